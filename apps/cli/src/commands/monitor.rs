//! 监控命令
//!
//! 每个周期打印一行原始读数。

use super::{DongleArgs, SelectionArgs, load_config, run_polling, warn_unknown_channels};
use anyhow::Result;
use clap::Args;
use etee_tools::DisplayFormatter;
use std::path::Path;
use std::process::ExitCode;

/// 监控命令参数
#[derive(Args, Debug)]
pub struct MonitorCommand {
    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub dongle: DongleArgs,
}

impl MonitorCommand {
    pub fn execute(&self, config_path: Option<&Path>) -> Result<ExitCode> {
        let mut config = load_config(config_path)?;
        self.selection.apply(&mut config);
        config.validate()?;
        warn_unknown_channels(&config.channels);

        let formatter = DisplayFormatter::new(config.channels.clone(), config.hands.clone());
        println!("Press Ctrl+C to stop");

        let interval = config.monitor_interval();
        run_polling(&config, &self.selection, &self.dongle, interval, None, |snapshot| {
            println!("{}", formatter.format_line(snapshot));
            Ok(())
        })
    }
}
