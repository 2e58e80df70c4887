//! 逐手指命令
//!
//! 只采集手指类别，打印双手五指的 pull/force。

use super::{DongleArgs, SelectionArgs, load_config, run_polling};
use anyhow::Result;
use clap::Args;
use etee_driver::PollConfig;
use etee_protocol::InputCategory;
use etee_tools::{format_finger_line, format_finger_table};
use std::path::Path;
use std::process::ExitCode;

/// 逐手指命令参数
#[derive(Args, Debug)]
pub struct FingersCommand {
    /// 以表格形式打印（每个周期一张表）
    #[arg(long)]
    pub table: bool,

    /// 轮询间隔（ms）
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// 运行的周期数
    #[arg(long)]
    pub cycles: Option<u64>,

    #[command(flatten)]
    pub dongle: DongleArgs,
}

impl FingersCommand {
    pub fn execute(&self, config_path: Option<&Path>) -> Result<ExitCode> {
        let selection = SelectionArgs {
            categories: Some(vec![InputCategory::Fingers]),
            interval_ms: self.interval_ms,
            cycles: self.cycles,
            ..SelectionArgs::default()
        };
        let mut config = load_config(config_path)?;
        selection.apply(&mut config);
        config.validate()?;

        // 右手未检测到时提示重连，本周期不输出
        let probe = Some(PollConfig::DEFAULT_PROBE);
        let interval = config.monitor_interval();
        run_polling(&config, &selection, &self.dongle, interval, probe, |snapshot| {
            if self.table {
                println!("{}", format_finger_table(snapshot));
            } else {
                println!("{}", format_finger_line(snapshot));
            }
            Ok(())
        })
    }
}
