//! OSC 转发命令
//!
//! 归一化后按 `/<hand>/<channel>` 发送，同时打印显示行。

use super::{DongleArgs, SelectionArgs, load_config, run_polling, warn_unknown_channels};
use anyhow::{Context, Result};
use clap::Args;
use etee_tools::{DisplayFormatter, MessageMapper, OscUdpSink, RecordingSink};
use std::path::Path;
use std::process::ExitCode;

/// OSC 命令参数
#[derive(Args, Debug)]
pub struct OscCommand {
    /// OSC 目标主机（覆盖配置）
    #[arg(long)]
    pub host: Option<String>,

    /// OSC 目标端口（覆盖配置）
    #[arg(long)]
    pub port: Option<u16>,

    /// 不发送，只打印将要发送的消息
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub dongle: DongleArgs,
}

impl OscCommand {
    pub fn execute(&self, config_path: Option<&Path>) -> Result<ExitCode> {
        let mut config = load_config(config_path)?;
        self.selection.apply(&mut config);
        if let Some(host) = &self.host {
            config.osc.host = host.clone();
        }
        if let Some(port) = self.port {
            config.osc.port = port;
        }
        config.validate()?;
        warn_unknown_channels(&config.channels);

        let ranges = config.range_table()?;
        let mapper = MessageMapper::new(config.channels.clone(), config.hands.clone(), ranges);
        let formatter = DisplayFormatter::new(config.channels.clone(), config.hands.clone());

        let mut udp = if self.dry_run {
            None
        } else {
            let sink = OscUdpSink::connect(&config.osc.host, config.osc.port).with_context(|| {
                format!("Failed to open OSC target {}:{}", config.osc.host, config.osc.port)
            })?;
            Some(sink)
        };
        let mut recording = RecordingSink::new();

        println!("Sending OSC data to {}:{}", config.osc.host, config.osc.port);
        println!("OSC addresses format: /<hand>/<sensor>");
        println!("Press Ctrl+C to stop");

        let interval = config.osc_interval();
        run_polling(&config, &self.selection, &self.dongle, interval, None, |snapshot| {
            match udp.as_mut() {
                Some(sink) => {
                    mapper.send_all(snapshot, sink);
                },
                None => {
                    mapper.send_all(snapshot, &mut recording);
                    for message in recording.drain() {
                        println!("{} {:.3}", message.address, message.value);
                    }
                },
            }
            println!("{}", formatter.format_line(snapshot));
            Ok(())
        })
    }
}

