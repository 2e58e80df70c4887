//! 命令定义和实现

pub mod config;
pub mod fingers;
pub mod monitor;
pub mod osc;

pub use config::ConfigCommand;
pub use fingers::FingersCommand;
pub use monitor::MonitorCommand;
pub use osc::OscCommand;

use anyhow::{Context, Result};
use clap::Args;
use etee_driver::{
    DriverError, LoopOutcome, PollConfig, PollEvent, PollLoop, SimulatedDongleBuilder, Snapshot,
};
use etee_protocol::{ChannelId, Hand, InputCategory};
use etee_tools::{MonitorConfig, timestamp_now};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{info, warn};

/// 通道/手/类别选择（覆盖配置文件）
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// 通道列表（逗号分隔，如 index_pull,quaternion）
    #[arg(long, value_delimiter = ',')]
    pub channels: Option<Vec<String>>,

    /// 手（left,right）
    #[arg(long, value_delimiter = ',')]
    pub hands: Option<Vec<Hand>>,

    /// 采集的输入类别（fingers,trackpad,slider,gestures,imu,system）
    #[arg(long, value_delimiter = ',')]
    pub categories: Option<Vec<InputCategory>>,

    /// 轮询间隔（ms）
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// 运行的周期数（不指定时一直运行到 Ctrl+C）
    #[arg(long)]
    pub cycles: Option<u64>,
}

impl SelectionArgs {
    /// 把命令行参数合并进配置
    pub fn apply(&self, config: &mut MonitorConfig) {
        if let Some(channels) = &self.channels {
            config.channels = channels.clone();
        }
        if let Some(hands) = &self.hands {
            config.hands = hands.clone();
        }
        if let Some(categories) = &self.categories {
            config.categories = Some(categories.clone());
        }
        if let Some(interval) = self.interval_ms {
            config.interval_ms = Some(interval);
        }
    }
}

/// 模拟 dongle 参数
#[derive(Args, Debug, Clone)]
#[command(next_help_heading = "Simulated dongle")]
pub struct DongleArgs {
    /// 模拟未插入 dongle
    #[arg(long)]
    pub no_dongle: bool,

    /// 运行 N 个周期后模拟拔出 dongle
    #[arg(long)]
    pub unplug_after: Option<u64>,

    /// connect 与 start_data 之间的等待时间（ms）
    #[arg(long, default_value_t = 1000)]
    pub settle_ms: u64,

    /// 模拟离线的控制器（left,right）
    #[arg(long, value_delimiter = ',')]
    pub offline: Vec<Hand>,
}

/// 加载配置：显式路径必须存在，默认路径不存在时使用默认配置
pub fn load_config(path: Option<&Path>) -> Result<MonitorConfig> {
    match path {
        Some(path) => MonitorConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => match MonitorConfig::default_path() {
            Some(path) => MonitorConfig::load_or_default(&path)
                .with_context(|| format!("Failed to load config from {}", path.display())),
            None => Ok(MonitorConfig::default()),
        },
    }
}

/// 配置文件路径：显式路径优先
pub fn resolve_config_path(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => MonitorConfig::default_path()
            .ok_or_else(|| anyhow::anyhow!("Cannot determine config directory")),
    }
}

/// 未知通道名只提示，不拒绝（快照中没有的通道会被跳过）
pub fn warn_unknown_channels(channels: &[String]) {
    for channel in channels {
        if channel.parse::<ChannelId>().is_err() {
            warn!("Unknown channel '{}' will never appear in snapshots", channel);
        }
    }
}

/// 连接模拟 dongle 并运行轮询循环，每个快照调用一次 `on_snapshot`
///
/// `probe` 为 `None` 时不检测控制器在线状态，缺失的读数照常作为 `---` / 0 输出。
/// 返回进程退出码：Ctrl+C / 周期结束为 0，dongle 断开为 1。
pub fn run_polling<F>(
    config: &MonitorConfig,
    selection: &SelectionArgs,
    dongle_args: &DongleArgs,
    interval: Duration,
    probe: Option<(Hand, ChannelId)>,
    mut on_snapshot: F,
) -> Result<ExitCode>
where
    F: FnMut(&Snapshot) -> Result<()>,
{
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
        println!("\nStopping data collection...");
    })?;

    let mut dongle = SimulatedDongleBuilder::new()
        .ports(if dongle_args.no_dongle { 0 } else { 1 })
        .build();
    let handle = dongle.handle();
    for &hand in &dongle_args.offline {
        handle.set_hand_online(hand, false);
    }

    let poll = PollLoop::new(PollConfig {
        interval,
        settle: Duration::from_millis(dongle_args.settle_ms),
        categories: config.selected_categories(),
        probe,
        max_cycles: selection.cycles,
    });

    match poll.start(&mut dongle) {
        Err(DriverError::NoDongle) => {
            anyhow::bail!("{}. Please insert the dongle and restart.", DriverError::NoDongle)
        },
        other => other.context("Failed to start data stream")?,
    }

    let mut snapshots = 0u64;
    let mut callback_error = None;

    let outcome = poll.run(&mut dongle, &running, |event| match event {
        PollEvent::Snapshot(snapshot) => {
            if let Err(e) = on_snapshot(snapshot) {
                warn!("Output failed: {:#}", e);
                callback_error.get_or_insert(e);
                running.store(false, Ordering::SeqCst);
            }
            snapshots += 1;
            if dongle_args.unplug_after == Some(snapshots) {
                handle.unplug();
            }
        },
        PollEvent::ControllerMissing { hand } => {
            println!("---");
            println!(
                "{} {} etee controller not detected. Please reconnect controller.",
                timestamp_now(),
                capitalize(hand.as_str())
            );
        },
    })?;

    if let Some(e) = callback_error {
        return Err(e);
    }

    if let LoopOutcome::Disconnected { .. } = outcome {
        println!("Dongle disconnected. Please reconnect and restart.");
    }
    info!("Stopped after {} cycles", outcome.cycles());

    Ok(ExitCode::from(outcome.exit_code() as u8))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
