//! # etee CLI
//!
//! Command-line monitor and OSC bridge for etee glove controllers.
//!
//! ```bash
//! # 每 50ms 打印一行原始读数
//! etee-cli monitor --channels index_pull,index_force --hands right
//!
//! # 归一化后通过 OSC 发送（同时打印显示行）
//! etee-cli osc --host 192.168.1.125 --port 8000 --channels trackpad_x
//!
//! # 逐手指 pull/force
//! etee-cli fingers --table
//!
//! # 生成默认配置文件
//! etee-cli config init
//! ```
//!
//! 退出码：Ctrl+C 为 0；dongle 断开为 1。

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

use commands::{ConfigCommand, FingersCommand, MonitorCommand, OscCommand};

/// etee CLI - 手套控制器监控工具
#[derive(Parser, Debug)]
#[command(name = "etee-cli")]
#[command(about = "Monitor etee glove controllers and forward readings over OSC", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认 `<config_dir>/etee/monitor.toml`）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 打印原始读数
    Monitor {
        #[command(flatten)]
        args: MonitorCommand,
    },

    /// 通过 OSC 发送归一化读数
    Osc {
        #[command(flatten)]
        args: OscCommand,
    },

    /// 逐手指 pull/force
    Fingers {
        #[command(flatten)]
        args: FingersCommand,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<ExitCode> {
    // 初始化日志（输出到 stderr，stdout 只保留数据行）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("etee_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Monitor { args } => args.execute(config_path),
        Commands::Osc { args } => args.execute(config_path),
        Commands::Fingers { args } => args.execute(config_path),
        Commands::Config(cmd) => {
            cmd.execute(config_path)?;
            Ok(ExitCode::SUCCESS)
        },
    }
}
