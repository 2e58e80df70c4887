//! 配置管理命令
//!
//! 查看、生成配置文件。

use super::{load_config, resolve_config_path};
use anyhow::{Context, Result};
use clap::Subcommand;
use etee_tools::MonitorConfig;
use std::path::Path;

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 打印生效的配置（TOML）
    Show,

    /// 写入默认配置文件
    Init {
        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },

    /// 打印配置文件路径
    Path,
}

impl ConfigCommand {
    pub fn execute(self, config_path: Option<&Path>) -> Result<()> {
        match self {
            ConfigCommand::Show => Self::show_(config_path),
            ConfigCommand::Init { force } => Self::init_(config_path, force),
            ConfigCommand::Path => Self::path_(config_path),
        }
    }

    fn show_(config_path: Option<&Path>) -> Result<()> {
        let config = load_config(config_path)?;
        print!("{}", config.to_toml()?);
        Ok(())
    }

    fn init_(config_path: Option<&Path>, force: bool) -> Result<()> {
        let path = resolve_config_path(config_path)?;
        if path.exists() && !force {
            anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
        }

        MonitorConfig::default()
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote default config to {}", path.display());
        Ok(())
    }

    fn path_(config_path: Option<&Path>) -> Result<()> {
        let path = resolve_config_path(config_path)?;
        println!("{}", path.display());
        Ok(())
    }
}
