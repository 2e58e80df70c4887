//! # 监控配置
//!
//! TOML 配置文件，命令行参数优先于文件中的值。
//!
//! 配置文件路径：
//! - Linux: `~/.config/etee/monitor.toml`
//! - macOS: `~/Library/Application Support/etee/monitor.toml`
//! - Windows: `%APPDATA%\etee\monitor.toml`
//!
//! ```toml
//! channels = ["index_pull", "index_force", "quaternion"]
//! hands = ["left", "right"]
//! interval_ms = 50
//!
//! [osc]
//! host = "127.0.0.1"
//! port = 8000
//!
//! [[ranges]]
//! key = "index_pull"
//! mode = "exact"
//! min = 0
//! max = 100
//! ```

use crate::range::{ChannelRange, MatchMode, RangeError, RangeRule, RangeShape, RangeTable};
use etee_protocol::{Hand, InputCategory};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// 监控默认轮询间隔
pub const MONITOR_INTERVAL_MS: u64 = 50;
/// OSC 转发默认轮询间隔
pub const OSC_INTERVAL_MS: u64 = 100;

/// 监控配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// 显示/发送的通道（按此顺序）
    pub channels: Vec<String>,

    /// 显示/发送的手（按此顺序）
    pub hands: Vec<Hand>,

    /// 采集的输入类别；不设置时采集全部
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<InputCategory>>,

    /// 轮询间隔（ms）；不设置时监控用 50，OSC 用 100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,

    /// OSC 目标
    pub osc: OscConfig,

    /// 额外范围规则，优先于内置表
    pub ranges: Vec<RangeEntry>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            channels: [
                "index_pull",
                "index_force",
                "thumb_pull",
                "thumb_force",
                "middle_pull",
                "middle_force",
                "ring_pull",
                "ring_force",
                "pinky_pull",
                "pinky_force",
                "trackpad_x",
                "trackpad_y",
                "quaternion",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            hands: Hand::ALL.to_vec(),
            categories: None,
            interval_ms: None,
            osc: OscConfig::default(),
            ranges: Vec::new(),
        }
    }
}

impl MonitorConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("etee").join("monitor.toml"))
    }

    /// 从文件加载配置
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: MonitorConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 文件存在则加载，否则返回默认配置
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// 保存配置到文件（自动创建父目录）
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 基本校验：间隔非零、手列表非空、范围合法
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_ms == Some(0) {
            return Err(ConfigError::Invalid("interval_ms must be greater than 0".into()));
        }
        if self.hands.is_empty() {
            return Err(ConfigError::Invalid("hands must not be empty".into()));
        }
        for entry in &self.ranges {
            entry.to_rule()?;
        }
        Ok(())
    }

    /// 内置范围表，配置中的规则按书写顺序置于表头
    pub fn range_table(&self) -> Result<RangeTable, ConfigError> {
        let mut table = RangeTable::default();
        for entry in self.ranges.iter().rev() {
            table.prepend(entry.to_rule()?);
        }
        Ok(table)
    }

    /// 采集类别；未设置时为全部
    pub fn selected_categories(&self) -> Vec<InputCategory> {
        self.categories.clone().unwrap_or_else(|| InputCategory::ALL.to_vec())
    }

    pub fn monitor_interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.unwrap_or(MONITOR_INTERVAL_MS))
    }

    pub fn osc_interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.unwrap_or(OSC_INTERVAL_MS))
    }
}

/// OSC 目标地址
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscConfig {
    pub host: String,
    pub port: u16,
}

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// 配置文件中的一条范围规则
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeEntry {
    pub key: String,
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub mode: MatchMode,
    #[serde(default)]
    pub shape: RangeShape,
}

impl RangeEntry {
    pub fn to_rule(&self) -> Result<RangeRule, RangeError> {
        let range = ChannelRange::new(self.key.clone(), self.min, self.max)?;
        Ok(RangeRule::new(self.mode, self.shape, range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = MonitorConfig::default();
        assert_eq!(config.channels.len(), 13);
        assert_eq!(config.hands, vec![Hand::Left, Hand::Right]);
        assert_eq!(config.monitor_interval(), Duration::from_millis(50));
        assert_eq!(config.osc_interval(), Duration::from_millis(100));
        assert_eq!(config.osc.port, 8000);
        assert_eq!(config.selected_categories().len(), 6);
    }

    #[test]
    fn test_parse_partial_file() {
        let config: MonitorConfig = toml::from_str(
            r#"
            channels = ["trackpad_x"]
            hands = ["right"]
            categories = ["trackpad", "imu"]
            interval_ms = 20

            [osc]
            port = 9000
            "#,
        )
        .unwrap();

        assert_eq!(config.channels, vec!["trackpad_x"]);
        assert_eq!(config.hands, vec![Hand::Right]);
        assert_eq!(
            config.selected_categories(),
            vec![InputCategory::Trackpad, InputCategory::Imu]
        );
        assert_eq!(config.monitor_interval(), Duration::from_millis(20));
        assert_eq!(config.osc.host, "127.0.0.1");
        assert_eq!(config.osc.port, 9000);
    }

    #[test]
    fn test_range_entries_take_priority() {
        let config: MonitorConfig = toml::from_str(
            r#"
            [[ranges]]
            key = "index_pull"
            mode = "exact"
            min = 0
            max = 100

            [[ranges]]
            key = "euler"
            shape = "vector"
            min = -180
            max = 180
            "#,
        )
        .unwrap();

        let table = config.range_table().unwrap();
        assert_eq!(table.len(), 12);
        assert_eq!(table.scalar_range("index_pull"), (0.0, 100.0));
        assert_eq!(table.scalar_range("thumb_pull"), (0.0, 126.0));
        assert_eq!(table.vector_range("euler"), (-180.0, 180.0));
        // 书写顺序即优先级
        let keys: Vec<&str> = table.iter().take(2).map(|r| r.range.key()).collect();
        assert_eq!(keys, vec!["index_pull", "euler"]);
    }

    #[test]
    fn test_invalid_range_rejected() {
        let config = MonitorConfig {
            ranges: vec![RangeEntry {
                key: "pull".into(),
                min: 10.0,
                max: 0.0,
                mode: MatchMode::Contains,
                shape: RangeShape::Scalar,
            }],
            ..MonitorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Range(_))));
        assert!(config.range_table().is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = MonitorConfig {
            interval_ms: Some(0),
            ..MonitorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("monitor.toml");

        let config = MonitorConfig {
            channels: vec!["accel".into(), "battery_level".into()],
            interval_ms: Some(25),
            ..MonitorConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = MonitorConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempdir().unwrap();
        let config = MonitorConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, MonitorConfig::default());
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("monitor.toml");
        fs::write(&path, "channels = 5").unwrap();
        assert!(matches!(MonitorConfig::load(&path), Err(ConfigError::Parse(_))));
    }
}
