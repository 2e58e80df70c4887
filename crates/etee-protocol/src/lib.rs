//! # etee Protocol
//!
//! etee 手套控制器的数据模型定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `channel`: 通道目录（手指、触控板、滑条、手势、IMU、系统状态）
//! - `value`: 单个通道的原始读数形态
//! - `snapshot`: 一次轮询得到的双手快照
//!
//! 驱动层（`etee-driver`）负责产生快照，工具层（`etee-tools`）负责归一化与格式化。

pub mod channel;
pub mod snapshot;
pub mod value;

// 重新导出常用类型
pub use channel::{ChannelId, ChannelKind, Finger, FingerField, InputCategory};
pub use snapshot::Snapshot;
pub use value::RawValue;

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 数据模型解析错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Invalid hand: {0} (expected left or right)")]
    InvalidHand(String),

    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    #[error("Invalid input category: {0}")]
    InvalidCategory(String),

    #[error("Invalid finger: {0}")]
    InvalidFinger(String),
}

/// 左右手
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// 固定的遍历顺序：先左后右
    pub const ALL: [Hand; 2] = [Hand::Left, Hand::Right];

    /// 小写名称，用于 OSC 地址（`/left/...`）
    pub fn as_str(&self) -> &'static str {
        match self {
            Hand::Left => "left",
            Hand::Right => "right",
        }
    }

    /// 大写首字母，用于显示行前缀（`L_index_pull`）
    pub fn initial(&self) -> char {
        match self {
            Hand::Left => 'L',
            Hand::Right => 'R',
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hand {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Hand::Left),
            "right" | "r" => Ok(Hand::Right),
            _ => Err(ProtocolError::InvalidHand(s.to_string())),
        }
    }
}
