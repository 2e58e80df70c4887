//! 驱动层错误类型定义

use etee_protocol::{ChannelId, Hand};
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// 未找到 dongle（可用端口数为 0）
    #[error("No etee dongle found")]
    NoDongle,

    /// 尚未调用 `connect()`
    #[error("Not connected to dongle")]
    NotConnected,

    /// 数据流尚未启动（需先调用 `start_data()`）
    #[error("Data stream not started")]
    StreamNotStarted,

    /// 通道读取失败
    #[error("Channel {channel} unavailable on {hand} hand")]
    ChannelUnavailable { hand: Hand, channel: ChannelId },

    /// 数据线程错误
    #[error("Data loop thread error: {0}")]
    Thread(String),
}
