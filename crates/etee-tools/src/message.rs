//! # OSC 消息映射
//!
//! 把快照转换成 `(地址, 归一化值)` 序列并交给发送端。
//!
//! - 标量通道：`/<hand>/<channel>`
//! - 四元数：`/<hand>/<channel>/w|x|y|z`，不发送基地址
//! - 向量：`/<hand>/<channel>/<下标>`，不发送基地址
//!
//! 数值转换全部委托给 [`coerce_or_default`]。

use crate::normalize::{Normalized, coerce_or_default};
use crate::range::RangeTable;
use etee_protocol::{Hand, Snapshot};
use rosc::{OscPacket, OscType};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use thiserror::Error;
use tracing::{debug, info, warn};

/// 发送端错误
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OSC encode error: {0}")]
    Encode(String),

    #[error("Cannot resolve OSC target {0}")]
    Resolve(String),
}

/// 一条出站消息
#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage {
    pub address: String,
    pub value: f32,
}

impl OscMessage {
    pub fn new(address: impl Into<String>, value: f32) -> Self {
        Self {
            address: address.into(),
            value,
        }
    }
}

/// 出站传输：每条消息一次 `send`
pub trait MessageSink {
    fn send(&mut self, address: &str, value: f32) -> Result<(), SinkError>;
}

/// 一次批量发送的结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendReport {
    pub sent: usize,
    pub failed: usize,
}

/// 快照 → 消息映射器
#[derive(Debug, Clone)]
pub struct MessageMapper {
    channels: Vec<String>,
    hands: Vec<Hand>,
    ranges: RangeTable,
}

impl MessageMapper {
    pub fn new(channels: Vec<String>, hands: Vec<Hand>, ranges: RangeTable) -> Self {
        Self { channels, hands, ranges }
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn ranges(&self) -> &RangeTable {
        &self.ranges
    }

    /// 按“通道优先、再按手”的顺序生成消息；快照中没有的通道跳过
    pub fn map(&self, snapshot: &Snapshot) -> Vec<OscMessage> {
        let mut messages = Vec::new();

        for channel in &self.channels {
            for &hand in &self.hands {
                let Some(raw) = snapshot.get(hand, channel) else {
                    continue;
                };
                let base = format!("/{}/{}", hand.as_str(), channel);

                match coerce_or_default(raw, channel, &self.ranges) {
                    Normalized::Scalar(v) => messages.push(OscMessage::new(base, v as f32)),
                    Normalized::Components(components) => {
                        messages.extend(components.into_iter().map(|(label, v)| {
                            OscMessage::new(format!("{}/{}", base, label), v as f32)
                        }));
                    },
                }
            }
        }

        messages
    }

    /// 映射并逐条发送
    ///
    /// 单条发送失败只记录告警并计数，不中断后续消息。
    pub fn send_all<S>(&self, snapshot: &Snapshot, sink: &mut S) -> SendReport
    where
        S: MessageSink + ?Sized,
    {
        let mut report = SendReport::default();
        for message in self.map(snapshot) {
            match sink.send(&message.address, message.value) {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    warn!("Failed to send {}: {}", message.address, e);
                    report.failed += 1;
                },
            }
        }
        debug!("Sent {} messages ({} failed)", report.sent, report.failed);
        report
    }
}

/// 基于 UDP 的 OSC 发送端（编码由 rosc 完成）
#[derive(Debug)]
pub struct OscUdpSink {
    socket: UdpSocket,
    target: SocketAddr,
}

impl OscUdpSink {
    /// 解析目标地址并绑定本地临时端口
    pub fn connect(host: &str, port: u16) -> Result<Self, SinkError> {
        let target = (host, port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| SinkError::Resolve(format!("{}:{}", host, port)))?;

        let bind_addr: SocketAddr = if target.is_ipv4() {
            ([0u8; 4], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(bind_addr)?;

        info!("OSC sink ready, sending to {}", target);
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl MessageSink for OscUdpSink {
    fn send(&mut self, address: &str, value: f32) -> Result<(), SinkError> {
        let packet = OscPacket::Message(rosc::OscMessage {
            addr: address.to_string(),
            args: vec![OscType::Float(value)],
        });
        let buf = rosc::encoder::encode(&packet).map_err(|e| SinkError::Encode(format!("{:?}", e)))?;
        self.socket.send_to(&buf, self.target)?;
        Ok(())
    }
}

/// 内存发送端（测试和 `--dry-run` 使用）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSink {
    messages: Vec<OscMessage>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[OscMessage] {
        &self.messages
    }

    /// 取出已记录的消息并清空
    pub fn drain(&mut self) -> Vec<OscMessage> {
        std::mem::take(&mut self.messages)
    }
}

impl MessageSink for RecordingSink {
    fn send(&mut self, address: &str, value: f32) -> Result<(), SinkError> {
        self.messages.push(OscMessage::new(address, value));
        Ok(())
    }
}
