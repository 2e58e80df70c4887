//! 驱动层模块
//!
//! 本模块提供 etee 手套控制器的访问功能，包括：
//! - 驱动抽象（[`EteeDriver`]）：连接、启停数据流、按通道读取
//! - 快照采集：按输入类别组装一个周期的双手读数
//! - 轮询循环：断开检测、控制器重连请求、协作式中断
//! - 模拟 dongle（`simulated` feature）：后台数据线程 + 无锁状态
//!
//! # 使用场景
//!
//! ```
//! use etee_driver::{EteeDriver, PollConfig, PollEvent, PollLoop, SimulatedDongle};
//! use std::sync::atomic::AtomicBool;
//! use std::time::Duration;
//!
//! let mut dongle = SimulatedDongle::new();
//! let poll = PollLoop::new(PollConfig {
//!     interval: Duration::from_millis(1),
//!     settle: Duration::ZERO,
//!     max_cycles: Some(3),
//!     ..PollConfig::default()
//! });
//!
//! poll.start(&mut dongle).unwrap();
//! let running = AtomicBool::new(true);
//! let outcome = poll
//!     .run(&mut dongle, &running, |event| {
//!         if let PollEvent::Snapshot(snapshot) = event {
//!             assert!(!snapshot.is_empty());
//!         }
//!     })
//!     .unwrap();
//! assert_eq!(outcome.cycles(), 3);
//! ```

pub mod collect;
mod driver;
mod error;
pub mod poll;
#[cfg(feature = "simulated")]
pub mod simulated;

pub use collect::{collect_channels, collect_snapshot, read_or_absent};
pub use driver::EteeDriver;
pub use error::DriverError;
pub use poll::{LoopOutcome, PollConfig, PollEvent, PollLoop};
#[cfg(feature = "simulated")]
pub use simulated::{DongleHandle, HandState, SimulatedDongle, SimulatedDongleBuilder};

// 重新导出数据模型，调用方无需直接依赖 etee-protocol
pub use etee_protocol::{ChannelId, Hand, InputCategory, RawValue, Snapshot};
