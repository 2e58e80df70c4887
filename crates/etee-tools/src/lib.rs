//! # etee Tools - 快照处理流水线
//!
//! **依赖原则**: 只依赖 `etee-protocol`，不依赖驱动层
//!
//! ## 包含模块
//!
//! - `range` - 通道范围表（有序规则，首个匹配生效）
//! - `normalize` - 归一化到 `[0, 1]`（永不失败）
//! - `display` - 固定格式文本行
//! - `message` - OSC 地址映射与发送端
//! - `config` - TOML 配置
//!
//! ## 使用示例
//!
//! ```
//! use etee_protocol::{Hand, Snapshot};
//! use etee_tools::{MessageMapper, RangeTable};
//!
//! let snapshot = Snapshot::new()
//!     .with(Hand::Left, "index_pull", 63i64)
//!     .with(Hand::Right, "index_pull", None::<i64>);
//!
//! let mapper = MessageMapper::new(vec!["index_pull".into()], Hand::ALL.to_vec(), RangeTable::default());
//! let messages = mapper.map(&snapshot);
//! assert_eq!(messages[0].address, "/left/index_pull");
//! assert_eq!(messages[0].value, 0.5);
//! assert_eq!(messages[1].value, 0.0);
//! ```

pub mod config;
pub mod display;
pub mod message;
pub mod normalize;
pub mod range;

// 重新导出常用类型
pub use config::{ConfigError, MonitorConfig, OscConfig, RangeEntry};
pub use display::{
    DisplayFormatter, format_finger_line, format_finger_line_at, format_finger_table, format_timestamp,
    format_value, timestamp_now,
};
pub use message::{
    MessageMapper, MessageSink, OscMessage, OscUdpSink, RecordingSink, SendReport, SinkError,
};
pub use normalize::{ComponentLabel, Normalized, coerce_or_default, normalize};
pub use range::{ChannelRange, MatchMode, RangeError, RangeRule, RangeShape, RangeTable};
