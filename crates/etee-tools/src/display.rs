//! # 显示格式
//!
//! 把快照渲染成一行固定格式文本，供人工监控。这里显示的是原始值，不做归一化。
//!
//! ```text
//! 14:03:27.512034 | L_index_pull: 63 | R_index_pull:--- | L_quaternion:[ 1.000, 0.000, 0.000, 0.000]
//! ```

use chrono::{Local, NaiveTime};
use etee_protocol::{Finger, Hand, RawValue, Snapshot};
use std::fmt::Write;

/// 缺失值占位
pub const MISSING: &str = "---";

/// 字段分隔符
pub const SEPARATOR: &str = " | ";

/// 格式化单个原始值
///
/// ```
/// use etee_protocol::RawValue;
/// use etee_tools::format_value;
///
/// assert_eq!(format_value(&RawValue::Int(5)), "  5");
/// assert_eq!(format_value(&RawValue::Absent), "---");
/// assert_eq!(format_value(&RawValue::Bool(true)), "1");
/// ```
pub fn format_value(raw: &RawValue) -> String {
    match raw {
        RawValue::Absent => MISSING.to_string(),
        RawValue::Bool(b) => u8::from(*b).to_string(),
        RawValue::Int(v) => format!("{:>3}", v),
        // 浮点保留最短表示（1.5、2.0），再右对齐到 3 位
        RawValue::Float(v) => format!("{:>3}", float_repr(*v)),
        RawValue::Quaternion(q) => {
            format!("[{:>6.3},{:>6.3},{:>6.3},{:>6.3}]", q.w, q.i, q.j, q.k)
        },
        RawValue::Vector(components) => {
            let parts: Vec<String> = components
                .iter()
                .map(|c| match c {
                    Some(v) => format!("{:>5.2}", v),
                    None => MISSING.to_string(),
                })
                .collect();
            format!("[{}]", parts.join(","))
        },
        RawValue::Other(s) => s.clone(),
    }
}

/// 时间戳：`时:分:秒.微秒`
pub fn format_timestamp(time: NaiveTime) -> String {
    time.format("%H:%M:%S%.6f").to_string()
}

/// 当前本地时间的时间戳
pub fn timestamp_now() -> String {
    format_timestamp(Local::now().time())
}

/// 单行显示格式器
///
/// 字段顺序：先按通道，再按手；快照中没有的通道直接跳过。
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFormatter {
    channels: Vec<String>,
    hands: Vec<Hand>,
}

impl DisplayFormatter {
    pub fn new(channels: Vec<String>, hands: Vec<Hand>) -> Self {
        Self { channels, hands }
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    /// 以当前本地时间格式化（时间戳在格式化时采集，而非轮询时）
    pub fn format_line(&self, snapshot: &Snapshot) -> String {
        self.format_line_at(snapshot, Local::now().time())
    }

    /// 以给定时间格式化
    pub fn format_line_at(&self, snapshot: &Snapshot, time: NaiveTime) -> String {
        let mut line = format_timestamp(time);
        for token in self.tokens(snapshot) {
            line.push_str(SEPARATOR);
            line.push_str(&token);
        }
        line
    }

    /// `<H>_<channel>:<value>` 字段
    pub fn tokens(&self, snapshot: &Snapshot) -> Vec<String> {
        let mut tokens = Vec::new();
        for channel in &self.channels {
            for &hand in &self.hands {
                if let Some(value) = snapshot.get(hand, channel) {
                    tokens.push(format!("{}_{}:{}", hand.initial(), channel, format_value(value)));
                }
            }
        }
        tokens
    }
}

/// 浮点的最短表示，指数部分带符号且至少两位（`1e+20`、`1e-05`）
fn float_repr(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    let repr = format!("{:?}", v);
    match repr.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        },
        None => repr,
    }
}

fn finger_value(snapshot: &Snapshot, hand: Hand, finger: Finger, field: &str) -> String {
    let channel = format!("{}_{}", finger.as_str(), field);
    format_value(snapshot.get(hand, &channel).unwrap_or(&RawValue::Absent))
}

/// 以当前本地时间格式化逐手指单行
pub fn format_finger_line(snapshot: &Snapshot) -> String {
    format_finger_line_at(snapshot, Local::now().time())
}

/// 逐手指的 pull/force 单行
///
/// ```text
/// 14:03:27.512034 | Thumb  L: pull= 12 force=  0 R: pull= 40 force=  0 | Index  L: ...
/// ```
pub fn format_finger_line_at(snapshot: &Snapshot, time: NaiveTime) -> String {
    let mut line = format_timestamp(time);
    for finger in Finger::ALL {
        let _ = write!(
            line,
            "{}{:<6} L: pull={} force={} R: pull={} force={}",
            SEPARATOR,
            finger.label(),
            finger_value(snapshot, Hand::Left, finger, "pull"),
            finger_value(snapshot, Hand::Left, finger, "force"),
            finger_value(snapshot, Hand::Right, finger, "pull"),
            finger_value(snapshot, Hand::Right, finger, "force"),
        );
    }
    line
}

/// 逐手指表格：表头、分隔线、每根手指一行
pub fn format_finger_table(snapshot: &Snapshot) -> String {
    let header = format!(
        "{:<8}{:>8}{:>8}{:>8}{:>8}",
        "Finger", "L pull", "L force", "R pull", "R force"
    );
    let mut table = String::new();
    let _ = writeln!(table, "{}", header);
    let _ = writeln!(table, "{}", "-".repeat(header.len()));
    for finger in Finger::ALL {
        let _ = writeln!(
            table,
            "{:<8}{:>8}{:>8}{:>8}{:>8}",
            finger.label(),
            finger_value(snapshot, Hand::Left, finger, "pull"),
            finger_value(snapshot, Hand::Left, finger, "force"),
            finger_value(snapshot, Hand::Right, finger, "pull"),
            finger_value(snapshot, Hand::Right, finger, "force"),
        );
    }
    table
}
