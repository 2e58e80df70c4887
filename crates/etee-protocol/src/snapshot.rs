//! 轮询快照
//!
//! 一个轮询周期内双手全部通道的原始读数（hand → channel → value）。
//! 快照不跨周期保留，每次轮询重新构建。

use crate::{Hand, RawValue};

/// 单只手的读数，保持插入顺序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandReadings {
    entries: Vec<(String, RawValue)>,
}

impl HandReadings {
    /// 插入或覆盖一个通道的读数（覆盖时保留原位置）
    pub fn insert(&mut self, channel: impl Into<String>, value: RawValue) {
        let channel = channel.into();
        match self.entries.iter_mut().find(|(name, _)| *name == channel) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((channel, value)),
        }
    }

    pub fn get(&self, channel: &str) -> Option<&RawValue> {
        self.entries.iter().find(|(name, _)| name == channel).map(|(_, v)| v)
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.get(channel).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(name, v)| (name.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 一次轮询的双手快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    left: HandReadings,
    right: HandReadings,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 链式插入，便于测试和手工构造
    pub fn with(mut self, hand: Hand, channel: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(hand, channel, value.into());
        self
    }

    pub fn insert(&mut self, hand: Hand, channel: impl Into<String>, value: RawValue) {
        self.hand_mut(hand).insert(channel, value);
    }

    /// 读取某只手某通道的值
    ///
    /// 返回 `None` 表示该通道未被采集；`Some(RawValue::Absent)` 表示已采集但本周期无数据。
    pub fn get(&self, hand: Hand, channel: &str) -> Option<&RawValue> {
        self.hand(hand).get(channel)
    }

    pub fn contains(&self, hand: Hand, channel: &str) -> bool {
        self.hand(hand).contains(channel)
    }

    pub fn hand(&self, hand: Hand) -> &HandReadings {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }

    fn hand_mut(&mut self, hand: Hand) -> &mut HandReadings {
        match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        }
    }

    /// 双手读数总数
    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}
