//! # 通道范围表
//!
//! 每个通道族（`pull`、`force`、`accel` ...）对应一个 `[min, max]` 原始范围，
//! 归一化时按此范围做仿射映射。
//!
//! 查找规则是显式有序的：从上到下依次匹配，首个命中的规则生效。
//! 标量查找只看标量规则，向量查找只看向量规则，因此 `trackpad_pull`
//! 命中 `pull`，而 `accel` 永远不会作用于标量读数。

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 范围定义错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("Invalid range for '{key}': min ({min}) must be less than max ({max})")]
    Inverted { key: String, min: f64, max: f64 },

    #[error("Range key must not be empty")]
    EmptyKey,
}

/// 单个通道族的归一化范围（保证 `min < max`）
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelRange {
    key: String,
    min: f64,
    max: f64,
}

impl ChannelRange {
    /// 创建范围；`min >= max` 或任一端为 NaN 时返回错误
    pub fn new(key: impl Into<String>, min: f64, max: f64) -> Result<Self, RangeError> {
        let key = key.into();
        if key.is_empty() {
            return Err(RangeError::EmptyKey);
        }
        if min.is_nan() || max.is_nan() || min >= max {
            return Err(RangeError::Inverted { key, min, max });
        }
        Ok(Self { key, min, max })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

impl fmt::Display for ChannelRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}..{}", self.key, self.min, self.max)
    }
}

/// 通道名与 key 的匹配方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// 通道名完全等于 key
    Exact,
    /// 通道名包含 key
    #[default]
    Contains,
}

/// 规则适用的读数形状
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeShape {
    /// 整数/浮点标量
    #[default]
    Scalar,
    /// 数值向量（逐分量）
    Vector,
}

/// 一条有序规则
#[derive(Debug, Clone, PartialEq)]
pub struct RangeRule {
    pub mode: MatchMode,
    pub shape: RangeShape,
    pub range: ChannelRange,
}

impl RangeRule {
    pub fn new(mode: MatchMode, shape: RangeShape, range: ChannelRange) -> Self {
        Self { mode, shape, range }
    }

    pub fn matches(&self, channel: &str) -> bool {
        match self.mode {
            MatchMode::Exact => channel == self.range.key(),
            MatchMode::Contains => channel.contains(self.range.key()),
        }
    }
}

/// 有序范围表
///
/// # Example
///
/// ```
/// use etee_tools::RangeTable;
///
/// let table = RangeTable::default();
/// assert_eq!(table.scalar_range("index_pull"), (0.0, 126.0));
/// assert_eq!(table.scalar_range("trackpad_x"), (0.0, 255.0));
/// assert_eq!(table.vector_range("accel"), (-2.0, 2.0));
/// assert_eq!(table.vector_range("euler"), (-1.0, 1.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RangeTable {
    rules: Vec<RangeRule>,
}

impl RangeTable {
    /// 未匹配标量的默认范围
    pub const DEFAULT_SCALAR: (f64, f64) = (0.0, 126.0);
    /// 未匹配向量的默认范围
    pub const DEFAULT_VECTOR: (f64, f64) = (-1.0, 1.0);

    /// 空表（所有查找都落到默认范围）
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// 追加规则（最低优先级）
    pub fn push(&mut self, rule: RangeRule) {
        self.rules.push(rule);
    }

    /// 插入规则到表头（最高优先级）
    pub fn prepend(&mut self, rule: RangeRule) {
        self.rules.insert(0, rule);
    }

    pub fn iter(&self) -> impl Iterator<Item = &RangeRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 按形状查找首个匹配的规则
    pub fn lookup(&self, channel: &str, shape: RangeShape) -> Option<&ChannelRange> {
        self.rules
            .iter()
            .find(|rule| rule.shape == shape && rule.matches(channel))
            .map(|rule| &rule.range)
    }

    /// 标量通道的 `(min, max)`
    pub fn scalar_range(&self, channel: &str) -> (f64, f64) {
        self.lookup(channel, RangeShape::Scalar)
            .map(|r| (r.min(), r.max()))
            .unwrap_or(Self::DEFAULT_SCALAR)
    }

    /// 向量通道（每个分量）的 `(min, max)`
    pub fn vector_range(&self, channel: &str) -> (f64, f64) {
        self.lookup(channel, RangeShape::Vector)
            .map(|r| (r.min(), r.max()))
            .unwrap_or(Self::DEFAULT_VECTOR)
    }
}

/// 内置表项：`(key, shape, min, max)`，顺序即优先级
const DEFAULT_RULES: [(&str, RangeShape, f64, f64); 10] = [
    ("pull", RangeShape::Scalar, 0.0, 126.0),
    ("force", RangeShape::Scalar, 0.0, 126.0),
    ("trackpad_x", RangeShape::Scalar, 0.0, 255.0),
    ("trackpad_y", RangeShape::Scalar, 0.0, 255.0),
    ("slider_value", RangeShape::Scalar, 0.0, 126.0),
    ("battery_level", RangeShape::Scalar, 0.0, 100.0),
    ("proximity", RangeShape::Scalar, 0.0, 126.0),
    // 加速度 ±2g
    ("accel", RangeShape::Vector, -2.0, 2.0),
    // 角速度 ±250 deg/s
    ("gyro", RangeShape::Vector, -250.0, 250.0),
    // 磁场 ±4900 µT
    ("mag", RangeShape::Vector, -4900.0, 4900.0),
];

impl Default for RangeTable {
    fn default() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .map(|&(key, shape, min, max)| RangeRule {
                mode: MatchMode::Contains,
                shape,
                range: ChannelRange { key: key.to_string(), min, max },
            })
            .collect();
        Self { rules }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_range_rejected() {
        assert!(matches!(
            ChannelRange::new("pull", 126.0, 0.0),
            Err(RangeError::Inverted { .. })
        ));
        assert!(ChannelRange::new("pull", 1.0, 1.0).is_err());
        assert!(ChannelRange::new("pull", f64::NAN, 1.0).is_err());
        assert_eq!(ChannelRange::new("", 0.0, 1.0), Err(RangeError::EmptyKey));
    }

    #[test]
    fn test_default_table_order() {
        let table = RangeTable::default();
        let keys: Vec<&str> = table.iter().map(|r| r.range.key()).collect();
        assert_eq!(
            keys,
            vec![
                "pull",
                "force",
                "trackpad_x",
                "trackpad_y",
                "slider_value",
                "battery_level",
                "proximity",
                "accel",
                "gyro",
                "mag"
            ]
        );
    }

    #[test]
    fn test_scalar_families() {
        let table = RangeTable::default();
        assert_eq!(table.scalar_range("thumb_force"), (0.0, 126.0));
        assert_eq!(table.scalar_range("trackpad_y"), (0.0, 255.0));
        assert_eq!(table.scalar_range("battery_level"), (0.0, 100.0));
        assert_eq!(table.scalar_range("proximity"), (0.0, 126.0));
        // trackpad_pull 属于 pull 族，而不是 trackpad_x/y
        assert_eq!(table.scalar_range("trackpad_pull"), (0.0, 126.0));
    }

    #[test]
    fn test_shapes_do_not_mix() {
        let table = RangeTable::default();
        // 标量查找不会命中向量规则
        assert_eq!(table.scalar_range("accel"), RangeTable::DEFAULT_SCALAR);
        // 向量查找不会命中标量规则
        assert_eq!(table.vector_range("pull"), RangeTable::DEFAULT_VECTOR);
        assert_eq!(table.vector_range("gyro"), (-250.0, 250.0));
        assert_eq!(table.vector_range("mag"), (-4900.0, 4900.0));
    }

    #[test]
    fn test_first_match_wins() {
        let mut table = RangeTable::default();
        table.push(RangeRule::new(
            MatchMode::Exact,
            RangeShape::Scalar,
            ChannelRange::new("index_pull", 0.0, 10.0).unwrap(),
        ));
        // 追加在末尾，被前面的 pull 规则遮蔽
        assert_eq!(table.scalar_range("index_pull"), (0.0, 126.0));

        table.prepend(RangeRule::new(
            MatchMode::Exact,
            RangeShape::Scalar,
            ChannelRange::new("index_pull", 0.0, 10.0).unwrap(),
        ));
        assert_eq!(table.scalar_range("index_pull"), (0.0, 10.0));
        assert_eq!(table.scalar_range("thumb_pull"), (0.0, 126.0));
    }

    #[test]
    fn test_exact_mode() {
        let rule = RangeRule::new(
            MatchMode::Exact,
            RangeShape::Scalar,
            ChannelRange::new("grip_pull", 0.0, 50.0).unwrap(),
        );
        assert!(rule.matches("grip_pull"));
        assert!(!rule.matches("grip_pull_raw"));
    }

    #[test]
    fn test_empty_table_defaults() {
        let table = RangeTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.scalar_range("index_pull"), (0.0, 126.0));
        assert_eq!(table.vector_range("accel"), (-1.0, 1.0));
    }
}
