//! # 归一化
//!
//! 把原始读数映射到 `[0, 1]`，供下游消费。
//!
//! [`coerce_or_default`] 永不失败：无法识别的形状一律退化为 `0`，
//! 单个异常读数不会中断轮询循环。

use crate::range::RangeTable;
use etee_protocol::RawValue;
use std::fmt;

/// 线性映射并截断到 `[0, 1]`
///
/// 结果为 NaN（例如输入为 NaN）时返回 `0`。
///
/// ```
/// use etee_tools::normalize;
///
/// assert_eq!(normalize(63.0, 0.0, 126.0), 0.5);
/// assert_eq!(normalize(300.0, 0.0, 126.0), 1.0);
/// assert_eq!(normalize(-5.0, 0.0, 126.0), 0.0);
/// ```
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let n = (value - min) / (max - min);
    if n.is_nan() { 0.0 } else { n.clamp(0.0, 1.0) }
}

/// 分量标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentLabel {
    /// 四元数分量 `w`/`x`/`y`/`z`
    Quat(char),
    /// 向量分量下标
    Index(usize),
}

impl fmt::Display for ComponentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentLabel::Quat(c) => write!(f, "{}", c),
            ComponentLabel::Index(i) => write!(f, "{}", i),
        }
    }
}

/// 归一化结果
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Scalar(f64),
    /// 逐分量结果；缺失分量不出现
    Components(Vec<(ComponentLabel, f64)>),
}

impl Normalized {
    /// 标量值；分量结果返回 `None`
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Normalized::Scalar(v) => Some(*v),
            Normalized::Components(_) => None,
        }
    }
}

const QUATERNION_LABELS: [char; 4] = ['w', 'x', 'y', 'z'];

/// 按通道名和范围表归一化一个原始读数
///
/// | 读数 | 结果 |
/// |------|------|
/// | `Absent` | `Scalar(0)` |
/// | `Bool` | `Scalar(1)` / `Scalar(0)`，不经过范围 |
/// | `Int` / `Float` | `Scalar(normalize(v, scalar_range))` |
/// | `Quaternion` | 四个分量，各自 `(c + 1) / 2` |
/// | `Vector` | 逐分量 `normalize(c, vector_range)`，跳过缺失分量 |
/// | `Other` | `Scalar(0)` |
pub fn coerce_or_default(raw: &RawValue, channel: &str, table: &RangeTable) -> Normalized {
    match raw {
        RawValue::Absent => Normalized::Scalar(0.0),
        RawValue::Bool(b) => Normalized::Scalar(if *b { 1.0 } else { 0.0 }),
        RawValue::Int(_) | RawValue::Float(_) => {
            let (min, max) = table.scalar_range(channel);
            let value = raw.as_f64().unwrap_or(0.0);
            Normalized::Scalar(normalize(value, min, max))
        },
        RawValue::Quaternion(q) => {
            let components = [q.w, q.i, q.j, q.k];
            Normalized::Components(
                QUATERNION_LABELS
                    .iter()
                    .zip(components)
                    .map(|(&label, c)| (ComponentLabel::Quat(label), quaternion_component(c)))
                    .collect(),
            )
        },
        RawValue::Vector(values) => {
            let (min, max) = table.vector_range(channel);
            Normalized::Components(
                values
                    .iter()
                    .enumerate()
                    .filter_map(|(i, c)| c.map(|c| (ComponentLabel::Index(i), normalize(c, min, max))))
                    .collect(),
            )
        },
        RawValue::Other(_) => Normalized::Scalar(0.0),
    }
}

/// 四元数分量本身位于 `[-1, 1]`，`(c + 1) / 2` 即可
fn quaternion_component(c: f64) -> f64 {
    let n = (c + 1.0) / 2.0;
    if n.is_nan() { 0.0 } else { n }
}
