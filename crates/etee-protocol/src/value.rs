//! 原始读数
//!
//! 驱动返回的单个通道值。`Absent` 表示本周期无数据（控制器未连接或尚未上报），
//! 不是错误。

use nalgebra::Quaternion;
use std::fmt;

/// 单个通道、单只手、单一时刻的原始值
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawValue {
    /// 本周期无数据
    #[default]
    Absent,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// IMU 向量，单个分量可能缺失
    Vector(Vec<Option<f64>>),
    /// 姿态四元数，分量位于 [-1, 1]
    Quaternion(Quaternion<f64>),
    /// 无法识别的形态（原样保留字符串表示）
    Other(String),
}

impl RawValue {
    /// 由 `[w, x, y, z]` 构造四元数值
    pub fn quaternion(w: f64, x: f64, y: f64, z: f64) -> Self {
        RawValue::Quaternion(Quaternion::new(w, x, y, z))
    }

    /// 由完整的三分量构造向量值
    pub fn vector3(x: f64, y: f64, z: f64) -> Self {
        RawValue::Vector(vec![Some(x), Some(y), Some(z)])
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, RawValue::Absent)
    }

    /// 数值读数（整数或浮点）
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Int(v) => Some(*v as f64),
            RawValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// 四元数分量，按 `[w, x, y, z]` 排列
    pub fn quaternion_components(&self) -> Option<[f64; 4]> {
        match self {
            RawValue::Quaternion(q) => Some([q.w, q.i, q.j, q.k]),
            _ => None,
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<u8> for RawValue {
    fn from(value: u8) -> Self {
        RawValue::Int(value as i64)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<Quaternion<f64>> for RawValue {
    fn from(value: Quaternion<f64>) -> Self {
        RawValue::Quaternion(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawValue::Absent)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Absent => f.write_str("None"),
            RawValue::Bool(v) => write!(f, "{}", v),
            RawValue::Int(v) => write!(f, "{}", v),
            RawValue::Float(v) => write!(f, "{}", v),
            RawValue::Vector(components) => {
                f.write_str("[")?;
                for (i, c) in components.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match c {
                        Some(v) => write!(f, "{}", v)?,
                        None => f.write_str("None")?,
                    }
                }
                f.write_str("]")
            },
            RawValue::Quaternion(q) => write!(f, "[{}, {}, {}, {}]", q.w, q.i, q.j, q.k),
            RawValue::Other(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quaternion_component_order() {
        let value = RawValue::quaternion(1.0, 0.1, 0.2, 0.3);
        assert_eq!(value.quaternion_components(), Some([1.0, 0.1, 0.2, 0.3]));
        assert_eq!(RawValue::Int(3).quaternion_components(), None);
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(RawValue::Int(63).as_f64(), Some(63.0));
        assert_eq!(RawValue::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(RawValue::Bool(true).as_f64(), None);
        assert_eq!(RawValue::Absent.as_f64(), None);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(RawValue::from(None::<i64>), RawValue::Absent);
        assert_eq!(RawValue::from(Some(5i64)), RawValue::Int(5));
        assert_eq!(RawValue::from(Some(true)), RawValue::Bool(true));
        assert!(RawValue::default().is_absent());
    }

    #[test]
    fn test_display() {
        assert_eq!(RawValue::Absent.to_string(), "None");
        assert_eq!(RawValue::vector3(1.0, 2.5, -3.0).to_string(), "[1, 2.5, -3]");
        assert_eq!(RawValue::Vector(vec![Some(1.0), None]).to_string(), "[1, None]");
        assert_eq!(RawValue::Other("calibrating".into()).to_string(), "calibrating");
    }
}
