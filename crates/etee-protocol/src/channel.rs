//! 通道目录
//!
//! 控制器每只手暴露的全部输入通道，按输入类别分组。
//! 通道名称（`name()`）即快照中的键、显示行中的标签和 OSC 地址的最后一段。

use crate::ProtocolError;
use std::fmt;
use std::str::FromStr;

/// 手指
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// 拇指到小指
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Finger::Thumb => "thumb",
            Finger::Index => "index",
            Finger::Middle => "middle",
            Finger::Ring => "ring",
            Finger::Pinky => "pinky",
        }
    }

    /// 首字母大写的显示名（`Thumb`）
    pub fn label(&self) -> &'static str {
        match self {
            Finger::Thumb => "Thumb",
            Finger::Index => "Index",
            Finger::Middle => "Middle",
            Finger::Ring => "Ring",
            Finger::Pinky => "Pinky",
        }
    }
}

impl FromStr for Finger {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Finger::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProtocolError::InvalidFinger(s.to_string()))
    }
}

/// 单根手指上的四个字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerField {
    /// 弯曲（拉动）程度
    Pull,
    /// 按压力度
    Force,
    Touched,
    Clicked,
}

impl FingerField {
    pub const ALL: [FingerField; 4] = [
        FingerField::Pull,
        FingerField::Force,
        FingerField::Touched,
        FingerField::Clicked,
    ];
}

/// 通道值的预期形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// 数值（0..126、0..255、0..100 等）
    Scalar,
    /// 布尔状态（touched/clicked/按键）
    Flag,
    /// 三分量向量（accel/gyro/mag/euler）
    Vector,
    /// 四元数姿态（w, x, y, z）
    Quaternion,
}

/// 输入类别
///
/// 轮询时可以只选择部分类别，以减少每个周期的驱动调用次数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InputCategory {
    Fingers,
    Trackpad,
    Slider,
    Gestures,
    Imu,
    System,
}

impl InputCategory {
    pub const ALL: [InputCategory; 6] = [
        InputCategory::Fingers,
        InputCategory::Trackpad,
        InputCategory::Slider,
        InputCategory::Gestures,
        InputCategory::Imu,
        InputCategory::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InputCategory::Fingers => "fingers",
            InputCategory::Trackpad => "trackpad",
            InputCategory::Slider => "slider",
            InputCategory::Gestures => "gestures",
            InputCategory::Imu => "imu",
            InputCategory::System => "system",
        }
    }

    /// 该类别包含的通道（顺序固定）
    pub fn channels(&self) -> Vec<ChannelId> {
        use ChannelId::*;
        match self {
            InputCategory::Fingers => self::Finger::ALL
                .into_iter()
                .flat_map(|finger| {
                    FingerField::ALL.into_iter().map(move |field| ChannelId::Finger(finger, field))
                })
                .collect(),
            InputCategory::Trackpad => vec![
                TrackpadX,
                TrackpadY,
                TrackpadPull,
                TrackpadForce,
                TrackpadTouched,
                TrackpadClicked,
            ],
            InputCategory::Slider => vec![SliderValue, SliderTouched, SliderUp, SliderDown],
            InputCategory::Gestures => vec![
                GripPull,
                GripForce,
                GripTouched,
                GripClicked,
                PinchTrackpadPull,
                PinchTrackpadClicked,
                PinchThumbfingerPull,
                PinchThumbfingerClicked,
                PointIndependentClicked,
                PointExclTpClicked,
            ],
            InputCategory::Imu => vec![Quaternion, Euler, Accel, Gyro, Mag],
            InputCategory::System => vec![
                BatteryLevel,
                Charging,
                ChargingComplete,
                SystemButton,
                TrackerConnected,
                Proximity,
                ProximityTouched,
                ProximityClicked,
            ],
        }
    }
}

impl fmt::Display for InputCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputCategory {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InputCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProtocolError::InvalidCategory(s.to_string()))
    }
}

/// 通道标识
///
/// 封闭枚举：驱动层按此标识分派到具体的读取函数，不做基于字符串的反射调用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    Finger(Finger, FingerField),

    // 触控板
    TrackpadX,
    TrackpadY,
    TrackpadPull,
    TrackpadForce,
    TrackpadTouched,
    TrackpadClicked,

    // 滑条
    SliderValue,
    SliderTouched,
    SliderUp,
    SliderDown,

    // 手势
    GripPull,
    GripForce,
    GripTouched,
    GripClicked,
    PinchTrackpadPull,
    PinchTrackpadClicked,
    PinchThumbfingerPull,
    PinchThumbfingerClicked,
    PointIndependentClicked,
    PointExclTpClicked,

    // IMU
    Quaternion,
    Euler,
    Accel,
    Gyro,
    Mag,

    // 系统状态
    BatteryLevel,
    Charging,
    ChargingComplete,
    SystemButton,
    TrackerConnected,
    Proximity,
    ProximityTouched,
    ProximityClicked,
}

impl ChannelId {
    /// 全部通道，按类别顺序排列
    pub fn all() -> Vec<ChannelId> {
        InputCategory::ALL.iter().flat_map(|c| c.channels()).collect()
    }

    /// 通道名（快照键 / OSC 地址段）
    pub fn name(&self) -> &'static str {
        use ChannelId::*;
        match self {
            Finger(finger, field) => finger_channel_name(*finger, *field),
            TrackpadX => "trackpad_x",
            TrackpadY => "trackpad_y",
            TrackpadPull => "trackpad_pull",
            TrackpadForce => "trackpad_force",
            TrackpadTouched => "trackpad_touched",
            TrackpadClicked => "trackpad_clicked",
            SliderValue => "slider_value",
            SliderTouched => "slider_touched",
            SliderUp => "slider_up",
            SliderDown => "slider_down",
            GripPull => "grip_pull",
            GripForce => "grip_force",
            GripTouched => "grip_touched",
            GripClicked => "grip_clicked",
            PinchTrackpadPull => "pinch_trackpad_pull",
            PinchTrackpadClicked => "pinch_trackpad_clicked",
            PinchThumbfingerPull => "pinch_thumbfinger_pull",
            PinchThumbfingerClicked => "pinch_thumbfinger_clicked",
            PointIndependentClicked => "point_independent_clicked",
            PointExclTpClicked => "point_excl_tp_clicked",
            Quaternion => "quaternion",
            Euler => "euler",
            Accel => "accel",
            Gyro => "gyro",
            Mag => "mag",
            BatteryLevel => "battery_level",
            Charging => "charging",
            ChargingComplete => "charging_complete",
            SystemButton => "system_button",
            TrackerConnected => "tracker_connected",
            Proximity => "proximity",
            ProximityTouched => "proximity_touched",
            ProximityClicked => "proximity_clicked",
        }
    }

    /// 预期的值形态
    pub fn kind(&self) -> ChannelKind {
        use ChannelId::*;
        match self {
            Finger(_, FingerField::Pull | FingerField::Force) => ChannelKind::Scalar,
            Finger(_, FingerField::Touched | FingerField::Clicked) => ChannelKind::Flag,
            TrackpadX | TrackpadY | TrackpadPull | TrackpadForce => ChannelKind::Scalar,
            SliderValue => ChannelKind::Scalar,
            GripPull | GripForce | PinchTrackpadPull | PinchThumbfingerPull => ChannelKind::Scalar,
            BatteryLevel | Proximity => ChannelKind::Scalar,
            Quaternion => ChannelKind::Quaternion,
            Euler | Accel | Gyro | Mag => ChannelKind::Vector,
            TrackpadTouched | TrackpadClicked | SliderTouched | SliderUp | SliderDown
            | GripTouched | GripClicked | PinchTrackpadClicked | PinchThumbfingerClicked
            | PointIndependentClicked | PointExclTpClicked | Charging | ChargingComplete
            | SystemButton | TrackerConnected | ProximityTouched | ProximityClicked => {
                ChannelKind::Flag
            },
        }
    }

    /// 所属类别
    pub fn category(&self) -> InputCategory {
        use ChannelId::*;
        match self {
            Finger(..) => InputCategory::Fingers,
            TrackpadX | TrackpadY | TrackpadPull | TrackpadForce | TrackpadTouched
            | TrackpadClicked => InputCategory::Trackpad,
            SliderValue | SliderTouched | SliderUp | SliderDown => InputCategory::Slider,
            GripPull | GripForce | GripTouched | GripClicked | PinchTrackpadPull
            | PinchTrackpadClicked | PinchThumbfingerPull | PinchThumbfingerClicked
            | PointIndependentClicked | PointExclTpClicked => InputCategory::Gestures,
            Quaternion | Euler | Accel | Gyro | Mag => InputCategory::Imu,
            BatteryLevel | Charging | ChargingComplete | SystemButton | TrackerConnected
            | Proximity | ProximityTouched | ProximityClicked => InputCategory::System,
        }
    }
}

fn finger_channel_name(finger: Finger, field: FingerField) -> &'static str {
    use FingerField::*;
    match (finger, field) {
        (Finger::Thumb, Pull) => "thumb_pull",
        (Finger::Thumb, Force) => "thumb_force",
        (Finger::Thumb, Touched) => "thumb_touched",
        (Finger::Thumb, Clicked) => "thumb_clicked",
        (Finger::Index, Pull) => "index_pull",
        (Finger::Index, Force) => "index_force",
        (Finger::Index, Touched) => "index_touched",
        (Finger::Index, Clicked) => "index_clicked",
        (Finger::Middle, Pull) => "middle_pull",
        (Finger::Middle, Force) => "middle_force",
        (Finger::Middle, Touched) => "middle_touched",
        (Finger::Middle, Clicked) => "middle_clicked",
        (Finger::Ring, Pull) => "ring_pull",
        (Finger::Ring, Force) => "ring_force",
        (Finger::Ring, Touched) => "ring_touched",
        (Finger::Ring, Clicked) => "ring_clicked",
        (Finger::Pinky, Pull) => "pinky_pull",
        (Finger::Pinky, Force) => "pinky_force",
        (Finger::Pinky, Touched) => "pinky_touched",
        (Finger::Pinky, Clicked) => "pinky_clicked",
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChannelId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ChannelId::all()
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| ProtocolError::UnknownChannel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_channel_count() {
        // 5 根手指 × 4 + 6 + 4 + 10 + 5 + 8
        assert_eq!(ChannelId::all().len(), 53);
        assert_eq!(InputCategory::Fingers.channels().len(), 20);
    }

    #[test]
    fn test_channel_names_unique() {
        let names: HashSet<&str> = ChannelId::all().iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), ChannelId::all().len());
    }

    #[test]
    fn test_channel_name_round_trip() {
        for channel in ChannelId::all() {
            assert_eq!(channel.name().parse::<ChannelId>().unwrap(), channel);
            assert!(channel.category().channels().contains(&channel));
        }
    }

    #[test]
    fn test_finger_channel_order() {
        let fingers = InputCategory::Fingers.channels();
        assert_eq!(fingers[0].name(), "thumb_pull");
        assert_eq!(fingers[1].name(), "thumb_force");
        assert_eq!(fingers[5].name(), "index_force");
        assert_eq!(fingers[19].name(), "pinky_clicked");
    }

    #[test]
    fn test_channel_kind() {
        assert_eq!(ChannelId::Finger(Finger::Index, FingerField::Pull).kind(), ChannelKind::Scalar);
        assert_eq!(ChannelId::Finger(Finger::Ring, FingerField::Clicked).kind(), ChannelKind::Flag);
        assert_eq!(ChannelId::Quaternion.kind(), ChannelKind::Quaternion);
        assert_eq!(ChannelId::Accel.kind(), ChannelKind::Vector);
        assert_eq!(ChannelId::BatteryLevel.kind(), ChannelKind::Scalar);
        assert_eq!(ChannelId::TrackerConnected.kind(), ChannelKind::Flag);
    }

    #[test]
    fn test_unknown_channel() {
        let err = "index_bend".parse::<ChannelId>().unwrap_err();
        assert_eq!(err, ProtocolError::UnknownChannel("index_bend".to_string()));
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("IMU".parse::<InputCategory>().unwrap(), InputCategory::Imu);
        assert_eq!("fingers".parse::<InputCategory>().unwrap(), InputCategory::Fingers);
        assert!("buttons".parse::<InputCategory>().is_err());
    }

    #[test]
    fn test_finger_from_str() {
        assert_eq!("Pinky".parse::<Finger>().unwrap(), Finger::Pinky);
        assert!("toe".parse::<Finger>().is_err());
        assert_eq!(Finger::Middle.label(), "Middle");
    }
}
