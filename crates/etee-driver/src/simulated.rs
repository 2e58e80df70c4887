//! 模拟 dongle
//!
//! 进程内的 [`EteeDriver`] 实现，无需硬件即可运行监控与 OSC 转发。
//! `run()` 启动后台数据线程，按固定周期合成双手读数并写入无锁状态（`ArcSwapOption`），
//! 读取端直接 `load()`，与真实驱动的“内部缓冲 + getter”模型一致。
//!
//! 测试可以通过 [`DongleHandle`] 模拟 dongle 拔出、控制器离线。

use crate::{DriverError, EteeDriver};
use arc_swap::ArcSwapOption;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use etee_protocol::{ChannelId, Finger, FingerField, Hand, RawValue};
use nalgebra::{Quaternion, UnitQuaternion};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::thread::{JoinHandle, spawn};
use std::time::Duration;
use tracing::{debug, info, warn};

/// 单根手指的读数
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FingerState {
    pub pull: u8,
    pub force: u8,
    pub touched: bool,
    pub clicked: bool,
}

/// 单只手的完整状态（数据线程写入，读取端只读）
#[derive(Debug, Clone, PartialEq)]
pub struct HandState {
    pub fingers: [FingerState; 5],

    pub trackpad_x: u8,
    pub trackpad_y: u8,
    pub trackpad_pull: u8,
    pub trackpad_force: u8,
    pub trackpad_touched: bool,
    pub trackpad_clicked: bool,

    pub slider_value: u8,
    pub slider_touched: bool,
    pub slider_up: bool,
    pub slider_down: bool,

    pub grip_pull: u8,
    pub grip_force: u8,
    pub grip_touched: bool,
    pub grip_clicked: bool,
    pub pinch_trackpad_pull: u8,
    pub pinch_trackpad_clicked: bool,
    pub pinch_thumbfinger_pull: u8,
    pub pinch_thumbfinger_clicked: bool,
    pub point_independent_clicked: bool,
    pub point_excl_tp_clicked: bool,

    pub quaternion: Quaternion<f64>,
    /// 欧拉角（度）
    pub euler: [f64; 3],
    /// 加速度（g）
    pub accel: [f64; 3],
    /// 角速度（deg/s）
    pub gyro: [f64; 3],
    /// 磁场（µT）
    pub mag: [f64; 3],

    pub battery_level: u8,
    pub charging: bool,
    pub charging_complete: bool,
    pub system_button: bool,
    pub tracker_connected: bool,
    pub proximity: u8,
    pub proximity_touched: bool,
    pub proximity_clicked: bool,
}

impl Default for HandState {
    fn default() -> Self {
        Self {
            fingers: [FingerState::default(); 5],
            trackpad_x: 0,
            trackpad_y: 0,
            trackpad_pull: 0,
            trackpad_force: 0,
            trackpad_touched: false,
            trackpad_clicked: false,
            slider_value: 0,
            slider_touched: false,
            slider_up: false,
            slider_down: false,
            grip_pull: 0,
            grip_force: 0,
            grip_touched: false,
            grip_clicked: false,
            pinch_trackpad_pull: 0,
            pinch_trackpad_clicked: false,
            pinch_thumbfinger_pull: 0,
            pinch_thumbfinger_clicked: false,
            point_independent_clicked: false,
            point_excl_tp_clicked: false,
            quaternion: Quaternion::identity(),
            euler: [0.0; 3],
            accel: [0.0, 0.0, 1.0],
            gyro: [0.0; 3],
            mag: [0.0; 3],
            battery_level: 100,
            charging: false,
            charging_complete: false,
            system_button: false,
            tracker_connected: false,
            proximity: 0,
            proximity_touched: false,
            proximity_clicked: false,
        }
    }
}

/// 正弦相位映射到 0..=max 的整数读数
fn wave(phase: f64, max: u8) -> u8 {
    let s = (phase.sin() + 1.0) / 2.0;
    (s * max as f64).round() as u8
}

impl HandState {
    /// 按帧序号合成一帧读数
    ///
    /// 手指依次弯曲，IMU 绕竖直轴缓慢旋转；左右手相位错开。
    pub fn synthesize(hand: Hand, tick: u64) -> Self {
        let offset = match hand {
            Hand::Left => 0.0,
            Hand::Right => std::f64::consts::FRAC_PI_2,
        };
        let t = tick as f64 * 0.05 + offset;

        let mut fingers = [FingerState::default(); 5];
        for (i, finger) in fingers.iter_mut().enumerate() {
            let phase = t + i as f64 * 0.6;
            finger.pull = wave(phase, 126);
            finger.force = if finger.pull > 100 { wave(phase * 2.0, 126) } else { 0 };
            finger.touched = finger.pull > 10;
            finger.clicked = finger.pull > 120;
        }

        let yaw = t * 0.2;
        let rotation = UnitQuaternion::from_euler_angles(0.0, 0.0, yaw);
        let (roll, pitch, yaw) = rotation.euler_angles();

        let grip_pull = fingers[2..].iter().map(|f| f.pull as u32).sum::<u32>() / 3;

        Self {
            fingers,
            trackpad_x: wave(t * 0.7, 255),
            trackpad_y: wave(t * 0.9, 255),
            trackpad_pull: wave(t * 0.3, 126),
            trackpad_force: 0,
            trackpad_touched: wave(t * 0.3, 126) > 10,
            trackpad_clicked: false,
            slider_value: wave(t * 0.4, 126),
            slider_touched: wave(t * 0.4, 126) > 5,
            slider_up: false,
            slider_down: false,
            grip_pull: grip_pull as u8,
            grip_force: 0,
            grip_touched: grip_pull > 10,
            grip_clicked: grip_pull > 120,
            pinch_trackpad_pull: 0,
            pinch_trackpad_clicked: false,
            pinch_thumbfinger_pull: fingers[0].pull.min(fingers[1].pull),
            pinch_thumbfinger_clicked: false,
            point_independent_clicked: false,
            point_excl_tp_clicked: false,
            quaternion: *rotation.quaternion(),
            euler: [roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees()],
            accel: [0.1 * t.sin(), 0.1 * t.cos(), 1.0],
            gyro: [0.0, 0.0, 0.6f64.to_degrees()],
            mag: [25.0 * yaw.cos(), 25.0 * yaw.sin(), -40.0],
            battery_level: 100u64.saturating_sub(tick / 6000) as u8,
            charging: false,
            charging_complete: false,
            system_button: false,
            tracker_connected: false,
            proximity: wave(t * 0.1, 126),
            proximity_touched: wave(t * 0.1, 126) > 30,
            proximity_clicked: wave(t * 0.1, 126) > 100,
        }
    }

    /// 通道分派表：每个 [`ChannelId`] 对应一个字段
    pub fn read(&self, channel: ChannelId) -> RawValue {
        use ChannelId as C;
        match channel {
            C::Finger(finger, field) => {
                let state = &self.fingers[finger_index(finger)];
                match field {
                    FingerField::Pull => state.pull.into(),
                    FingerField::Force => state.force.into(),
                    FingerField::Touched => state.touched.into(),
                    FingerField::Clicked => state.clicked.into(),
                }
            },
            C::TrackpadX => self.trackpad_x.into(),
            C::TrackpadY => self.trackpad_y.into(),
            C::TrackpadPull => self.trackpad_pull.into(),
            C::TrackpadForce => self.trackpad_force.into(),
            C::TrackpadTouched => self.trackpad_touched.into(),
            C::TrackpadClicked => self.trackpad_clicked.into(),
            C::SliderValue => self.slider_value.into(),
            C::SliderTouched => self.slider_touched.into(),
            C::SliderUp => self.slider_up.into(),
            C::SliderDown => self.slider_down.into(),
            C::GripPull => self.grip_pull.into(),
            C::GripForce => self.grip_force.into(),
            C::GripTouched => self.grip_touched.into(),
            C::GripClicked => self.grip_clicked.into(),
            C::PinchTrackpadPull => self.pinch_trackpad_pull.into(),
            C::PinchTrackpadClicked => self.pinch_trackpad_clicked.into(),
            C::PinchThumbfingerPull => self.pinch_thumbfinger_pull.into(),
            C::PinchThumbfingerClicked => self.pinch_thumbfinger_clicked.into(),
            C::PointIndependentClicked => self.point_independent_clicked.into(),
            C::PointExclTpClicked => self.point_excl_tp_clicked.into(),
            C::Quaternion => self.quaternion.into(),
            C::Euler => vector(self.euler),
            C::Accel => vector(self.accel),
            C::Gyro => vector(self.gyro),
            C::Mag => vector(self.mag),
            C::BatteryLevel => self.battery_level.into(),
            C::Charging => self.charging.into(),
            C::ChargingComplete => self.charging_complete.into(),
            C::SystemButton => self.system_button.into(),
            C::TrackerConnected => self.tracker_connected.into(),
            C::Proximity => self.proximity.into(),
            C::ProximityTouched => self.proximity_touched.into(),
            C::ProximityClicked => self.proximity_clicked.into(),
        }
    }
}

fn finger_index(finger: Finger) -> usize {
    match finger {
        Finger::Thumb => 0,
        Finger::Index => 1,
        Finger::Middle => 2,
        Finger::Ring => 3,
        Finger::Pinky => 4,
    }
}

fn vector(components: [f64; 3]) -> RawValue {
    RawValue::Vector(components.iter().copied().map(Some).collect())
}

/// 数据线程与读取端共享的上下文
#[derive(Debug)]
struct DongleContext {
    ports: AtomicUsize,
    streaming: AtomicBool,
    left_online: AtomicBool,
    right_online: AtomicBool,
    left: ArcSwapOption<HandState>,
    right: ArcSwapOption<HandState>,
    tick: AtomicU64,
}

impl DongleContext {
    fn new(ports: usize) -> Self {
        Self {
            ports: AtomicUsize::new(ports),
            streaming: AtomicBool::new(false),
            left_online: AtomicBool::new(true),
            right_online: AtomicBool::new(true),
            left: ArcSwapOption::empty(),
            right: ArcSwapOption::empty(),
            tick: AtomicU64::new(0),
        }
    }

    fn slot(&self, hand: Hand) -> &ArcSwapOption<HandState> {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }

    fn online(&self, hand: Hand) -> &AtomicBool {
        match hand {
            Hand::Left => &self.left_online,
            Hand::Right => &self.right_online,
        }
    }

    fn clear(&self) {
        self.left.store(None);
        self.right.store(None);
    }
}

/// 模拟 dongle 的外部控制句柄（可跨线程克隆）
#[derive(Debug, Clone)]
pub struct DongleHandle {
    ctx: Arc<DongleContext>,
}

impl DongleHandle {
    /// 模拟拔出 dongle
    pub fn unplug(&self) {
        warn!("Simulated dongle unplugged");
        self.ctx.ports.store(0, Ordering::SeqCst);
    }

    /// 模拟控制器上线/离线；离线后该手所有通道读数为 `Absent`
    pub fn set_hand_online(&self, hand: Hand, online: bool) {
        self.ctx.online(hand).store(online, Ordering::SeqCst);
        if !online {
            self.ctx.slot(hand).store(None);
        }
    }

    /// 数据线程已产生的帧数
    pub fn ticks(&self) -> u64 {
        self.ctx.tick.load(Ordering::Relaxed)
    }

    pub fn is_streaming(&self) -> bool {
        self.ctx.streaming.load(Ordering::SeqCst)
    }
}

/// 模拟 dongle 构造器
///
/// # Example
///
/// ```
/// use etee_driver::{EteeDriver, SimulatedDongleBuilder};
/// use std::time::Duration;
///
/// let mut dongle = SimulatedDongleBuilder::new()
///     .update_interval(Duration::from_millis(5))
///     .build();
/// dongle.connect().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedDongleBuilder {
    ports: usize,
    update_interval: Duration,
    prime: bool,
}

impl Default for SimulatedDongleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedDongleBuilder {
    pub fn new() -> Self {
        Self {
            ports: 1,
            update_interval: Duration::from_millis(10),
            prime: true,
        }
    }

    /// 可用端口数（0 表示未插入 dongle）
    pub fn ports(mut self, ports: usize) -> Self {
        self.ports = ports;
        self
    }

    /// 数据线程的更新周期（默认 10ms，约 100Hz）
    pub fn update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// `start_data()` 时是否立即写入第一帧（默认开启，避免首个周期读到空值）
    pub fn prime_on_start(mut self, prime: bool) -> Self {
        self.prime = prime;
        self
    }

    pub fn build(self) -> SimulatedDongle {
        SimulatedDongle {
            ctx: Arc::new(DongleContext::new(self.ports)),
            update_interval: self.update_interval,
            prime: self.prime,
            connected: false,
            shutdown_tx: None,
            data_thread: None,
        }
    }
}

/// 模拟 dongle
pub struct SimulatedDongle {
    ctx: Arc<DongleContext>,
    update_interval: Duration,
    prime: bool,
    connected: bool,
    shutdown_tx: Option<Sender<()>>,
    data_thread: Option<JoinHandle<()>>,
}

impl SimulatedDongle {
    pub fn new() -> Self {
        SimulatedDongleBuilder::new().build()
    }

    pub fn handle(&self) -> DongleHandle {
        DongleHandle {
            ctx: self.ctx.clone(),
        }
    }

    /// 数据线程是否在运行
    pub fn is_running(&self) -> bool {
        self.data_thread.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }

    fn publish(ctx: &DongleContext) {
        let tick = ctx.tick.fetch_add(1, Ordering::Relaxed) + 1;
        for hand in Hand::ALL {
            if ctx.online(hand).load(Ordering::SeqCst) {
                ctx.slot(hand).store(Some(Arc::new(HandState::synthesize(hand, tick))));
            } else {
                ctx.slot(hand).store(None);
            }
        }
    }
}

impl Default for SimulatedDongle {
    fn default() -> Self {
        Self::new()
    }
}

/// 数据线程主循环：直到收到关闭信号或发送端被丢弃
fn data_loop(ctx: Arc<DongleContext>, shutdown_rx: Receiver<()>, interval: Duration) {
    debug!("Simulated data loop started ({:?} interval)", interval);
    loop {
        match shutdown_rx.recv_timeout(interval) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {},
        }

        if ctx.streaming.load(Ordering::SeqCst) && ctx.ports.load(Ordering::SeqCst) > 0 {
            SimulatedDongle::publish(&ctx);
        }
    }
    debug!("Simulated data loop exited");
}

impl EteeDriver for SimulatedDongle {
    fn available_ports(&self) -> usize {
        self.ctx.ports.load(Ordering::SeqCst)
    }

    fn connect(&mut self) -> Result<(), DriverError> {
        if self.available_ports() == 0 {
            return Err(DriverError::NoDongle);
        }
        self.connected = true;
        info!("Connected to simulated dongle");
        Ok(())
    }

    fn start_data(&mut self) -> Result<(), DriverError> {
        if !self.connected {
            return Err(DriverError::NotConnected);
        }
        self.ctx.streaming.store(true, Ordering::SeqCst);
        if self.prime {
            Self::publish(&self.ctx);
        }
        info!("Controller data stream started");
        Ok(())
    }

    fn run(&mut self) -> Result<(), DriverError> {
        if !self.connected {
            return Err(DriverError::NotConnected);
        }
        if self.is_running() {
            return Ok(());
        }

        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);
        let ctx = self.ctx.clone();
        let interval = self.update_interval;
        self.data_thread = Some(spawn(move || data_loop(ctx, shutdown_rx, interval)));
        self.shutdown_tx = Some(shutdown_tx);
        info!("Data loop started");
        Ok(())
    }

    fn stop_data(&mut self) -> Result<(), DriverError> {
        self.ctx.streaming.store(false, Ordering::SeqCst);
        self.ctx.clear();
        info!("Controller data stream stopped");
        Ok(())
    }

    fn stop(&mut self) -> Result<(), DriverError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.data_thread.take() {
            handle.join().map_err(|_| DriverError::Thread("data loop panicked".to_string()))?;
            info!("Data loop stopped");
        }
        Ok(())
    }

    fn read(&self, hand: Hand, channel: ChannelId) -> Result<RawValue, DriverError> {
        if self.available_ports() == 0 {
            return Err(DriverError::NoDongle);
        }
        if !self.connected {
            return Err(DriverError::NotConnected);
        }

        Ok(self.ctx.slot(hand).load_full().map(|state| state.read(channel)).unwrap_or_default())
    }
}

impl Drop for SimulatedDongle {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("Failed to stop simulated dongle: {}", e);
        }
    }
}
