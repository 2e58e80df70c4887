//! 轮询循环
//!
//! 单线程同步循环：检查 dongle → 采集快照 → 回调 → 固定间隔休眠。
//!
//! - dongle 断开（端口数为 0）：停止数据流和数据循环，返回 [`LoopOutcome::Disconnected`]
//! - 配置了探测通道且其为 `Absent`（控制器未检测到）：重新调用一次 `start_data()`，本周期不产出快照
//! - `running` 被置为 `false`（Ctrl+C）：在两次迭代之间退出，返回 [`LoopOutcome::Interrupted`]
//!
//! 没有重试退避，也没有单次读取超时；驱动 getter 阻塞会阻塞整个循环。

use crate::collect::collect_snapshot;
use crate::{DriverError, EteeDriver};
use etee_protocol::{ChannelId, Finger, FingerField, Hand, InputCategory, Snapshot};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// 轮询配置
///
/// # Example
///
/// ```
/// use etee_driver::PollConfig;
/// use std::time::Duration;
///
/// let config = PollConfig {
///     interval: Duration::from_millis(100),
///     ..PollConfig::default()
/// };
/// assert_eq!(config.settle, Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    /// 每个周期结束后的休眠时间
    pub interval: Duration,
    /// `connect()` 之后、`start_data()` 之前的等待时间
    pub settle: Duration,
    /// 采集的输入类别，空表示全部
    pub categories: Vec<InputCategory>,
    /// 控制器在线探测通道；为 `None` 时不做探测
    pub probe: Option<(Hand, ChannelId)>,
    /// 最多运行的周期数；为 `None` 时一直运行到中断或断开
    pub max_cycles: Option<u64>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(50),
            settle: Duration::from_secs(1),
            categories: Vec::new(),
            probe: None,
            max_cycles: None,
        }
    }
}

impl PollConfig {
    /// 默认探测通道：右手食指 pull
    pub const DEFAULT_PROBE: (Hand, ChannelId) =
        (Hand::Right, ChannelId::Finger(Finger::Index, FingerField::Pull));
}

/// 单个周期产出的事件
#[derive(Debug)]
pub enum PollEvent<'a> {
    /// 正常采集到的快照
    Snapshot(&'a Snapshot),
    /// 探测通道无数据，已重新请求数据流
    ControllerMissing { hand: Hand },
}

/// 循环结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOutcome {
    /// 外部中断（Ctrl+C）
    Interrupted { cycles: u64 },
    /// dongle 断开
    Disconnected { cycles: u64 },
    /// 达到 `max_cycles`
    Completed { cycles: u64 },
}

impl LoopOutcome {
    pub fn cycles(&self) -> u64 {
        match self {
            LoopOutcome::Interrupted { cycles }
            | LoopOutcome::Disconnected { cycles }
            | LoopOutcome::Completed { cycles } => *cycles,
        }
    }

    /// 进程退出码：只有 dongle 断开视为失败
    pub fn exit_code(&self) -> i32 {
        match self {
            LoopOutcome::Disconnected { .. } => 1,
            _ => 0,
        }
    }
}

/// 轮询循环
#[derive(Debug, Clone, Default)]
pub struct PollLoop {
    config: PollConfig,
}

impl PollLoop {
    pub fn new(config: PollConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// 建立连接并启动数据流：`connect` → 等待 → `start_data` → `run`
    pub fn start<D>(&self, driver: &mut D) -> Result<(), DriverError>
    where
        D: EteeDriver + ?Sized,
    {
        if !driver.is_dongle_present() {
            return Err(DriverError::NoDongle);
        }

        driver.connect()?;
        if !self.config.settle.is_zero() {
            std::thread::sleep(self.config.settle);
        }
        driver.start_data()?;
        driver.run()?;
        info!("Polling started ({:?} interval)", self.config.interval);
        Ok(())
    }

    /// 运行轮询循环，直到中断、断开或达到周期上限
    ///
    /// 退出前总会调用 `stop_data()` 和 `stop()`。
    pub fn run<D, F>(
        &self,
        driver: &mut D,
        running: &AtomicBool,
        mut on_event: F,
    ) -> Result<LoopOutcome, DriverError>
    where
        D: EteeDriver + ?Sized,
        F: FnMut(PollEvent<'_>),
    {
        let mut cycles = 0u64;

        loop {
            if !running.load(Ordering::SeqCst) {
                info!("Polling interrupted after {} cycles", cycles);
                Self::shutdown(driver);
                return Ok(LoopOutcome::Interrupted { cycles });
            }

            if !driver.is_dongle_present() {
                error!("Dongle disconnected after {} cycles", cycles);
                Self::shutdown(driver);
                return Ok(LoopOutcome::Disconnected { cycles });
            }

            let snapshot = collect_snapshot(driver, &self.config.categories);

            match self.missing_probe(driver, &snapshot) {
                Some(hand) => {
                    warn!("{} controller not detected, re-requesting data stream", hand);
                    if let Err(e) = driver.start_data() {
                        warn!("start_data failed: {}", e);
                    }
                    on_event(PollEvent::ControllerMissing { hand });
                },
                None => on_event(PollEvent::Snapshot(&snapshot)),
            }

            cycles += 1;
            debug!("Poll cycle {} complete", cycles);

            if let Some(max) = self.config.max_cycles
                && cycles >= max
            {
                Self::shutdown(driver);
                return Ok(LoopOutcome::Completed { cycles });
            }

            spin_sleep::sleep(self.config.interval);
        }
    }

    /// 探测通道缺失时返回对应的手
    fn missing_probe<D>(&self, driver: &D, snapshot: &Snapshot) -> Option<Hand>
    where
        D: EteeDriver + ?Sized,
    {
        let (hand, channel) = self.config.probe?;
        let missing = match snapshot.get(hand, channel.name()) {
            Some(value) => value.is_absent(),
            // 探测通道不在所选类别中，单独读取一次
            None => crate::collect::read_or_absent(driver, hand, channel).is_absent(),
        };
        missing.then_some(hand)
    }

    /// 停止数据流和数据循环；失败只记录日志
    pub fn shutdown<D>(driver: &mut D)
    where
        D: EteeDriver + ?Sized,
    {
        if let Err(e) = driver.stop_data() {
            warn!("stop_data failed: {}", e);
        }
        if let Err(e) = driver.stop() {
            warn!("stop failed: {}", e);
        }
    }
}
