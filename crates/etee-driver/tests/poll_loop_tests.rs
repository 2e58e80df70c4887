//! 轮询循环集成测试
//!
//! 使用 MockDriver 记录驱动调用序列，验证断开、控制器缺失和中断三种路径。

use etee_driver::{
    ChannelId, DriverError, EteeDriver, Hand, InputCategory, LoopOutcome, PollConfig, PollEvent,
    PollLoop, RawValue, SimulatedDongleBuilder,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 可编程的驱动：按周期弹出端口数和右手 index_pull 读数
#[derive(Default)]
struct MockDriver {
    calls: Arc<Mutex<Vec<&'static str>>>,
    ports: Mutex<VecDeque<usize>>,
    index_pull: Mutex<VecDeque<RawValue>>,
    current_pull: Mutex<RawValue>,
}

impl MockDriver {
    fn new(ports: Vec<usize>, index_pull: Vec<RawValue>) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            ports: Mutex::new(ports.into()),
            index_pull: Mutex::new(index_pull.into()),
            current_pull: Mutex::new(RawValue::Int(0)),
        }
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

impl EteeDriver for MockDriver {
    fn available_ports(&self) -> usize {
        let mut ports = self.ports.lock().unwrap();
        if ports.len() > 1 { ports.pop_front().unwrap() } else { *ports.front().unwrap_or(&1) }
    }

    fn connect(&mut self) -> Result<(), DriverError> {
        self.record("connect");
        Ok(())
    }

    fn start_data(&mut self) -> Result<(), DriverError> {
        self.record("start_data");
        Ok(())
    }

    fn run(&mut self) -> Result<(), DriverError> {
        self.record("run");
        Ok(())
    }

    fn stop_data(&mut self) -> Result<(), DriverError> {
        self.record("stop_data");
        Ok(())
    }

    fn stop(&mut self) -> Result<(), DriverError> {
        self.record("stop");
        Ok(())
    }

    fn read(&self, hand: Hand, channel: ChannelId) -> Result<RawValue, DriverError> {
        if hand == Hand::Right && channel.name() == "index_pull" {
            // 每个周期只在第一次读取时推进脚本
            if let Some(next) = self.index_pull.lock().unwrap().pop_front() {
                *self.current_pull.lock().unwrap() = next;
            }
            return Ok(self.current_pull.lock().unwrap().clone());
        }
        Ok(RawValue::Int(1))
    }
}

fn fast_config() -> PollConfig {
    PollConfig {
        interval: Duration::from_millis(1),
        settle: Duration::ZERO,
        categories: vec![InputCategory::Fingers],
        ..PollConfig::default()
    }
}

#[test]
fn test_start_sequence() {
    let mut driver = MockDriver::new(vec![1], vec![]);
    PollLoop::new(fast_config()).start(&mut driver).unwrap();
    assert_eq!(driver.calls(), vec!["connect", "start_data", "run"]);
}

#[test]
fn test_start_without_dongle() {
    let mut driver = MockDriver::new(vec![0], vec![]);
    let result = PollLoop::new(fast_config()).start(&mut driver);
    assert_eq!(result, Err(DriverError::NoDongle));
    assert!(driver.calls().is_empty());
}

#[test]
fn test_disconnect_stops_stream_and_loop() {
    let mut driver = MockDriver::new(vec![1, 1, 0], vec![]);
    let running = AtomicBool::new(true);
    let mut snapshots = 0;

    let outcome = PollLoop::new(fast_config())
        .run(&mut driver, &running, |event| {
            if let PollEvent::Snapshot(_) = event {
                snapshots += 1;
            }
        })
        .unwrap();

    assert_eq!(outcome, LoopOutcome::Disconnected { cycles: 2 });
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(snapshots, 2);
    assert_eq!(driver.calls(), vec!["stop_data", "stop"]);
}

#[test]
fn test_missing_controller_reissues_start_data() {
    let mut driver = MockDriver::new(
        vec![1],
        vec![RawValue::Int(10), RawValue::Absent, RawValue::Int(12)],
    );
    let config = PollConfig {
        probe: Some(PollConfig::DEFAULT_PROBE),
        max_cycles: Some(3),
        ..fast_config()
    };
    let running = AtomicBool::new(true);
    let mut events = Vec::new();

    let outcome = PollLoop::new(config)
        .run(&mut driver, &running, |event| {
            events.push(match event {
                PollEvent::Snapshot(_) => "snapshot",
                PollEvent::ControllerMissing { .. } => "missing",
            });
        })
        .unwrap();

    assert_eq!(outcome, LoopOutcome::Completed { cycles: 3 });
    assert_eq!(events, vec!["snapshot", "missing", "snapshot"]);
    assert_eq!(driver.calls(), vec!["start_data", "stop_data", "stop"]);
}

#[test]
fn test_interrupt_before_first_cycle() {
    let mut driver = MockDriver::new(vec![1], vec![]);
    let running = AtomicBool::new(false);

    let outcome = PollLoop::new(fast_config()).run(&mut driver, &running, |_| {}).unwrap();

    assert_eq!(outcome, LoopOutcome::Interrupted { cycles: 0 });
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(driver.calls(), vec!["stop_data", "stop"]);
}

#[test]
fn test_interrupt_from_callback() {
    let mut driver = MockDriver::new(vec![1], vec![]);
    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    let mut seen = 0;

    let outcome = PollLoop::new(fast_config())
        .run(&mut driver, &running, |_| {
            seen += 1;
            if seen == 4 {
                flag.store(false, Ordering::SeqCst);
            }
        })
        .unwrap();

    assert_eq!(outcome, LoopOutcome::Interrupted { cycles: 4 });
}

#[test]
fn test_simulated_dongle_unplug_ends_loop() {
    let mut dongle = SimulatedDongleBuilder::new().update_interval(Duration::from_millis(1)).build();
    let handle = dongle.handle();
    let poll = PollLoop::new(fast_config());
    poll.start(&mut dongle).unwrap();

    let running = AtomicBool::new(true);
    let mut cycles = 0;
    let outcome = poll
        .run(&mut dongle, &running, |event| {
            if let PollEvent::Snapshot(snapshot) = event {
                assert!(matches!(
                    snapshot.get(Hand::Left, "thumb_pull"),
                    Some(RawValue::Int(_))
                ));
            }
            cycles += 1;
            if cycles == 5 {
                handle.unplug();
            }
        })
        .unwrap();

    assert_eq!(outcome, LoopOutcome::Disconnected { cycles: 5 });
    assert!(!dongle.is_running());
    assert!(!dongle.handle().is_streaming());
}

#[test]
fn test_simulated_offline_controller_detected() {
    let mut dongle = SimulatedDongleBuilder::new().update_interval(Duration::from_millis(1)).build();
    dongle.handle().set_hand_online(Hand::Right, false);

    let config = PollConfig {
        probe: Some(PollConfig::DEFAULT_PROBE),
        max_cycles: Some(2),
        ..fast_config()
    };
    let poll = PollLoop::new(config);
    poll.start(&mut dongle).unwrap();

    let running = AtomicBool::new(true);
    let mut missing = 0;
    poll.run(&mut dongle, &running, |event| {
        if let PollEvent::ControllerMissing { hand } = event {
            assert_eq!(hand, Hand::Right);
            missing += 1;
        }
    })
    .unwrap();

    assert_eq!(missing, 2);
}

#[test]
fn test_offline_controller_without_probe_yields_snapshots() {
    let mut dongle = SimulatedDongleBuilder::new().update_interval(Duration::from_millis(1)).build();
    dongle.handle().set_hand_online(Hand::Right, false);

    let poll = PollLoop::new(PollConfig {
        max_cycles: Some(5),
        ..fast_config()
    });
    poll.start(&mut dongle).unwrap();

    let running = AtomicBool::new(true);
    let mut snapshots = 0;
    poll.run(&mut dongle, &running, |event| match event {
        PollEvent::Snapshot(snapshot) => {
            assert!(!snapshot.get(Hand::Left, "index_pull").unwrap().is_absent());
            assert!(snapshot.get(Hand::Right, "index_pull").unwrap().is_absent());
            snapshots += 1;
        },
        PollEvent::ControllerMissing { .. } => panic!("no probe configured"),
    })
    .unwrap();

    assert_eq!(snapshots, 5);
}
