//! 控制器驱动抽象
//!
//! 厂商驱动对象的统一接口。本仓库不实现 dongle 的串口协议，
//! 只通过这组方法与驱动交互：连接、启停数据流、按通道读取。

use crate::DriverError;
use etee_protocol::{ChannelId, Hand, RawValue};

/// etee 驱动接口
///
/// 生命周期：`connect()` → `start_data()` → `run()` → 循环 `read()` → `stop_data()` → `stop()`。
///
/// 读取约定：控制器未上报时返回 `Ok(RawValue::Absent)`，而不是错误；
/// 只有驱动本身无法工作（dongle 拔出、未连接）时才返回 `Err`。
pub trait EteeDriver {
    /// 当前可用的 dongle 端口数；为 0 表示 dongle 已断开
    fn available_ports(&self) -> usize;

    /// 连接到 dongle
    fn connect(&mut self) -> Result<(), DriverError>;

    /// 通知控制器开始发送数据流（可重复调用，用于控制器重连）
    fn start_data(&mut self) -> Result<(), DriverError>;

    /// 启动驱动内部的数据接收循环
    fn run(&mut self) -> Result<(), DriverError>;

    /// 停止控制器数据流
    fn stop_data(&mut self) -> Result<(), DriverError>;

    /// 停止驱动内部的数据接收循环
    fn stop(&mut self) -> Result<(), DriverError>;

    /// 读取某只手某个通道的最新值
    fn read(&self, hand: Hand, channel: ChannelId) -> Result<RawValue, DriverError>;

    /// dongle 是否可用
    fn is_dongle_present(&self) -> bool {
        self.available_ports() > 0
    }
}

impl<D: EteeDriver + ?Sized> EteeDriver for Box<D> {
    fn available_ports(&self) -> usize {
        (**self).available_ports()
    }

    fn connect(&mut self) -> Result<(), DriverError> {
        (**self).connect()
    }

    fn start_data(&mut self) -> Result<(), DriverError> {
        (**self).start_data()
    }

    fn run(&mut self) -> Result<(), DriverError> {
        (**self).run()
    }

    fn stop_data(&mut self) -> Result<(), DriverError> {
        (**self).stop_data()
    }

    fn stop(&mut self) -> Result<(), DriverError> {
        (**self).stop()
    }

    fn read(&self, hand: Hand, channel: ChannelId) -> Result<RawValue, DriverError> {
        (**self).read(hand, channel)
    }
}
