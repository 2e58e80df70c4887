//! 快照采集
//!
//! 按输入类别逐通道调用驱动，组装一个周期的 [`Snapshot`]。
//! 单个通道读取失败不会中断采集：记录告警并以 `RawValue::Absent` 代替。

use crate::EteeDriver;
use etee_protocol::{ChannelId, Hand, InputCategory, RawValue, Snapshot};
use tracing::{trace, warn};

/// 按类别采集双手快照
///
/// `categories` 为空时采集全部类别。
pub fn collect_snapshot<D>(driver: &D, categories: &[InputCategory]) -> Snapshot
where
    D: EteeDriver + ?Sized,
{
    let selected: &[InputCategory] =
        if categories.is_empty() { &InputCategory::ALL } else { categories };

    let channels: Vec<ChannelId> = selected.iter().flat_map(|c| c.channels()).collect();
    collect_channels(driver, &channels, &Hand::ALL)
}

/// 采集指定通道和手
pub fn collect_channels<D>(driver: &D, channels: &[ChannelId], hands: &[Hand]) -> Snapshot
where
    D: EteeDriver + ?Sized,
{
    let mut snapshot = Snapshot::new();

    for &hand in hands {
        for &channel in channels {
            let value = read_or_absent(driver, hand, channel);
            snapshot.insert(hand, channel.name(), value);
        }
    }

    trace!("Collected snapshot with {} readings", snapshot.len());
    snapshot
}

/// 读取单个通道，失败时退化为 `Absent`
pub fn read_or_absent<D>(driver: &D, hand: Hand, channel: ChannelId) -> RawValue
where
    D: EteeDriver + ?Sized,
{
    match driver.read(hand, channel) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to read {} on {} hand: {}", channel, hand, e);
            RawValue::Absent
        },
    }
}
