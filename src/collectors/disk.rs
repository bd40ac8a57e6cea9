use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, debug_span};

use super::absorb;
use crate::error::{CollectionFailed, ProviderError, Subsystem};
use crate::metric::Metric;
use crate::system::provider::{DiskIoCounters, MetricsProvider, Partition, PartitionUsage};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiskInfo {
    /// Every mounted partition, in enumeration order.
    pub partitions: Vec<Partition>,
    /// Usage keyed by mount point. Mounts that refused the query are absent.
    pub usage: BTreeMap<String, PartitionUsage>,
    pub io_counters: BTreeMap<String, DiskIoCounters>,
}

impl DiskInfo {
    pub fn usage_for(&self, mount_point: &str) -> Option<&PartitionUsage> {
        self.usage.get(mount_point)
    }
}

pub fn collect_disk<P: MetricsProvider + ?Sized>(
    provider: &mut P,
) -> Result<DiskInfo, CollectionFailed> {
    let _span = debug_span!("collect.disk").entered();
    let fail = |source| CollectionFailed::new(Subsystem::Disk, source);

    let partitions = provider.partitions().map_err(fail)?;
    let mut usage = BTreeMap::new();
    for partition in &partitions {
        if usage.contains_key(&partition.mount_point) {
            continue;
        }
        match provider.partition_usage(&partition.mount_point) {
            Ok(stat) => {
                usage.insert(partition.mount_point.clone(), stat);
            }
            Err(ProviderError::PartitionAccessDenied { mount_point }) => {
                debug!(%mount_point, "usage query denied, skipping mount point");
            }
            Err(err) => return Err(fail(err)),
        }
    }

    let io_counters = match absorb(provider.disk_io_counters()) {
        Metric::Present(counters) => counters.into_iter().collect(),
        Metric::Unavailable => BTreeMap::new(),
    };

    Ok(DiskInfo {
        partitions,
        usage,
        io_counters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::fake::{FakeProvider, partition};

    #[test]
    fn repeated_mount_point_is_queried_once() {
        let mut provider = FakeProvider::workstation();
        provider.partitions = vec![
            partition("/dev/sda1", "/", "ext4", "rw"),
            partition("/dev/sda1", "/", "ext4", "rw"),
        ];

        let disk = collect_disk(&mut provider).unwrap();
        assert_eq!(disk.partitions.len(), 2);
        assert_eq!(disk.usage.len(), 1);
        assert_eq!(provider.usage_queries, vec!["/"]);
    }

    #[test]
    fn denied_mount_is_listed_but_has_no_usage() {
        let mut provider = FakeProvider::workstation();
        provider.partitions = vec![
            partition("/dev/sda1", "/", "ext4", "rw"),
            partition("/dev/sdb1", "/secure", "ext4", "rw"),
        ];
        provider.usage = vec![("/".to_string(), PartitionUsage::from_space(100, 40))];
        provider.denied_mounts = vec!["/secure".to_string()];

        let disk = collect_disk(&mut provider).unwrap();
        assert_eq!(disk.partitions.len(), 2);
        assert_eq!(disk.usage.keys().collect::<Vec<_>>(), vec!["/"]);
        assert!(disk.usage_for("/secure").is_none());
    }

    #[test]
    fn other_usage_errors_are_fatal() {
        let mut provider = FakeProvider::workstation();
        provider.usage.retain(|(mount, _)| mount != "/boot/efi");
        let err = collect_disk(&mut provider).unwrap_err();
        assert_eq!(err.subsystem, Subsystem::Disk);
    }

    #[test]
    fn io_counters_are_optional() {
        let mut provider = FakeProvider::workstation();
        provider.disk_io = None;
        let disk = collect_disk(&mut provider).unwrap();
        assert!(disk.io_counters.is_empty());
        assert_eq!(disk.partitions.len(), 3);
    }

    #[test]
    fn io_counters_pass_through() {
        let mut provider = FakeProvider::workstation();
        let disk = collect_disk(&mut provider).unwrap();
        assert_eq!(disk.io_counters["nvme0n1p2"].write_bytes, 2 * 1024 * 1024 * 1024);
    }

    #[test]
    fn enumeration_failure_is_fatal() {
        let mut provider = FakeProvider::workstation().with_unreachable(Subsystem::Disk);
        assert!(collect_disk(&mut provider).is_err());
    }
}
