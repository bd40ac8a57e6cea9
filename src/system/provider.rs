//! The platform metrics provider seam.
//!
//! Everything the collectors know about the running machine comes through
//! [`MetricsProvider`]. The production implementation lives in
//! [`native`](super::native); tests drive the collectors with
//! [`FakeProvider`](super::fake::FakeProvider).

use std::net::IpAddr;
use std::time::Duration;

use serde::Serialize;

use crate::error::ProviderError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostInfo {
    pub hostname: String,
    pub os_name: String,
    pub kernel_release: String,
    pub boot_time_unix: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoreCounts {
    pub logical: usize,
    pub physical: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Kernel-wide CPU counters. Passed through without interpretation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CpuCounters {
    pub context_switches: u64,
    pub interrupts: u64,
    pub soft_interrupts: Option<u64>,
    pub syscalls: Option<u64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VirtualMemory {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub available: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    pub options: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PartitionUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f64,
}

impl PartitionUsage {
    /// Derive usage from the two figures every platform reports.
    pub fn from_space(total: u64, available: u64) -> Self {
        let free = available.min(total);
        let used = total - free;
        let percent = if total == 0 {
            0.0
        } else {
            ((used as f64 / total as f64) * 1000.0).round() / 10.0
        };
        PartitionUsage {
            total,
            used,
            free,
            percent,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiskIoCounters {
    pub read_bytes: u64,
    pub write_bytes: u64,
}

/// Addresses of one interface, in the order the OS enumerated them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceAddresses {
    pub name: String,
    pub addresses: Vec<IpAddr>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceStats {
    pub name: String,
    pub mtu: u64,
    pub mac_address: String,
    pub is_up: Option<bool>,
    pub speed_mbps: Option<u64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NetIoCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

/// OS-facing source of raw statistics.
///
/// Calls that can only fail because a platform lacks the stat return
/// [`ProviderError::MetricUnavailable`]; the collectors decide which failures
/// are tolerable.
pub trait MetricsProvider {
    fn host(&mut self) -> Result<HostInfo, ProviderError>;

    fn core_counts(&mut self) -> Result<CoreCounts, ProviderError>;

    /// Blocks the caller for `interval` and returns global usage over it.
    fn cpu_usage(&mut self, interval: Duration) -> Result<f32, ProviderError>;

    fn cpu_frequency_mhz(&mut self) -> Result<u64, ProviderError>;

    fn load_average(&mut self) -> Result<LoadAverage, ProviderError>;

    fn cpu_counters(&mut self) -> Result<CpuCounters, ProviderError>;

    fn virtual_memory(&mut self) -> Result<VirtualMemory, ProviderError>;

    fn partitions(&mut self) -> Result<Vec<Partition>, ProviderError>;

    fn partition_usage(&mut self, mount_point: &str) -> Result<PartitionUsage, ProviderError>;

    /// Per-device I/O counters keyed by device name, enumeration order.
    fn disk_io_counters(&mut self) -> Result<Vec<(String, DiskIoCounters)>, ProviderError>;

    fn interface_addresses(&mut self) -> Result<Vec<InterfaceAddresses>, ProviderError>;

    fn interface_stats(&mut self) -> Result<Vec<InterfaceStats>, ProviderError>;

    fn net_io_counters(&mut self) -> Result<NetIoCounters, ProviderError>;
}
