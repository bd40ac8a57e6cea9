use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use super::provider::{
    CoreCounts, CpuCounters, DiskIoCounters, HostInfo, InterfaceAddresses, InterfaceStats,
    LoadAverage, MetricsProvider, NetIoCounters, Partition, PartitionUsage, VirtualMemory,
};
use crate::error::{ProviderError, Subsystem};

pub const GIB: u64 = 1024 * 1024 * 1024;
pub const MIB: u64 = 1024 * 1024;

/// Fixture-driven provider used by tests and benches.
///
/// Every field is returned as-is by the matching trait call. `None` on an
/// optional field makes the call report `MetricUnavailable`, and a subsystem
/// listed in `unreachable` fails its required calls outright.
#[derive(Clone, Debug)]
pub struct FakeProvider {
    pub host: HostInfo,
    pub cores: CoreCounts,
    pub cpu_usage: f32,
    pub frequency_mhz: Option<u64>,
    pub load_average: Option<LoadAverage>,
    pub cpu_counters: Option<CpuCounters>,
    pub memory: VirtualMemory,
    pub partitions: Vec<Partition>,
    pub usage: Vec<(String, PartitionUsage)>,
    pub denied_mounts: Vec<String>,
    pub disk_io: Option<Vec<(String, DiskIoCounters)>>,
    pub addresses: Vec<InterfaceAddresses>,
    pub interface_stats: Option<Vec<InterfaceStats>>,
    pub net_io: NetIoCounters,
    pub unreachable: Vec<Subsystem>,
    pub sampled_intervals: Vec<Duration>,
    pub usage_queries: Vec<String>,
}

pub fn partition(device: &str, mount_point: &str, fs_type: &str, options: &str) -> Partition {
    Partition {
        device: device.to_string(),
        mount_point: mount_point.to_string(),
        fs_type: fs_type.to_string(),
        options: options.to_string(),
    }
}

pub fn interface(name: &str, addresses: &[IpAddr]) -> InterfaceAddresses {
    InterfaceAddresses {
        name: name.to_string(),
        addresses: addresses.to_vec(),
    }
}

fn stats(name: &str, mtu: u64, mac: &str, is_up: bool, speed_mbps: Option<u64>) -> InterfaceStats {
    InterfaceStats {
        name: name.to_string(),
        mtu,
        mac_address: mac.to_string(),
        is_up: Some(is_up),
        speed_mbps,
    }
}

impl FakeProvider {
    /// An eight-thread Linux desktop with one unreadable home volume.
    pub fn workstation() -> Self {
        FakeProvider {
            host: HostInfo {
                hostname: "devbox".to_string(),
                os_name: "Linux".to_string(),
                kernel_release: "6.8.0-45-generic".to_string(),
                boot_time_unix: 1_760_000_000,
            },
            cores: CoreCounts {
                logical: 8,
                physical: Some(4),
            },
            cpu_usage: 12.5,
            frequency_mhz: Some(2400),
            load_average: Some(LoadAverage {
                one: 0.52,
                five: 0.61,
                fifteen: 0.7,
            }),
            cpu_counters: Some(CpuCounters {
                context_switches: 1_990_473,
                interrupts: 114_930_548,
                soft_interrupts: Some(183_433),
                syscalls: None,
            }),
            memory: VirtualMemory {
                total: 16 * GIB,
                used: 8 * GIB,
                free: 4 * GIB,
                available: 7 * GIB,
            },
            partitions: vec![
                partition("/dev/nvme0n1p2", "/", "ext4", "rw,relatime"),
                partition("/dev/nvme0n1p1", "/boot/efi", "vfat", "rw,fmask=0077"),
                partition("/dev/mapper/home-alice", "/home/alice", "ext4", "rw,nosuid"),
            ],
            usage: vec![
                ("/".to_string(), PartitionUsage::from_space(500 * GIB, 300 * GIB)),
                (
                    "/boot/efi".to_string(),
                    PartitionUsage::from_space(512 * MIB, 448 * MIB),
                ),
                (
                    "/home/alice".to_string(),
                    PartitionUsage::from_space(100 * GIB, 50 * GIB),
                ),
            ],
            denied_mounts: vec!["/home/alice".to_string()],
            disk_io: Some(vec![
                (
                    "nvme0n1p2".to_string(),
                    DiskIoCounters {
                        read_bytes: GIB,
                        write_bytes: 2 * GIB,
                    },
                ),
                (
                    "nvme0n1p1".to_string(),
                    DiskIoCounters {
                        read_bytes: 5 * MIB,
                        write_bytes: MIB,
                    },
                ),
            ]),
            addresses: vec![
                interface(
                    "lo",
                    &[
                        IpAddr::V4(Ipv4Addr::LOCALHOST),
                        IpAddr::V6(Ipv6Addr::LOCALHOST),
                    ],
                ),
                interface(
                    "eth0",
                    &[
                        IpAddr::V6(Ipv6Addr::new(0xfe80, 0, 0, 0, 0xa00, 0x27ff, 0xfe4e, 0x66a1)),
                        IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5)),
                        IpAddr::V4(Ipv4Addr::new(10, 0, 0, 6)),
                    ],
                ),
                interface("docker0", &[IpAddr::V4(Ipv4Addr::new(172, 17, 0, 1))]),
                interface("wlan0", &[]),
            ],
            interface_stats: Some(vec![
                stats("lo", 65536, "00:00:00:00:00:00", true, None),
                stats("eth0", 1500, "08:00:27:4e:66:a1", true, Some(1000)),
                stats("docker0", 1500, "02:42:ac:11:00:01", false, None),
                stats("wlan0", 1500, "3c:a9:f4:10:22:33", false, None),
            ]),
            net_io: NetIoCounters {
                bytes_sent: 128 * MIB,
                bytes_recv: 1536 * MIB,
            },
            unreachable: Vec::new(),
            sampled_intervals: Vec::new(),
            usage_queries: Vec::new(),
        }
    }

    pub fn with_unreachable(mut self, subsystem: Subsystem) -> Self {
        self.unreachable.push(subsystem);
        self
    }

    fn check(&self, subsystem: Subsystem) -> Result<(), ProviderError> {
        if self.unreachable.contains(&subsystem) {
            return Err(ProviderError::unreachable(format!("{subsystem} source offline")));
        }
        Ok(())
    }
}

impl MetricsProvider for FakeProvider {
    fn host(&mut self) -> Result<HostInfo, ProviderError> {
        self.check(Subsystem::Host)?;
        Ok(self.host.clone())
    }

    fn core_counts(&mut self) -> Result<CoreCounts, ProviderError> {
        self.check(Subsystem::Cpu)?;
        Ok(self.cores)
    }

    fn cpu_usage(&mut self, interval: Duration) -> Result<f32, ProviderError> {
        self.check(Subsystem::Cpu)?;
        self.sampled_intervals.push(interval);
        Ok(self.cpu_usage)
    }

    fn cpu_frequency_mhz(&mut self) -> Result<u64, ProviderError> {
        self.frequency_mhz
            .ok_or_else(|| ProviderError::unavailable("cpu frequency"))
    }

    fn load_average(&mut self) -> Result<LoadAverage, ProviderError> {
        self.load_average
            .ok_or_else(|| ProviderError::unavailable("load average"))
    }

    fn cpu_counters(&mut self) -> Result<CpuCounters, ProviderError> {
        self.cpu_counters
            .ok_or_else(|| ProviderError::unavailable("cpu counters"))
    }

    fn virtual_memory(&mut self) -> Result<VirtualMemory, ProviderError> {
        self.check(Subsystem::Memory)?;
        Ok(self.memory)
    }

    fn partitions(&mut self) -> Result<Vec<Partition>, ProviderError> {
        self.check(Subsystem::Disk)?;
        Ok(self.partitions.clone())
    }

    fn partition_usage(&mut self, mount_point: &str) -> Result<PartitionUsage, ProviderError> {
        self.usage_queries.push(mount_point.to_string());
        if self.denied_mounts.iter().any(|m| m == mount_point) {
            return Err(ProviderError::PartitionAccessDenied {
                mount_point: mount_point.to_string(),
            });
        }
        self.usage
            .iter()
            .find(|(mount, _)| mount == mount_point)
            .map(|(_, usage)| *usage)
            .ok_or_else(|| ProviderError::unreachable(format!("{mount_point} is not mounted")))
    }

    fn disk_io_counters(&mut self) -> Result<Vec<(String, DiskIoCounters)>, ProviderError> {
        self.disk_io
            .clone()
            .ok_or_else(|| ProviderError::unavailable("disk io counters"))
    }

    fn interface_addresses(&mut self) -> Result<Vec<InterfaceAddresses>, ProviderError> {
        self.check(Subsystem::Network)?;
        Ok(self.addresses.clone())
    }

    fn interface_stats(&mut self) -> Result<Vec<InterfaceStats>, ProviderError> {
        self.interface_stats
            .clone()
            .ok_or_else(|| ProviderError::unavailable("interface stats"))
    }

    fn net_io_counters(&mut self) -> Result<NetIoCounters, ProviderError> {
        self.check(Subsystem::Network)?;
        Ok(self.net_io)
    }
}
