use std::io::{self, ErrorKind};
use std::path::Path;
use std::time::Duration;

use sysinfo::{Disks, MINIMUM_CPU_UPDATE_INTERVAL, Networks, System};
use tracing::debug;

use super::platform;
use super::provider::{
    CoreCounts, CpuCounters, DiskIoCounters, HostInfo, InterfaceAddresses, InterfaceStats,
    LoadAverage, MetricsProvider, NetIoCounters, Partition, PartitionUsage, VirtualMemory,
};
use crate::error::ProviderError;

/// [`MetricsProvider`] backed by the `sysinfo` crate, with the gaps filled
/// from [`platform`] reads.
pub struct SysinfoProvider {
    sys: System,
    disks: Disks,
    networks: Networks,
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoProvider {
    pub fn new() -> Self {
        SysinfoProvider {
            sys: System::new(),
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
        }
    }
}

impl MetricsProvider for SysinfoProvider {
    fn host(&mut self) -> Result<HostInfo, ProviderError> {
        let boot_time_unix = System::boot_time();
        if boot_time_unix == 0 {
            return Err(ProviderError::unreachable("boot time not reported"));
        }
        Ok(HostInfo {
            hostname: System::host_name().unwrap_or_else(|| "unknown".to_string()),
            os_name: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
            kernel_release: System::kernel_version().unwrap_or_else(|| "unknown".to_string()),
            boot_time_unix,
        })
    }

    fn core_counts(&mut self) -> Result<CoreCounts, ProviderError> {
        if self.sys.cpus().is_empty() {
            self.sys.refresh_cpu_all();
        }
        let logical = self.sys.cpus().len();
        if logical == 0 {
            return Err(ProviderError::unreachable("no CPUs enumerated"));
        }
        Ok(CoreCounts {
            logical,
            physical: System::physical_core_count(),
        })
    }

    fn cpu_usage(&mut self, interval: Duration) -> Result<f32, ProviderError> {
        let interval = interval.max(MINIMUM_CPU_UPDATE_INTERVAL);
        debug!(interval_ms = interval.as_millis() as u64, "sampling cpu usage");
        self.sys.refresh_cpu_usage();
        std::thread::sleep(interval);
        self.sys.refresh_cpu_usage();
        if self.sys.cpus().is_empty() {
            return Err(ProviderError::unreachable("no CPUs enumerated"));
        }
        Ok(self.sys.global_cpu_usage())
    }

    fn cpu_frequency_mhz(&mut self) -> Result<u64, ProviderError> {
        self.sys.refresh_cpu_frequency();
        self.sys
            .cpus()
            .first()
            .map(|cpu| cpu.frequency())
            .filter(|mhz| *mhz > 0)
            .ok_or_else(|| ProviderError::unavailable("cpu frequency"))
    }

    fn load_average(&mut self) -> Result<LoadAverage, ProviderError> {
        if !platform::load_average_supported() {
            return Err(ProviderError::unavailable("load average"));
        }
        let load = System::load_average();
        Ok(LoadAverage {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        })
    }

    fn cpu_counters(&mut self) -> Result<CpuCounters, ProviderError> {
        platform::cpu_counters().ok_or_else(|| ProviderError::unavailable("cpu counters"))
    }

    fn virtual_memory(&mut self) -> Result<VirtualMemory, ProviderError> {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        if total == 0 {
            return Err(ProviderError::unreachable("total memory reported as zero"));
        }
        Ok(VirtualMemory {
            total,
            used: self.sys.used_memory(),
            free: self.sys.free_memory(),
            available: self.sys.available_memory(),
        })
    }

    fn partitions(&mut self) -> Result<Vec<Partition>, ProviderError> {
        Ok(self
            .disks
            .list()
            .iter()
            .map(|disk| {
                let mount_point = disk.mount_point().to_string_lossy().to_string();
                let options = platform::mount_options(&mount_point)
                    .unwrap_or_else(|| if disk.is_read_only() { "ro" } else { "rw" }.to_string());
                Partition {
                    device: disk.name().to_string_lossy().to_string(),
                    fs_type: disk.file_system().to_string_lossy().to_string(),
                    mount_point,
                    options,
                }
            })
            .collect())
    }

    fn partition_usage(&mut self, mount_point: &str) -> Result<PartitionUsage, ProviderError> {
        // statvfs on the mount point fails the same way stat does
        if let Err(err) = std::fs::metadata(mount_point) {
            return Err(usage_error(err, mount_point));
        }
        let disk = self
            .disks
            .list()
            .iter()
            .find(|disk| disk.mount_point() == Path::new(mount_point))
            .ok_or_else(|| ProviderError::unreachable(format!("{mount_point} is not mounted")))?;
        Ok(PartitionUsage::from_space(
            disk.total_space(),
            disk.available_space(),
        ))
    }

    fn disk_io_counters(&mut self) -> Result<Vec<(String, DiskIoCounters)>, ProviderError> {
        let mut counters: Vec<(String, DiskIoCounters)> = Vec::new();
        for disk in self.disks.list() {
            let name = disk.name().to_string_lossy();
            let device = name.strip_prefix("/dev/").unwrap_or(&name).to_string();
            // Several mounts can share one device (bind mounts, subvolumes)
            if counters.iter().any(|(existing, _)| *existing == device) {
                continue;
            }
            let usage = disk.usage();
            counters.push((
                device,
                DiskIoCounters {
                    read_bytes: usage.total_read_bytes,
                    write_bytes: usage.total_written_bytes,
                },
            ));
        }
        Ok(counters)
    }

    fn interface_addresses(&mut self) -> Result<Vec<InterfaceAddresses>, ProviderError> {
        Ok(self
            .networks
            .iter()
            .map(|(name, data)| InterfaceAddresses {
                name: name.clone(),
                addresses: data.ip_networks().iter().map(|net| net.addr).collect(),
            })
            .collect())
    }

    fn interface_stats(&mut self) -> Result<Vec<InterfaceStats>, ProviderError> {
        Ok(self
            .networks
            .iter()
            .map(|(name, data)| {
                let link = platform::link_state(name).unwrap_or_default();
                InterfaceStats {
                    name: name.clone(),
                    mtu: data.mtu(),
                    mac_address: data.mac_address().to_string(),
                    is_up: link.is_up,
                    speed_mbps: link.speed_mbps,
                }
            })
            .collect())
    }

    fn net_io_counters(&mut self) -> Result<NetIoCounters, ProviderError> {
        Ok(self
            .networks
            .iter()
            .fold(NetIoCounters::default(), |acc, (_, data)| NetIoCounters {
                bytes_sent: acc.bytes_sent + data.total_transmitted(),
                bytes_recv: acc.bytes_recv + data.total_received(),
            }))
    }
}

/// A refused stat only costs that mount point its usage; anything else is fatal.
fn usage_error(err: io::Error, mount_point: &str) -> ProviderError {
    match err.kind() {
        ErrorKind::PermissionDenied => ProviderError::PartitionAccessDenied {
            mount_point: mount_point.to_string(),
        },
        _ => ProviderError::Io(err),
    }
}
