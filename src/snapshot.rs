//! Snapshot assembly: runs every collector once, then derives the display
//! values the report interpolates.

use std::fmt::Write;
use std::net::Ipv4Addr;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, debug_span};

use crate::collectors::{
    CpuInfo, DiskInfo, MemoryInfo, NetworkInfo, collect_cpu, collect_disk, collect_memory,
    collect_network,
};
use crate::config::{Config, DEFAULT_TIMESTAMP_FORMAT};
use crate::error::{CollectionFailed, Subsystem};
use crate::format::{Uptime, bytes_to_gb, bytes_to_mb, format_load_average};
use crate::metric::Metric;
use crate::system::provider::MetricsProvider;

/// Wall-clock instant a snapshot is taken at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureTime {
    pub unix_secs: i64,
    pub local: NaiveDateTime,
}

impl CaptureTime {
    pub fn now() -> Self {
        let now = Local::now();
        CaptureTime {
            unix_secs: now.timestamp(),
            local: now.naive_local(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SystemSnapshot {
    pub hostname: String,
    pub os_name: String,
    pub kernel_release: String,
    pub boot_time_unix: u64,
    pub uptime_secs: u64,
    pub uptime: Uptime,
    pub captured_at_unix: i64,
    pub captured_at: String,
    pub cpu: CpuInfo,
    pub memory: MemoryInfo,
    pub disk: DiskInfo,
    pub network: NetworkInfo,
    pub summary: Summary,
}

/// Values derived for the summary report. Sizes are binary GB/MB with two
/// decimals.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub memory: MemorySummary,
    pub cpu: CpuSummary,
    pub disk: Metric<DiskHeadline>,
    pub network: NetworkSummary,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MemorySummary {
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
    pub available_gb: f64,
    pub usage_percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CpuSummary {
    pub usage_percent: f32,
    pub load_average: Metric<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiskHeadline {
    pub mount_point: String,
    pub usage: Metric<DiskUsageSummary>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DiskUsageSummary {
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
    pub usage_percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub interface: Metric<InterfaceHeadline>,
    pub sent_mb: f64,
    pub received_mb: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InterfaceHeadline {
    pub name: String,
    pub address: Ipv4Addr,
}

/// Collect everything now, blocking for the configured CPU sample window.
pub fn build_snapshot<P: MetricsProvider + ?Sized>(
    provider: &mut P,
    config: &Config,
) -> Result<SystemSnapshot, CollectionFailed> {
    build_snapshot_at(provider, config, CaptureTime::now())
}

pub fn build_snapshot_at<P: MetricsProvider + ?Sized>(
    provider: &mut P,
    config: &Config,
    captured: CaptureTime,
) -> Result<SystemSnapshot, CollectionFailed> {
    let _span = debug_span!("snapshot.build").entered();

    let host = provider
        .host()
        .map_err(|source| CollectionFailed::new(Subsystem::Host, source))?;
    let memory = collect_memory(provider)?;
    let cpu = collect_cpu(provider, config.general.cpu_sample_interval())?;
    let disk = collect_disk(provider)?;
    let network = collect_network(provider)?;

    let uptime_secs = u64::try_from(captured.unix_secs)
        .unwrap_or(0)
        .saturating_sub(host.boot_time_unix);
    let summary = summarize(&cpu, &memory, &disk, &network);
    debug!(
        partitions = disk.partitions.len(),
        interfaces = network.addresses.len(),
        uptime_secs,
        "snapshot assembled"
    );

    Ok(SystemSnapshot {
        hostname: host.hostname,
        os_name: host.os_name,
        kernel_release: host.kernel_release,
        boot_time_unix: host.boot_time_unix,
        uptime_secs,
        uptime: Uptime::from_secs(uptime_secs),
        captured_at_unix: captured.unix_secs,
        captured_at: format_timestamp(&captured.local, &config.report.timestamp_format),
        cpu,
        memory,
        disk,
        network,
        summary,
    })
}

fn summarize(cpu: &CpuInfo, memory: &MemoryInfo, disk: &DiskInfo, network: &NetworkInfo) -> Summary {
    Summary {
        memory: MemorySummary {
            total_gb: bytes_to_gb(memory.total),
            used_gb: bytes_to_gb(memory.used),
            free_gb: bytes_to_gb(memory.free),
            available_gb: bytes_to_gb(memory.available),
            usage_percent: memory.usage_percent,
        },
        cpu: CpuSummary {
            usage_percent: cpu.usage_percent,
            load_average: cpu.load_average.as_ref().map(format_load_average),
        },
        disk: headline_disk(disk),
        network: NetworkSummary {
            interface: headline_interface(network),
            sent_mb: bytes_to_mb(network.io.bytes_sent),
            received_mb: bytes_to_mb(network.io.bytes_recv),
        },
    }
}

/// First partition in enumeration order; no relevance heuristic.
fn headline_disk(disk: &DiskInfo) -> Metric<DiskHeadline> {
    let Some(partition) = disk.partitions.first() else {
        return Metric::Unavailable;
    };
    let usage = disk
        .usage_for(&partition.mount_point)
        .map(|usage| DiskUsageSummary {
            total_gb: bytes_to_gb(usage.total),
            used_gb: bytes_to_gb(usage.used),
            free_gb: bytes_to_gb(usage.free),
            usage_percent: usage.percent,
        });
    Metric::Present(DiskHeadline {
        mount_point: partition.mount_point.clone(),
        usage: usage.into(),
    })
}

/// First interface that has an IPv4 address, in provider order.
fn headline_interface(network: &NetworkInfo) -> Metric<InterfaceHeadline> {
    network
        .addresses
        .first()
        .map(|entry| InterfaceHeadline {
            name: entry.interface.clone(),
            address: entry.address,
        })
        .into()
}

fn format_timestamp(local: &NaiveDateTime, pattern: &str) -> String {
    let mut out = String::new();
    // chrono reports a malformed pattern as a fmt error
    if write!(out, "{}", local.format(pattern)).is_err() {
        out.clear();
        let _ = write!(out, "{}", local.format(DEFAULT_TIMESTAMP_FORMAT));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::fake::FakeProvider;
    use chrono::NaiveDate;

    fn capture() -> CaptureTime {
        CaptureTime {
            unix_secs: 1_760_000_000 + 3 * 86_400 + 4 * 3_600 + 5 * 60 + 30,
            local: NaiveDate::from_ymd_opt(2025, 10, 12)
                .unwrap()
                .and_hms_opt(13, 25, 30)
                .unwrap(),
        }
    }

    #[test]
    fn uptime_is_capture_minus_boot() {
        let mut provider = FakeProvider::workstation();
        let snapshot = build_snapshot_at(&mut provider, &Config::default(), capture()).unwrap();
        assert_eq!(snapshot.uptime_secs, 273_930);
        assert_eq!(snapshot.uptime.to_string(), "3d 4h 5m");
        assert_eq!(snapshot.captured_at, "2025-10-12 13:25:30");
    }

    #[test]
    fn memory_failure_yields_no_snapshot() {
        let mut provider = FakeProvider::workstation().with_unreachable(Subsystem::Memory);
        let err = build_snapshot_at(&mut provider, &Config::default(), capture()).unwrap_err();
        assert_eq!(err.subsystem, Subsystem::Memory);
        assert!(err.to_string().contains("memory"));
    }

    #[test]
    fn host_failure_is_reported_as_host() {
        let mut provider = FakeProvider::workstation().with_unreachable(Subsystem::Host);
        let err = build_snapshot_at(&mut provider, &Config::default(), capture()).unwrap_err();
        assert_eq!(err.subsystem, Subsystem::Host);
    }

    #[test]
    fn headlines_use_first_available_entries() {
        let mut provider = FakeProvider::workstation();
        let snapshot = build_snapshot_at(&mut provider, &Config::default(), capture()).unwrap();

        let Metric::Present(disk) = &snapshot.summary.disk else {
            panic!("expected a headline disk");
        };
        assert_eq!(disk.mount_point, "/");
        let Metric::Present(usage) = disk.usage else {
            panic!("expected usage for /");
        };
        assert_eq!(usage.total_gb, 500.0);
        assert_eq!(usage.used_gb, 200.0);
        assert_eq!(usage.usage_percent, 40.0);

        let Metric::Present(iface) = &snapshot.summary.network.interface else {
            panic!("expected a headline interface");
        };
        assert_eq!(iface.name, "eth0");
        assert_eq!(snapshot.summary.network.sent_mb, 128.0);
        assert_eq!(snapshot.summary.network.received_mb, 1536.0);
    }

    #[test]
    fn headline_disk_without_usage_keeps_mount() {
        let mut provider = FakeProvider::workstation();
        provider.denied_mounts.push("/".to_string());
        let snapshot = build_snapshot_at(&mut provider, &Config::default(), capture()).unwrap();
        let Metric::Present(disk) = &snapshot.summary.disk else {
            panic!("expected a headline disk");
        };
        assert_eq!(disk.mount_point, "/");
        assert_eq!(disk.usage, Metric::Unavailable);
        assert_eq!(snapshot.disk.partitions.len(), 3);
    }

    #[test]
    fn no_partitions_means_no_headline() {
        let mut provider = FakeProvider::workstation();
        provider.partitions.clear();
        let snapshot = build_snapshot_at(&mut provider, &Config::default(), capture()).unwrap();
        assert_eq!(snapshot.summary.disk, Metric::Unavailable);
    }

    #[test]
    fn load_average_formatted_or_absent() {
        let mut provider = FakeProvider::workstation();
        let snapshot = build_snapshot_at(&mut provider, &Config::default(), capture()).unwrap();
        assert_eq!(
            snapshot.summary.cpu.load_average,
            Metric::Present("0.52, 0.61, 0.70".to_string())
        );

        provider.load_average = None;
        let snapshot = build_snapshot_at(&mut provider, &Config::default(), capture()).unwrap();
        assert_eq!(snapshot.summary.cpu.load_average, Metric::Unavailable);
    }

    #[test]
    fn timestamp_uses_configured_pattern() {
        let mut config = Config::default();
        config.report.timestamp_format = "%d/%m/%Y".to_string();
        let mut provider = FakeProvider::workstation();
        let snapshot = build_snapshot_at(&mut provider, &config, capture()).unwrap();
        assert_eq!(snapshot.captured_at, "12/10/2025");
    }

    #[test]
    fn malformed_timestamp_pattern_falls_back() {
        let local = capture().local;
        assert_eq!(format_timestamp(&local, "%Q"), "2025-10-12 13:25:30");
    }
}
