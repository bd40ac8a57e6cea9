use std::net::{IpAddr, Ipv4Addr};

use chrono::NaiveDate;
use gtop::config::Config;
use gtop::report::{
    MIN_REPORT_WIDTH, render, render_detailed, render_detailed_with_width, render_json,
    render_with_width,
};
use gtop::snapshot::{CaptureTime, SystemSnapshot, build_snapshot_at};
use gtop::system::fake::{FakeProvider, interface, partition};
use gtop::system::provider::PartitionUsage;
use insta::assert_snapshot;
use unicode_width::UnicodeWidthStr;

fn capture() -> CaptureTime {
    CaptureTime {
        // boot + 3d 4h 5m 30s
        unix_secs: 1_760_273_930,
        local: NaiveDate::from_ymd_opt(2025, 10, 12)
            .unwrap()
            .and_hms_opt(13, 25, 30)
            .unwrap(),
    }
}

fn snapshot_of(mut provider: FakeProvider) -> SystemSnapshot {
    build_snapshot_at(&mut provider, &Config::default(), capture())
        .expect("fake provider snapshot")
}

#[test]
fn summary_report_from_fixture() {
    let text = render(&snapshot_of(FakeProvider::workstation()));
    assert_snapshot!("summary_report", text);
}

#[test]
fn degraded_host_renders_na_instead_of_failing() {
    let mut provider = FakeProvider::workstation();
    provider.cores.physical = None;
    provider.load_average = None;
    provider.frequency_mhz = None;
    provider.partitions.clear();
    provider.addresses = vec![interface("lo", &[IpAddr::V4(Ipv4Addr::LOCALHOST)])];

    let text = render(&snapshot_of(provider));
    assert_snapshot!("degraded_report", text);
}

#[test]
fn rendering_is_idempotent() {
    let snapshot = snapshot_of(FakeProvider::workstation());
    assert_eq!(render(&snapshot), render(&snapshot));
    assert_eq!(render_detailed(&snapshot), render_detailed(&snapshot));
}

/// The labelled block that starts with `first`, up to the next blank line.
fn block<'a>(text: &'a str, first: &str) -> Vec<&'a str> {
    text.lines()
        .skip_while(|line| *line != first)
        .take_while(|line| !line.is_empty())
        .collect()
}

#[test]
fn detailed_report_lists_every_partition_and_interface() {
    let snapshot = snapshot_of(FakeProvider::workstation());
    let text = render_detailed(&snapshot);

    assert!(text.starts_with(&render(&snapshot)));
    assert!(text.contains("[ Partitions ]"));
    assert!(text.contains("[ Interfaces ]"));

    assert_eq!(
        block(&text, "Device      : /dev/mapper/home-alice"),
        vec![
            "Device      : /dev/mapper/home-alice",
            "Mount       : /home/alice",
            "Type        : ext4",
            "Size        : N/A",
            "Usage       : N/A",
            "Options     : rw,nosuid",
        ]
    );

    let root = block(&text, "Device      : /dev/nvme0n1p2");
    assert!(root.contains(&"Size        : 500.0 GB"));
    assert!(root.contains(&"Usage       : 40.0%"));

    assert_eq!(
        block(&text, "Interface   : eth0"),
        vec![
            "Interface   : eth0",
            "IP Address  : 10.0.0.5",
            "Link        : up",
            "Speed       : 1000 Mb/s",
            "MTU         : 1500",
        ]
    );

    let wlan0 = block(&text, "Interface   : wlan0");
    assert!(wlan0.contains(&"IP Address  : -"));
    assert!(wlan0.contains(&"Link        : down"));
    assert!(wlan0.contains(&"Speed       : N/A"));
}

#[test]
fn every_detailed_line_fits_the_report_width() {
    let mut provider = FakeProvider::workstation();
    provider.partitions.push(partition(
        "/dev/mapper/luks-0f3c9a1e-2b7d-4c55-9e61-8a2f4d1b6c7e",
        "/var/lib/containers/storage/overlay",
        "overlay",
        "rw,relatime,lowerdir=/var/lib/containers/l1:/var/lib/containers/l2,upperdir=/var/lib/containers/u",
    ));
    provider.usage.push((
        "/var/lib/containers/storage/overlay".to_string(),
        PartitionUsage::from_space(64 << 30, 16 << 30),
    ));
    let snapshot = snapshot_of(provider);

    for width in [42, 60, 80] {
        let text = render_detailed_with_width(&snapshot, width);
        for line in text.lines() {
            assert!(line.width() <= width, "{line:?} exceeds {width} columns");
        }
        let options = text
            .lines()
            .find(|line| line.starts_with("Options     : rw,relatime,lowerdir"))
            .expect("long options row");
        assert!(options.ends_with('\u{2026}'));
    }
}

#[test]
fn configured_width_stretches_banner_and_rules() {
    let snapshot = snapshot_of(FakeProvider::workstation());
    let text = render_with_width(&snapshot, 60);
    let mut lines = text.lines();

    assert_eq!(
        lines.next(),
        Some("=================== gTOP SYSTEM SNAPSHOT ===================")
    );
    assert!(text.lines().any(|line| line == "-".repeat(60)));
    assert_eq!(text.lines().last(), Some("=".repeat(60).as_str()));
    assert!(text.contains("Hostname    : devbox\n"));
    assert_eq!(render_with_width(&snapshot, 42), render(&snapshot));
}

#[test]
fn width_below_minimum_is_clamped() {
    let snapshot = snapshot_of(FakeProvider::workstation());
    let text = render_with_width(&snapshot, 3);
    assert_eq!(text.lines().next().map(str::len), Some(MIN_REPORT_WIDTH));
    assert!(text.lines().all(|line| line.width() <= MIN_REPORT_WIDTH));
}

#[test]
fn json_dump_carries_raw_records() {
    let snapshot = snapshot_of(FakeProvider::workstation());
    let json = render_json(&snapshot).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["hostname"], "devbox");
    assert_eq!(value["uptime"]["days"], 3);
    assert_eq!(value["cpu"]["counters"]["context_switches"], 1_990_473);
    assert_eq!(value["disk"]["partitions"].as_array().unwrap().len(), 3);
    assert!(value["disk"]["usage"].get("/home/alice").is_none());
    assert_eq!(value["network"]["addresses"][0]["address"], "10.0.0.5");
    assert_eq!(value["summary"]["memory"]["usage_percent"], 50.0);
}

#[test]
fn unavailable_fields_serialize_as_null() {
    let mut provider = FakeProvider::workstation();
    provider.load_average = None;
    let snapshot = snapshot_of(provider);
    let value: serde_json::Value =
        serde_json::from_str(&render_json(&snapshot).unwrap()).unwrap();
    assert!(value["cpu"]["load_average"].is_null());
    assert!(value["summary"]["cpu"]["load_average"].is_null());
}
