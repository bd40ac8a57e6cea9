//! Fixed-width text rendering of a [`SystemSnapshot`]. Only interpolates
//! values the assembler already derived.

use std::fmt::Write;

use crate::format::{format_bytes, pad_unicode, truncate_unicode};
use crate::metric::Metric;
use crate::snapshot::{DiskHeadline, SystemSnapshot};

/// Default total width of the text report, in display columns.
pub const REPORT_WIDTH: usize = 42;
const TITLE: &str = " gTOP SYSTEM SNAPSHOT ";
const LABEL_WIDTH: usize = 12;
/// Narrowest width that still fits the banner title with a rule on each side.
pub const MIN_REPORT_WIDTH: usize = TITLE.len() + 2;

/// The summary report at the default width.
pub fn render(snapshot: &SystemSnapshot) -> String {
    render_with_width(snapshot, REPORT_WIDTH)
}

/// The summary report: header, Memory/CPU/Disk/Network blocks, footer.
/// `width` is clamped to [`MIN_REPORT_WIDTH`].
pub fn render_with_width(snapshot: &SystemSnapshot, width: usize) -> String {
    let mut out = Report::new(width);
    let banner = out.banner();
    out.line(&banner);
    out.field("Hostname", &snapshot.hostname);
    out.field("Uptime", &snapshot.uptime.to_string());
    out.field("OS", &snapshot.os_name);
    out.field("Kernel", &snapshot.kernel_release);
    out.rule('-');

    let memory = &snapshot.summary.memory;
    out.section("Memory");
    out.field("Total", &gb(memory.total_gb));
    out.field("Used", &gb(memory.used_gb));
    out.field("Free", &gb(memory.free_gb));
    out.field("Available", &gb(memory.available_gb));
    out.field("Usage", &percent(memory.usage_percent));
    out.rule('-');

    let cpu = &snapshot.cpu;
    out.section("CPU");
    out.field("Logical", &cpu.logical_cores.to_string());
    out.field("Physical", &cpu.physical_cores.to_string());
    out.field(
        "Usage",
        &percent(f64::from(snapshot.summary.cpu.usage_percent)),
    );
    out.field("Load Avg", &snapshot.summary.cpu.load_average.to_string());
    out.field(
        "Frequency",
        &cpu.frequency_mhz.map(|mhz| format!("{mhz} MHz")).to_string(),
    );
    out.rule('-');

    out.section("Disk");
    disk_block(&mut out, &snapshot.summary.disk);
    out.rule('-');

    let network = &snapshot.summary.network;
    out.section("Network");
    out.field(
        "Interface",
        &network.interface.as_ref().map(|i| i.name.as_str()).to_string(),
    );
    out.field(
        "IP Address",
        &network.interface.as_ref().map(|i| i.address).to_string(),
    );
    out.field("Sent", &mb(network.sent_mb));
    out.field("Received", &mb(network.received_mb));
    out.rule('-');

    out.line("");
    out.line(&format!("Snapshot Timestamp : {}", snapshot.captured_at));
    out.rule('=');
    out.text
}

/// The detailed report at the default width.
pub fn render_detailed(snapshot: &SystemSnapshot) -> String {
    render_detailed_with_width(snapshot, REPORT_WIDTH)
}

/// The summary followed by one block per partition and per interface.
pub fn render_detailed_with_width(snapshot: &SystemSnapshot, width: usize) -> String {
    let mut out = Report::new(width);
    out.text = render_with_width(snapshot, width);

    out.section("Partitions");
    if snapshot.disk.partitions.is_empty() {
        out.line("none");
    }
    for (i, partition) in snapshot.disk.partitions.iter().enumerate() {
        if i > 0 {
            out.line("");
        }
        let (size, usage) = match snapshot.disk.usage_for(&partition.mount_point) {
            Some(usage) => (format_bytes(usage.total), percent(usage.percent)),
            None => ("N/A".to_string(), "N/A".to_string()),
        };
        out.field("Device", &partition.device);
        out.field("Mount", &partition.mount_point);
        out.field("Type", &partition.fs_type);
        out.field("Size", &size);
        out.field("Usage", &usage);
        out.field("Options", &partition.options);
    }

    out.section("Interfaces");
    if snapshot.network.interfaces.is_empty() {
        out.line("none");
    }
    for (i, iface) in snapshot.network.interfaces.iter().enumerate() {
        if i > 0 {
            out.line("");
        }
        let address = snapshot
            .network
            .address_of(&iface.name)
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| "-".to_string());
        let link = iface.is_up.map(|up| if up { "up" } else { "down" });
        let speed = iface.speed_mbps.map(|mbps| format!("{mbps} Mb/s"));
        out.field("Interface", &iface.name);
        out.field("IP Address", &address);
        out.field("Link", &link.to_string());
        out.field("Speed", &speed.to_string());
        out.field("MTU", &iface.mtu.to_string());
    }
    out.rule('=');
    out.text
}

pub fn render_json(snapshot: &SystemSnapshot) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshot)
}

/// Text buffer that keeps every line within `width` columns.
struct Report {
    text: String,
    width: usize,
}

impl Report {
    fn new(width: usize) -> Self {
        Report {
            text: String::new(),
            width: width.max(MIN_REPORT_WIDTH),
        }
    }

    fn banner(&self) -> String {
        let side = self.width.saturating_sub(TITLE.len()) / 2;
        let mut line = format!("{}{TITLE}{}", "=".repeat(side), "=".repeat(side));
        while line.len() < self.width {
            line.push('=');
        }
        line
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.text, "{}", truncate_unicode(text, self.width));
    }

    fn rule(&mut self, ch: char) {
        let _ = writeln!(self.text, "{}", ch.to_string().repeat(self.width));
    }

    fn section(&mut self, name: &str) {
        self.line("");
        self.line(&format!("[ {name} ]"));
    }

    fn field(&mut self, label: &str, value: &str) {
        let value = truncate_unicode(value, self.width - LABEL_WIDTH - 2);
        let _ = writeln!(self.text, "{}: {value}", pad_unicode(label, LABEL_WIDTH));
    }
}

fn disk_block(out: &mut Report, headline: &Metric<DiskHeadline>) {
    let Metric::Present(disk) = headline else {
        for label in ["Mount", "Used", "Free", "Usage"] {
            out.field(label, "N/A");
        }
        return;
    };
    out.field("Mount", &disk.mount_point);
    out.field("Used", &disk.usage.map(|u| gb(u.used_gb)).to_string());
    out.field("Free", &disk.usage.map(|u| gb(u.free_gb)).to_string());
    out.field(
        "Usage",
        &disk.usage.map(|u| percent(u.usage_percent)).to_string(),
    );
}

fn gb(value: f64) -> String {
    format!("{value:.2} GB")
}

fn mb(value: f64) -> String {
    format!("{value:.2} MB")
}

fn percent(value: f64) -> String {
    format!("{value:.1}%")
}
