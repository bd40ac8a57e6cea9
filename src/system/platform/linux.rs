use super::{LinkState, PlatformExtensions};
use crate::system::provider::CpuCounters;

pub struct Platform;

// IFF_UP from <net/if.h>
const IFF_UP: u64 = 0x1;

impl PlatformExtensions for Platform {
    fn cpu_counters() -> Option<CpuCounters> {
        let contents = std::fs::read_to_string("/proc/stat").ok()?;
        parse_proc_stat(&contents)
    }

    fn mount_options(mount_point: &str) -> Option<String> {
        let contents = std::fs::read_to_string("/proc/mounts").ok()?;
        parse_mount_options(&contents, mount_point)
    }

    fn link_state(interface: &str) -> Option<LinkState> {
        let base = format!("/sys/class/net/{interface}");
        let flags = std::fs::read_to_string(format!("{base}/flags")).ok();
        // Reading speed fails with EINVAL on virtual links and while down
        let speed = std::fs::read_to_string(format!("{base}/speed")).ok();
        if flags.is_none() && speed.is_none() {
            return None;
        }
        Some(LinkState {
            is_up: flags.as_deref().and_then(parse_if_flags),
            speed_mbps: speed.as_deref().and_then(parse_link_speed),
        })
    }

    fn load_average_supported() -> bool {
        true
    }
}

fn parse_proc_stat(contents: &str) -> Option<CpuCounters> {
    let mut context_switches = None;
    let mut interrupts = None;
    let mut soft_interrupts = None;
    for line in contents.lines() {
        let mut fields = line.split_whitespace();
        // `intr` and `softirq` lead with the total, per-source counts follow
        match fields.next() {
            Some("ctxt") => context_switches = fields.next().and_then(|v| v.parse().ok()),
            Some("intr") => interrupts = fields.next().and_then(|v| v.parse().ok()),
            Some("softirq") => soft_interrupts = fields.next().and_then(|v| v.parse().ok()),
            _ => {}
        }
    }
    Some(CpuCounters {
        context_switches: context_switches?,
        interrupts: interrupts?,
        soft_interrupts,
        syscalls: None,
    })
}

fn parse_mount_options(contents: &str, mount_point: &str) -> Option<String> {
    // Later entries shadow earlier ones mounted on the same path
    contents
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 {
                return None;
            }
            (unescape_mount_field(fields[1]) == mount_point).then(|| fields[3].to_string())
        })
        .last()
}

/// /proc/mounts octal-escapes space, tab, newline and backslash.
fn unescape_mount_field(field: &str) -> String {
    field
        .replace("\\040", " ")
        .replace("\\011", "\t")
        .replace("\\012", "\n")
        .replace("\\134", "\\")
}

fn parse_if_flags(raw: &str) -> Option<bool> {
    let hex = raw.trim().trim_start_matches("0x");
    u64::from_str_radix(hex, 16)
        .ok()
        .map(|flags| flags & IFF_UP != 0)
}

fn parse_link_speed(raw: &str) -> Option<u64> {
    // Unknown speed is reported as -1
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|speed| *speed > 0)
        .map(|speed| speed as u64)
}
