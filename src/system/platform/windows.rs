use super::{LinkState, PlatformExtensions};
use crate::system::provider::CpuCounters;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn cpu_counters() -> Option<CpuCounters> {
        None
    }

    fn mount_options(_mount_point: &str) -> Option<String> {
        None
    }

    fn link_state(_interface: &str) -> Option<LinkState> {
        None
    }

    fn load_average_supported() -> bool {
        // sysinfo reports zeros here rather than an error
        false
    }
}
