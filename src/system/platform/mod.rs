use crate::system::provider::CpuCounters;

/// Link-layer state read from the OS, each part optional.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkState {
    pub is_up: Option<bool>,
    pub speed_mbps: Option<u64>,
}

pub trait PlatformExtensions {
    fn cpu_counters() -> Option<CpuCounters>;
    fn mount_options(mount_point: &str) -> Option<String>;
    fn link_state(interface: &str) -> Option<LinkState>;
    fn load_average_supported() -> bool;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;

pub fn cpu_counters() -> Option<CpuCounters> {
    platform_impl::Platform::cpu_counters()
}

pub fn mount_options(mount_point: &str) -> Option<String> {
    platform_impl::Platform::mount_options(mount_point)
}

pub fn link_state(interface: &str) -> Option<LinkState> {
    platform_impl::Platform::link_state(interface)
}

pub fn load_average_supported() -> bool {
    platform_impl::Platform::load_average_supported()
}
