use std::net::{IpAddr, Ipv4Addr};

use serde::Serialize;
use tracing::debug_span;

use super::absorb;
use crate::error::{CollectionFailed, Subsystem};
use crate::metric::Metric;
use crate::system::provider::{InterfaceStats, MetricsProvider, NetIoCounters};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InterfaceAddress {
    pub interface: String,
    pub address: Ipv4Addr,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InterfaceStatus {
    pub name: String,
    pub mtu: u64,
    pub mac_address: String,
    pub is_up: Metric<bool>,
    pub speed_mbps: Metric<u64>,
}

impl From<InterfaceStats> for InterfaceStatus {
    fn from(stats: InterfaceStats) -> Self {
        InterfaceStatus {
            name: stats.name,
            mtu: stats.mtu,
            mac_address: stats.mac_address,
            is_up: stats.is_up.into(),
            speed_mbps: stats.speed_mbps.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NetworkInfo {
    /// One IPv4 address per interface, in provider enumeration order.
    pub addresses: Vec<InterfaceAddress>,
    pub interfaces: Vec<InterfaceStatus>,
    pub io: NetIoCounters,
}

impl NetworkInfo {
    pub fn address_of(&self, interface: &str) -> Option<Ipv4Addr> {
        self.addresses
            .iter()
            .find(|entry| entry.interface == interface)
            .map(|entry| entry.address)
    }
}

/// The first IPv4 address outside `127.0.0.0/8`.
pub fn first_ipv4(addresses: &[IpAddr]) -> Option<Ipv4Addr> {
    addresses.iter().find_map(|addr| match addr {
        IpAddr::V4(v4) if !v4.is_loopback() => Some(*v4),
        _ => None,
    })
}

pub fn collect_network<P: MetricsProvider + ?Sized>(
    provider: &mut P,
) -> Result<NetworkInfo, CollectionFailed> {
    let _span = debug_span!("collect.network").entered();
    let fail = |source| CollectionFailed::new(Subsystem::Network, source);

    let mut addresses: Vec<InterfaceAddress> = Vec::new();
    for entry in provider.interface_addresses().map_err(fail)? {
        if addresses.iter().any(|known| known.interface == entry.name) {
            continue;
        }
        if let Some(address) = first_ipv4(&entry.addresses) {
            addresses.push(InterfaceAddress {
                interface: entry.name,
                address,
            });
        }
    }

    let interfaces = match absorb(provider.interface_stats()) {
        Metric::Present(stats) => stats.into_iter().map(InterfaceStatus::from).collect(),
        Metric::Unavailable => Vec::new(),
    };
    let io = provider.net_io_counters().map_err(fail)?;

    Ok(NetworkInfo {
        addresses,
        interfaces,
        io,
    })
}
