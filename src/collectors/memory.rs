use serde::Serialize;
use tracing::debug_span;

use crate::error::{CollectionFailed, Subsystem};
use crate::system::provider::MetricsProvider;

/// Virtual memory in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MemoryInfo {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub available: u64,
    pub usage_percent: f64,
}

pub fn collect_memory<P: MetricsProvider + ?Sized>(
    provider: &mut P,
) -> Result<MemoryInfo, CollectionFailed> {
    let _span = debug_span!("collect.memory").entered();
    let raw = provider
        .virtual_memory()
        .map_err(|source| CollectionFailed::new(Subsystem::Memory, source))?;

    Ok(MemoryInfo {
        total: raw.total,
        used: raw.used,
        free: raw.free,
        available: raw.available,
        usage_percent: usage_percent(raw.used, raw.total),
    })
}

/// `used / total` as a percentage with one decimal; zero for an empty total.
pub fn usage_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((used as f64 / total as f64) * 1000.0).round() / 10.0
}
