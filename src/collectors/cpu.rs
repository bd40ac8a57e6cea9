use std::time::Duration;

use serde::Serialize;
use tracing::debug_span;

use super::absorb;
use crate::error::{CollectionFailed, Subsystem};
use crate::metric::Metric;
use crate::system::provider::{CpuCounters, LoadAverage, MetricsProvider};

/// Usage is averaged over this window unless configured otherwise.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CpuInfo {
    pub logical_cores: usize,
    pub physical_cores: Metric<usize>,
    pub usage_percent: f32,
    pub frequency_mhz: Metric<u64>,
    pub load_average: Metric<LoadAverage>,
    pub counters: Metric<CpuCounters>,
}

/// Blocks for `sample_interval` while usage is measured.
pub fn collect_cpu<P: MetricsProvider + ?Sized>(
    provider: &mut P,
    sample_interval: Duration,
) -> Result<CpuInfo, CollectionFailed> {
    let _span = debug_span!("collect.cpu").entered();
    let fail = |source| CollectionFailed::new(Subsystem::Cpu, source);

    let cores = provider.core_counts().map_err(fail)?;
    let usage_percent = provider.cpu_usage(sample_interval).map_err(fail)?;
    let logical_cores = cores.logical.max(1);

    Ok(CpuInfo {
        logical_cores,
        physical_cores: cores
            .physical
            .filter(|count| *count >= 1)
            .map(|count| count.min(logical_cores))
            .into(),
        usage_percent: usage_percent.clamp(0.0, 100.0),
        frequency_mhz: absorb(provider.cpu_frequency_mhz()),
        load_average: absorb(provider.load_average()),
        counters: absorb(provider.cpu_counters()),
    })
}
