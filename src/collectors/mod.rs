//! One collector per subsystem. Each queries a
//! [`MetricsProvider`](crate::system::provider::MetricsProvider) and
//! returns a typed record; field-level failures stop here and become
//! [`Metric::Unavailable`].

pub mod cpu;
pub mod disk;
pub mod memory;
pub mod network;

pub use cpu::{CpuInfo, collect_cpu};
pub use disk::{DiskInfo, collect_disk};
pub use memory::{MemoryInfo, collect_memory};
pub use network::{NetworkInfo, collect_network};

use tracing::{debug, warn};

use crate::error::ProviderError;
use crate::metric::Metric;

/// Turn an optional stat's result into a [`Metric`], logging why it is absent.
pub(crate) fn absorb<T>(result: Result<T, ProviderError>) -> Metric<T> {
    match result {
        Ok(value) => Metric::Present(value),
        Err(ProviderError::MetricUnavailable { metric }) => {
            debug!(metric, "metric unavailable on this platform");
            Metric::Unavailable
        }
        Err(err) => {
            warn!(error = %err, "optional metric could not be read");
            Metric::Unavailable
        }
    }
}
