use std::fmt;

use thiserror::Error;

/// Failure reported by a [`MetricsProvider`](crate::system::provider::MetricsProvider) call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The stat exists in the data model but this platform does not report it.
    #[error("{metric} is not available on this platform")]
    MetricUnavailable { metric: &'static str },

    /// A usage query on one mount point was refused by the OS.
    #[error("access to {mount_point} was denied")]
    PartitionAccessDenied { mount_point: String },

    /// The provider cannot produce any data for the request.
    #[error("metrics provider unreachable: {reason}")]
    Unreachable { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    pub fn unavailable(metric: &'static str) -> Self {
        ProviderError::MetricUnavailable { metric }
    }

    pub fn unreachable(reason: impl Into<String>) -> Self {
        ProviderError::Unreachable {
            reason: reason.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subsystem {
    Host,
    Cpu,
    Memory,
    Disk,
    Network,
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Subsystem::Host => "host",
            Subsystem::Cpu => "cpu",
            Subsystem::Memory => "memory",
            Subsystem::Disk => "disk",
            Subsystem::Network => "network",
        };
        f.write_str(name)
    }
}

/// A whole collector could not produce its record. Always fatal for the run.
#[derive(Debug, Error)]
#[error("failed to collect {subsystem} metrics: {source}")]
pub struct CollectionFailed {
    pub subsystem: Subsystem,
    #[source]
    pub source: ProviderError,
}

impl CollectionFailed {
    pub fn new(subsystem: Subsystem, source: ProviderError) -> Self {
        CollectionFailed { subsystem, source }
    }
}
