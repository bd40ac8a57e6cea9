pub mod collectors;
pub mod config;
pub mod error;
pub mod format;
pub mod metric;
pub mod report;
pub mod snapshot;
pub mod system;
