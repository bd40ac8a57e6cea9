pub mod fake;
pub mod native;
pub mod platform;
pub mod provider;
