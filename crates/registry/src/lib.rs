//! Software Registry - per-host tracking, change detection and notification

mod config;
mod registry;
mod scope;
mod sink;
mod tracker;

pub use config::{TrackerConfig, DEFAULT_RETENTION, DEFAULT_SWEEP_INTERVAL};
pub use registry::{RegisterOutcome, SoftwareRegistry, TrackerStats};
pub use scope::SubnetScopeFilter;
pub use sink::{MemorySink, TracingSink};
pub use tracker::SoftwareTracker;
