//! Drishti Common - Shared types and traits
//!
//! This crate provides the core types, traits, and utilities used across
//! the Drishti passive software-tracking engine.
//!
//! Key pieces:
//! - structured versions with a total order
//! - observations with documented defaults
//! - the sink and scope-filter seams toward the host platform
//! - comprehensive error handling

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{DrishtiError, DrishtiResult};
pub use traits::{HostScopeFilter, ObservationSink};
pub use types::{
    Connection, NoticeKind, Observation, Protocol, SoftwareCategory, SoftwareVersion, TrackPolicy,
    VersionChangeNotice,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
