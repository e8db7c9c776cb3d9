//! Seam traits between the tracking core and its collaborators
//!
//! The registry talks to the outside world through exactly two interfaces:
//! the observation sink (durable log + alert channel) and the host-scope
//! predicate. Both are object-safe so implementations can be swapped at
//! service start.

use crate::types::{Observation, TrackPolicy, VersionChangeNotice};
use anyhow::Result;
use async_trait::async_trait;
use std::net::IpAddr;

/// Destination for accepted observations and version-change notices.
///
/// `record` is append-only: the registry writes one record per accepted,
/// non-suppressed observation and never rewrites or deletes prior records.
/// Implementations are expected to be near-instant and best-effort; errors
/// are logged by the registry, never propagated to reporting analyzers.
#[async_trait]
pub trait ObservationSink: Send + Sync {
    /// Append one accepted observation to the durable log.
    async fn record(&self, observation: &Observation) -> Result<()>;

    /// Raise a version-change notice on the alert channel.
    async fn notify(&self, notice: &VersionChangeNotice) -> Result<()>;
}

/// Externally supplied predicate deciding whether a host is tracked under a
/// given policy.
///
/// What "local" means (site subnets, RFC1918, anything else) is entirely the
/// implementation's business; the core only asks the question.
pub trait HostScopeFilter: Send + Sync {
    fn in_scope(&self, host: IpAddr, policy: TrackPolicy) -> bool;
}
