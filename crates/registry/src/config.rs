//! Tracking behaviour configuration
//!
//! Keep fields `pub` so the tracker and registry can read them without
//! accessor overhead.

use drishti_common::TrackPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// How long a host's software table survives without activity.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

/// How often the background sweep looks for idle hosts.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Which hosts are in scope for tracking.
    pub policy: TrackPolicy,
    /// Software names whose version *changes* raise a notice.
    pub interesting: HashSet<String>,
    /// Idle window after which a host's entries are evicted.
    pub retention: Duration,
    /// Cadence of the background eviction sweep.
    pub sweep_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let mut interesting = HashSet::new();
        interesting.insert("SSH".to_owned());
        Self {
            policy: TrackPolicy::LocalHostsOnly,
            interesting,
            retention: DEFAULT_RETENTION,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl TrackerConfig {
    /// Preset: track every host seen on the wire.
    #[inline]
    #[must_use]
    pub fn track_all() -> Self {
        Self {
            policy: TrackPolicy::AllHosts,
            ..Self::default()
        }
    }

    /// Preset: accept nothing.
    #[inline]
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            policy: TrackPolicy::Disabled,
            ..Self::default()
        }
    }

    /// Builder: override the scope policy.
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: TrackPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builder: mark a software name as interesting.
    #[inline]
    #[must_use]
    pub fn with_interesting<S: Into<String>>(mut self, name: S) -> Self {
        self.interesting.insert(name.into());
        self
    }

    /// Builder: override the idle retention window.
    #[inline]
    #[must_use]
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_marks_ssh_interesting() {
        let config = TrackerConfig::default();
        assert!(config.interesting.contains("SSH"));
        assert_eq!(config.policy, TrackPolicy::LocalHostsOnly);
        assert_eq!(config.retention, DEFAULT_RETENTION);
    }

    #[test]
    fn presets() {
        assert_eq!(TrackerConfig::track_all().policy, TrackPolicy::AllHosts);
        assert_eq!(TrackerConfig::disabled().policy, TrackPolicy::Disabled);
    }

    #[test]
    fn builders_compose() {
        let config = TrackerConfig::track_all()
            .with_interesting("OpenVPN")
            .with_retention(Duration::from_secs(60));
        assert!(config.interesting.contains("OpenVPN"));
        assert!(config.interesting.contains("SSH"));
        assert_eq!(config.retention, Duration::from_secs(60));
    }
}
