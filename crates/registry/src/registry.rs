//! Per-host software table and the register/update/notify decision
//!
//! The registry keeps the most recently accepted observation per
//! (host, name) and decides, for every incoming observation, whether it is
//! new information: first sightings are recorded, interesting version
//! changes are recorded and raise a notice, everything else is suppressed.
//!
//! The lookup-compare-decide-write sequence in [`SoftwareRegistry::register`]
//! must run as an atomic unit per key; the tracker serializes all calls
//! through a single worker task.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use drishti_common::{Connection, Observation, ObservationSink, VersionChangeNotice};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::TrackerConfig;

/// Outcome of a single registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// First sighting of this (host, name): recorded.
    New,
    /// Interesting software changed version: notice raised, then recorded.
    Changed,
    /// Already known (same version, or uninteresting churn): nothing emitted.
    Suppressed,
}

/// Running counters over the registry's lifetime.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrackerStats {
    pub observations: u64,
    pub recorded: u64,
    pub alerts: u64,
    pub suppressed: u64,
    pub evicted_hosts: u64,
}

struct HostTable {
    entries: HashMap<String, Observation>,
    last_activity: SystemTime,
}

/// The per-host, per-name table of last-known software state.
pub struct SoftwareRegistry {
    hosts: HashMap<IpAddr, HostTable>,
    config: TrackerConfig,
    sink: Arc<dyn ObservationSink>,
    stats: TrackerStats,
}

impl SoftwareRegistry {
    #[must_use]
    pub fn new(config: TrackerConfig, sink: Arc<dyn ObservationSink>) -> Self {
        Self {
            hosts: HashMap::new(),
            config,
            sink,
            stats: TrackerStats::default(),
        }
    }

    /// Apply one accepted observation: look up the current entry, compare,
    /// decide, emit.
    ///
    /// Sink failures are logged and swallowed; the table mutation still
    /// happens, and the error never reaches the reporting analyzer.
    pub async fn register(
        &mut self,
        conn: &Connection,
        observation: Observation,
    ) -> RegisterOutcome {
        self.stats.observations += 1;

        let table = self
            .hosts
            .entry(observation.host)
            .or_insert_with(|| HostTable {
                entries: HashMap::new(),
                last_activity: observation.timestamp,
            });
        table.last_activity = observation.timestamp;

        let Some(old) = table.entries.get(&observation.name) else {
            debug!(host = %observation.host, software = %observation, "first sighting");
            write_record(self.sink.as_ref(), &observation).await;
            self.stats.recorded += 1;
            table.entries.insert(observation.name.clone(), observation);
            return RegisterOutcome::New;
        };

        let interesting = self.config.interesting.contains(&observation.name);
        if interesting && old.version != observation.version {
            let label = conn.endpoint_label(observation.host);
            let message = format!(
                "{} '{}' version changed from {} to {}",
                label, observation.name, old.version, observation.version,
            );
            info!(host = %observation.host, "{}", message);

            let notice = VersionChangeNotice::new(
                conn.clone(),
                message,
                observation.to_string(),
                observation.category,
            );
            raise_notice(self.sink.as_ref(), &notice).await;
            self.stats.alerts += 1;

            write_record(self.sink.as_ref(), &observation).await;
            self.stats.recorded += 1;
            table.entries.insert(observation.name.clone(), observation);
            return RegisterOutcome::Changed;
        }

        // Same version, or uninteresting churn: the stored entry stays
        // authoritative and nothing is emitted.
        self.stats.suppressed += 1;
        RegisterOutcome::Suppressed
    }

    /// Current entry for (host, name), expiring the host first if idle.
    pub fn lookup(&mut self, host: IpAddr, name: &str, now: SystemTime) -> Option<Observation> {
        let idle = match self.hosts.get(&host) {
            Some(table) => is_idle(table, self.config.retention, now),
            None => return None,
        };
        if idle {
            self.hosts.remove(&host);
            self.stats.evicted_hosts += 1;
            return None;
        }
        self.hosts
            .get(&host)
            .and_then(|table| table.entries.get(name))
            .cloned()
    }

    /// Drop every host table idle past the retention window. Silent: no
    /// sink events for evictions.
    pub fn evict_idle(&mut self, now: SystemTime) -> usize {
        let retention = self.config.retention;
        let before = self.hosts.len();
        self.hosts.retain(|host, table| {
            let keep = !is_idle(table, retention, now);
            if !keep {
                debug!(host = %host, "evicting idle host table");
            }
            keep
        });
        let evicted = before - self.hosts.len();
        self.stats.evicted_hosts += evicted as u64;
        evicted
    }

    #[inline]
    #[must_use]
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    #[inline]
    #[must_use]
    pub fn stats(&self) -> &TrackerStats {
        &self.stats
    }
}

fn is_idle(table: &HostTable, retention: Duration, now: SystemTime) -> bool {
    match now.duration_since(table.last_activity) {
        Ok(idle) => idle >= retention,
        // Activity timestamp in the future: clock skew, treat as fresh.
        Err(_) => false,
    }
}

async fn write_record(sink: &dyn ObservationSink, observation: &Observation) {
    if let Err(err) = sink.record(observation).await {
        warn!(error = %err, host = %observation.host, "observation sink write failed");
    }
}

async fn raise_notice(sink: &dyn ObservationSink, notice: &VersionChangeNotice) {
    if let Err(err) = sink.notify(notice).await {
        warn!(error = %err, "notice emission failed");
    }
}
