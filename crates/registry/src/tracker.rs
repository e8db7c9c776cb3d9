//! Tracker - the analyzer-facing entry point and its worker loop
//!
//! Analyzers call [`SoftwareTracker::found`] from many tasks at once; the
//! gate itself never blocks. Accepted observations are handed to a single
//! worker task over an mpsc channel, so registrations apply in call order
//! (which gives per-key ordering for free) and the eviction sweep can never
//! race an in-flight registration: both run on the same task.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use drishti_common::{Connection, HostScopeFilter, Observation, ObservationSink, TrackPolicy};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, trace, warn};

use crate::config::TrackerConfig;
use crate::registry::{SoftwareRegistry, TrackerStats};

enum TrackerMessage {
    Register {
        conn: Connection,
        observation: Observation,
    },
    Lookup {
        host: IpAddr,
        name: String,
        reply: oneshot::Sender<Option<Observation>>,
    },
    Stats {
        reply: oneshot::Sender<TrackerStats>,
    },
}

/// Shared tracking front end. Created once at service start, shut down at
/// service stop.
pub struct SoftwareTracker {
    tx: mpsc::UnboundedSender<TrackerMessage>,
    scope: Arc<dyn HostScopeFilter>,
    policy: TrackPolicy,
    worker: JoinHandle<()>,
}

impl SoftwareTracker {
    #[must_use]
    pub fn new(
        config: TrackerConfig,
        scope: Arc<dyn HostScopeFilter>,
        sink: Arc<dyn ObservationSink>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let policy = config.policy;
        let sweep_interval = config.sweep_interval;
        let registry = SoftwareRegistry::new(config, sink);
        let worker = tokio::spawn(worker_loop(registry, rx, sweep_interval));
        Self {
            tx,
            scope,
            policy,
            worker,
        }
    }

    /// Sole entry point for reporting analyzers.
    ///
    /// Applies the scope gate and, for in-scope hosts, enqueues the
    /// observation for registration. Returns whether the observation was
    /// accepted for processing; a `true` says nothing about whether it ends
    /// up logged (dedup happens in the registry).
    #[instrument(
        skip(self, conn, observation),
        fields(host = %observation.host, name = %observation.name)
    )]
    pub fn found(&self, conn: &Connection, observation: Observation) -> bool {
        if !self.scope.in_scope(observation.host, self.policy) {
            trace!(policy = self.policy.as_str(), "observation out of scope");
            return false;
        }
        let msg = TrackerMessage::Register {
            conn: conn.clone(),
            observation,
        };
        if self.tx.send(msg).is_err() {
            warn!("tracker worker is gone, observation dropped");
            return false;
        }
        true
    }

    /// Current entry for (host, name), if any.
    pub async fn lookup(&self, host: IpAddr, name: &str) -> Option<Observation> {
        let (reply, rx) = oneshot::channel();
        let msg = TrackerMessage::Lookup {
            host,
            name: name.to_owned(),
            reply,
        };
        if self.tx.send(msg).is_err() {
            return None;
        }
        rx.await.unwrap_or(None)
    }

    /// Snapshot of the registry counters.
    pub async fn stats(&self) -> TrackerStats {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(TrackerMessage::Stats { reply }).is_err() {
            return TrackerStats::default();
        }
        rx.await.unwrap_or_default()
    }

    /// Close the intake and wait for queued observations to drain.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(err) = self.worker.await {
            warn!(error = %err, "tracker worker terminated abnormally");
        }
    }
}

async fn worker_loop(
    mut registry: SoftwareRegistry,
    mut rx: mpsc::UnboundedReceiver<TrackerMessage>,
    sweep_interval: Duration,
) {
    let mut sweep = tokio::time::interval(sweep_interval);
    sweep.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Some(TrackerMessage::Register { conn, observation }) => {
                    let outcome = registry.register(&conn, observation).await;
                    trace!(?outcome, "registration applied");
                }
                Some(TrackerMessage::Lookup { host, name, reply }) => {
                    let _ = reply.send(registry.lookup(host, &name, SystemTime::now()));
                }
                Some(TrackerMessage::Stats { reply }) => {
                    let _ = reply.send(registry.stats().clone());
                }
                None => break,
            },
            _ = sweep.tick() => {
                let evicted = registry.evict_idle(SystemTime::now());
                if evicted > 0 {
                    debug!(evicted, "idle host tables swept");
                }
            }
        }
    }
}
