//! Observation sinks
//!
//! [`TracingSink`] hands accepted observations to the host platform's log
//! pipeline as JSON records; [`MemorySink`] captures everything in memory
//! for tests and embedders that post-process observations themselves.

use anyhow::Result;
use async_trait::async_trait;
use drishti_common::{Observation, ObservationSink, VersionChangeNotice};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Default sink: one JSON log record per accepted observation, notices at
/// warn level.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ObservationSink for TracingSink {
    async fn record(&self, observation: &Observation) -> Result<()> {
        let record = serde_json::to_string(observation)?;
        info!(target: "drishti::software", record = %record, "software observed");
        Ok(())
    }

    async fn notify(&self, notice: &VersionChangeNotice) -> Result<()> {
        warn!(
            target: "drishti::notice",
            kind = notice.kind.as_str(),
            subject = %notice.subject,
            category = notice.category.as_str(),
            "{}",
            notice.message,
        );
        Ok(())
    }
}

/// Capturing sink: keeps records and notices in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Observation>>,
    notices: Mutex<Vec<VersionChangeNotice>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, in write order.
    pub async fn records(&self) -> Vec<Observation> {
        self.records.lock().await.clone()
    }

    /// Snapshot of every notice raised so far, in emission order.
    pub async fn notices(&self) -> Vec<VersionChangeNotice> {
        self.notices.lock().await.clone()
    }
}

#[async_trait]
impl ObservationSink for MemorySink {
    async fn record(&self, observation: &Observation) -> Result<()> {
        self.records.lock().await.push(observation.clone());
        Ok(())
    }

    async fn notify(&self, notice: &VersionChangeNotice) -> Result<()> {
        self.notices.lock().await.push(notice.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drishti_common::{Connection, SoftwareCategory, SoftwareVersion};

    #[tokio::test]
    async fn memory_sink_captures_in_order() {
        let sink = MemorySink::new();
        let first = Observation::new("nginx", SoftwareVersion::new(1, 18, 0));
        let second = Observation::new("nginx", SoftwareVersion::new(1, 20, 1));
        sink.record(&first).await.unwrap();
        sink.record(&second).await.unwrap();

        let records = sink.records().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].version, SoftwareVersion::new(1, 18, 0));
        assert_eq!(records[1].version, SoftwareVersion::new(1, 20, 1));
    }

    #[tokio::test]
    async fn memory_sink_captures_notices() {
        let sink = MemorySink::new();
        let conn = Connection::new(
            "192.168.1.5:51515".parse().unwrap(),
            "10.0.0.1:22".parse().unwrap(),
        );
        let notice = VersionChangeNotice::new(
            conn,
            "10.0.0.1 server 'SSH' version changed from 7.4.0 to 8.2.0",
            "SSH 8.2.0",
            SoftwareCategory::Unknown,
        );
        sink.notify(&notice).await.unwrap();
        assert_eq!(sink.notices().await.len(), 1);
    }

    #[tokio::test]
    async fn tracing_sink_accepts_records() {
        let sink = TracingSink::new();
        let obs = Observation::new("Apache", SoftwareVersion::new(2, 4, 10));
        assert!(sink.record(&obs).await.is_ok());
    }
}
