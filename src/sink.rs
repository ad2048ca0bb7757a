//! Destinations for serialized records.
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::SinkError;
use crate::shutdown::ShutdownSignal;

/// Persists one serialized record. Implementations must be safe to call
/// from many workers at once.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn store(&self, shutdown: &ShutdownSignal, record: Bytes) -> Result<(), SinkError>;
}

/// Emits each record as a tracing event on the `f1_telemetry_ingest::record`
/// target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl Sink for LogSink {
    async fn store(&self, _shutdown: &ShutdownSignal, record: Bytes) -> Result<(), SinkError> {
        match std::str::from_utf8(&record) {
            Ok(text) => info!(target: "f1_telemetry_ingest::record", record = text),
            Err(_) => info!(target: "f1_telemetry_ingest::record", len = record.len(), "binary record"),
        }
        Ok(())
    }
}

/// Appends one record per line to a file.
pub struct JsonLinesSink {
    path: PathBuf,
    file: Mutex<BufWriter<File>>,
}

impl JsonLinesSink {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        debug!(path = %path.display(), "opened json-lines sink");
        Ok(Self {
            path,
            file: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Sink for JsonLinesSink {
    async fn store(&self, _shutdown: &ShutdownSignal, record: Bytes) -> Result<(), SinkError> {
        if record.contains(&b'\n') {
            return Err(SinkError::Rejected(
                "record contains a newline and cannot be line-delimited".to_string(),
            ));
        }
        let mut file = self.file.lock().await;
        file.write_all(&record).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;
        Ok(())
    }
}

/// Keeps records in memory.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<Bytes>>,
    fail_with: Option<String>,
    latency: Option<Duration>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that rejects every record with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Simulated store latency, applied before every store.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub async fn records(&self) -> Vec<Bytes> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn store(&self, shutdown: &ShutdownSignal, record: Bytes) -> Result<(), SinkError> {
        if let Some(latency) = self.latency {
            let mut shutdown = shutdown.clone();
            tokio::select! {
                _ = tokio::time::sleep(latency) => {}
                _ = shutdown.triggered() => return Err(SinkError::Cancelled),
            }
        }
        if let Some(reason) = &self.fail_with {
            return Err(SinkError::Rejected(reason.clone()));
        }
        self.records.lock().await.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shutdown::Shutdown;

    #[tokio::test]
    async fn memory_sink_keeps_records_in_order() {
        let shutdown = Shutdown::new();
        let sink = MemorySink::new();
        sink.store(&shutdown.signal(), Bytes::from_static(b"a"))
            .await
            .unwrap();
        sink.store(&shutdown.signal(), Bytes::from_static(b"b"))
            .await
            .unwrap();
        assert_eq!(sink.records().await, vec![Bytes::from("a"), Bytes::from("b")]);
    }

    #[tokio::test]
    async fn failing_sink_rejects() {
        let shutdown = Shutdown::new();
        let sink = MemorySink::failing("index unavailable");
        let err = sink
            .store(&shutdown.signal(), Bytes::from_static(b"{}"))
            .await
            .unwrap_err();
        assert!(matches!(err, SinkError::Rejected(reason) if reason == "index unavailable"));
        assert!(sink.is_empty().await);
    }

    #[tokio::test]
    async fn slow_store_is_cancelled_by_shutdown() {
        let shutdown = Shutdown::new();
        let sink = MemorySink::new().with_latency(Duration::from_secs(30));
        let signal = shutdown.signal();
        let store = tokio::spawn(async move { sink.store(&signal, Bytes::from_static(b"{}")).await });
        shutdown.trigger();
        let result = tokio::time::timeout(Duration::from_secs(1), store)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(result, Err(SinkError::Cancelled)));
    }

    #[tokio::test]
    async fn json_lines_rejects_embedded_newline() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonLinesSink::open(dir.path().join("out.jsonl")).await.unwrap();
        let shutdown = Shutdown::new();
        let err = sink
            .store(&shutdown.signal(), Bytes::from_static(b"{\n}"))
            .await
            .unwrap_err();
        assert!(matches!(err, SinkError::Rejected(_)));
    }
}
