//! Bounded queue between the UDP receiver and a fixed pool of workers.
//!
//! The receiver copies each datagram out of its reusable buffer before
//! queueing it, and blocks when the queue is full. Workers pull one
//! datagram at a time and run it to a terminal [`Outcome`].
//!
//! [`Outcome`]: crate::processor::Outcome
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_channel::{Receiver, Sender};
use bytes::Bytes;
use tokio::net::UdpSocket;
use tokio::task::JoinSet;
use tracing::{debug, error, info, trace, warn};

use crate::error::PipelineError;
use crate::metrics::SharedMetrics;
use crate::processor::TelemetryProcessor;
use crate::record::RecordEncoding;
use crate::shutdown::ShutdownSignal;
use crate::sink::Sink;

pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;
pub const DEFAULT_WORKERS: usize = 100;
pub const DEFAULT_RECV_BUFFER: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub queue_capacity: usize,
    pub workers: usize,
    pub encoding: RecordEncoding,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            workers: DEFAULT_WORKERS,
            encoding: RecordEncoding::Json,
        }
    }
}

pub struct IngestionPipeline {
    tx: Sender<Bytes>,
    workers: JoinSet<()>,
}

impl IngestionPipeline {
    /// Spawn the worker pool. Workers stop when `shutdown` fires (after
    /// finishing the datagram in hand) or when every sender is dropped and
    /// the queue is empty.
    pub fn start(
        config: PipelineConfig,
        sink: Arc<dyn Sink>,
        metrics: SharedMetrics,
        shutdown: ShutdownSignal,
    ) -> Self {
        let queue_capacity = config.queue_capacity.max(1);
        let workers = config.workers.max(1);

        let (tx, rx) = async_channel::bounded(queue_capacity);
        let processor = Arc::new(TelemetryProcessor::new(sink, config.encoding, metrics));

        let mut set = JoinSet::new();
        for worker in 0..workers {
            set.spawn(run_worker(
                worker,
                rx.clone(),
                Arc::clone(&processor),
                shutdown.clone(),
            ));
        }
        drop(rx);
        info!(workers, queue_capacity, encoding = ?config.encoding, "ingestion pipeline started");

        Self { tx, workers: set }
    }

    /// A producer handle onto the queue.
    pub fn sender(&self) -> Sender<Bytes> {
        self.tx.clone()
    }

    /// Queue one datagram, waiting for room if the queue is full.
    pub async fn submit(&self, datagram: Bytes) -> Result<(), PipelineError> {
        self.tx
            .send(datagram)
            .await
            .map_err(|_| PipelineError::QueueClosed)
    }

    /// Drop this handle's sender and wait for every worker to exit.
    pub async fn close(self) {
        let Self { tx, mut workers } = self;
        drop(tx);
        while let Some(joined) = workers.join_next().await {
            if let Err(err) = joined {
                error!(error = %err, "ingestion worker failed");
            }
        }
        debug!("ingestion pipeline closed");
    }
}

async fn run_worker(
    worker: usize,
    rx: Receiver<Bytes>,
    processor: Arc<TelemetryProcessor>,
    mut shutdown: ShutdownSignal,
) {
    loop {
        let next = tokio::select! {
            biased;
            _ = shutdown.triggered() => None,
            datagram = rx.recv() => datagram.ok(),
        };
        let Some(datagram) = next else {
            break;
        };
        processor.process(datagram, &shutdown).await;
    }
    trace!(worker, "worker stopped");
}

/// Why the receive loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverExit {
    Shutdown,
    IdleTimeout,
    QueueClosed,
}

/// Read datagrams from `socket` and queue a copy of each until shutdown,
/// idle timeout, or the queue closing.
pub async fn receive_datagrams(
    socket: UdpSocket,
    tx: Sender<Bytes>,
    metrics: SharedMetrics,
    mut shutdown: ShutdownSignal,
    recv_buffer: usize,
    idle_timeout: Option<Duration>,
) -> ReceiverExit {
    let mut buffer = vec![0u8; recv_buffer];

    loop {
        let received = tokio::select! {
            biased;
            _ = shutdown.triggered() => return ReceiverExit::Shutdown,
            received = recv_or_idle(&socket, &mut buffer, idle_timeout) => received,
        };

        match received {
            Some(Ok((len, peer))) => {
                metrics.write().await.record_received(len);
                // the buffer is reused for the next recv
                let datagram = Bytes::copy_from_slice(&buffer[..len]);
                trace!(len, %peer, "datagram received");

                tokio::select! {
                    biased;
                    _ = shutdown.triggered() => return ReceiverExit::Shutdown,
                    sent = tx.send(datagram) => {
                        if sent.is_err() {
                            warn!("ingestion queue closed, stopping receiver");
                            return ReceiverExit::QueueClosed;
                        }
                    }
                }
            }
            Some(Err(err)) => {
                warn!(error = %err, "UDP receive failed");
            }
            None => {
                info!(
                    idle_secs = idle_timeout.map(|d| d.as_secs()).unwrap_or_default(),
                    "no datagrams received, stopping receiver"
                );
                return ReceiverExit::IdleTimeout;
            }
        }
    }
}

/// `None` when `idle_timeout` passes without a datagram.
async fn recv_or_idle(
    socket: &UdpSocket,
    buffer: &mut [u8],
    idle_timeout: Option<Duration>,
) -> Option<io::Result<(usize, SocketAddr)>> {
    match idle_timeout {
        Some(limit) => tokio::time::timeout(limit, socket.recv_from(buffer))
            .await
            .ok(),
        None => Some(socket.recv_from(buffer).await),
    }
}
