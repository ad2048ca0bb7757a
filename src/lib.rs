//! Concurrent ingestion of F1 2020 UDP telemetry.
//!
//! Datagrams are received on a UDP socket, queued, and drained by a fixed
//! worker pool. Each worker parses the header, gates on season and player
//! index, decodes the full-grid packet, keeps the player's slot, and
//! hands the serialized record to a [`Sink`].

pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod processor;
pub mod record;
pub mod shutdown;
pub mod sink;
pub mod stats;
pub mod telemetry;

pub use error::{DecodeError, DispatchError, IgnoreReason, PipelineError, SinkError};
pub use metrics::{Metrics, SharedMetrics};
pub use pipeline::{receive_datagrams, IngestionPipeline, PipelineConfig, ReceiverExit};
pub use processor::{Dispatched, Outcome, PacketDecoder, TelemetryProcessor};
pub use record::{PlayerData, RecordEncoding, TelemetryRecord};
pub use shutdown::{Shutdown, ShutdownSignal};
pub use sink::{JsonLinesSink, LogSink, MemorySink, Sink};
pub use telemetry::{Packet, PacketHeader, PacketId};
