//! Per-datagram processing: dispatch, decode, extract, serialize, store.
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, error, trace, warn};

use crate::error::{DispatchError, IgnoreReason};
use crate::metrics::SharedMetrics;
use crate::record::{RecordEncoding, TelemetryRecord};
use crate::shutdown::ShutdownSignal;
use crate::sink::Sink;
use crate::telemetry::{parse_header, Packet, PacketHeader, PacketId};

/// Result of routing one datagram.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    Packet(Packet),
    Ignored(IgnoreReason),
}

/// Terminal state of one datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ignored(IgnoreReason),
    Unknown(u8),
    DecodeFailed,
    Stored(PacketId),
    StoreFailed(PacketId),
}

/// Routes datagrams to their layout decoder. Stateless.
#[derive(Debug, Default, Clone, Copy)]
pub struct PacketDecoder;

impl PacketDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn dispatch(&self, raw: &[u8]) -> Result<Dispatched, DispatchError> {
        let header = parse_header(raw)?;
        self.route(&header, raw)
    }

    /// Gate on season and player index, then decode with the layout named
    /// by the header.
    pub fn route(&self, header: &PacketHeader, raw: &[u8]) -> Result<Dispatched, DispatchError> {
        if !header.is_supported_format() {
            return Ok(Dispatched::Ignored(IgnoreReason::UnsupportedFormat(
                header.packet_format,
            )));
        }
        if header.player_index().is_none() {
            return Ok(Dispatched::Ignored(IgnoreReason::PlayerIndexOutOfRange(
                header.player_car_index,
            )));
        }
        let id = PacketId::try_from(header.packet_id).map_err(|packet_id| {
            DispatchError::UnknownPacket {
                packet_id,
                header: *header,
            }
        })?;
        Ok(Dispatched::Packet(Packet::decode(id, raw)?))
    }
}

pub struct TelemetryProcessor {
    decoder: PacketDecoder,
    sink: Arc<dyn Sink>,
    encoding: RecordEncoding,
    metrics: SharedMetrics,
}

impl TelemetryProcessor {
    pub fn new(sink: Arc<dyn Sink>, encoding: RecordEncoding, metrics: SharedMetrics) -> Self {
        Self {
            decoder: PacketDecoder::new(),
            sink,
            encoding,
            metrics,
        }
    }

    /// Drive one datagram to a terminal outcome. Never fails: every error
    /// is logged and counted here.
    pub async fn process(&self, datagram: Bytes, shutdown: &ShutdownSignal) -> Outcome {
        let started = Instant::now();
        let outcome = self.run(&datagram, Utc::now(), shutdown).await;

        let mut metrics = self.metrics.write().await;
        match outcome {
            Outcome::Ignored(_) => metrics.ignored += 1,
            Outcome::Unknown(_) => metrics.unknown += 1,
            Outcome::DecodeFailed => metrics.decode_errors += 1,
            Outcome::Stored(packet) => metrics.record_stored(packet),
            Outcome::StoreFailed(_) => metrics.store_errors += 1,
        }
        metrics.add_latency(started.elapsed());
        outcome
    }

    async fn run(
        &self,
        datagram: &[u8],
        received_at: DateTime<Utc>,
        shutdown: &ShutdownSignal,
    ) -> Outcome {
        let packet = match self.decoder.dispatch(datagram) {
            Ok(Dispatched::Packet(packet)) => packet,
            Ok(Dispatched::Ignored(reason)) => {
                trace!(%reason, len = datagram.len(), "ignoring datagram");
                return Outcome::Ignored(reason);
            }
            Err(DispatchError::UnknownPacket { packet_id, header }) => {
                warn!(packet_id, ?header, "unknown packet type");
                return Outcome::Unknown(packet_id);
            }
            Err(DispatchError::Decode(err)) => {
                warn!(error = %err, len = datagram.len(), "failed to decode datagram");
                return Outcome::DecodeFailed;
            }
        };

        let packet_id = packet.id();
        let frame = packet.header().frame_identifier;
        let record = match TelemetryRecord::from_packet(packet, received_at) {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, %packet_id, frame, "failed to extract player data");
                return Outcome::DecodeFailed;
            }
        };

        let body = match record.encode(self.encoding) {
            Ok(body) => body,
            Err(err) => {
                error!(error = %err, %packet_id, frame, "failed to serialize record");
                return Outcome::StoreFailed(packet_id);
            }
        };

        match self.sink.store(shutdown, body).await {
            Ok(()) => {
                debug!(%packet_id, frame, "stored record");
                Outcome::Stored(packet_id)
            }
            Err(err) => {
                error!(error = %err, %packet_id, frame, "failed to store record");
                Outcome::StoreFailed(packet_id)
            }
        }
    }
}
