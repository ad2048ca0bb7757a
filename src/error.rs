//! Error taxonomy for decoding, dispatch and storage.
use crate::telemetry::{PacketHeader, PacketId};
use thiserror::Error;

/// A datagram could not be interpreted with the layout it claims to have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("datagram too short for header: {len} bytes (need {need})")]
    HeaderTooShort { len: usize, need: usize },

    #[error("{packet} packet too short: {len} bytes (need {need})")]
    PacketTooShort {
        packet: PacketId,
        len: usize,
        need: usize,
    },

    #[error("read of {width} bytes at offset {offset} runs past end of datagram")]
    OutOfBounds { offset: usize, width: usize },

    #[error("{packet} packet has no grid slot for player index {index}")]
    PlayerIndex { packet: PacketId, index: u8 },
}

/// Why a datagram was dropped without being decoded. Not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    UnsupportedFormat(u16),
    PlayerIndexOutOfRange(u8),
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IgnoreReason::UnsupportedFormat(format) => {
                write!(f, "unsupported packet format {format}")
            }
            IgnoreReason::PlayerIndexOutOfRange(index) => {
                write!(f, "player car index {index} out of range")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("unknown packet id {packet_id} (header: {header:?})")]
    UnknownPacket { packet_id: u8, header: PacketHeader },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("could not serialize record: {0}")]
    Encode(String),

    #[error("sink rejected record: {0}")]
    Rejected(String),

    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store cancelled by shutdown")]
    Cancelled,
}

impl From<serde_json::Error> for SinkError {
    fn from(err: serde_json::Error) -> Self {
        SinkError::Encode(err.to_string())
    }
}

impl From<rmp_serde::encode::Error> for SinkError {
    fn from(err: rmp_serde::encode::Error) -> Self {
        SinkError::Encode(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("ingestion queue is closed")]
    QueueClosed,
}
