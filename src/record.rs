//! Player-perspective records.
//!
//! Decoding keeps the whole 22-car grid; this module is the separate
//! projection step that keeps only the slot at the header's
//! `player_car_index`, plus whatever the packet reports outside the grid.
use bytes::Bytes;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::error::{DecodeError, SinkError};
use crate::telemetry::{
    CarMotionData, CarSetupData, CarStatusData, CarTelemetryData, EventDetails,
    FinalClassificationData, LapData, LobbyInfoData, Packet, PacketHeader, PacketId,
    ParticipantData, PlayerMotionData, PlayerTelemetryExtras, SessionData, NUM_CARS,
};

/// The player's view of one packet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlayerData {
    Motion {
        car: CarMotionData,
        player: PlayerMotionData,
    },
    Session(Box<SessionData>),
    LapData {
        lap: LapData,
    },
    Event {
        event_string_code: String,
        details: EventDetails,
    },
    Participants {
        num_active_cars: u8,
        participant: ParticipantData,
    },
    CarSetups {
        setup: CarSetupData,
    },
    CarTelemetry {
        telemetry: CarTelemetryData,
        extras: PlayerTelemetryExtras,
    },
    CarStatus {
        status: CarStatusData,
    },
    FinalClassification {
        num_cars: u8,
        classification: FinalClassificationData,
    },
    LobbyInfo {
        num_players: u8,
        player: LobbyInfoData,
    },
}

/// One decoded datagram, ready to be serialized and stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryRecord {
    pub packet_type: PacketId,
    pub header: PacketHeader,
    pub received_at: DateTime<Utc>,
    pub data: PlayerData,
}

/// Wire encoding of stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RecordEncoding {
    /// NaN and infinite floats have no JSON form and are written as `null`.
    #[default]
    Json,
    /// Keeps every float bit for bit, non-finite values included.
    #[value(name = "msgpack")]
    MessagePack,
}

impl TelemetryRecord {
    /// Project a full-grid packet onto the player's slot.
    pub fn from_packet(packet: Packet, received_at: DateTime<Utc>) -> Result<Self, DecodeError> {
        let packet_type = packet.id();
        let header = *packet.header();
        let data = extract_player(packet)?;
        Ok(Self {
            packet_type,
            header,
            received_at,
            data,
        })
    }

    pub fn encode(&self, encoding: RecordEncoding) -> Result<Bytes, SinkError> {
        let body = match encoding {
            RecordEncoding::Json => serde_json::to_vec(self)?,
            RecordEncoding::MessagePack => rmp_serde::to_vec_named(self)?,
        };
        Ok(Bytes::from(body))
    }
}

/// Reduce a decoded packet to the player's data, using the header's
/// `player_car_index` for every grid-carrying packet type.
pub fn extract_player(packet: Packet) -> Result<PlayerData, DecodeError> {
    let packet_type = packet.id();
    let index = packet.header().player_car_index;

    Ok(match packet {
        Packet::Motion(p) => {
            let p = *p;
            PlayerData::Motion {
                car: player_slot(p.car_motion_data, packet_type, index)?,
                player: p.player,
            }
        }
        Packet::Session(p) => PlayerData::Session(Box::new(p.session)),
        Packet::LapData(p) => PlayerData::LapData {
            lap: player_slot(p.lap_data, packet_type, index)?,
        },
        Packet::Event(p) => PlayerData::Event {
            event_string_code: p.code_str(),
            details: p.details,
        },
        Packet::Participants(p) => PlayerData::Participants {
            num_active_cars: p.num_active_cars,
            participant: player_slot(p.participants, packet_type, index)?,
        },
        Packet::CarSetups(p) => PlayerData::CarSetups {
            setup: player_slot(p.car_setups, packet_type, index)?,
        },
        Packet::CarTelemetry(p) => PlayerData::CarTelemetry {
            telemetry: player_slot(p.car_telemetry_data, packet_type, index)?,
            extras: p.extras,
        },
        Packet::CarStatus(p) => PlayerData::CarStatus {
            status: player_slot(p.car_status_data, packet_type, index)?,
        },
        Packet::FinalClassification(p) => PlayerData::FinalClassification {
            num_cars: p.num_cars,
            classification: player_slot(p.classification_data, packet_type, index)?,
        },
        Packet::LobbyInfo(p) => PlayerData::LobbyInfo {
            num_players: p.num_players,
            player: player_slot(p.lobby_players, packet_type, index)?,
        },
    })
}

/// Move the entry at `index` out of a grid.
fn player_slot<T>(grid: [T; NUM_CARS], packet: PacketId, index: u8) -> Result<T, DecodeError> {
    grid.into_iter()
        .nth(usize::from(index))
        .ok_or(DecodeError::PlayerIndex { packet, index })
}
