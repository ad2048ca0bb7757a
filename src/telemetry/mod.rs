//! F1 2020 UDP telemetry packet definitions.
//!
//! Every datagram starts with a 24-byte [`PacketHeader`] whose `packet_id`
//! selects one of ten fixed layouts. All values are little-endian; layouts
//! are only valid for packet format [`PACKET_FORMAT_2020`].
//!
//! | Packet ID | Name                | Size (bytes) |
//! |-----------|---------------------|--------------|
//! | 0         | Motion              | 1464         |
//! | 1         | Session             | 251          |
//! | 2         | Lap Data            | 1190         |
//! | 3         | Event               | 35           |
//! | 4         | Participants        | 1213         |
//! | 5         | Car Setups          | 1102         |
//! | 6         | Car Telemetry       | 1307         |
//! | 7         | Car Status          | 1344         |
//! | 8         | Final Classification| 839          |
//! | 9         | Lobby Info          | 1169         |
//!
//! Decoders keep the game's raw units. Nothing here rounds or converts.

use serde::Serialize;
use std::fmt;

use crate::error::DecodeError;

/// Declares a struct whose fields are laid out on the wire in declaration
/// order, and derives its [`Wire`] impl from that order.
macro_rules! wire_struct {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                pub $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        pub struct $name {
            $(
                $(#[$fmeta])*
                pub $field: $ty,
            )*
        }

        impl $crate::telemetry::Wire for $name {
            const SIZE: usize = 0 $( + <$ty as $crate::telemetry::Wire>::SIZE )*;

            fn read(
                r: &mut $crate::telemetry::ByteReader<'_>,
            ) -> Result<Self, $crate::error::DecodeError> {
                Ok(Self {
                    $( $field: r.read()?, )*
                })
            }

            fn write(&self, w: &mut $crate::telemetry::ByteWriter) {
                $( w.put(&self.$field); )*
            }
        }
    };
}

pub mod car_setup;
pub mod car_status;
pub mod car_telemetry;
pub mod event;
pub mod final_classification;
pub mod header;
pub mod lap_data;
pub mod lobby_info;
pub mod motion;
pub mod participants;
pub mod reader;
pub mod session;

pub use car_setup::{CarSetupData, PacketCarSetupData};
pub use car_status::{CarStatusData, PacketCarStatusData};
pub use car_telemetry::{CarTelemetryData, PacketCarTelemetryData, PlayerTelemetryExtras};
pub use event::{EventCode, EventDetails, PacketEventData, Penalty};
pub use final_classification::{FinalClassificationData, PacketFinalClassificationData};
pub use header::{parse_header, PacketHeader, HEADER_SIZE};
pub use lap_data::{LapData, PacketLapData};
pub use lobby_info::{LobbyInfoData, PacketLobbyInfoData};
pub use motion::{CarMotionData, PacketMotionData, PlayerMotionData};
pub use participants::{PacketParticipantsData, ParticipantData};
pub use reader::{ByteReader, ByteWriter, Wire};
pub use session::{MarshalZone, PacketSessionData, SessionData, WeatherForecastSample};

/// The only season layout this crate understands.
pub const PACKET_FORMAT_2020: u16 = 2020;

/// Length of every per-car grid.
pub const NUM_CARS: usize = 22;

/// Highest valid value of `player_car_index`.
pub const MAX_PLAYER_INDEX: u8 = 21;

/// `secondary_player_car_index` when there is no split-screen player.
pub const NO_SECONDARY_PLAYER: u8 = 255;

/// Packet type identifier carried in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PacketId {
    Motion = 0,
    Session = 1,
    LapData = 2,
    Event = 3,
    Participants = 4,
    CarSetups = 5,
    CarTelemetry = 6,
    CarStatus = 7,
    FinalClassification = 8,
    LobbyInfo = 9,
}

impl PacketId {
    pub const ALL: [PacketId; 10] = [
        PacketId::Motion,
        PacketId::Session,
        PacketId::LapData,
        PacketId::Event,
        PacketId::Participants,
        PacketId::CarSetups,
        PacketId::CarTelemetry,
        PacketId::CarStatus,
        PacketId::FinalClassification,
        PacketId::LobbyInfo,
    ];

    pub fn from_u8(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|p| *p as u8 == id)
    }

    /// Declared total datagram size for this packet type, header included.
    pub fn wire_size(self) -> usize {
        match self {
            PacketId::Motion => PacketMotionData::SIZE,
            PacketId::Session => PacketSessionData::SIZE,
            PacketId::LapData => PacketLapData::SIZE,
            PacketId::Event => PacketEventData::SIZE,
            PacketId::Participants => PacketParticipantsData::SIZE,
            PacketId::CarSetups => PacketCarSetupData::SIZE,
            PacketId::CarTelemetry => PacketCarTelemetryData::SIZE,
            PacketId::CarStatus => PacketCarStatusData::SIZE,
            PacketId::FinalClassification => PacketFinalClassificationData::SIZE,
            PacketId::LobbyInfo => PacketLobbyInfoData::SIZE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PacketId::Motion => "motion",
            PacketId::Session => "session",
            PacketId::LapData => "lap_data",
            PacketId::Event => "event",
            PacketId::Participants => "participants",
            PacketId::CarSetups => "car_setups",
            PacketId::CarTelemetry => "car_telemetry",
            PacketId::CarStatus => "car_status",
            PacketId::FinalClassification => "final_classification",
            PacketId::LobbyInfo => "lobby_info",
        }
    }
}

impl TryFrom<u8> for PacketId {
    type Error = u8;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        PacketId::from_u8(id).ok_or(id)
    }
}

impl fmt::Display for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-wheel values, in the protocol's fixed order: rear-left, rear-right,
/// front-left, front-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Wheels<T> {
    pub rear_left: T,
    pub rear_right: T,
    pub front_left: T,
    pub front_right: T,
}

impl<T> Wheels<T> {
    pub fn new(rear_left: T, rear_right: T, front_left: T, front_right: T) -> Self {
        Self {
            rear_left,
            rear_right,
            front_left,
            front_right,
        }
    }

    /// Values in wire order.
    pub fn into_array(self) -> [T; 4] {
        [
            self.rear_left,
            self.rear_right,
            self.front_left,
            self.front_right,
        ]
    }
}

impl<T> From<[T; 4]> for Wheels<T> {
    fn from([rear_left, rear_right, front_left, front_right]: [T; 4]) -> Self {
        Self::new(rear_left, rear_right, front_left, front_right)
    }
}

impl<T: Wire> Wire for Wheels<T> {
    const SIZE: usize = T::SIZE * 4;

    fn read(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            rear_left: r.read()?,
            rear_right: r.read()?,
            front_left: r.read()?,
            front_right: r.read()?,
        })
    }

    fn write(&self, w: &mut ByteWriter) {
        w.put(&self.rear_left);
        w.put(&self.rear_right);
        w.put(&self.front_left);
        w.put(&self.front_right);
    }
}

/// A complete packet layout that starts with the common header.
pub trait TelemetryPacket: Wire {
    const ID: PacketId;

    fn header(&self) -> &PacketHeader;
}

/// Decode one packet type, rejecting datagrams shorter than its declared size.
pub fn decode<P: TelemetryPacket>(raw: &[u8]) -> Result<P, DecodeError> {
    if raw.len() < P::SIZE {
        return Err(DecodeError::PacketTooShort {
            packet: P::ID,
            len: raw.len(),
            need: P::SIZE,
        });
    }
    ByteReader::new(raw).read()
}

pub fn encode<P: Wire>(packet: &P) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(P::SIZE);
    w.put(packet);
    w.into_inner()
}

/// Any decoded packet, tagged by type.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Motion(Box<PacketMotionData>),
    Session(Box<PacketSessionData>),
    LapData(Box<PacketLapData>),
    Event(Box<PacketEventData>),
    Participants(Box<PacketParticipantsData>),
    CarSetups(Box<PacketCarSetupData>),
    CarTelemetry(Box<PacketCarTelemetryData>),
    CarStatus(Box<PacketCarStatusData>),
    FinalClassification(Box<PacketFinalClassificationData>),
    LobbyInfo(Box<PacketLobbyInfoData>),
}

impl Packet {
    /// Decode `raw` with the layout for `id`.
    pub fn decode(id: PacketId, raw: &[u8]) -> Result<Self, DecodeError> {
        Ok(match id {
            PacketId::Motion => Packet::Motion(Box::new(decode(raw)?)),
            PacketId::Session => Packet::Session(Box::new(decode(raw)?)),
            PacketId::LapData => Packet::LapData(Box::new(decode(raw)?)),
            PacketId::Event => Packet::Event(Box::new(decode(raw)?)),
            PacketId::Participants => Packet::Participants(Box::new(decode(raw)?)),
            PacketId::CarSetups => Packet::CarSetups(Box::new(decode(raw)?)),
            PacketId::CarTelemetry => Packet::CarTelemetry(Box::new(decode(raw)?)),
            PacketId::CarStatus => Packet::CarStatus(Box::new(decode(raw)?)),
            PacketId::FinalClassification => {
                Packet::FinalClassification(Box::new(decode(raw)?))
            }
            PacketId::LobbyInfo => Packet::LobbyInfo(Box::new(decode(raw)?)),
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        match self {
            Packet::Motion(p) => encode(p.as_ref()),
            Packet::Session(p) => encode(p.as_ref()),
            Packet::LapData(p) => encode(p.as_ref()),
            Packet::Event(p) => encode(p.as_ref()),
            Packet::Participants(p) => encode(p.as_ref()),
            Packet::CarSetups(p) => encode(p.as_ref()),
            Packet::CarTelemetry(p) => encode(p.as_ref()),
            Packet::CarStatus(p) => encode(p.as_ref()),
            Packet::FinalClassification(p) => encode(p.as_ref()),
            Packet::LobbyInfo(p) => encode(p.as_ref()),
        }
    }

    pub fn id(&self) -> PacketId {
        match self {
            Packet::Motion(_) => PacketId::Motion,
            Packet::Session(_) => PacketId::Session,
            Packet::LapData(_) => PacketId::LapData,
            Packet::Event(_) => PacketId::Event,
            Packet::Participants(_) => PacketId::Participants,
            Packet::CarSetups(_) => PacketId::CarSetups,
            Packet::CarTelemetry(_) => PacketId::CarTelemetry,
            Packet::CarStatus(_) => PacketId::CarStatus,
            Packet::FinalClassification(_) => PacketId::FinalClassification,
            Packet::LobbyInfo(_) => PacketId::LobbyInfo,
        }
    }

    pub fn header(&self) -> &PacketHeader {
        match self {
            Packet::Motion(p) => p.header(),
            Packet::Session(p) => p.header(),
            Packet::LapData(p) => p.header(),
            Packet::Event(p) => p.header(),
            Packet::Participants(p) => p.header(),
            Packet::CarSetups(p) => p.header(),
            Packet::CarTelemetry(p) => p.header(),
            Packet::CarStatus(p) => p.header(),
            Packet::FinalClassification(p) => p.header(),
            Packet::LobbyInfo(p) => p.header(),
        }
    }
}

/// Implements [`TelemetryPacket`] for a layout whose first field is `header`.
macro_rules! telemetry_packet {
    ($ty:ty, $id:expr) => {
        impl $crate::telemetry::TelemetryPacket for $ty {
            const ID: $crate::telemetry::PacketId = $id;

            fn header(&self) -> &$crate::telemetry::PacketHeader {
                &self.header
            }
        }
    };
}

telemetry_packet!(PacketMotionData, PacketId::Motion);
telemetry_packet!(PacketSessionData, PacketId::Session);
telemetry_packet!(PacketLapData, PacketId::LapData);
telemetry_packet!(PacketEventData, PacketId::Event);
telemetry_packet!(PacketParticipantsData, PacketId::Participants);
telemetry_packet!(PacketCarSetupData, PacketId::CarSetups);
telemetry_packet!(PacketCarTelemetryData, PacketId::CarTelemetry);
telemetry_packet!(PacketCarStatusData, PacketId::CarStatus);
telemetry_packet!(PacketFinalClassificationData, PacketId::FinalClassification);
telemetry_packet!(PacketLobbyInfoData, PacketId::LobbyInfo);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_sizes_match_season_2020() {
        assert_eq!(HEADER_SIZE, 24);
        assert_eq!(PacketId::Motion.wire_size(), 1464);
        assert_eq!(PacketId::Session.wire_size(), 251);
        assert_eq!(PacketId::LapData.wire_size(), 1190);
        assert_eq!(PacketId::Event.wire_size(), 35);
        assert_eq!(PacketId::Participants.wire_size(), 1213);
        assert_eq!(PacketId::CarSetups.wire_size(), 1102);
        assert_eq!(PacketId::CarTelemetry.wire_size(), 1307);
        assert_eq!(PacketId::CarStatus.wire_size(), 1344);
        assert_eq!(PacketId::FinalClassification.wire_size(), 839);
        assert_eq!(PacketId::LobbyInfo.wire_size(), 1169);
    }

    #[test]
    fn packet_ids_round_trip_through_u8() {
        for id in PacketId::ALL {
            assert_eq!(PacketId::try_from(id as u8), Ok(id));
        }
        assert_eq!(PacketId::try_from(10), Err(10));
        assert_eq!(PacketId::from_u8(255), None);
    }

    #[test]
    fn wheels_read_in_rl_rr_fl_fr_order() {
        let mut w = ByteWriter::new();
        for v in [1u16, 2, 3, 4] {
            w.put(&v);
        }
        let raw = w.into_inner();
        let wheels: Wheels<u16> = ByteReader::new(&raw).read().unwrap();
        assert_eq!(wheels.rear_left, 1);
        assert_eq!(wheels.rear_right, 2);
        assert_eq!(wheels.front_left, 3);
        assert_eq!(wheels.front_right, 4);
        assert_eq!(wheels.into_array(), [1, 2, 3, 4]);
    }

    #[test]
    fn decode_names_packet_type_when_short() {
        let raw = vec![0u8; 100];
        let err = decode::<PacketCarStatusData>(&raw).unwrap_err();
        assert_eq!(
            err,
            DecodeError::PacketTooShort {
                packet: PacketId::CarStatus,
                len: 100,
                need: 1344
            }
        );
        assert!(err.to_string().starts_with("car_status packet too short"));
    }

    #[test]
    fn default_packets_encode_to_declared_size() {
        assert_eq!(encode(&PacketMotionData::default()).len(), 1464);
        assert_eq!(encode(&PacketSessionData::default()).len(), 251);
        assert_eq!(encode(&PacketLapData::default()).len(), 1190);
        assert_eq!(encode(&PacketEventData::default()).len(), 35);
        assert_eq!(encode(&PacketParticipantsData::default()).len(), 1213);
        assert_eq!(encode(&PacketCarSetupData::default()).len(), 1102);
        assert_eq!(encode(&PacketCarTelemetryData::default()).len(), 1307);
        assert_eq!(encode(&PacketCarStatusData::default()).len(), 1344);
        assert_eq!(encode(&PacketFinalClassificationData::default()).len(), 839);
        assert_eq!(encode(&PacketLobbyInfoData::default()).len(), 1169);
    }
}
