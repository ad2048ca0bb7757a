//! Event packet (ID 3).
//!
//! A four-character code selects how the seven trailing detail bytes are
//! read. Codes outside the known set keep those bytes as an opaque payload
//! instead of failing the packet.
use serde::{Serialize, Serializer};

use super::{ByteReader, ByteWriter, PacketHeader, Wire};
use crate::error::DecodeError;

/// Size of the detail union shared by every event kind.
pub const EVENT_DETAILS_SIZE: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCode {
    SessionStarted,
    SessionEnded,
    FastestLap,
    Retirement,
    DrsEnabled,
    DrsDisabled,
    TeamMateInPits,
    ChequeredFlag,
    RaceWinner,
    PenaltyIssued,
    SpeedTrap,
}

impl EventCode {
    pub const ALL: [EventCode; 11] = [
        EventCode::SessionStarted,
        EventCode::SessionEnded,
        EventCode::FastestLap,
        EventCode::Retirement,
        EventCode::DrsEnabled,
        EventCode::DrsDisabled,
        EventCode::TeamMateInPits,
        EventCode::ChequeredFlag,
        EventCode::RaceWinner,
        EventCode::PenaltyIssued,
        EventCode::SpeedTrap,
    ];

    pub fn code(self) -> &'static [u8; 4] {
        match self {
            EventCode::SessionStarted => b"SSTA",
            EventCode::SessionEnded => b"SEND",
            EventCode::FastestLap => b"FTLP",
            EventCode::Retirement => b"RTMT",
            EventCode::DrsEnabled => b"DRSE",
            EventCode::DrsDisabled => b"DRSD",
            EventCode::TeamMateInPits => b"TMPT",
            EventCode::ChequeredFlag => b"CHQF",
            EventCode::RaceWinner => b"RCWN",
            EventCode::PenaltyIssued => b"PENA",
            EventCode::SpeedTrap => b"SPTP",
        }
    }

    pub fn from_code(code: &[u8; 4]) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Penalty {
    pub penalty_type: u8,
    pub infringement_type: u8,
    /// Car the penalty is applied to.
    pub vehicle_idx: u8,
    /// Other car involved, if any.
    pub other_vehicle_idx: u8,
    /// Time gained, or time spent doing the action, in seconds.
    pub time: u8,
    pub lap_num: u8,
    pub places_gained: u8,
}

/// Detail payload, one variant per event code.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventDetails {
    SessionStarted,
    SessionEnded,
    FastestLap { vehicle_idx: u8, lap_time: f32 },
    Retirement { vehicle_idx: u8 },
    DrsEnabled,
    DrsDisabled,
    TeamMateInPits { vehicle_idx: u8 },
    ChequeredFlag,
    RaceWinner { vehicle_idx: u8 },
    Penalty(Penalty),
    /// Top speed in km/h.
    SpeedTrap { vehicle_idx: u8, speed: f32 },
    /// Unrecognised code; the detail bytes are kept verbatim.
    Opaque { payload: [u8; EVENT_DETAILS_SIZE] },
}

impl Default for EventDetails {
    fn default() -> Self {
        EventDetails::Opaque {
            payload: [0; EVENT_DETAILS_SIZE],
        }
    }
}

impl EventDetails {
    /// The code this payload is published under, `None` for [`EventDetails::Opaque`].
    pub fn code(&self) -> Option<EventCode> {
        Some(match self {
            EventDetails::SessionStarted => EventCode::SessionStarted,
            EventDetails::SessionEnded => EventCode::SessionEnded,
            EventDetails::FastestLap { .. } => EventCode::FastestLap,
            EventDetails::Retirement { .. } => EventCode::Retirement,
            EventDetails::DrsEnabled => EventCode::DrsEnabled,
            EventDetails::DrsDisabled => EventCode::DrsDisabled,
            EventDetails::TeamMateInPits { .. } => EventCode::TeamMateInPits,
            EventDetails::ChequeredFlag => EventCode::ChequeredFlag,
            EventDetails::RaceWinner { .. } => EventCode::RaceWinner,
            EventDetails::Penalty(_) => EventCode::PenaltyIssued,
            EventDetails::SpeedTrap { .. } => EventCode::SpeedTrap,
            EventDetails::Opaque { .. } => return None,
        })
    }

    /// Interpret the detail union according to `code`.
    pub fn read(code: &[u8; 4], details: &[u8; EVENT_DETAILS_SIZE]) -> Result<Self, DecodeError> {
        let mut r = ByteReader::new(details);
        let Some(kind) = EventCode::from_code(code) else {
            return Ok(EventDetails::Opaque { payload: *details });
        };
        Ok(match kind {
            EventCode::SessionStarted => EventDetails::SessionStarted,
            EventCode::SessionEnded => EventDetails::SessionEnded,
            EventCode::FastestLap => EventDetails::FastestLap {
                vehicle_idx: r.read()?,
                lap_time: r.read()?,
            },
            EventCode::Retirement => EventDetails::Retirement {
                vehicle_idx: r.read()?,
            },
            EventCode::DrsEnabled => EventDetails::DrsEnabled,
            EventCode::DrsDisabled => EventDetails::DrsDisabled,
            EventCode::TeamMateInPits => EventDetails::TeamMateInPits {
                vehicle_idx: r.read()?,
            },
            EventCode::ChequeredFlag => EventDetails::ChequeredFlag,
            EventCode::RaceWinner => EventDetails::RaceWinner {
                vehicle_idx: r.read()?,
            },
            EventCode::PenaltyIssued => EventDetails::Penalty(Penalty {
                penalty_type: r.read()?,
                infringement_type: r.read()?,
                vehicle_idx: r.read()?,
                other_vehicle_idx: r.read()?,
                time: r.read()?,
                lap_num: r.read()?,
                places_gained: r.read()?,
            }),
            EventCode::SpeedTrap => EventDetails::SpeedTrap {
                vehicle_idx: r.read()?,
                speed: r.read()?,
            },
        })
    }

    /// Write the detail union, zero-padded to its fixed width.
    pub fn write(&self, w: &mut ByteWriter) {
        let mut d = ByteWriter::with_capacity(EVENT_DETAILS_SIZE);
        match self {
            EventDetails::SessionStarted
            | EventDetails::SessionEnded
            | EventDetails::DrsEnabled
            | EventDetails::DrsDisabled
            | EventDetails::ChequeredFlag => {}
            EventDetails::FastestLap {
                vehicle_idx,
                lap_time,
            } => {
                d.put(vehicle_idx);
                d.put(lap_time);
            }
            EventDetails::Retirement { vehicle_idx }
            | EventDetails::TeamMateInPits { vehicle_idx }
            | EventDetails::RaceWinner { vehicle_idx } => d.put(vehicle_idx),
            EventDetails::Penalty(p) => {
                for b in [
                    p.penalty_type,
                    p.infringement_type,
                    p.vehicle_idx,
                    p.other_vehicle_idx,
                    p.time,
                    p.lap_num,
                    p.places_gained,
                ] {
                    d.put(&b);
                }
            }
            EventDetails::SpeedTrap { vehicle_idx, speed } => {
                d.put(vehicle_idx);
                d.put(speed);
            }
            EventDetails::Opaque { payload } => d.bytes(payload),
        }
        let mut details = d.into_inner();
        details.resize(EVENT_DETAILS_SIZE, 0);
        w.bytes(&details);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PacketEventData {
    pub header: PacketHeader,
    #[serde(serialize_with = "serialize_code")]
    pub event_string_code: [u8; 4],
    pub details: EventDetails,
}

impl PacketEventData {
    /// Build a packet whose code matches `details`. Opaque details get a
    /// zeroed code; set `event_string_code` afterwards for those.
    pub fn new(header: PacketHeader, details: EventDetails) -> Self {
        let event_string_code = details.code().map(|c| *c.code()).unwrap_or_default();
        Self {
            header,
            event_string_code,
            details,
        }
    }

    pub fn code_str(&self) -> String {
        String::from_utf8_lossy(&self.event_string_code).into_owned()
    }
}

impl Wire for PacketEventData {
    const SIZE: usize = PacketHeader::SIZE + 4 + EVENT_DETAILS_SIZE;

    fn read(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let header = r.read()?;
        let event_string_code: [u8; 4] = r.read()?;
        let raw_details: [u8; EVENT_DETAILS_SIZE] = r.read()?;
        let details = EventDetails::read(&event_string_code, &raw_details)?;
        Ok(Self {
            header,
            event_string_code,
            details,
        })
    }

    fn write(&self, w: &mut ByteWriter) {
        w.put(&self.header);
        w.put(&self.event_string_code);
        self.details.write(w);
    }
}

fn serialize_code<S: Serializer>(code: &[u8; 4], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(code))
}
