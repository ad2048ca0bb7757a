//! Participants packet (ID 4). Sent every five seconds.
use serde::Serialize;

use super::reader::{name_from_bytes, name_to_bytes, NAME_LEN};
use super::{ByteReader, ByteWriter, PacketHeader, Wire, NUM_CARS};
use crate::error::DecodeError;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ParticipantData {
    /// 1 for AI, 0 for a human driver.
    pub ai_controlled: u8,
    pub driver_id: u8,
    pub team_id: u8,
    pub race_number: u8,
    pub nationality: u8,
    /// Driver name for AI cars, otherwise the platform or LAN name.
    pub name: String,
    /// The player's UDP setting: 0 restricted, 1 public.
    pub your_telemetry: u8,
}

impl Wire for ParticipantData {
    const SIZE: usize = 5 + NAME_LEN + 1;

    fn read(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            ai_controlled: r.read()?,
            driver_id: r.read()?,
            team_id: r.read()?,
            race_number: r.read()?,
            nationality: r.read()?,
            name: name_from_bytes(&r.read()?),
            your_telemetry: r.read()?,
        })
    }

    fn write(&self, w: &mut ByteWriter) {
        w.put(&self.ai_controlled);
        w.put(&self.driver_id);
        w.put(&self.team_id);
        w.put(&self.race_number);
        w.put(&self.nationality);
        w.put(&name_to_bytes(&self.name));
        w.put(&self.your_telemetry);
    }
}

wire_struct! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct PacketParticipantsData {
        pub header: PacketHeader,
        /// Should match the number of cars on the HUD.
        pub num_active_cars: u8,
        pub participants: [ParticipantData; NUM_CARS],
    }
}
