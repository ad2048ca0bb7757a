//! Lobby info packet (ID 9): players waiting in a multiplayer lobby.
use serde::Serialize;

use super::reader::{name_from_bytes, name_to_bytes, NAME_LEN};
use super::{ByteReader, ByteWriter, PacketHeader, Wire, NUM_CARS};
use crate::error::DecodeError;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LobbyInfoData {
    pub ai_controlled: u8,
    /// 255 if no team is selected yet.
    pub team_id: u8,
    pub nationality: u8,
    pub name: String,
    /// 0 not ready, 1 ready, 2 spectating.
    pub ready_status: u8,
}

impl Wire for LobbyInfoData {
    const SIZE: usize = 3 + NAME_LEN + 1;

    fn read(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            ai_controlled: r.read()?,
            team_id: r.read()?,
            nationality: r.read()?,
            name: name_from_bytes(&r.read()?),
            ready_status: r.read()?,
        })
    }

    fn write(&self, w: &mut ByteWriter) {
        w.put(&self.ai_controlled);
        w.put(&self.team_id);
        w.put(&self.nationality);
        w.put(&name_to_bytes(&self.name));
        w.put(&self.ready_status);
    }
}

wire_struct! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct PacketLobbyInfoData {
        pub header: PacketHeader,
        pub num_players: u8,
        pub lobby_players: [LobbyInfoData; NUM_CARS],
    }
}
