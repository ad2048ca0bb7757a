use serde::{Serialize, Serializer};

use super::{ByteReader, MAX_PLAYER_INDEX, PACKET_FORMAT_2020};
use crate::error::DecodeError;

/// Fixed size of the common header prefix.
pub const HEADER_SIZE: usize = 24;

wire_struct! {
    /// Common prefix of every season-2020 datagram.
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
    pub struct PacketHeader {
        /// Season discriminator, `2020` for this layout.
        pub packet_format: u16,
        pub game_major_version: u8,
        pub game_minor_version: u8,
        /// Version of this packet type, starting at 1.
        pub packet_version: u8,
        pub packet_id: u8,
        /// Opaque session identifier. Serialized as a decimal string so
        /// consumers that parse JSON numbers as doubles keep every bit.
        #[serde(serialize_with = "serialize_session_uid")]
        pub session_uid: u64,
        /// Seconds since the session started.
        pub session_time: f32,
        pub frame_identifier: u32,
        pub player_car_index: u8,
        /// 255 when there is no split-screen player.
        pub secondary_player_car_index: u8,
    }
}

impl PacketHeader {
    pub fn is_supported_format(&self) -> bool {
        self.packet_format == PACKET_FORMAT_2020
    }

    /// Grid slot of the controlling player, if the index is in range.
    pub fn player_index(&self) -> Option<usize> {
        (self.player_car_index <= MAX_PLAYER_INDEX).then_some(usize::from(self.player_car_index))
    }
}

/// Parse the header prefix of a raw datagram.
pub fn parse_header(raw: &[u8]) -> Result<PacketHeader, DecodeError> {
    if raw.len() < HEADER_SIZE {
        return Err(DecodeError::HeaderTooShort {
            len: raw.len(),
            need: HEADER_SIZE,
        });
    }
    ByteReader::new(raw).read()
}

fn serialize_session_uid<S: Serializer>(uid: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(uid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{encode, Wire};

    fn sample() -> PacketHeader {
        PacketHeader {
            packet_format: 2020,
            game_major_version: 1,
            game_minor_version: 18,
            packet_version: 1,
            packet_id: 6,
            session_uid: 0xDEAD_BEEF_CAFE_F00D,
            session_time: 123.456,
            frame_identifier: 9001,
            player_car_index: 19,
            secondary_player_car_index: 255,
        }
    }

    #[test]
    fn header_is_24_bytes() {
        assert_eq!(PacketHeader::SIZE, HEADER_SIZE);
        assert_eq!(encode(&sample()).len(), HEADER_SIZE);
    }

    #[test]
    fn fields_land_at_documented_offsets() {
        let raw = encode(&sample());
        assert_eq!(&raw[0..2], &2020u16.to_le_bytes());
        assert_eq!(raw[5], 6);
        assert_eq!(&raw[6..14], &0xDEAD_BEEF_CAFE_F00Du64.to_le_bytes());
        assert_eq!(&raw[14..18], &123.456f32.to_le_bytes());
        assert_eq!(&raw[18..22], &9001u32.to_le_bytes());
        assert_eq!(raw[22], 19);
        assert_eq!(raw[23], 255);
    }

    #[test]
    fn parses_header_and_ignores_trailing_bytes() {
        let mut raw = encode(&sample());
        raw.extend_from_slice(&[0xAA; 16]);
        assert_eq!(parse_header(&raw).unwrap(), sample());
    }

    #[test]
    fn short_buffer_is_an_error() {
        assert_eq!(
            parse_header(&[0u8; 23]),
            Err(DecodeError::HeaderTooShort { len: 23, need: 24 })
        );
        assert!(parse_header(&[]).is_err());
    }

    #[test]
    fn player_index_helpers() {
        let mut header = sample();
        assert_eq!(header.player_index(), Some(19));
        header.player_car_index = 255;
        assert_eq!(header.player_index(), None);
    }

    #[test]
    fn session_uid_serializes_as_string() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["session_uid"], "16045690984503111693");
        assert_eq!(json["frame_identifier"], 9001);
    }
}
