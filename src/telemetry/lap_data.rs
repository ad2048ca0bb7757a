//! Lap data packet (ID 2): timing for every car in the session.
use serde::Serialize;

use super::{PacketHeader, NUM_CARS};

wire_struct! {
    /// 53 bytes per car. Lap times are seconds, sector times milliseconds.
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
    pub struct LapData {
        pub last_lap_time: f32,
        pub current_lap_time: f32,
        pub sector1_time_in_ms: u16,
        pub sector2_time_in_ms: u16,
        pub best_lap_time: f32,
        pub best_lap_num: u8,
        pub best_lap_sector1_time_in_ms: u16,
        pub best_lap_sector2_time_in_ms: u16,
        pub best_lap_sector3_time_in_ms: u16,
        pub best_overall_sector1_time_in_ms: u16,
        pub best_overall_sector1_lap_num: u8,
        pub best_overall_sector2_time_in_ms: u16,
        pub best_overall_sector2_lap_num: u8,
        pub best_overall_sector3_time_in_ms: u16,
        pub best_overall_sector3_lap_num: u8,
        /// Metres around the current lap; negative before the line is crossed.
        pub lap_distance: f32,
        pub total_distance: f32,
        pub safety_car_delta: f32,
        pub car_position: u8,
        pub current_lap_num: u8,
        /// 0 none, 1 pitting, 2 in pit area.
        pub pit_status: u8,
        pub sector: u8,
        pub current_lap_invalid: u8,
        /// Accumulated time penalties in seconds.
        pub penalties: u8,
        pub grid_position: u8,
        /// 0 garage, 1 flying lap, 2 in lap, 3 out lap, 4 on track.
        pub driver_status: u8,
        /// 0 invalid, 1 inactive, 2 active, 3 finished, 4 DSQ, 5 not classified, 6 retired.
        pub result_status: u8,
    }
}

wire_struct! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct PacketLapData {
        pub header: PacketHeader,
        pub lap_data: [LapData; NUM_CARS],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{decode, encode, Wire, HEADER_SIZE};

    #[test]
    fn lap_data_is_53_bytes() {
        assert_eq!(LapData::SIZE, 53);
    }

    #[test]
    fn last_car_result_status_is_final_byte() {
        let mut raw = encode(&PacketLapData::default());
        let last = raw.len() - 1;
        raw[last] = 6;
        let packet: PacketLapData = decode(&raw).unwrap();
        assert_eq!(packet.lap_data[21].result_status, 6);
        assert_eq!(packet.lap_data[20].result_status, 0);
    }

    #[test]
    fn best_overall_sector_fields_are_unaligned() {
        let mut packet = PacketLapData::default();
        packet.lap_data[0].best_overall_sector2_time_in_ms = 0xBEEF;
        let raw = encode(&packet);
        // 4+4+2+2+4+1+2+2+2+2+1 bytes precede best_overall_sector2_time_in_ms
        let at = HEADER_SIZE + 26;
        assert_eq!(&raw[at..at + 2], &0xBEEFu16.to_le_bytes());
    }
}
