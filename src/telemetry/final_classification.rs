//! Final classification packet (ID 8), sent once at the end of a race.
use serde::Serialize;

use super::{PacketHeader, NUM_CARS};

pub const MAX_TYRE_STINTS: usize = 8;

wire_struct! {
    /// 37 bytes per car.
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
    pub struct FinalClassificationData {
        pub position: u8,
        pub num_laps: u8,
        pub grid_position: u8,
        pub points: u8,
        pub num_pit_stops: u8,
        pub result_status: u8,
        /// Seconds.
        pub best_lap_time: f32,
        /// Seconds, without penalties.
        pub total_race_time: f64,
        pub penalties_time: u8,
        pub num_penalties: u8,
        pub num_tyre_stints: u8,
        pub tyre_stints_actual: [u8; MAX_TYRE_STINTS],
        pub tyre_stints_visual: [u8; MAX_TYRE_STINTS],
    }
}

wire_struct! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct PacketFinalClassificationData {
        pub header: PacketHeader,
        pub num_cars: u8,
        pub classification_data: [FinalClassificationData; NUM_CARS],
    }
}
