//! Car status packet (ID 7): fuel, tyres, damage and ERS.
use serde::Serialize;

use super::{PacketHeader, Wheels, NUM_CARS};

wire_struct! {
    /// 60 bytes per car.
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
    pub struct CarStatusData {
        /// 0 off, 2 high.
        pub traction_control: u8,
        pub anti_lock_brakes: u8,
        /// 0 lean, 1 standard, 2 rich, 3 max.
        pub fuel_mix: u8,
        /// Percent.
        pub front_brake_bias: u8,
        pub pit_limiter_status: u8,
        /// kg.
        pub fuel_in_tank: f32,
        pub fuel_capacity: f32,
        /// Value shown on the MFD.
        pub fuel_remaining_laps: f32,
        pub max_rpm: u16,
        pub idle_rpm: u16,
        pub max_gears: u8,
        pub drs_allowed: u8,
        /// Metres until DRS is available, 0 when not available.
        pub drs_activation_distance: u16,
        /// Percent.
        pub tyres_wear: Wheels<u8>,
        pub actual_tyre_compound: u8,
        pub visual_tyre_compound: u8,
        pub tyres_age_laps: u8,
        pub tyres_damage: Wheels<u8>,
        pub front_left_wing_damage: u8,
        pub front_right_wing_damage: u8,
        pub rear_wing_damage: u8,
        pub drs_fault: u8,
        pub engine_damage: u8,
        pub gear_box_damage: u8,
        /// -1 unknown, 0 none, 1 green, 2 blue, 3 yellow, 4 red.
        pub vehicle_fia_flags: i8,
        /// Joules.
        pub ers_store_energy: f32,
        /// 0 none, 1 medium, 2 overtake, 3 hotlap.
        pub ers_deploy_mode: u8,
        pub ers_harvested_this_lap_mguk: f32,
        pub ers_harvested_this_lap_mguh: f32,
        pub ers_deployed_this_lap: f32,
    }
}

wire_struct! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct PacketCarStatusData {
        pub header: PacketHeader,
        pub car_status_data: [CarStatusData; NUM_CARS],
    }
}
