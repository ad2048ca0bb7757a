//! Motion packet (ID 0): physics state for every car, plus extra detail
//! for the player's car intended for motion platforms.
use serde::Serialize;

use super::{PacketHeader, Wheels, NUM_CARS};

wire_struct! {
    /// 60 bytes per car. Direction vectors are normalised `i16`s; divide
    /// by 32767.0 for a unit float.
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
    pub struct CarMotionData {
        pub world_position_x: f32,
        pub world_position_y: f32,
        pub world_position_z: f32,
        pub world_velocity_x: f32,
        pub world_velocity_y: f32,
        pub world_velocity_z: f32,
        pub world_forward_dir_x: i16,
        pub world_forward_dir_y: i16,
        pub world_forward_dir_z: i16,
        pub world_right_dir_x: i16,
        pub world_right_dir_y: i16,
        pub world_right_dir_z: i16,
        pub g_force_lateral: f32,
        pub g_force_longitudinal: f32,
        pub g_force_vertical: f32,
        /// Radians.
        pub yaw: f32,
        pub pitch: f32,
        pub roll: f32,
    }
}

wire_struct! {
    /// Trailing 120 bytes that only describe the player's car.
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
    pub struct PlayerMotionData {
        pub suspension_position: Wheels<f32>,
        pub suspension_velocity: Wheels<f32>,
        pub suspension_acceleration: Wheels<f32>,
        pub wheel_speed: Wheels<f32>,
        pub wheel_slip: Wheels<f32>,
        pub local_velocity_x: f32,
        pub local_velocity_y: f32,
        pub local_velocity_z: f32,
        pub angular_velocity_x: f32,
        pub angular_velocity_y: f32,
        pub angular_velocity_z: f32,
        pub angular_acceleration_x: f32,
        pub angular_acceleration_y: f32,
        pub angular_acceleration_z: f32,
        /// Radians.
        pub front_wheels_angle: f32,
    }
}

wire_struct! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct PacketMotionData {
        pub header: PacketHeader,
        pub car_motion_data: [CarMotionData; NUM_CARS],
        pub player: PlayerMotionData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{decode, encode, Wire, HEADER_SIZE};

    #[test]
    fn layout_sizes() {
        assert_eq!(CarMotionData::SIZE, 60);
        assert_eq!(PlayerMotionData::SIZE, 120);
    }

    #[test]
    fn player_extras_follow_the_grid() {
        let mut raw = encode(&PacketMotionData::default());
        let extras = HEADER_SIZE + NUM_CARS * CarMotionData::SIZE;
        // suspension_position[front_left] is the third f32 of the extras
        raw[extras + 8..extras + 12].copy_from_slice(&0.25f32.to_le_bytes());
        // front_wheels_angle is the last f32 of the packet
        let last = raw.len() - 4;
        raw[last..].copy_from_slice(&(-0.5f32).to_le_bytes());

        let packet: PacketMotionData = decode(&raw).unwrap();
        assert_eq!(packet.player.suspension_position.front_left, 0.25);
        assert_eq!(packet.player.suspension_position.rear_left, 0.0);
        assert_eq!(packet.player.front_wheels_angle, -0.5);
    }

    #[test]
    fn grid_slots_are_positional() {
        let mut packet = PacketMotionData::default();
        packet.car_motion_data[7].world_forward_dir_z = -32767;
        let raw = encode(&packet);
        let slot = HEADER_SIZE + 7 * CarMotionData::SIZE + 24 + 4;
        assert_eq!(&raw[slot..slot + 2], &(-32767i16).to_le_bytes());
    }
}
