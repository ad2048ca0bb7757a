//! Car telemetry packet (ID 6).
use serde::Serialize;

use super::{PacketHeader, Wheels, NUM_CARS};

wire_struct! {
    /// 58 bytes per car.
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
    pub struct CarTelemetryData {
        /// km/h.
        pub speed: u16,
        /// 0.0 to 1.0.
        pub throttle: f32,
        /// -1.0 full left to 1.0 full right.
        pub steer: f32,
        pub brake: f32,
        /// 0 to 100.
        pub clutch: u8,
        /// -1 reverse, 0 neutral, 1-8 forward.
        pub gear: i8,
        pub engine_rpm: u16,
        pub drs: u8,
        pub rev_lights_percent: u8,
        /// Celsius.
        pub brakes_temperature: Wheels<u16>,
        pub tyres_surface_temperature: Wheels<u8>,
        pub tyres_inner_temperature: Wheels<u8>,
        pub engine_temperature: u16,
        /// PSI.
        pub tyres_pressure: Wheels<f32>,
        pub surface_type: Wheels<u8>,
    }
}

wire_struct! {
    /// Trailing fields that follow the grid.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
    pub struct PlayerTelemetryExtras {
        /// Bit flags for the buttons currently pressed.
        pub button_status: u32,
        /// 255 when the MFD is closed.
        pub mfd_panel_index: u8,
        pub mfd_panel_index_secondary_player: u8,
        /// 0 when no gear is suggested.
        pub suggested_gear: i8,
    }
}

wire_struct! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct PacketCarTelemetryData {
        pub header: PacketHeader,
        pub car_telemetry_data: [CarTelemetryData; NUM_CARS],
        pub extras: PlayerTelemetryExtras,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{decode, encode, Wire, HEADER_SIZE};

    #[test]
    fn layout_sizes() {
        assert_eq!(CarTelemetryData::SIZE, 58);
        assert_eq!(PlayerTelemetryExtras::SIZE, 7);
    }

    #[test]
    fn brake_temperatures_keep_wheel_positions() {
        let mut packet = PacketCarTelemetryData::default();
        packet.car_telemetry_data[5].brakes_temperature = Wheels::new(510, 520, 630, 640);
        let raw = encode(&packet);
        let at = HEADER_SIZE + 5 * CarTelemetryData::SIZE + 20;
        assert_eq!(&raw[at..at + 2], &510u16.to_le_bytes());
        assert_eq!(&raw[at + 6..at + 8], &640u16.to_le_bytes());
    }

    #[test]
    fn suggested_gear_is_last_byte() {
        let mut raw = encode(&PacketCarTelemetryData::default());
        let last = raw.len() - 1;
        raw[last] = (-1i8) as u8;
        raw[last - 2] = 255;
        let packet: PacketCarTelemetryData = decode(&raw).unwrap();
        assert_eq!(packet.extras.suggested_gear, -1);
        assert_eq!(packet.extras.mfd_panel_index, 255);
    }
}
