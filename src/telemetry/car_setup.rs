//! Car setups packet (ID 5). In multiplayer, other players' setups are
//! blanked unless they share them.
use serde::Serialize;

use super::{PacketHeader, Wheels, NUM_CARS};

wire_struct! {
    /// 49 bytes per car.
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
    pub struct CarSetupData {
        pub front_wing: u8,
        pub rear_wing: u8,
        /// Differential adjustment on throttle, percent.
        pub on_throttle: u8,
        pub off_throttle: u8,
        pub front_camber: f32,
        pub rear_camber: f32,
        pub front_toe: f32,
        pub rear_toe: f32,
        pub front_suspension: u8,
        pub rear_suspension: u8,
        pub front_anti_roll_bar: u8,
        pub rear_anti_roll_bar: u8,
        pub front_suspension_height: u8,
        pub rear_suspension_height: u8,
        /// Percent.
        pub brake_pressure: u8,
        pub brake_bias: u8,
        /// PSI.
        pub tyre_pressure: Wheels<f32>,
        pub ballast: u8,
        pub fuel_load: f32,
    }
}

wire_struct! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct PacketCarSetupData {
        pub header: PacketHeader,
        pub car_setups: [CarSetupData; NUM_CARS],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{decode, encode, Wire, HEADER_SIZE};

    #[test]
    fn setup_is_49_bytes() {
        assert_eq!(CarSetupData::SIZE, 49);
    }

    #[test]
    fn tyre_pressures_follow_wheel_order() {
        let mut raw = encode(&PacketCarSetupData::default());
        let pressures = HEADER_SIZE + 28;
        for (i, psi) in [21.0f32, 21.5, 23.0, 23.5].iter().enumerate() {
            let at = pressures + i * 4;
            raw[at..at + 4].copy_from_slice(&psi.to_le_bytes());
        }
        let packet: PacketCarSetupData = decode(&raw).unwrap();
        let tyres = packet.car_setups[0].tyre_pressure;
        assert_eq!(tyres.rear_left, 21.0);
        assert_eq!(tyres.rear_right, 21.5);
        assert_eq!(tyres.front_left, 23.0);
        assert_eq!(tyres.front_right, 23.5);
    }
}
