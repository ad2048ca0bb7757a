//! Session packet (ID 1): track, weather and timing for the session in
//! progress. Sent twice per second.
use serde::Serialize;

use super::PacketHeader;

pub const MAX_MARSHAL_ZONES: usize = 21;
pub const MAX_WEATHER_FORECAST_SAMPLES: usize = 20;

wire_struct! {
    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
    pub struct MarshalZone {
        /// Fraction (0..1) of the lap where the zone starts.
        pub zone_start: f32,
        /// -1 invalid, 0 none, 1 green, 2 blue, 3 yellow, 4 red.
        pub zone_flag: i8,
    }
}

wire_struct! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
    pub struct WeatherForecastSample {
        pub session_type: u8,
        /// Minutes ahead the forecast is for.
        pub time_offset: u8,
        pub weather: u8,
        pub track_temperature: i8,
        pub air_temperature: i8,
    }
}

wire_struct! {
    /// Session body following the header.
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct SessionData {
        /// 0 clear, 1 light cloud, 2 overcast, 3 light rain, 4 heavy rain, 5 storm.
        pub weather: u8,
        /// Degrees celsius.
        pub track_temperature: i8,
        pub air_temperature: i8,
        pub total_laps: u8,
        /// Metres.
        pub track_length: u16,
        pub session_type: u8,
        /// -1 for unknown.
        pub track_id: i8,
        /// 0 F1 modern, 1 F1 classic, 2 F2, 3 F1 generic.
        pub formula: u8,
        /// Seconds.
        pub session_time_left: u16,
        pub session_duration: u16,
        /// km/h.
        pub pit_speed_limit: u8,
        pub game_paused: u8,
        pub is_spectating: u8,
        pub spectator_car_index: u8,
        pub sli_pro_native_support: u8,
        pub num_marshal_zones: u8,
        pub marshal_zones: [MarshalZone; MAX_MARSHAL_ZONES],
        /// 0 none, 1 full, 2 virtual.
        pub safety_car_status: u8,
        pub network_game: u8,
        pub num_weather_forecast_samples: u8,
        pub weather_forecast_samples: [WeatherForecastSample; MAX_WEATHER_FORECAST_SAMPLES],
    }
}

wire_struct! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct PacketSessionData {
        pub header: PacketHeader,
        pub session: SessionData,
    }
}
