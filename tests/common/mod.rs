//! Fully populated synthetic packets shared by the integration tests.
#![allow(dead_code)]

use f1_telemetry_ingest::telemetry::{
    EventDetails, Packet, PacketCarSetupData, PacketCarStatusData, PacketCarTelemetryData,
    PacketEventData, PacketFinalClassificationData, PacketHeader, PacketId, PacketLapData,
    PacketLobbyInfoData, PacketMotionData, PacketParticipantsData, PacketSessionData, Wheels,
    NO_SECONDARY_PLAYER, PACKET_FORMAT_2020,
};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn header(id: PacketId, player: u8, frame: u32, session_uid: u64) -> PacketHeader {
    PacketHeader {
        packet_format: PACKET_FORMAT_2020,
        game_major_version: 1,
        game_minor_version: 18,
        packet_version: 1,
        packet_id: id as u8,
        session_uid,
        session_time: frame as f32 / 60.0,
        frame_identifier: frame,
        player_car_index: player,
        secondary_player_car_index: NO_SECONDARY_PLAYER,
    }
}

/// Distinct, non-round values per car slot so that a wrong slot or a
/// permuted wheel shows up as a mismatch.
fn f(slot: usize, field: u32) -> f32 {
    slot as f32 * 100.0 + field as f32 + 0.125
}

fn wheel_f32(slot: usize, field: u32) -> Wheels<f32> {
    Wheels::new(f(slot, field), f(slot, field + 1), f(slot, field + 2), f(slot, field + 3))
}

pub fn build_packet(id: PacketId, header: PacketHeader) -> Packet {
    match id {
        PacketId::Motion => Packet::Motion(Box::new(build_motion(header))),
        PacketId::Session => Packet::Session(Box::new(build_session(header))),
        PacketId::LapData => Packet::LapData(Box::new(build_lap_data(header))),
        PacketId::Event => Packet::Event(Box::new(PacketEventData::new(
            header,
            EventDetails::FastestLap {
                vehicle_idx: header.player_car_index,
                lap_time: 83.456,
            },
        ))),
        PacketId::Participants => Packet::Participants(Box::new(build_participants(header))),
        PacketId::CarSetups => Packet::CarSetups(Box::new(build_car_setups(header))),
        PacketId::CarTelemetry => Packet::CarTelemetry(Box::new(build_car_telemetry(header))),
        PacketId::CarStatus => Packet::CarStatus(Box::new(build_car_status(header))),
        PacketId::FinalClassification => {
            Packet::FinalClassification(Box::new(build_final_classification(header)))
        }
        PacketId::LobbyInfo => Packet::LobbyInfo(Box::new(build_lobby_info(header))),
    }
}

pub fn build_datagram(id: PacketId, player: u8, frame: u32, session_uid: u64) -> Vec<u8> {
    build_packet(id, header(id, player, frame, session_uid)).encode()
}

pub fn build_motion(header: PacketHeader) -> PacketMotionData {
    let mut p = PacketMotionData {
        header,
        ..Default::default()
    };
    for (i, car) in p.car_motion_data.iter_mut().enumerate() {
        car.world_position_x = f(i, 1);
        car.world_position_y = f(i, 2);
        car.world_position_z = f(i, 3);
        car.world_velocity_x = f(i, 4);
        car.world_forward_dir_x = -(i as i16) * 1000;
        car.world_right_dir_z = i as i16 * 7;
        car.g_force_lateral = f(i, 5);
        car.yaw = f(i, 6);
        car.roll = f(i, 7);
    }
    p.player.suspension_position = wheel_f32(0, 10);
    p.player.wheel_speed = wheel_f32(0, 20);
    p.player.wheel_slip = wheel_f32(0, 30);
    p.player.angular_acceleration_z = -2.5;
    p.player.front_wheels_angle = 0.3125;
    p
}

pub fn build_session(header: PacketHeader) -> PacketSessionData {
    let mut p = PacketSessionData {
        header,
        ..Default::default()
    };
    let s = &mut p.session;
    s.weather = 3;
    s.track_temperature = -2;
    s.air_temperature = 31;
    s.total_laps = 53;
    s.track_length = 5793;
    s.session_type = 10;
    s.track_id = 11;
    s.session_time_left = 3600;
    s.session_duration = 7200;
    s.pit_speed_limit = 80;
    s.num_marshal_zones = 21;
    for (i, zone) in s.marshal_zones.iter_mut().enumerate() {
        zone.zone_start = i as f32 / 21.0;
        zone.zone_flag = (i % 5) as i8 - 1;
    }
    s.safety_car_status = 2;
    s.network_game = 1;
    s.num_weather_forecast_samples = 20;
    for (i, sample) in s.weather_forecast_samples.iter_mut().enumerate() {
        sample.session_type = 10;
        sample.time_offset = i as u8 * 5;
        sample.weather = (i % 6) as u8;
        sample.track_temperature = 20 + i as i8;
        sample.air_temperature = 15 + i as i8;
    }
    p
}

pub fn build_lap_data(header: PacketHeader) -> PacketLapData {
    let mut p = PacketLapData {
        header,
        ..Default::default()
    };
    for (i, lap) in p.lap_data.iter_mut().enumerate() {
        lap.last_lap_time = f(i, 1);
        lap.current_lap_time = f(i, 2);
        lap.best_lap_time = f(i, 3);
        lap.best_lap_num = i as u8;
        lap.lap_distance = f(i, 4);
        lap.total_distance = f(i, 5);
        lap.safety_car_delta = -f(i, 6);
        lap.car_position = i as u8 + 1;
        lap.current_lap_num = 12;
        lap.pit_status = (i % 3) as u8;
        lap.sector = (i % 3) as u8;
        lap.grid_position = 22 - i as u8;
        lap.driver_status = 4;
        lap.result_status = 2;
    }
    p
}

pub fn build_participants(header: PacketHeader) -> PacketParticipantsData {
    let mut p = PacketParticipantsData {
        header,
        num_active_cars: 20,
        ..Default::default()
    };
    for (i, driver) in p.participants.iter_mut().enumerate() {
        driver.ai_controlled = u8::from(i % 2 == 0);
        driver.driver_id = i as u8 + 7;
        driver.team_id = (i / 2) as u8;
        driver.race_number = i as u8 + 2;
        driver.nationality = i as u8 + 30;
        driver.name = format!("Driver Ünïcode {i}");
        driver.your_telemetry = 1;
    }
    p
}

pub fn build_car_setups(header: PacketHeader) -> PacketCarSetupData {
    let mut p = PacketCarSetupData {
        header,
        ..Default::default()
    };
    for (i, setup) in p.car_setups.iter_mut().enumerate() {
        setup.front_wing = i as u8;
        setup.rear_wing = i as u8 + 1;
        setup.front_camber = -f(i, 1);
        setup.rear_toe = f(i, 2);
        setup.brake_bias = 56;
        setup.tyre_pressure = wheel_f32(i, 10);
        setup.ballast = 6;
        setup.fuel_load = f(i, 20);
    }
    p
}

pub fn build_car_telemetry(header: PacketHeader) -> PacketCarTelemetryData {
    let mut p = PacketCarTelemetryData {
        header,
        ..Default::default()
    };
    for (i, car) in p.car_telemetry_data.iter_mut().enumerate() {
        car.speed = 200 + i as u16;
        car.throttle = 0.75;
        car.steer = -0.125;
        car.brake = 0.0625;
        car.clutch = i as u8;
        car.gear = (i % 10) as i8 - 1;
        car.engine_rpm = 11000 + i as u16;
        car.drs = (i % 2) as u8;
        car.rev_lights_percent = 90;
        car.brakes_temperature = Wheels::new(500 + i as u16, 510, 620, 630);
        car.tyres_surface_temperature = Wheels::new(90, 91, 92, 93);
        car.tyres_inner_temperature = Wheels::new(100, 101, 102, 103);
        car.engine_temperature = 110;
        car.tyres_pressure = wheel_f32(i, 40);
        car.surface_type = Wheels::new(0, 1, 2, 3);
    }
    p.extras.button_status = 0x0000_1004;
    p.extras.mfd_panel_index = 255;
    p.extras.mfd_panel_index_secondary_player = 255;
    p.extras.suggested_gear = 7;
    p
}

pub fn build_car_status(header: PacketHeader) -> PacketCarStatusData {
    let mut p = PacketCarStatusData {
        header,
        ..Default::default()
    };
    for (i, car) in p.car_status_data.iter_mut().enumerate() {
        car.traction_control = 2;
        car.anti_lock_brakes = 1;
        car.fuel_mix = 1;
        car.front_brake_bias = 56;
        car.fuel_in_tank = f(i, 1);
        car.fuel_capacity = 110.0;
        car.fuel_remaining_laps = f(i, 2);
        car.max_rpm = 13000;
        car.idle_rpm = 4000;
        car.max_gears = 8;
        car.drs_allowed = 1;
        car.drs_activation_distance = 250 + i as u16;
        car.tyres_wear = Wheels::new(10, 11, 12, 13);
        car.actual_tyre_compound = 16;
        car.visual_tyre_compound = 16;
        car.tyres_age_laps = i as u8;
        car.tyres_damage = Wheels::new(1, 2, 3, 4);
        car.front_left_wing_damage = 5;
        car.vehicle_fia_flags = -1;
        car.ers_store_energy = f(i, 3) * 1000.0;
        car.ers_deploy_mode = 2;
        car.ers_harvested_this_lap_mguk = f(i, 4);
        car.ers_harvested_this_lap_mguh = f(i, 5);
        car.ers_deployed_this_lap = f(i, 6);
    }
    p
}

pub fn build_final_classification(header: PacketHeader) -> PacketFinalClassificationData {
    let mut p = PacketFinalClassificationData {
        header,
        num_cars: 20,
        ..Default::default()
    };
    for (i, car) in p.classification_data.iter_mut().enumerate() {
        car.position = i as u8 + 1;
        car.num_laps = 53;
        car.grid_position = 22 - i as u8;
        car.points = 25u8.saturating_sub(i as u8);
        car.num_pit_stops = 1;
        car.result_status = 3;
        car.best_lap_time = f(i, 1);
        car.total_race_time = 5_000.0 + i as f64 + 0.000_000_123;
        car.penalties_time = 5;
        car.num_penalties = 1;
        car.num_tyre_stints = 2;
        car.tyre_stints_actual = [16, 17, 0, 0, 0, 0, 0, i as u8];
        car.tyre_stints_visual = [16, 17, 0, 0, 0, 0, 0, i as u8];
    }
    p
}

pub fn build_lobby_info(header: PacketHeader) -> PacketLobbyInfoData {
    let mut p = PacketLobbyInfoData {
        header,
        num_players: 4,
        ..Default::default()
    };
    for (i, player) in p.lobby_players.iter_mut().enumerate() {
        player.ai_controlled = u8::from(i >= 4);
        player.team_id = if i < 4 { i as u8 } else { 255 };
        player.nationality = i as u8 + 1;
        player.name = format!("Lobby {i}");
        player.ready_status = (i % 3) as u8;
    }
    p
}
