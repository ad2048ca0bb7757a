//! Synthetic F1 2020 telemetry generator.
//!
//! Sends well-formed datagrams of random (or one chosen) packet type to a
//! listener, optionally mixing in invalid ones to exercise the gating paths.
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::net::UdpSocket;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use f1_telemetry_ingest::telemetry::{
    EventDetails, Packet, PacketCarSetupData, PacketCarStatusData, PacketCarTelemetryData,
    PacketEventData, PacketFinalClassificationData, PacketHeader, PacketId, PacketLapData,
    PacketLobbyInfoData, PacketMotionData, PacketParticipantsData, PacketSessionData, Penalty,
    Wheels, HEADER_SIZE, MAX_PLAYER_INDEX, NO_SECONDARY_PLAYER, NUM_CARS, PACKET_FORMAT_2020,
};

#[derive(Debug, Parser)]
#[command(name = "generator", about = "Send synthetic F1 2020 telemetry datagrams")]
struct Args {
    /// Address of the ingest service
    #[arg(long, default_value = "127.0.0.1:20777")]
    target: SocketAddr,

    /// Datagrams to send, 0 sends until interrupted
    #[arg(long, default_value_t = 1000)]
    count: u64,

    /// Datagrams per second
    #[arg(long, default_value_t = 60)]
    rate: u32,

    /// Only send this packet id (0-9)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=9))]
    packet_id: Option<u8>,

    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=21))]
    player_index: u8,

    /// Fraction of datagrams that are deliberately invalid
    #[arg(long, default_value_t = 0.0)]
    invalid_fraction: f64,

    /// Seed for reproducible streams
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
enum Invalid {
    WrongSeason,
    NoPlayer,
    UnknownId,
    Truncated,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    anyhow::ensure!(
        (0.0..=1.0).contains(&args.invalid_fraction),
        "--invalid-fraction must be between 0 and 1"
    );
    anyhow::ensure!(args.rate > 0, "--rate must be greater than zero");

    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .context("failed to bind local UDP socket")?;
    socket
        .connect(args.target)
        .await
        .with_context(|| format!("failed to connect to {}", args.target))?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let session_uid: u64 = rng.gen();
    let fixed_id = args.packet_id.and_then(PacketId::from_u8);

    info!(addr = %args.target, count = args.count, rate = args.rate, "sending telemetry");

    let mut ticker = interval(Duration::from_secs_f64(1.0 / f64::from(args.rate)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

    let mut sent = 0u64;
    let mut invalid = 0u64;
    let mut frame = 0u32;
    loop {
        if args.count > 0 && sent >= args.count {
            break;
        }
        ticker.tick().await;

        let id = fixed_id.unwrap_or_else(|| PacketId::ALL[rng.gen_range(0..PacketId::ALL.len())]);
        let header = PacketHeader {
            packet_format: PACKET_FORMAT_2020,
            game_major_version: 1,
            game_minor_version: 18,
            packet_version: 1,
            packet_id: id as u8,
            session_uid,
            session_time: frame as f32 / 60.0,
            frame_identifier: frame,
            player_car_index: args.player_index,
            secondary_player_car_index: NO_SECONDARY_PLAYER,
        };
        let mut datagram = synthetic_packet(id, header, &mut rng).encode();

        if rng.gen_bool(args.invalid_fraction) {
            let kind = match rng.gen_range(0..4) {
                0 => Invalid::WrongSeason,
                1 => Invalid::NoPlayer,
                2 => Invalid::UnknownId,
                _ => Invalid::Truncated,
            };
            corrupt(&mut datagram, kind, &mut rng);
            debug!(?kind, frame, "sending invalid datagram");
            invalid += 1;
        }

        socket
            .send(&datagram)
            .await
            .context("failed to send datagram")?;
        sent += 1;
        frame = frame.wrapping_add(1);
    }

    info!(sent, invalid, "done");
    Ok(())
}

fn corrupt(datagram: &mut Vec<u8>, kind: Invalid, rng: &mut StdRng) {
    match kind {
        Invalid::WrongSeason => datagram[..2].copy_from_slice(&2019u16.to_le_bytes()),
        Invalid::NoPlayer => datagram[22] = rng.gen_range(MAX_PLAYER_INDEX + 1..=u8::MAX),
        Invalid::UnknownId => datagram[5] = rng.gen_range(10..=u8::MAX),
        Invalid::Truncated => {
            let len = rng.gen_range(HEADER_SIZE..datagram.len());
            datagram.truncate(len);
        }
    }
}

fn wheels(rng: &mut StdRng, low: f32, high: f32) -> Wheels<f32> {
    Wheels::new(
        rng.gen_range(low..high),
        rng.gen_range(low..high),
        rng.gen_range(low..high),
        rng.gen_range(low..high),
    )
}

fn synthetic_packet(id: PacketId, header: PacketHeader, rng: &mut StdRng) -> Packet {
    match id {
        PacketId::Motion => {
            let mut p = PacketMotionData {
                header,
                ..Default::default()
            };
            for car in p.car_motion_data.iter_mut() {
                car.world_position_x = rng.gen_range(-1000.0..1000.0);
                car.world_position_z = rng.gen_range(-1000.0..1000.0);
                car.world_velocity_x = rng.gen_range(-90.0..90.0);
                car.g_force_lateral = rng.gen_range(-5.0..5.0);
                car.yaw = rng.gen_range(-3.1..3.1);
            }
            p.player.wheel_speed = wheels(rng, 0.0, 95.0);
            p.player.suspension_position = wheels(rng, -20.0, 20.0);
            p.player.front_wheels_angle = rng.gen_range(-0.4..0.4);
            Packet::Motion(Box::new(p))
        }
        PacketId::Session => {
            let mut p = PacketSessionData {
                header,
                ..Default::default()
            };
            let s = &mut p.session;
            s.weather = rng.gen_range(0..6);
            s.track_temperature = rng.gen_range(15..50);
            s.air_temperature = rng.gen_range(10..40);
            s.total_laps = rng.gen_range(5..78);
            s.track_length = rng.gen_range(3300..7004);
            s.track_id = rng.gen_range(0..30);
            s.pit_speed_limit = 80;
            s.num_marshal_zones = rng.gen_range(1..=21);
            for zone in s.marshal_zones.iter_mut().take(usize::from(s.num_marshal_zones)) {
                zone.zone_start = rng.gen_range(0.0..1.0);
                zone.zone_flag = rng.gen_range(-1..=4);
            }
            s.num_weather_forecast_samples = rng.gen_range(0..=20);
            Packet::Session(Box::new(p))
        }
        PacketId::LapData => {
            let mut p = PacketLapData {
                header,
                ..Default::default()
            };
            for (i, lap) in p.lap_data.iter_mut().enumerate() {
                lap.current_lap_time = rng.gen_range(0.0..95.0);
                lap.last_lap_time = rng.gen_range(70.0..95.0);
                lap.lap_distance = rng.gen_range(0.0..5000.0);
                lap.car_position = i as u8 + 1;
                lap.current_lap_num = rng.gen_range(1..60);
                lap.sector = rng.gen_range(0..3);
            }
            Packet::LapData(Box::new(p))
        }
        PacketId::Event => {
            let vehicle_idx = rng.gen_range(0..NUM_CARS as u8);
            let details = match rng.gen_range(0..6) {
                0 => EventDetails::FastestLap {
                    vehicle_idx,
                    lap_time: rng.gen_range(70.0..95.0),
                },
                1 => EventDetails::SpeedTrap {
                    vehicle_idx,
                    speed: rng.gen_range(280.0..350.0),
                },
                2 => EventDetails::Penalty(Penalty {
                    penalty_type: rng.gen_range(0..17),
                    infringement_type: rng.gen_range(0..51),
                    vehicle_idx,
                    other_vehicle_idx: 255,
                    time: 5,
                    lap_num: rng.gen_range(1..60),
                    places_gained: 0,
                }),
                3 => EventDetails::Retirement { vehicle_idx },
                4 => EventDetails::DrsEnabled,
                _ => EventDetails::SessionStarted,
            };
            Packet::Event(Box::new(PacketEventData::new(header, details)))
        }
        PacketId::Participants => {
            let mut p = PacketParticipantsData {
                header,
                num_active_cars: NUM_CARS as u8,
                ..Default::default()
            };
            for (i, driver) in p.participants.iter_mut().enumerate() {
                driver.ai_controlled = u8::from(i != usize::from(header.player_car_index));
                driver.driver_id = i as u8;
                driver.team_id = (i / 2) as u8;
                driver.race_number = rng.gen_range(1..99);
                driver.name = format!("DRIVER {}", i + 1);
            }
            Packet::Participants(Box::new(p))
        }
        PacketId::CarSetups => {
            let mut p = PacketCarSetupData {
                header,
                ..Default::default()
            };
            for setup in p.car_setups.iter_mut() {
                setup.front_wing = rng.gen_range(1..12);
                setup.rear_wing = rng.gen_range(1..12);
                setup.tyre_pressure = wheels(rng, 21.0, 25.0);
                setup.fuel_load = rng.gen_range(5.0..110.0);
            }
            Packet::CarSetups(Box::new(p))
        }
        PacketId::CarTelemetry => {
            let mut p = PacketCarTelemetryData {
                header,
                ..Default::default()
            };
            for car in p.car_telemetry_data.iter_mut() {
                car.speed = rng.gen_range(0..350);
                car.throttle = rng.gen_range(0.0..=1.0);
                car.brake = rng.gen_range(0.0..=1.0);
                car.steer = rng.gen_range(-1.0..=1.0);
                car.gear = rng.gen_range(1..=8);
                car.engine_rpm = rng.gen_range(4000..13000);
                car.tyres_pressure = wheels(rng, 21.0, 25.0);
            }
            p.extras.mfd_panel_index = 255;
            p.extras.mfd_panel_index_secondary_player = 255;
            Packet::CarTelemetry(Box::new(p))
        }
        PacketId::CarStatus => {
            let mut p = PacketCarStatusData {
                header,
                ..Default::default()
            };
            for car in p.car_status_data.iter_mut() {
                car.fuel_in_tank = rng.gen_range(0.0..110.0);
                car.fuel_capacity = 110.0;
                car.max_rpm = 13000;
                car.idle_rpm = 4000;
                car.max_gears = 8;
                car.ers_store_energy = rng.gen_range(0.0..4_000_000.0);
            }
            Packet::CarStatus(Box::new(p))
        }
        PacketId::FinalClassification => {
            let mut p = PacketFinalClassificationData {
                header,
                num_cars: NUM_CARS as u8,
                ..Default::default()
            };
            for (i, car) in p.classification_data.iter_mut().enumerate() {
                car.position = i as u8 + 1;
                car.grid_position = rng.gen_range(1..=NUM_CARS as u8);
                car.best_lap_time = rng.gen_range(70.0..95.0);
                car.total_race_time = rng.gen_range(5000.0..6000.0);
                car.num_tyre_stints = rng.gen_range(1..=3);
            }
            Packet::FinalClassification(Box::new(p))
        }
        PacketId::LobbyInfo => {
            let mut p = PacketLobbyInfoData {
                header,
                num_players: rng.gen_range(1..=NUM_CARS as u8),
                ..Default::default()
            };
            for (i, player) in p.lobby_players.iter_mut().enumerate() {
                player.team_id = rng.gen_range(0..10);
                player.name = format!("PLAYER {}", i + 1);
                player.ready_status = rng.gen_range(0..3);
            }
            Packet::LobbyInfo(Box::new(p))
        }
    }
}
