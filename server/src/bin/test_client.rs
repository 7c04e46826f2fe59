//! Headless smoke client: joins the arena, wanders around swinging at things
//! and prints what the server sends back.

use bincode::{deserialize, serialize};
use clap::Parser;
use log::{info, warn};
use shared::{Packet, PlayerClass, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::{sleep, timeout};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8080")]
    server: String,

    /// Class to play: warrior, mage, guardian or cleric
    #[arg(short, long, default_value = "warrior")]
    class: String,

    /// Number of action rounds to send
    #[arg(short, long, default_value = "10")]
    rounds: u32,
}

async fn send(
    socket: &UdpSocket,
    packet: &Packet,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    socket.send_to(&serialize(packet)?, addr).await?;
    Ok(())
}

fn describe(packet: &Packet) {
    match packet {
        Packet::FullState {
            tick,
            players,
            bots,
            ..
        } => info!(
            "State tick {}: {} players, {} bots",
            tick,
            players.len(),
            bots.len()
        ),
        Packet::PlayerDied { id } => info!("Player {} died", id),
        Packet::SkillEffect { id, effect } => info!("Player {} cast {:?}", id, effect),
        other => info!("Received {:?}", other),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let server_addr: SocketAddr = args.server.parse()?;
    let class = PlayerClass::from_name(&args.class);

    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    info!("Client socket bound to {}", socket.local_addr()?);

    send(
        &socket,
        &Packet::Connect {
            client_version: PROTOCOL_VERSION,
        },
        server_addr,
    )
    .await?;

    let mut buf = [0u8; 8192];
    let (len, _) = timeout(Duration::from_secs(2), socket.recv_from(&mut buf)).await??;
    let client_id = match deserialize::<Packet>(&buf[..len])? {
        Packet::Connected { client_id } => client_id,
        other => {
            warn!("Expected Connected but got: {:?}", other);
            return Ok(());
        }
    };
    info!("Connected as client {}, playing {:?}", client_id, class);

    let mut sequence = 1;
    send(&socket, &Packet::ChooseClass { sequence, class }, server_addr).await?;

    let mut position = (600.0_f32, 400.0_f32);
    for round in 0..args.rounds {
        let angle = round as f32 * 0.7;
        position.0 += angle.cos() * 20.0;
        position.1 += angle.sin() * 20.0;
        let aim = (position.0 + angle.cos() * 50.0, position.1 + angle.sin() * 50.0);

        sequence += 1;
        send(
            &socket,
            &Packet::Move {
                sequence,
                x: position.0,
                y: position.1,
            },
            server_addr,
        )
        .await?;

        sequence += 1;
        send(
            &socket,
            &Packet::Attack {
                sequence,
                x: aim.0,
                y: aim.1,
            },
            server_addr,
        )
        .await?;

        sequence += 1;
        send(
            &socket,
            &Packet::Skill {
                sequence,
                x: aim.0,
                y: aim.1,
            },
            server_addr,
        )
        .await?;

        // Drain whatever arrived during this round
        let deadline = tokio::time::Instant::now() + Duration::from_millis(500);
        while let Ok(Ok((len, _))) =
            tokio::time::timeout_at(deadline, socket.recv_from(&mut buf)).await
        {
            match deserialize::<Packet>(&buf[..len]) {
                Ok(packet) => describe(&packet),
                Err(e) => warn!("Failed to deserialize packet: {}", e),
            }
        }

        sleep(Duration::from_millis(100)).await;
    }

    send(&socket, &Packet::Disconnect, server_addr).await?;
    info!("Test client finished");

    Ok(())
}
