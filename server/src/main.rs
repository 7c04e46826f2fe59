use clap::Parser;
use log::info;
use server::config::ServerConfig;
use server::network::Server;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// UDP port for game traffic
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// TCP port for the liveness probe, 0 to disable
    #[arg(long, default_value = "8081")]
    health_port: u16,

    /// Simulation tick interval in milliseconds
    #[arg(long, default_value = "120")]
    sim_tick_ms: u64,

    /// Full-state broadcast interval in milliseconds
    #[arg(long, default_value = "120")]
    broadcast_tick_ms: u64,

    /// Maximum number of concurrent sessions
    #[arg(short, long, default_value = "32")]
    max_clients: usize,

    /// Seconds of silence before a session is dropped
    #[arg(long, default_value = "5")]
    client_timeout_secs: u64,

    /// Number of bots kept alive in the arena
    #[arg(short, long, default_value = "6")]
    bots: usize,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            bind_addr: format!("{}:{}", args.host, args.port),
            health_addr: (args.health_port != 0)
                .then(|| format!("{}:{}", args.host, args.health_port)),
            sim_tick: Duration::from_millis(args.sim_tick_ms.max(1)),
            broadcast_tick: Duration::from_millis(args.broadcast_tick_ms.max(1)),
            max_clients: args.max_clients,
            client_timeout: Duration::from_secs(args.client_timeout_secs),
            bot_population: args.bots,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let config = ServerConfig::from(Args::parse());
    info!("Starting arena server with {:?}", config);

    let mut server = Server::new(config).await?;

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
