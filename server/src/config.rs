//! Runtime configuration for the game server

use shared::{BOT_MAX, BROADCAST_TICK_MS, TICK_MS};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// UDP address for game traffic
    pub bind_addr: String,
    /// TCP address for the liveness probe, disabled when `None`
    pub health_addr: Option<String>,
    pub sim_tick: Duration,
    pub broadcast_tick: Duration,
    pub max_clients: usize,
    /// Silence after which a session counts as disconnected
    pub client_timeout: Duration,
    pub bot_population: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            health_addr: Some("127.0.0.1:8081".to_string()),
            sim_tick: Duration::from_millis(TICK_MS),
            broadcast_tick: Duration::from_millis(BROADCAST_TICK_MS),
            max_clients: 32,
            client_timeout: Duration::from_secs(5),
            bot_population: BOT_MAX,
        }
    }
}

impl ServerConfig {
    /// Simulation tick length as fed to the bot cooldowns
    pub fn sim_tick_ms(&self) -> u32 {
        self.sim_tick.as_millis().min(u32::MAX as u128) as u32
    }
}
