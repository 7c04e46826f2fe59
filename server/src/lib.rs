//! # Arena Server Library
//!
//! Authoritative server for a real-time arena combat game. The server owns the
//! true state of every player and bot, resolves all combat, drives the bots and
//! periodically sends every connected client a full snapshot. Clients are
//! untrusted: they only ever send intents (pick a class, move, attack, cast) and
//! the server decides what those intents do.
//!
//! ## Architecture
//!
//! ### Single Owner
//! All game state lives in one [`game::GameState`] owned by the main loop in
//! [`network::Server::run`]. Client commands, session timeouts and both
//! scheduled cycles are delivered to that loop as messages and handled one at a
//! time. Nothing else mutates the state, so there is no locking around combat.
//!
//! ### Two Timers
//! [`scheduler::TickScheduler`] runs two independent fixed intervals:
//! - **Simulation** (120 ms): top up the bot population, then run every bot's AI
//! - **Broadcast** (120 ms): send the full `{players, bots}` snapshot to everyone
//!
//! Per-action notifications (joins, moves, attacks, deaths, skill effects) are
//! sent immediately as commands are applied; the broadcast is a periodic
//! reconciliation on top of them.
//!
//! ### UDP Sessions
//! Packets are `bincode`-encoded [`shared::Packet`]s over UDP. Each remote
//! address holds one session whose id doubles as its player id. Gameplay
//! commands carry a per-session sequence number and stale ones are dropped,
//! which gives the simulation each session's commands exactly once and in order.
//!
//! ## Module Organization
//!
//! - `client_manager`: session lifecycle, sequencing and timeouts
//! - `game`: entity store, session commands and outbound notifications
//! - `combat`: damage, melee, whirlwind, fireball, shield and heal
//! - `ai`: bot chase-and-strike behaviour
//! - `scheduler`: simulation and broadcast timers
//! - `network`: UDP transport and the owning game loop
//! - `health`: TCP liveness probe
//! - `config`: runtime settings
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::ServerConfig;
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let mut server = Server::new(ServerConfig::default()).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Game-rule failures are not errors. A command from a session without a live
//! player, a skill below full energy, or a class pick while already spawned is
//! silently ignored, and non-finite coordinates fall back to the player's
//! current position. Only setup and socket I/O return errors.

pub mod ai;
pub mod client_manager;
pub mod combat;
pub mod config;
pub mod game;
pub mod health;
pub mod network;
pub mod scheduler;
