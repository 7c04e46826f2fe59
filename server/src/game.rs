//! Authoritative world state and the session commands that mutate it
//!
//! `GameState` is the single owned store of every live player and bot. It is
//! never shared between tasks: the network loop owns it and applies client
//! commands and scheduled ticks to it one at a time. Everything the clients
//! need to hear about is queued as a [`Notification`] and drained by the
//! network layer after each command or tick.

use crate::{ai, combat};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{
    coerce_coordinate, Bot, Packet, Player, PlayerClass, Positioned, RADIUS, WORLD_HEIGHT,
    WORLD_WIDTH,
};

/// Who should receive a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    All,
    AllExcept(u32),
    Only(u32),
}

/// An outbound packet produced by the simulation
#[derive(Debug, Clone)]
pub struct Notification {
    pub audience: Audience,
    pub packet: Packet,
}

pub struct GameState {
    pub tick: u32,
    /// Live players in spawn order
    pub players: Vec<Player>,
    /// Live bots in spawn order
    pub bots: Vec<Bot>,
    next_bot_id: u32,
    rng: StdRng,
    outbox: Vec<Notification>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic spawn positions, used by tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            tick: 0,
            players: Vec::new(),
            bots: Vec::new(),
            next_bot_id: 0,
            rng,
            outbox: Vec::new(),
        }
    }

    // Entity store

    /// Random whole-unit position inside the playable area
    pub fn random_position(&mut self) -> (f32, f32) {
        let x = self.rng.gen_range(0..(WORLD_WIDTH - RADIUS * 2.0) as u32) as f32 + RADIUS;
        let y = self.rng.gen_range(0..(WORLD_HEIGHT - RADIUS * 2.0) as u32) as f32 + RADIUS;
        (x, y)
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: u32) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn player_index(&self, id: u32) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn bot(&self, id: u32) -> Option<&Bot> {
        self.bots.iter().find(|b| b.id == id)
    }

    pub fn bot_index(&self, id: u32) -> Option<usize> {
        self.bots.iter().position(|b| b.id == id)
    }

    /// Creates a player for `id` unless one is already alive.
    pub fn spawn(&mut self, id: u32, class: PlayerClass) -> Option<Player> {
        if self.player(id).is_some() {
            return None;
        }

        let (x, y) = self.random_position();
        let player = Player::new(id, class, x, y);

        info!(
            "Spawned {:?} for client {} at ({}, {})",
            class, id, player.x, player.y
        );
        self.players.push(player.clone());
        Some(player)
    }

    pub fn remove(&mut self, id: u32) -> Option<Player> {
        let index = self.player_index(id)?;
        let player = self.players.remove(index);
        info!("Removed player {}", id);
        Some(player)
    }

    /// Test fixture: places a player exactly as given, replacing any live
    /// player with the same id. Skips `spawn`'s placement and join
    /// notifications, so the server never calls it.
    #[doc(hidden)]
    pub fn insert_player(&mut self, player: Player) {
        match self.player_index(player.id) {
            Some(index) => self.players[index] = player,
            None => self.players.push(player),
        }
    }

    /// Test fixture: places a bot exactly as given, bypassing
    /// `ensure_bot_population`.
    #[doc(hidden)]
    pub fn insert_bot(&mut self, bot: Bot) {
        self.next_bot_id = self.next_bot_id.max(bot.id.wrapping_add(1));
        self.bots.push(bot);
    }

    pub fn snapshot(&self) -> (Vec<Player>, Vec<Bot>) {
        (self.players.clone(), self.bots.clone())
    }

    /// Adds bots until `target` are alive. Returns how many were added.
    pub fn ensure_bot_population(&mut self, target: usize) -> usize {
        let mut spawned = 0;
        while self.bots.len() < target {
            let (x, y) = self.random_position();
            let bot = Bot::new(self.next_bot_id, x, y);
            self.next_bot_id = self.next_bot_id.wrapping_add(1);

            debug!("Spawned bot {} at ({}, {})", bot.id, bot.x, bot.y);
            self.bots.push(bot);
            spawned += 1;
        }
        spawned
    }

    // Notifications

    pub fn emit(&mut self, audience: Audience, packet: Packet) {
        self.outbox.push(Notification { audience, packet });
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }

    pub fn full_state(&self, timestamp: u64) -> Packet {
        let (players, bots) = self.snapshot();
        Packet::FullState {
            tick: self.tick,
            timestamp,
            players,
            bots,
        }
    }

    // Scheduled work

    /// One simulation step: replenish bots, then let every bot act.
    pub fn simulation_tick(&mut self, bot_population: usize, tick_ms: u32) {
        self.ensure_bot_population(bot_population);
        ai::run_bots(self, tick_ms);
        self.tick = self.tick.wrapping_add(1);
    }

    // Session commands

    pub fn choose_class(&mut self, id: u32, class: PlayerClass) {
        let Some(player) = self.spawn(id, class) else {
            debug!("Client {} already has a live player", id);
            return;
        };

        let roster = self.players.clone();
        let bots = self.bots.clone();
        self.emit(Audience::Only(id), Packet::CurrentRoster { players: roster });
        self.emit(Audience::Only(id), Packet::BotRoster { bots });
        self.emit(Audience::AllExcept(id), Packet::PlayerJoined { player });
    }

    pub fn move_player(&mut self, id: u32, x: f32, y: f32) {
        let Some(player) = self.player_mut(id) else {
            return;
        };

        player.x = coerce_coordinate(x, player.x);
        player.y = coerce_coordinate(y, player.y);
        player.apply_bounds();

        let player = player.clone();
        self.emit(Audience::AllExcept(id), Packet::PlayerMoved { player });
    }

    pub fn attack(&mut self, id: u32, x: f32, y: f32) {
        let Some(direction) = self.aim_from(id, x, y) else {
            return;
        };

        combat::melee_attack(self, id, direction);
        self.emit(
            Audience::All,
            Packet::AttackEffect {
                id,
                dx: direction.0,
                dy: direction.1,
            },
        );
    }

    pub fn skill(&mut self, id: u32, x: f32, y: f32) {
        let Some(direction) = self.aim_from(id, x, y) else {
            return;
        };

        combat::cast_skill(self, id, direction);
    }

    pub fn disconnect(&mut self, id: u32) {
        if self.remove(id).is_some() {
            self.emit(Audience::All, Packet::PlayerLeft { id });
        }
    }

    /// Direction from the player toward an aim point
    fn aim_from(&self, id: u32, x: f32, y: f32) -> Option<(f32, f32)> {
        let player = self.player(id)?;
        let x = coerce_coordinate(x, player.x);
        let y = coerce_coordinate(y, player.y);
        Some((x - player.x, y - player.y))
    }
}
