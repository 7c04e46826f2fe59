//! Fixed-interval timers for the simulation and broadcast cycles
//!
//! The scheduler never touches game state itself. It only tells the owning
//! loop which cycle is due, so both cycles run on the same task as client
//! commands and always see a fully applied state.

use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    /// Replenish bots and run their AI
    Simulation,
    /// Send the full snapshot to every session
    Broadcast,
}

pub struct TickScheduler {
    simulation: Interval,
    broadcast: Interval,
}

impl TickScheduler {
    /// Must be called from within a tokio runtime.
    pub fn new(sim_tick: Duration, broadcast_tick: Duration) -> Self {
        let mut simulation = interval(sim_tick);
        simulation.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut broadcast = interval(broadcast_tick);
        broadcast.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Self {
            simulation,
            broadcast,
        }
    }

    /// Waits for the next due cycle. Simulation wins when both are due at once.
    ///
    /// Cancel safe: dropping the future does not lose a tick.
    pub async fn next(&mut self) -> TickKind {
        tokio::select! {
            biased;
            _ = self.simulation.tick() => TickKind::Simulation,
            _ = self.broadcast.tick() => TickKind::Broadcast,
        }
    }
}
