//! Bot behaviour: chase the nearest player and hit them when close enough.

use crate::combat;
use crate::game::GameState;
use shared::{
    distance, normalize_vector, Bot, Player, Positioned, BOT_ATTACK_COOLDOWN_MS, BOT_SPEED,
    MELEE_RANGE,
};

/// Runs one AI step for every live bot.
pub fn run_bots(state: &mut GameState, tick_ms: u32) {
    for index in 0..state.bots.len() {
        step_bot(state, index, tick_ms);
    }
}

/// Nearest live player to `bot`; the earliest spawned wins a tie.
pub fn nearest_player<'a>(players: &'a [Player], bot: &Bot) -> Option<&'a Player> {
    players
        .iter()
        .min_by(|a, b| distance(bot, *a).total_cmp(&distance(bot, *b)))
}

fn step_bot(state: &mut GameState, index: usize, tick_ms: u32) {
    let target = nearest_player(&state.players, &state.bots[index]).map(|p| (p.id, p.position()));

    let bot = &mut state.bots[index];
    bot.cooldown_ms = bot.cooldown_ms.saturating_sub(tick_ms);

    let Some((target_id, (tx, ty))) = target else {
        return;
    };

    let (ux, uy) = normalize_vector(tx - bot.x, ty - bot.y);
    bot.x += ux * BOT_SPEED;
    bot.y += uy * BOT_SPEED;
    bot.apply_bounds();

    let in_reach = (tx - bot.x).hypot(ty - bot.y) <= MELEE_RANGE;
    if in_reach && bot.cooldown_ms == 0 {
        bot.cooldown_ms = BOT_ATTACK_COOLDOWN_MS;
        combat::apply_damage_to_player(state, target_id, 1, None);
    }
}
