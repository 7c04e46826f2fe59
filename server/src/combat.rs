//! Combat resolution over the authoritative game state
//!
//! Every function here is a silent no-op when the acting entity is missing:
//! late or malformed client commands are ignored rather than rejected.
//!
//! Target enumeration order is fixed: live players in spawn order, then bots
//! in spawn order. Melee strikes the first candidate in that order that is in
//! range (not the nearest one), and fireball ties on distance fall back to the
//! same order.

use crate::game::{Audience, GameState};
use log::{debug, info};
use shared::{
    normalize_vector, Packet, Positioned, SkillEffect, SkillKind, FIREBALL_RANGE, FIREBALL_WIDTH,
    HEAL_AMOUNT, MELEE_RANGE, WHIRLWIND_RADIUS,
};

/// A damageable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Player(u32),
    Bot(u32),
}

/// Applies damage to a player. Returns false if the player does not exist.
///
/// A shielded player loses the shield instead of hp and the attacker gains
/// nothing. Otherwise a live attacking player gains one energy.
pub fn apply_damage_to_player(
    state: &mut GameState,
    target_id: u32,
    amount: i32,
    source_id: Option<u32>,
) -> bool {
    let Some(index) = state.player_index(target_id) else {
        return false;
    };

    let target = &mut state.players[index];
    if target.shield > 0 {
        target.shield = 0;
        debug!("Player {} shield absorbed a hit", target_id);
        return true;
    }

    target.hp -= amount;
    if target.hp <= 0 {
        state.players.remove(index);
        info!("Player {} died", target_id);
        state.emit(Audience::All, Packet::PlayerLeft { id: target_id });
        state.emit(Audience::All, Packet::PlayerDied { id: target_id });
    }

    reward_attacker(state, source_id);
    true
}

/// Applies damage to a bot. Returns false if the bot does not exist.
pub fn apply_damage_to_bot(
    state: &mut GameState,
    bot_id: u32,
    amount: i32,
    source_id: Option<u32>,
) -> bool {
    let Some(index) = state.bot_index(bot_id) else {
        return false;
    };

    state.bots[index].hp -= amount;
    if state.bots[index].hp <= 0 {
        state.bots.remove(index);
        debug!("Bot {} destroyed", bot_id);
    }

    reward_attacker(state, source_id);
    true
}

fn reward_attacker(state: &mut GameState, source_id: Option<u32>) {
    if let Some(attacker) = source_id.and_then(|id| state.player_mut(id)) {
        attacker.grant_energy(1);
    }
}

pub fn strike(
    state: &mut GameState,
    target: Target,
    amount: i32,
    source_id: Option<u32>,
) -> bool {
    match target {
        Target::Player(id) => apply_damage_to_player(state, id, amount, source_id),
        Target::Bot(id) => apply_damage_to_bot(state, id, amount, source_id),
    }
}

/// Everything the attacker could hit, with positions, in enumeration order
fn candidates(state: &GameState, attacker_id: u32) -> Vec<(Target, (f32, f32))> {
    let players = state
        .players
        .iter()
        .filter(|p| p.id != attacker_id)
        .map(|p| (Target::Player(p.id), p.position()));
    let bots = state.bots.iter().map(|b| (Target::Bot(b.id), b.position()));
    players.chain(bots).collect()
}

fn within(origin: (f32, f32), point: (f32, f32), radius: f32) -> bool {
    (point.0 - origin.0).hypot(point.1 - origin.1) <= radius
}

/// Strikes the first candidate within melee range. `direction` only drives the
/// client-side effect and plays no part in targeting.
pub fn melee_attack(
    state: &mut GameState,
    attacker_id: u32,
    _direction: (f32, f32),
) -> Option<Target> {
    let origin = state.player(attacker_id)?.position();

    let hit = candidates(state, attacker_id)
        .into_iter()
        .find(|(_, position)| within(origin, *position, MELEE_RANGE))
        .map(|(target, _)| target)?;

    strike(state, hit, 1, Some(attacker_id));
    Some(hit)
}

/// One damage to every other entity within the whirlwind radius.
pub fn skill_whirlwind(state: &mut GameState, attacker_id: u32) -> Vec<Target> {
    let Some(origin) = state.player(attacker_id).map(|p| p.position()) else {
        return Vec::new();
    };

    let hits: Vec<Target> = candidates(state, attacker_id)
        .into_iter()
        .filter(|(_, position)| within(origin, *position, WHIRLWIND_RADIUS))
        .map(|(target, _)| target)
        .collect();

    for target in &hits {
        strike(state, *target, 1, Some(attacker_id));
    }
    hits
}

/// Picks the fireball target: the candidate closest along the aim axis that
/// lies inside the cone.
pub fn fireball_target(
    state: &GameState,
    attacker_id: u32,
    direction: (f32, f32),
) -> Option<Target> {
    let (ox, oy) = state.player(attacker_id)?.position();
    let (ux, uy) = normalize_vector(direction.0, direction.1);

    let mut best: Option<(Target, f32)> = None;
    for (target, (x, y)) in candidates(state, attacker_id) {
        let rx = x - ox;
        let ry = y - oy;

        let along = rx * ux + ry * uy;
        if !(0.0..=FIREBALL_RANGE).contains(&along) {
            continue;
        }

        let side = (rx * uy - ry * ux).abs();
        if side > FIREBALL_WIDTH {
            continue;
        }

        if best.map_or(true, |(_, best_along)| along < best_along) {
            best = Some((target, along));
        }
    }

    best.map(|(target, _)| target)
}

pub fn skill_fireball(
    state: &mut GameState,
    attacker_id: u32,
    direction: (f32, f32),
) -> Option<Target> {
    let hit = fireball_target(state, attacker_id, direction)?;
    strike(state, hit, 1, Some(attacker_id));
    Some(hit)
}

pub fn skill_shield(state: &mut GameState, attacker_id: u32) {
    if let Some(caster) = state.player_mut(attacker_id) {
        caster.shield = 1;
    }
}

pub fn skill_heal(state: &mut GameState, attacker_id: u32) {
    if let Some(caster) = state.player_mut(attacker_id) {
        caster.hp = (caster.hp + HEAL_AMOUNT).clamp(0, caster.max_hp);
    }
}

/// Casts the caster's class skill if their energy is full.
///
/// Energy is spent even when the skill hits nothing. Returns whether a cast
/// happened.
pub fn cast_skill(state: &mut GameState, attacker_id: u32, direction: (f32, f32)) -> bool {
    let Some(caster) = state.player(attacker_id) else {
        return false;
    };
    if !caster.has_full_energy() {
        return false;
    }
    let skill = caster.class.def().skill;

    let effect = match skill {
        SkillKind::Whirlwind => {
            skill_whirlwind(state, attacker_id);
            SkillEffect::Whirlwind
        }
        SkillKind::Fireball => {
            skill_fireball(state, attacker_id, direction);
            let (ux, uy) = normalize_vector(direction.0, direction.1);
            SkillEffect::Fireball { ux, uy }
        }
        SkillKind::Shield => {
            skill_shield(state, attacker_id);
            SkillEffect::Shield
        }
        SkillKind::Heal => {
            skill_heal(state, attacker_id);
            SkillEffect::Heal
        }
    };

    state.emit(
        Audience::All,
        Packet::SkillEffect {
            id: attacker_id,
            effect,
        },
    );

    if let Some(caster) = state.player_mut(attacker_id) {
        caster.energy = 0;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use shared::{Bot, Player, PlayerClass};

    fn state_with(players: &[(u32, PlayerClass, f32, f32)]) -> GameState {
        let mut state = GameState::with_seed(11);
        for &(id, class, x, y) in players {
            state.insert_player(Player::new(id, class, x, y));
        }
        state
    }

    fn fill_energy(state: &mut GameState, id: u32) {
        let player = state.player_mut(id).unwrap();
        player.energy = player.max_energy;
    }

    fn assert_invariants(state: &GameState) {
        for player in &state.players {
            assert!(player.hp > 0 && player.hp <= player.max_hp);
            assert!(player.energy >= 0 && player.energy <= player.max_energy);
        }
    }

    #[test]
    fn test_damage_reduces_hp_and_rewards_attacker() {
        let mut state = state_with(&[
            (1, PlayerClass::Warrior, 100.0, 100.0),
            (2, PlayerClass::Warrior, 140.0, 100.0),
        ]);

        assert!(apply_damage_to_player(&mut state, 2, 1, Some(1)));

        assert_eq!(state.player(2).unwrap().hp, 8);
        assert_eq!(state.player(1).unwrap().energy, 1);
    }

    #[test]
    fn test_damage_to_missing_player_is_noop() {
        let mut state = state_with(&[(1, PlayerClass::Warrior, 100.0, 100.0)]);

        assert!(!apply_damage_to_player(&mut state, 99, 1, Some(1)));
        assert_eq!(state.player(1).unwrap().energy, 0);
    }

    #[test]
    fn test_bot_damage_grants_no_energy() {
        let mut state = state_with(&[(1, PlayerClass::Cleric, 100.0, 100.0)]);

        apply_damage_to_player(&mut state, 1, 1, None);

        let player = state.player(1).unwrap();
        assert_eq!(player.hp, 8);
        assert_eq!(player.energy, 0);
    }

    #[test]
    fn test_energy_never_exceeds_max() {
        let mut state = state_with(&[
            (1, PlayerClass::Warrior, 100.0, 100.0),
            (2, PlayerClass::Guardian, 140.0, 100.0),
        ]);

        for _ in 0..5 {
            apply_damage_to_player(&mut state, 2, 1, Some(1));
            assert_invariants(&state);
        }
        assert_eq!(state.player(1).unwrap().energy, 3);
    }

    #[test]
    fn test_lethal_damage_removes_player_and_announces_death() {
        let mut state = state_with(&[
            (1, PlayerClass::Warrior, 100.0, 100.0),
            (2, PlayerClass::Mage, 140.0, 100.0),
        ]);
        state.player_mut(2).unwrap().hp = 1;

        apply_damage_to_player(&mut state, 2, 1, Some(1));

        assert!(state.player(2).is_none());
        assert_eq!(state.player(1).unwrap().energy, 1);

        let notifications = state.drain_notifications();
        assert!(matches!(notifications[0].packet, Packet::PlayerLeft { id: 2 }));
        assert!(matches!(notifications[1].packet, Packet::PlayerDied { id: 2 }));
    }

    #[test]
    fn test_shield_absorbs_exactly_one_hit() {
        let mut state = state_with(&[
            (1, PlayerClass::Warrior, 100.0, 100.0),
            (2, PlayerClass::Guardian, 140.0, 100.0),
        ]);
        skill_shield(&mut state, 2);
        assert_eq!(state.player(2).unwrap().shield, 1);

        apply_damage_to_player(&mut state, 2, 1, Some(1));
        let guardian = state.player(2).unwrap();
        assert_eq!(guardian.hp, 11);
        assert_eq!(guardian.shield, 0);
        assert_eq!(state.player(1).unwrap().energy, 0);

        apply_damage_to_player(&mut state, 2, 1, Some(1));
        assert_eq!(state.player(2).unwrap().hp, 10);
        assert_eq!(state.player(1).unwrap().energy, 1);
    }

    #[test]
    fn test_shield_does_not_stack() {
        let mut state = state_with(&[(2, PlayerClass::Guardian, 140.0, 100.0)]);
        skill_shield(&mut state, 2);
        skill_shield(&mut state, 2);

        assert_eq!(state.player(2).unwrap().shield, 1);
        apply_damage_to_player(&mut state, 2, 1, None);
        apply_damage_to_player(&mut state, 2, 1, None);
        assert_eq!(state.player(2).unwrap().hp, 10);
    }

    #[test]
    fn test_bot_dies_at_zero_hp() {
        let mut state = state_with(&[(1, PlayerClass::Warrior, 100.0, 100.0)]);
        state.insert_bot(Bot::new(0, 130.0, 100.0));

        assert!(apply_damage_to_bot(&mut state, 0, 1, Some(1)));
        assert_eq!(state.bot(0).unwrap().hp, 1);

        assert!(apply_damage_to_bot(&mut state, 0, 1, Some(1)));
        assert!(state.bot(0).is_none());
        assert_eq!(state.player(1).unwrap().energy, 2);

        assert!(!apply_damage_to_bot(&mut state, 0, 1, Some(1)));
    }

    #[test]
    fn test_melee_hits_player_in_range() {
        let mut state = state_with(&[
            (1, PlayerClass::Warrior, 100.0, 100.0),
            (2, PlayerClass::Warrior, 150.0, 100.0),
        ]);

        let hit = melee_attack(&mut state, 1, (1.0, 0.0));

        assert_eq!(hit, Some(Target::Player(2)));
        assert_eq!(state.player(2).unwrap().hp, 8);
        assert_eq!(state.player(1).unwrap().energy, 1);
    }

    #[test]
    fn test_melee_out_of_range_misses() {
        let mut state = state_with(&[
            (1, PlayerClass::Warrior, 100.0, 100.0),
            (2, PlayerClass::Warrior, 161.0, 100.0),
        ]);

        assert_eq!(melee_attack(&mut state, 1, (1.0, 0.0)), None);
        assert_eq!(state.player(2).unwrap().hp, 9);
        assert_eq!(state.player(1).unwrap().energy, 0);
    }

    #[test]
    fn test_melee_exact_range_hits() {
        let mut state = state_with(&[
            (1, PlayerClass::Warrior, 100.0, 100.0),
            (2, PlayerClass::Warrior, 160.0, 100.0),
        ]);

        assert_eq!(melee_attack(&mut state, 1, (0.0, 0.0)), Some(Target::Player(2)));
    }

    #[test]
    fn test_melee_picks_first_in_order_not_nearest() {
        let mut state = state_with(&[
            (1, PlayerClass::Warrior, 100.0, 100.0),
            (2, PlayerClass::Warrior, 155.0, 100.0),
            (3, PlayerClass::Warrior, 110.0, 100.0),
        ]);
        state.insert_bot(Bot::new(0, 101.0, 100.0));

        // Player 3 and the bot are closer, but player 2 spawned first.
        assert_eq!(melee_attack(&mut state, 1, (1.0, 0.0)), Some(Target::Player(2)));
        assert_eq!(state.player(3).unwrap().hp, 9);
        assert_eq!(state.bot(0).unwrap().hp, 2);
    }

    #[test]
    fn test_melee_players_before_bots() {
        let mut state = state_with(&[
            (1, PlayerClass::Warrior, 100.0, 100.0),
            (2, PlayerClass::Warrior, 150.0, 100.0),
        ]);
        state.insert_bot(Bot::new(0, 105.0, 100.0));

        assert_eq!(melee_attack(&mut state, 1, (0.0, 1.0)), Some(Target::Player(2)));
    }

    #[test]
    fn test_melee_falls_through_to_bot() {
        let mut state = state_with(&[
            (1, PlayerClass::Warrior, 100.0, 100.0),
            (2, PlayerClass::Warrior, 900.0, 600.0),
        ]);
        state.insert_bot(Bot::new(0, 300.0, 300.0));
        state.insert_bot(Bot::new(1, 120.0, 120.0));

        assert_eq!(melee_attack(&mut state, 1, (0.0, 1.0)), Some(Target::Bot(1)));
        assert_eq!(state.bot(1).unwrap().hp, 1);
    }

    #[test]
    fn test_melee_missing_attacker_is_noop() {
        let mut state = state_with(&[(2, PlayerClass::Warrior, 150.0, 100.0)]);

        assert_eq!(melee_attack(&mut state, 1, (1.0, 0.0)), None);
        assert_eq!(state.player(2).unwrap().hp, 9);
    }

    #[test]
    fn test_whirlwind_hits_everything_in_radius_once() {
        let mut state = state_with(&[
            (1, PlayerClass::Warrior, 400.0, 400.0),
            (2, PlayerClass::Mage, 470.0, 400.0),
            (3, PlayerClass::Cleric, 400.0, 330.0),
            (4, PlayerClass::Guardian, 500.0, 400.0),
        ]);
        state.insert_bot(Bot::new(0, 350.0, 400.0));
        state.insert_bot(Bot::new(1, 600.0, 600.0));

        let hits = skill_whirlwind(&mut state, 1);

        assert_eq!(
            hits,
            vec![Target::Player(2), Target::Player(3), Target::Bot(0)]
        );
        assert_eq!(state.player(2).unwrap().hp, 7);
        assert_eq!(state.player(3).unwrap().hp, 8);
        assert_eq!(state.player(4).unwrap().hp, 11);
        assert_eq!(state.bot(0).unwrap().hp, 1);
        assert_eq!(state.bot(1).unwrap().hp, 2);
        assert_eq!(state.player(1).unwrap().energy, 3);
        assert_invariants(&state);
    }

    #[test]
    fn test_whirlwind_radius_edge_is_inclusive() {
        let mut state = state_with(&[
            (1, PlayerClass::Warrior, 400.0, 400.0),
            (2, PlayerClass::Mage, 480.0, 400.0),
            (3, PlayerClass::Cleric, 319.99, 400.0),
        ]);
        state.insert_bot(Bot::new(0, 400.0, 480.0));
        state.insert_bot(Bot::new(1, 400.0, 319.99));

        let hits = skill_whirlwind(&mut state, 1);

        assert_eq!(hits, vec![Target::Player(2), Target::Bot(0)]);
        assert_eq!(state.player(3).unwrap().hp, 9);
        assert_eq!(state.bot(1).unwrap().hp, 2);
    }

    #[test]
    fn test_whirlwind_kills_and_respects_shields() {
        let mut state = state_with(&[
            (1, PlayerClass::Warrior, 400.0, 400.0),
            (2, PlayerClass::Mage, 420.0, 400.0),
            (3, PlayerClass::Guardian, 380.0, 400.0),
        ]);
        state.player_mut(2).unwrap().hp = 1;
        skill_shield(&mut state, 3);

        skill_whirlwind(&mut state, 1);

        assert!(state.player(2).is_none());
        let guardian = state.player(3).unwrap();
        assert_eq!(guardian.hp, 11);
        assert_eq!(guardian.shield, 0);
        assert_eq!(state.player(1).unwrap().energy, 1);
    }

    #[test]
    fn test_fireball_hits_nearest_along_axis() {
        let mut state = state_with(&[
            (1, PlayerClass::Mage, 100.0, 400.0),
            (3, PlayerClass::Warrior, 300.0, 410.0),
            (2, PlayerClass::Warrior, 200.0, 390.0),
        ]);

        let hit = skill_fireball(&mut state, 1, (50.0, 0.0));

        assert_eq!(hit, Some(Target::Player(2)));
        assert_eq!(state.player(2).unwrap().hp, 8);
        assert_eq!(state.player(3).unwrap().hp, 9);
    }

    #[test]
    fn test_fireball_ignores_targets_behind_or_outside_cone() {
        let state = state_with(&[
            (1, PlayerClass::Mage, 400.0, 400.0),
            (2, PlayerClass::Warrior, 350.0, 400.0),
            (3, PlayerClass::Warrior, 500.0, 430.0),
            (4, PlayerClass::Warrior, 721.0, 400.0),
        ]);

        assert_eq!(fireball_target(&state, 1, (1.0, 0.0)), None);
    }

    #[test]
    fn test_fireball_cone_edges_are_inclusive() {
        let mut state = state_with(&[
            (1, PlayerClass::Mage, 100.0, 400.0),
            (2, PlayerClass::Warrior, 420.0, 400.0),
        ]);
        assert_eq!(fireball_target(&state, 1, (1.0, 0.0)), Some(Target::Player(2)));

        state.player_mut(2).unwrap().x = 300.0;
        state.player_mut(2).unwrap().y = 428.0;
        assert_eq!(fireball_target(&state, 1, (1.0, 0.0)), Some(Target::Player(2)));
    }

    #[test]
    fn test_fireball_tie_prefers_players_then_order() {
        let mut state = state_with(&[
            (1, PlayerClass::Mage, 100.0, 400.0),
            (2, PlayerClass::Warrior, 200.0, 410.0),
            (3, PlayerClass::Warrior, 200.0, 390.0),
        ]);
        state.insert_bot(Bot::new(0, 200.0, 400.0));

        assert_eq!(fireball_target(&state, 1, (1.0, 0.0)), Some(Target::Player(2)));
    }

    #[test]
    fn test_fireball_with_huge_aim_keeps_its_cone() {
        let mut state = state_with(&[
            (1, PlayerClass::Mage, 100.0, 100.0),
            (2, PlayerClass::Warrior, 1100.0, 700.0),
        ]);
        fill_energy(&mut state, 1);

        state.skill(1, -3.0e38, -3.0e38);

        assert_eq!(state.player(2).unwrap().hp, 9);
        assert_eq!(state.player(1).unwrap().energy, 0);
        let notifications = state.drain_notifications();
        match notifications.last().map(|n| &n.packet) {
            Some(Packet::SkillEffect {
                effect: SkillEffect::Fireball { ux, uy },
                ..
            }) => {
                assert_approx_eq!(*ux, -std::f32::consts::FRAC_1_SQRT_2, 0.0001);
                assert_approx_eq!(*uy, -std::f32::consts::FRAC_1_SQRT_2, 0.0001);
            }
            other => panic!("Unexpected packet {:?}", other),
        }
    }

    #[test]
    fn test_fireball_with_huge_aim_still_hits_along_axis() {
        let mut state = state_with(&[
            (1, PlayerClass::Mage, 100.0, 400.0),
            (2, PlayerClass::Warrior, 300.0, 400.0),
        ]);

        assert_eq!(
            skill_fireball(&mut state, 1, (f32::MAX, 0.0)),
            Some(Target::Player(2))
        );
        assert_eq!(state.player(2).unwrap().hp, 8);
    }

    #[test]
    fn test_fireball_can_hit_bot() {
        let mut state = state_with(&[(1, PlayerClass::Mage, 100.0, 100.0)]);
        state.insert_bot(Bot::new(0, 100.0, 300.0));

        assert_eq!(skill_fireball(&mut state, 1, (0.0, 5.0)), Some(Target::Bot(0)));
        assert_eq!(state.bot(0).unwrap().hp, 1);
    }

    #[test]
    fn test_heal_is_capped() {
        let mut state = state_with(&[(1, PlayerClass::Cleric, 100.0, 100.0)]);

        state.player_mut(1).unwrap().hp = 4;
        skill_heal(&mut state, 1);
        assert_eq!(state.player(1).unwrap().hp, 7);

        skill_heal(&mut state, 1);
        assert_eq!(state.player(1).unwrap().hp, 9);
    }

    #[test]
    fn test_cast_skill_requires_full_energy() {
        let mut state = state_with(&[(1, PlayerClass::Guardian, 100.0, 100.0)]);
        state.player_mut(1).unwrap().energy = 2;

        assert!(!cast_skill(&mut state, 1, (1.0, 0.0)));

        let guardian = state.player(1).unwrap();
        assert_eq!(guardian.shield, 0);
        assert_eq!(guardian.energy, 2);
        assert!(state.drain_notifications().is_empty());
    }

    #[test]
    fn test_cast_skill_spends_energy_even_on_miss() {
        let mut state = state_with(&[(1, PlayerClass::Warrior, 100.0, 100.0)]);
        fill_energy(&mut state, 1);

        assert!(cast_skill(&mut state, 1, (1.0, 0.0)));
        assert_eq!(state.player(1).unwrap().energy, 0);

        let notifications = state.drain_notifications();
        assert!(matches!(
            notifications[0].packet,
            Packet::SkillEffect {
                id: 1,
                effect: SkillEffect::Whirlwind
            }
        ));
    }

    #[test]
    fn test_cast_whirlwind_resets_energy_after_hits() {
        let mut state = state_with(&[
            (1, PlayerClass::Warrior, 100.0, 100.0),
            (2, PlayerClass::Mage, 130.0, 100.0),
        ]);
        fill_energy(&mut state, 1);

        assert!(cast_skill(&mut state, 1, (0.0, 0.0)));
        assert_eq!(state.player(2).unwrap().hp, 7);
        assert_eq!(state.player(1).unwrap().energy, 0);
    }

    #[test]
    fn test_mage_fireball_scenario() {
        let mut state = state_with(&[
            (1, PlayerClass::Mage, 200.0, 400.0),
            (2, PlayerClass::Warrior, 300.0, 400.0),
            (3, PlayerClass::Warrior, 400.0, 400.0),
        ]);
        fill_energy(&mut state, 1);

        assert!(cast_skill(&mut state, 1, (100.0, 0.0)));

        assert_eq!(state.player(2).unwrap().hp, 8);
        assert_eq!(state.player(3).unwrap().hp, 9);
        assert_eq!(state.player(1).unwrap().energy, 0);

        let notifications = state.drain_notifications();
        match notifications.last().map(|n| &n.packet) {
            Some(Packet::SkillEffect {
                id: 1,
                effect: SkillEffect::Fireball { ux, uy },
            }) => {
                assert_eq!(*ux, 1.0);
                assert_eq!(*uy, 0.0);
            }
            other => panic!("Unexpected packet {:?}", other),
        }
    }

    #[test]
    fn test_guardian_shield_scenario() {
        let mut state = state_with(&[(4, PlayerClass::Guardian, 100.0, 100.0)]);
        fill_energy(&mut state, 4);

        assert!(cast_skill(&mut state, 4, (0.0, 0.0)));
        assert_eq!(state.player(4).unwrap().shield, 1);

        apply_damage_to_player(&mut state, 4, 1, None);
        let guardian = state.player(4).unwrap();
        assert_eq!(guardian.hp, 11);
        assert_eq!(guardian.shield, 0);
    }

    #[test]
    fn test_cleric_heal_cast() {
        let mut state = state_with(&[(5, PlayerClass::Cleric, 100.0, 100.0)]);
        fill_energy(&mut state, 5);
        state.player_mut(5).unwrap().hp = 2;

        assert!(cast_skill(&mut state, 5, (0.0, 0.0)));

        let cleric = state.player(5).unwrap();
        assert_eq!(cleric.hp, 5);
        assert_eq!(cleric.energy, 0);
    }
}
