//! Collision resolver
//!
//! Runs once per tick after movement. Each pair category is checked in a fixed
//! order; entities are only marked dead while checking and the collections are
//! compacted once at the end of the pass.

use super::behavior::DeathEffects;
use super::director;
use super::entity::{Entity, EntityData};
use super::events::GameEvent;
use super::state::GameState;

/// Damage `enemy` by one unit through its behavior
fn hit_enemy(enemy: &mut Entity, events: &mut Vec<GameEvent>, killed: &mut Vec<Entity>) {
    let variant = enemy.variant();
    events.push(GameEvent::EnemyDamaged {
        id: enemy.id,
        variant,
    });
    if variant.behavior().on_collision(enemy) {
        killed.push(enemy.clone());
    }
}

#[inline]
fn damage_gate_open(state: &GameState) -> bool {
    state.damage_cooldown == 0 && state.player.alive
}

/// Resolve every collision for this tick
pub fn resolve(state: &mut GameState, events: &mut Vec<GameEvent>) {
    // Snapshots of enemies killed this pass, taken before compaction
    let mut killed: Vec<Entity> = Vec::new();
    let mut player_damaged = false;

    // Player vs enemies (melee): one unit each way
    if damage_gate_open(state) {
        let player = &state.player;
        let hit = state
            .enemies
            .iter()
            .position(|e| e.alive && e.overlaps(player));
        if let Some(idx) = hit {
            state.damage_player(events);
            player_damaged = true;
            hit_enemy(&mut state.enemies[idx], events, &mut killed);
        }
    }

    // Enemies vs player lasers: a laser is spent on its first hit
    for enemy in state.enemies.iter_mut() {
        for laser in state.lasers.iter_mut() {
            if !enemy.alive {
                break;
            }
            if !laser.alive || !enemy.overlaps(laser) {
                continue;
            }
            laser.variant().behavior().on_collision(laser);
            hit_enemy(enemy, events, &mut killed);
        }
    }

    // Enemies vs explosions: each explosion damages a given enemy at most once
    for explosion in state.explosions.iter_mut().filter(|x| !x.expired()) {
        for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
            if explosion.has_hit(enemy.id) || !explosion.overlaps(enemy) {
                continue;
            }
            explosion.register_hit(enemy.id);
            hit_enemy(enemy, events, &mut killed);
        }
    }

    // Player vs explosions
    if damage_gate_open(state) {
        let player = &state.player;
        let player_id = player.id;
        let hit = state
            .explosions
            .iter_mut()
            .find(|x| !x.expired() && !x.has_hit(player_id) && x.overlaps(player));
        if let Some(explosion) = hit {
            explosion.register_hit(player_id);
            state.damage_player(events);
            player_damaged = true;
        }
    }

    // Player vs enemy lasers
    if damage_gate_open(state) {
        let player = &state.player;
        let hit = state
            .enemy_lasers
            .iter_mut()
            .find(|l| l.alive && l.overlaps(player));
        if let Some(laser) = hit {
            laser.variant().behavior().on_collision(laser);
            state.damage_player(events);
            player_damaged = true;
        }
    }

    if !player_damaged {
        state.damage_cooldown = state.damage_cooldown.saturating_sub(1);
    }

    // Player vs power-ups (never gated)
    if state.player.alive {
        let mut collected = Vec::new();
        for power_up in state.power_ups.iter_mut() {
            if !power_up.alive || !power_up.overlaps(&state.player) {
                continue;
            }
            if let EntityData::PowerUp { kind } = power_up.data {
                power_up.variant().behavior().on_collision(power_up);
                collected.push(kind);
            }
        }
        for kind in collected {
            state.apply_power_up(kind, events);
        }
    }

    // Death side effects
    let boss_killed = {
        let mut fx = DeathEffects::new(&mut state.ids, state.settings.explosion_duration_ticks);
        for entity in &killed {
            let variant = entity.variant();
            variant.behavior().on_death(entity, &mut fx);
            state.director.record_kill(variant, state.settings.boss_bonus);
            events.push(GameEvent::EnemyKilled {
                id: entity.id,
                variant,
                pos: entity.pos,
            });
            log::debug!("{} #{} destroyed", variant.as_str(), entity.id);
        }
        let DeathEffects {
            explosions,
            released,
            boss_killed,
            ..
        } = fx;
        state.explosions.extend(explosions);
        for target in released {
            if let Some(enemy) = state.enemies.iter_mut().find(|e| e.id == target) {
                enemy.shielded = false;
            }
        }
        boss_killed
    };

    // Compact
    state.explosions.retain(|x| !x.expired());
    state.enemies.retain(|e| e.alive);
    state.lasers.retain(|l| l.alive);
    state.enemy_lasers.retain(|l| l.alive);
    state.power_ups.retain(|p| p.alive);

    if let Some(kind) = boss_killed {
        log::info!("Boss {:?} defeated", kind);
        director::advance_level(state, events);
    }
}
