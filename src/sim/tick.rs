//! Fixed timestep simulation tick
//!
//! One call advances the session by one step:
//! player update -> collision -> spawn -> entity updates -> garbage collection.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::behavior::{AdvanceContext, TargetInfo, advance_all};
use super::collision;
use super::director;
use super::entity::{Entity, EntityData};
use super::events::{FrameEvents, GameEvent};
use super::menu;
use super::state::{GamePhase, GameState};
use crate::SimError;

/// Input snapshot for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    /// Special action (edge-triggered)
    pub bomb: bool,
    /// Menu selection (edge-triggered)
    pub select: bool,
}

/// Advance the game state by one step of `dt` milliseconds.
///
/// `dt == 0` leaves the state untouched and only reports the current frame.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Result<FrameEvents, SimError> {
    if !dt.is_finite() || dt < 0.0 {
        return Err(SimError::InvalidTimestep(dt));
    }

    let mut frame = FrameEvents::default();
    if dt > 0.0 {
        state.time_ticks += 1;
        match state.phase {
            GamePhase::Menu | GamePhase::LevelSelect => {
                menu::step(state, input, dt, &mut frame.events, &mut frame.sounds)?
            }
            GamePhase::Playing => play(state, input, dt, &mut frame)?,
            GamePhase::Quit => {}
        }
    }

    frame.quit = state.phase == GamePhase::Quit;
    frame.backdrop = state.director.backdrop;
    frame.renderables = state.renderables();
    frame.hud = state.hud();
    Ok(frame)
}

fn play(
    state: &mut GameState,
    input: &TickInput,
    dt: f32,
    frame: &mut FrameEvents,
) -> Result<(), SimError> {
    // Player
    let mut no_targets: [TargetInfo; 0] = [];
    let mut ctx = AdvanceContext::new(
        input,
        state.player.pos,
        &mut no_targets,
        &mut state.rng,
        &mut state.ids,
        &state.settings,
    );
    let player = &mut state.player;
    player.variant().behavior().advance(player, dt, &mut ctx);
    let AdvanceContext { spawned, cues, .. } = ctx;
    route_spawned(state, spawned);
    frame.sounds.extend(cues);

    collision::resolve(state, &mut frame.events);

    if !state.player.alive {
        let score = state.director.score;
        frame.events.push(GameEvent::PlayerDied { score });
        log::info!("Player died on level {} (score {})", state.director.level, score);
        state.enter_menu();
        return Ok(());
    }

    director::step(state, &mut frame.events)?;

    // Everything else, against a snapshot of the live enemies
    let mut targets: Vec<TargetInfo> = state.live_enemies().map(TargetInfo::from).collect();
    let mut ctx = AdvanceContext::new(
        input,
        state.player.pos,
        &mut targets,
        &mut state.rng,
        &mut state.ids,
        &state.settings,
    );
    advance_all(&mut state.enemies, dt, &mut ctx);
    advance_all(&mut state.lasers, dt, &mut ctx);
    advance_all(&mut state.enemy_lasers, dt, &mut ctx);
    advance_all(&mut state.power_ups, dt, &mut ctx);
    advance_all(&mut state.explosions, dt, &mut ctx);
    if let Some(overlay) = state.player_shield.as_mut() {
        overlay.variant().behavior().advance(overlay, dt, &mut ctx);
    }
    let AdvanceContext {
        spawned,
        claims,
        cues,
        ..
    } = ctx;

    for enemy in state.enemies.iter_mut() {
        if claims.contains(&enemy.id) {
            enemy.shielded = true;
        }
    }
    enforce_exclusive_shields(state);
    route_spawned(state, spawned);
    frame.sounds.extend(cues);

    collect_garbage(state);
    Ok(())
}

/// File entities created by behaviors into their collections
fn route_spawned(state: &mut GameState, spawned: Vec<Entity>) {
    for entity in spawned {
        match entity.data {
            EntityData::Laser { hostile: true } => state.enemy_lasers.push(entity),
            EntityData::Laser { hostile: false } => state.lasers.push(entity),
            EntityData::Explosion { .. } => state.explosions.push(entity),
            _ => state.enemies.push(entity),
        }
    }
}

/// A protected enemy must have exactly one shield. Violations abort debug
/// builds and are repaired in release builds.
fn enforce_exclusive_shields(state: &mut GameState) {
    let mut claimed = BTreeSet::new();
    let mut duplicates = Vec::new();
    for shield in &state.enemies {
        if let Some(target) = shield.shield_target()
            && !claimed.insert(target)
        {
            duplicates.push(shield.id);
        }
    }

    debug_assert!(
        duplicates.is_empty(),
        "shields {:?} share a protected enemy",
        duplicates
    );
    if !duplicates.is_empty() {
        log::error!(
            "Shields {:?} share a protected enemy, releasing them",
            duplicates
        );
    }

    for enemy in state.enemies.iter_mut() {
        if duplicates.contains(&enemy.id) {
            enemy.data = EntityData::Shield { target: None };
        }
        // Flags left behind by a vanished shield
        if enemy.shielded && !claimed.contains(&enemy.id) {
            enemy.shielded = false;
        }
    }
}

/// Drop dead entities and anything that left the playfield. Bosses stay.
fn collect_garbage(state: &mut GameState) {
    let mut released = Vec::new();
    state.enemies.retain(|e| {
        let keep = e.alive && (e.variant().is_boss() || !e.bounds().outside_playfield());
        if !keep && let Some(target) = e.shield_target() {
            released.push(target);
        }
        keep
    });
    for enemy in state.enemies.iter_mut() {
        if released.contains(&enemy.id) {
            enemy.shielded = false;
        }
    }

    for list in [
        &mut state.lasers,
        &mut state.enemy_lasers,
        &mut state.power_ups,
    ] {
        list.retain(|e| e.alive && !e.bounds().outside_playfield());
    }
    state.explosions.retain(|x| !x.expired());
}
