//! Wave/level director
//!
//! Owns every level-progression counter in one `LevelDirectorState`:
//! display score, progress score, boss sequencing and spawn cadence.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{BossKind, EnemyKind, Entity, PowerUpKind, Variant};
use super::events::GameEvent;
use super::state::GameState;
use crate::consts::*;
use crate::{Settings, SimError};

/// Progress needed past the level baseline before the boss appears
pub const BOSS_PROGRESS: u64 = 20;
/// Progress baseline width of one level
pub const LEVEL_PROGRESS: u64 = 100;

/// Background identifier, one per level (cycling)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backdrop {
    #[default]
    Green,
    Red,
    Blue,
    Purple,
}

impl Backdrop {
    pub fn for_level(level: usize) -> Self {
        match level % 4 {
            0 => Backdrop::Green,
            1 => Backdrop::Red,
            2 => Backdrop::Blue,
            _ => Backdrop::Purple,
        }
    }
}

/// Boss lifecycle within a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossStage {
    /// Progress still below the threshold
    Waiting,
    /// Boss spawned and alive
    Fight,
}

/// Composition quota for one level: (enemy kind, weight)
pub type WaveQuota = &'static [(EnemyKind, u32)];

/// Per-level wave quotas; later levels reuse the last entry
pub const LEVELS: [WaveQuota; 4] = [
    &[
        (EnemyKind::Spider, 3),
        (EnemyKind::Shooter, 2),
        (EnemyKind::Shield, 1),
    ],
    &[
        (EnemyKind::Spider, 2),
        (EnemyKind::Shooter, 2),
        (EnemyKind::Bomb, 2),
        (EnemyKind::Shield, 1),
    ],
    &[
        (EnemyKind::Spider, 2),
        (EnemyKind::Shooter, 3),
        (EnemyKind::Bomb, 2),
        (EnemyKind::Shield, 2),
    ],
    &[
        (EnemyKind::Spider, 3),
        (EnemyKind::Shooter, 3),
        (EnemyKind::Bomb, 3),
        (EnemyKind::Shield, 2),
    ],
];

pub fn quota_for(level: usize) -> WaveQuota {
    LEVELS[level.min(LEVELS.len() - 1)]
}

/// Flatten a quota into a uniform spawn pool
pub fn wave_pool(quota: WaveQuota) -> Vec<EnemyKind> {
    quota
        .iter()
        .flat_map(|&(kind, count)| std::iter::repeat_n(kind, count as usize))
        .collect()
}

/// Power-ups available at `level`
pub fn unlocked_power_ups(level: usize) -> &'static [PowerUpKind] {
    &PowerUpKind::ALL[..(2 + level).min(PowerUpKind::ALL.len())]
}

/// Level progression counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDirectorState {
    pub level: usize,
    /// Cycles through `BossKind::ROSTER`
    pub boss_index: usize,
    /// Displayed score
    pub score: u64,
    /// Drives boss/level transitions
    pub progress: u64,
    /// Progress restored at level start
    pub checkpoint: u64,
    pub boss_stage: BossStage,
    pub enemy_counter: f32,
    pub power_up_counter: u32,
    pub backdrop: Backdrop,
    /// Highest level reached this session
    pub unlocked_level: usize,
}

impl LevelDirectorState {
    pub fn new(level: usize, settings: &Settings) -> Self {
        let checkpoint = level as u64 * LEVEL_PROGRESS;
        Self {
            level,
            boss_index: level,
            score: 0,
            progress: checkpoint,
            checkpoint,
            boss_stage: BossStage::Waiting,
            enemy_counter: settings.initial_enemy_counter,
            power_up_counter: 0,
            backdrop: Backdrop::for_level(level),
            unlocked_level: level,
        }
    }

    /// Progress at which the boss spawns
    #[inline]
    pub fn threshold(&self) -> u64 {
        self.level as u64 * LEVEL_PROGRESS + BOSS_PROGRESS
    }

    /// Account for one kill. Boss kills add `boss_bonus` to the display score only.
    pub fn record_kill(&mut self, variant: Variant, boss_bonus: u64) {
        self.score += 1;
        self.progress += 1;
        if variant.is_boss() {
            self.score += boss_bonus;
        }
    }

    /// Per-tick enemy counter increment
    pub fn spawn_increment(&self, settings: &Settings) -> f32 {
        let ramp = &settings.ramp;
        let mut increment = 1.0 + self.level as f32 * ramp.per_level;
        if self.boss_index >= ramp.late_game_boss_index {
            increment *= 1.0 + ramp.log_scale * (1.0 + self.score as f32).ln();
        }
        increment
    }

    /// True exactly once per level: on the tick progress reaches the threshold
    pub fn boss_due(&self) -> bool {
        self.boss_stage == BossStage::Waiting && self.progress >= self.threshold()
    }
}

/// Spawn bosses, enemies and power-ups for this tick
pub fn step(state: &mut GameState, events: &mut Vec<GameEvent>) -> Result<(), SimError> {
    let settings = &state.settings;
    let director = &mut state.director;

    if director.boss_due() {
        let kind = BossKind::from_index(director.boss_index % BossKind::ROSTER.len())?;
        let lives =
            settings.boss_base_lives + settings.boss_lives_per_level * director.level as i32;
        let boss = Entity::boss(state.ids.next_id(), kind, lives);
        director.boss_stage = BossStage::Fight;
        events.push(GameEvent::BossSpawned {
            kind,
            level: director.level,
        });
        log::info!(
            "Boss {:?} spawned on level {} ({} lives)",
            kind,
            director.level,
            lives
        );
        state.enemies.push(boss);
    }

    if director.enemy_counter > settings.enemy_spawn_threshold {
        director.enemy_counter = 0.0;
        let pool = wave_pool(quota_for(director.level));
        if !pool.is_empty() {
            let kind = pool[state.rng.random_range(0..pool.len())];
            let x = state.rng.random_range(0.0..SCREEN_WIDTH);
            let y = if kind == EnemyKind::Shield {
                SHIELD_SPAWN_Y
            } else {
                ENEMY_SPAWN_Y
            };
            let enemy = Entity::enemy(
                state.ids.next_id(),
                kind,
                Vec2::new(x, y),
                settings.enemy_lives,
            );
            log::trace!("Spawned {:?} #{} at x={:.0}", kind, enemy.id, x);
            state.enemies.push(enemy);
        }
    } else {
        director.enemy_counter += director.spawn_increment(settings);
    }

    if director.power_up_counter > settings.power_up_spawn_threshold {
        director.power_up_counter = 0;
        let unlocked = unlocked_power_ups(director.level);
        let kind = unlocked[state.rng.random_range(0..unlocked.len())];
        let x = state.rng.random_range(0.0..SCREEN_WIDTH);
        let power_up = Entity::power_up(state.ids.next_id(), Vec2::new(x, ENEMY_SPAWN_Y), kind);
        log::trace!("Spawned {:?} power-up at x={:.0}", kind, x);
        state.power_ups.push(power_up);
    } else {
        director.power_up_counter += 1;
    }

    Ok(())
}

/// Boss down: move to the next level
pub fn advance_level(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let director = &mut state.director;
    director.level += 1;
    director.boss_index += 1;
    director.unlocked_level = director.unlocked_level.max(director.level);
    director.checkpoint = director.level as u64 * LEVEL_PROGRESS;
    director.progress = director.checkpoint;
    director.boss_stage = BossStage::Waiting;
    director.backdrop = Backdrop::for_level(director.level);

    state.enemies.clear();
    state.enemy_lasers.clear();

    events.push(GameEvent::LevelAdvanced {
        level: director.level,
    });
    log::info!(
        "Level {} reached ({:?}, score {})",
        director.level,
        director.backdrop,
        director.score
    );
}
