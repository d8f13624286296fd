//! Game state and session lifecycle
//!
//! The World's entity collections, RNG and director all live here. Every
//! mutation happens inside a tick (or a phase transition triggered by one).

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::director::LevelDirectorState;
use super::entity::{Entity, PowerUpKind, Variant};
use super::events::{GameEvent, HudState, Renderable};
use super::menu;
use crate::{Settings, SimError};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title menu (Play / Levels / Quit blocks)
    Menu,
    /// One block per unlocked level
    LevelSelect,
    /// Active gameplay
    Playing,
    /// Loop should stop
    Quit,
}

/// Monotonic entity id source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Reserve `count` consecutive ids, returning the first
    pub fn reserve(&mut self, count: u32) -> u32 {
        let first = self.next;
        self.next += count;
        first
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub settings: Settings,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Entity,
    /// Overlay granted by the shield power-up
    pub player_shield: Option<Entity>,
    pub enemies: Vec<Entity>,
    /// Player projectiles
    pub lasers: Vec<Entity>,
    pub enemy_lasers: Vec<Entity>,
    pub power_ups: Vec<Entity>,
    pub explosions: Vec<Entity>,
    pub menu_blocks: Vec<Entity>,
    pub director: LevelDirectorState,
    /// Shared gate for every player-damage source
    pub damage_cooldown: u32,
    /// Select input on the previous tick (menu activation is edge-triggered)
    pub select_held: bool,
    pub ids: IdAllocator,
}

impl GameState {
    /// Create a session sitting at the title menu
    pub fn new(settings: Settings) -> Result<Self, SimError> {
        settings.validate()?;
        let mut ids = IdAllocator::default();
        let player = Entity::player(ids.next_id(), settings.player_lives, settings.starting_bombs);
        let mut state = Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            director: LevelDirectorState::new(0, &settings),
            settings,
            phase: GamePhase::Menu,
            time_ticks: 0,
            player,
            player_shield: None,
            enemies: Vec::new(),
            lasers: Vec::new(),
            enemy_lasers: Vec::new(),
            power_ups: Vec::new(),
            explosions: Vec::new(),
            menu_blocks: Vec::new(),
            damage_cooldown: 0,
            select_held: false,
            ids,
        };
        state.enter_menu();
        Ok(state)
    }

    /// Drop every transient entity and hand out a fresh ship
    pub fn reset_field(&mut self) {
        self.enemies.clear();
        self.lasers.clear();
        self.enemy_lasers.clear();
        self.power_ups.clear();
        self.explosions.clear();
        self.menu_blocks.clear();
        self.player_shield = None;
        self.damage_cooldown = 0;
        self.player = Entity::player(
            self.ids.next_id(),
            self.settings.player_lives,
            self.settings.starting_bombs,
        );
    }

    pub fn enter_menu(&mut self) {
        self.reset_field();
        self.menu_blocks = menu::main_menu(&mut self.ids);
        self.phase = GamePhase::Menu;
        log::info!("Entered menu");
    }

    pub fn enter_level_select(&mut self) {
        self.reset_field();
        self.menu_blocks = menu::level_select(&mut self.ids, self.director.unlocked_level);
        self.phase = GamePhase::LevelSelect;
        log::info!(
            "Entered level select (unlocked up to {})",
            self.director.unlocked_level
        );
    }

    /// Begin play at `level`, which must already be unlocked
    pub fn start_level(&mut self, level: usize) -> Result<(), SimError> {
        let unlocked = self.director.unlocked_level;
        if level > unlocked {
            return Err(SimError::LevelLocked {
                requested: level,
                unlocked,
            });
        }
        self.reset_field();
        self.director = LevelDirectorState::new(level, &self.settings);
        self.director.unlocked_level = unlocked;
        self.phase = GamePhase::Playing;
        log::info!("Starting level {} ({:?})", level, self.director.backdrop);
        Ok(())
    }

    /// Apply one cooldown-gated damage unit to the player (the caller checks the gate)
    pub fn damage_player(&mut self, events: &mut Vec<GameEvent>) {
        self.damage_cooldown = self.settings.damage_cooldown_ticks;

        if self.player_shield.take().is_some() {
            if let Some(data) = self.player.player_data_mut() {
                data.power_ups[PowerUpKind::Shield.slot()] = false;
            }
            events.push(GameEvent::ShieldAbsorbed);
            log::debug!("Shield absorbed a hit");
            return;
        }

        self.player.lives -= 1;
        if self.player.lives <= 0 {
            self.player.alive = false;
        }
        events.push(GameEvent::PlayerDamaged {
            lives: self.player.lives,
        });
        log::debug!("Player hit, {} lives left", self.player.lives);
    }

    /// Apply a collected power-up. Re-collecting an active shield does nothing.
    pub fn apply_power_up(&mut self, kind: PowerUpKind, events: &mut Vec<GameEvent>) {
        let player_pos = self.player.pos;
        let Some(data) = self.player.player_data_mut() else {
            return;
        };
        let already_active = data.has(kind);
        data.power_ups[kind.slot()] = true;
        match kind {
            PowerUpKind::Speed => data.speed_ticks = 0,
            PowerUpKind::Damage => {}
            PowerUpKind::Bomb => data.bombs += 1,
            PowerUpKind::Shield => {
                if !already_active && self.player_shield.is_none() {
                    let id = self.ids.next_id();
                    self.player_shield = Some(Entity::shield_overlay(id, player_pos));
                }
            }
        }
        events.push(GameEvent::PowerUpCollected { kind });
        log::debug!("Collected {:?} power-up", kind);
    }

    /// Live enemies, in id order of spawning
    pub fn live_enemies(&self) -> impl Iterator<Item = &Entity> {
        self.enemies.iter().filter(|e| e.alive)
    }

    pub fn hud(&self) -> HudState {
        let data = self.player.player_data();
        HudState {
            score: self.director.score,
            lives: self.player.lives,
            bombs: data.map(|d| d.bombs).unwrap_or(0),
            shield_active: data.is_some_and(|d| d.has(PowerUpKind::Shield)),
            level: self.director.level,
        }
    }

    /// Fresh draw list in paint order
    pub fn renderables(&self) -> Vec<Renderable> {
        let layers = [
            self.explosions.as_slice(),
            self.enemies.as_slice(),
            self.lasers.as_slice(),
            self.enemy_lasers.as_slice(),
            self.power_ups.as_slice(),
            self.menu_blocks.as_slice(),
        ];
        layers
            .into_iter()
            .flatten()
            .chain(std::iter::once(&self.player))
            .chain(self.player_shield.iter())
            .filter(|e| e.alive)
            .map(|e| Renderable {
                variant: e.variant(),
                pos: e.pos,
                size: e.size,
                rotation: e.rotation,
            })
            .collect()
    }

    /// Number of entities of a variant across every collection
    pub fn count_variant(&self, variant: Variant) -> usize {
        self.renderables()
            .iter()
            .filter(|r| r.variant == variant)
            .count()
    }

    /// Player center (convenience for tests and autopilots)
    pub fn player_pos(&self) -> Vec2 {
        self.player.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starts_in_menu() {
        let state = GameState::new(Settings::default()).unwrap();
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.menu_blocks.len(), 3);
        assert_eq!(state.player.lives, 3);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_invalid_settings_fail_fast() {
        let settings = Settings {
            player_lives: -1,
            ..Default::default()
        };
        assert!(matches!(
            GameState::new(settings),
            Err(SimError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_locked_level_rejected() {
        let mut state = GameState::new(Settings::default()).unwrap();
        assert!(matches!(
            state.start_level(2),
            Err(SimError::LevelLocked {
                requested: 2,
                unlocked: 0
            })
        ));
        assert!(state.start_level(0).is_ok());
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.menu_blocks.is_empty());
    }

    #[test]
    fn test_shield_power_up_is_idempotent() {
        let mut state = GameState::new(Settings::default()).unwrap();
        state.start_level(0).unwrap();
        let mut events = Vec::new();

        state.apply_power_up(PowerUpKind::Shield, &mut events);
        let first_id = state.player_shield.as_ref().map(|s| s.id);
        state.apply_power_up(PowerUpKind::Shield, &mut events);

        assert_eq!(state.player_shield.as_ref().map(|s| s.id), first_id);
        assert_eq!(state.count_variant(Variant::ShieldPowerUp), 1);
        assert!(state.hud().shield_active);
    }

    #[test]
    fn test_shield_absorbs_damage() {
        let mut state = GameState::new(Settings::default()).unwrap();
        state.start_level(0).unwrap();
        let mut events = Vec::new();
        state.apply_power_up(PowerUpKind::Shield, &mut events);

        state.damage_player(&mut events);
        assert_eq!(state.player.lives, 3);
        assert!(state.player_shield.is_none());
        assert!(!state.hud().shield_active);
        assert_eq!(state.damage_cooldown, 60);

        state.damage_player(&mut events);
        assert_eq!(state.player.lives, 2);
        assert!(events.contains(&GameEvent::ShieldAbsorbed));
        assert!(events.contains(&GameEvent::PlayerDamaged { lives: 2 }));
    }

    #[test]
    fn test_bomb_power_up_adds_bomb() {
        let mut state = GameState::new(Settings::default()).unwrap();
        let mut events = Vec::new();
        state.apply_power_up(PowerUpKind::Bomb, &mut events);
        state.apply_power_up(PowerUpKind::Bomb, &mut events);
        assert_eq!(state.hud().bombs, 3);
    }

    #[test]
    fn test_renderables_paint_order() {
        let mut state = GameState::new(Settings::default()).unwrap();
        state.start_level(0).unwrap();
        let mut events = Vec::new();
        state.apply_power_up(PowerUpKind::Shield, &mut events);
        let id = state.ids.next_id();
        state.explosions.push(Entity::explosion(
            id,
            Vec2::new(320.0, 100.0),
            Vec2::splat(60.0),
            50,
        ));

        let order: Vec<Variant> = state.renderables().iter().map(|r| r.variant).collect();
        assert_eq!(
            order,
            vec![Variant::Explosion, Variant::Player, Variant::ShieldPowerUp]
        );
    }
}
