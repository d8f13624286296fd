//! Game settings and balance tuning
//!
//! Loaded from an optional JSON file; every field has a default so partial
//! files are accepted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::SimError;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Starting lives for this preset
    pub fn lives(&self) -> i32 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Normal => 3,
            Difficulty::Hard => 2,
        }
    }

    /// Per-level growth of the enemy spawn rate
    pub fn ramp_per_level(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.15,
            Difficulty::Normal => 0.25,
            Difficulty::Hard => 0.4,
        }
    }
}

/// Shield enemy tracking thresholds (pixels)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShieldTuning {
    /// Horizontal distance within which the shield snaps onto its target
    pub dead_band: f32,
    /// Preferred vertical gap below the target
    pub hold_distance: f32,
    /// Beyond this gap the shield closes in at full speed
    pub far_distance: f32,
}

impl Default for ShieldTuning {
    fn default() -> Self {
        Self {
            dead_band: 5.0,
            hold_distance: 50.0,
            far_distance: 200.0,
        }
    }
}

/// Enemy spawn rate growth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyRamp {
    /// Added to the per-tick spawn increment for every level index
    pub per_level: f32,
    /// Boss index from which the score-based multiplier applies
    pub late_game_boss_index: usize,
    /// Multiplier slope: `1 + log_scale * ln(1 + score)`
    pub log_scale: f32,
}

impl Default for DifficultyRamp {
    fn default() -> Self {
        Self {
            per_level: Difficulty::Normal.ramp_per_level(),
            late_game_boss_index: 4,
            log_scale: 0.1,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Run seed for reproducibility
    pub seed: u64,

    // === Player ===
    pub player_lives: i32,
    pub starting_bombs: u32,
    /// Ticks between player-damaging events
    pub damage_cooldown_ticks: u32,
    /// Ticks between player volleys while fire is held
    pub player_shot_cooldown_ticks: u32,

    // === Spawning ===
    pub enemy_spawn_threshold: f32,
    pub initial_enemy_counter: f32,
    pub power_up_spawn_threshold: u32,
    pub ramp: DifficultyRamp,

    // === Combat ===
    pub explosion_duration_ticks: u32,
    pub enemy_lives: i32,
    pub boss_base_lives: i32,
    /// Extra boss lives per level index
    pub boss_lives_per_level: i32,
    pub boss_bonus: u64,

    pub shield: ShieldTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            seed: 0x5EED,

            player_lives: Difficulty::Normal.lives(),
            starting_bombs: 1,
            damage_cooldown_ticks: 60,
            player_shot_cooldown_ticks: 15,

            enemy_spawn_threshold: 75.0,
            initial_enemy_counter: 45.0,
            power_up_spawn_threshold: 180,
            ramp: DifficultyRamp::default(),

            explosion_duration_ticks: 50,
            enemy_lives: 1,
            boss_base_lives: 12,
            boss_lives_per_level: 4,
            boss_bonus: 70,

            shield: ShieldTuning::default(),
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset (applies preset defaults)
    pub fn from_preset(preset: Difficulty) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a difficulty preset (updates preset-dependent settings)
    pub fn apply_preset(&mut self, preset: Difficulty) {
        self.difficulty = preset;
        self.player_lives = preset.lives();
        self.ramp.per_level = preset.ramp_per_level();
    }

    /// Builder-style seed override
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SimError> {
        if self.player_lives <= 0 {
            return Err(SimError::InvalidConfiguration(format!(
                "player_lives must be positive, got {}",
                self.player_lives
            )));
        }
        if self.enemy_lives <= 0 || self.boss_base_lives <= 0 {
            return Err(SimError::InvalidConfiguration(
                "enemy and boss lives must be positive".to_string(),
            ));
        }
        if !(self.enemy_spawn_threshold.is_finite() && self.enemy_spawn_threshold > 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "enemy_spawn_threshold must be positive, got {}",
                self.enemy_spawn_threshold
            )));
        }
        if self.power_up_spawn_threshold == 0 {
            return Err(SimError::InvalidConfiguration(
                "power_up_spawn_threshold must be positive".to_string(),
            ));
        }
        if self.explosion_duration_ticks == 0 {
            return Err(SimError::InvalidConfiguration(
                "explosion_duration_ticks must be positive".to_string(),
            ));
        }
        if !(self.ramp.per_level >= 0.0 && self.ramp.log_scale >= 0.0) {
            return Err(SimError::InvalidConfiguration(
                "difficulty ramp must be non-negative".to_string(),
            ));
        }
        let shield = &self.shield;
        if !(shield.dead_band >= 0.0 && shield.hold_distance < shield.far_distance) {
            return Err(SimError::InvalidConfiguration(format!(
                "shield tuning needs dead_band >= 0 and hold_distance < far_distance, got {:?}",
                shield
            )));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!(
                    "Using default settings ({}: {})",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }
}
