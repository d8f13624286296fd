//! Error taxonomy for the simulation core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unknown power-up kind `{0}`")]
    UnknownPowerUp(String),

    #[error("power-up code {0} is outside 1..=4")]
    PowerCodeOutOfRange(u8),

    #[error("boss index {0} is outside the boss roster")]
    BossIndexOutOfRange(usize),

    #[error("level {requested} is locked (highest unlocked: {unlocked})")]
    LevelLocked { requested: usize, unlocked: usize },

    #[error("timestep must be finite and non-negative, got {0}")]
    InvalidTimestep(f32),

    #[error("failed to parse settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
