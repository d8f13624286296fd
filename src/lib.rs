//! Corona Shooter - a fixed-timestep 2D arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, behaviors, collisions, level director)
//! - `world`: Frame API consumed by the render/input/audio layer
//! - `audio`: Sound cue collaborator interface
//! - `settings`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod settings;
pub mod sim;
pub mod world;

pub use audio::{AudioSink, SoundCue};
pub use error::SimError;
pub use settings::{Difficulty, Settings};
pub use world::{FixedStep, World};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (milliseconds per tick, ~60 Hz)
    pub const SIM_DT: f32 = 16.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 640.0;
    pub const SCREEN_HEIGHT: f32 = 640.0;
    /// Distance above the top edge an entity may travel before it is reclaimed
    pub const KILL_MARGIN: f32 = 40.0;

    /// Player ship
    pub const PLAYER_START: (f32, f32) = (320.0, 540.0);
    pub const PLAYER_SIZE: (f32, f32) = (27.0, 36.0);
    pub const PLAYER_SPEED: f32 = 0.5;
    pub const PLAYER_MAX_VEL: f32 = 0.5;
    /// Acceleration per tick is `input * dt / PLAYER_ACCEL_DIVISOR`
    pub const PLAYER_ACCEL_DIVISOR: f32 = 100.0;
    pub const PLAYER_FRICTION: f32 = 9.0 / 10.0;
    pub const VELOCITY_SNAP: f32 = 0.01;
    pub const SPEED_BOOST: f32 = 1.3;
    pub const SPEED_BOOST_TICKS: u32 = 360;

    /// Projectiles
    pub const LASER_SPEED: f32 = 0.6;
    pub const LASER_SIZE: (f32, f32) = (9.0, 20.0);

    /// Regular enemies
    pub const ENEMY_SPEED: f32 = 0.35;
    pub const BOMB_SPEED: f32 = 0.25;
    pub const SPIDER_SIZE: (f32, f32) = (75.0, 50.0);
    pub const SHOOTER_SIZE: (f32, f32) = (60.0, 45.0);
    pub const BOMB_SIZE: (f32, f32) = (55.0, 60.0);
    pub const SHIELD_SIZE: (f32, f32) = (50.0, 50.0);
    pub const ENEMY_SPAWN_Y: f32 = -25.0;
    pub const SHIELD_SPAWN_Y: f32 = 0.0;

    /// Shooter patrol
    pub const PATROL_LEFT: f32 = 40.0;
    pub const PATROL_RIGHT: f32 = 580.0;
    pub const PATROL_DEPTH: f32 = 50.0;
    pub const PATROL_DAMPING: f32 = 0.71;
    pub const SHOOTER_FIRE_TICKS: u32 = 60;

    /// Bosses
    pub const BOSS_SIZE: (f32, f32) = (120.0, 90.0);
    pub const BOSS_SPEED: f32 = 0.2;
    pub const BOSS_SPAWN: (f32, f32) = (320.0, -45.0);
    pub const BOSS_FIRE_TICKS: u32 = 60;

    /// Power-ups
    pub const POWER_UP_SPEED: f32 = 0.4;
    pub const POWER_UP_SIZE: (f32, f32) = (40.0, 40.0);
    pub const SHIELD_OVERLAY_SIZE: (f32, f32) = (50.0, 50.0);

    /// Explosion beams span the whole playfield along one axis
    pub const EXPLOSION_THICKNESS: f32 = 60.0;

    /// Menu blocks
    pub const MENU_BLOCK_SIZE: (f32, f32) = (140.0, 50.0);
}

use consts::SCREEN_WIDTH;

/// Wrap a horizontal coordinate into `[0, SCREEN_WIDTH)`
#[inline]
pub fn wrap_x(x: f32) -> f32 {
    let wrapped = x.rem_euclid(SCREEN_WIDTH);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if wrapped >= SCREEN_WIDTH { 0.0 } else { wrapped }
}
