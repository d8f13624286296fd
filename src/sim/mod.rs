//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod behavior;
pub mod collision;
pub mod director;
pub mod entity;
pub mod events;
pub mod geom;
pub mod menu;
pub mod state;
pub mod tick;

pub use behavior::{AdvanceContext, Behavior, DeathEffects, TargetInfo};
pub use director::{Backdrop, BossStage, LevelDirectorState};
pub use entity::{
    BossKind, EnemyKind, Entity, EntityData, MenuAction, PlayerData, PowerUpKind, Variant,
    cross_explosions,
};
pub use events::{FrameEvents, GameEvent, HudState, Renderable};
pub use geom::Bounds;
pub use state::{GamePhase, GameState, IdAllocator};
pub use tick::{TickInput, tick};
