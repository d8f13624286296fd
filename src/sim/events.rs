//! Per-frame output consumed by the render/audio layer

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::director::Backdrop;
use super::entity::{BossKind, MenuAction, PowerUpKind, Variant};
use crate::audio::SoundCue;

/// Gameplay events raised during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Player lost a life (remaining lives)
    PlayerDamaged { lives: i32 },
    /// Shield overlay took the hit instead of the player
    ShieldAbsorbed,
    EnemyDamaged { id: u32, variant: Variant },
    EnemyKilled { id: u32, variant: Variant, pos: Vec2 },
    PowerUpCollected { kind: PowerUpKind },
    BossSpawned { kind: BossKind, level: usize },
    LevelAdvanced { level: usize },
    PlayerDied { score: u64 },
    MenuActivated { action: MenuAction },
    Quit,
}

/// Draw request for one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub variant: Variant,
    pub pos: Vec2,
    pub size: Vec2,
    /// Degrees
    pub rotation: f32,
}

/// Heads-up display values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudState {
    pub score: u64,
    pub lives: i32,
    pub bombs: u32,
    pub shield_active: bool,
    pub level: usize,
}

/// Everything the collaborator layer needs to realize one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameEvents {
    pub backdrop: Backdrop,
    /// Paint order: explosions, enemies, projectiles, power-ups, menu blocks, player, shield
    pub renderables: Vec<Renderable>,
    pub sounds: Vec<SoundCue>,
    pub events: Vec<GameEvent>,
    pub hud: HudState,
    /// The loop should stop
    pub quit: bool,
}

impl FrameEvents {
    /// Number of events matching a predicate
    pub fn count(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}
