//! Entity model
//!
//! Every simulated object is one `Entity` record: shared kinematic fields plus
//! an `EntityData` payload carrying the variant-specific state. Behavior is
//! dispatched on the variant tag (see `behavior`).

use std::collections::BTreeSet;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Bounds;
use crate::SimError;
use crate::consts::*;

/// Variant tag for every simulated object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    Player,
    Spider,
    Shooter,
    Bomb,
    Shield,
    BossSpider,
    BossShooter,
    BossBomb,
    BossShield,
    Laser,
    PowerUp,
    Explosion,
    ShieldPowerUp,
    MenuBlock,
}

impl Variant {
    pub fn is_boss(self) -> bool {
        matches!(
            self,
            Variant::BossSpider | Variant::BossShooter | Variant::BossBomb | Variant::BossShield
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Player => "player",
            Variant::Spider => "spider",
            Variant::Shooter => "shooter",
            Variant::Bomb => "bomb",
            Variant::Shield => "shield",
            Variant::BossSpider => "boss-spider",
            Variant::BossShooter => "boss-shooter",
            Variant::BossBomb => "boss-bomb",
            Variant::BossShield => "boss-shield",
            Variant::Laser => "laser",
            Variant::PowerUp => "power-up",
            Variant::Explosion => "explosion",
            Variant::ShieldPowerUp => "shield-power-up",
            Variant::MenuBlock => "menu-block",
        }
    }
}

/// Regular enemy types drawn from a level's wave pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Spider,
    Shooter,
    Bomb,
    Shield,
}

/// Boss roster, cycled by the director's boss index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossKind {
    Spider,
    Shooter,
    Bomb,
    Shield,
}

impl BossKind {
    pub const ROSTER: [BossKind; 4] = [
        BossKind::Spider,
        BossKind::Shooter,
        BossKind::Bomb,
        BossKind::Shield,
    ];

    pub fn from_index(index: usize) -> Result<Self, SimError> {
        Self::ROSTER
            .get(index)
            .copied()
            .ok_or(SimError::BossIndexOutOfRange(index))
    }

    pub fn variant(self) -> Variant {
        match self {
            BossKind::Spider => Variant::BossSpider,
            BossKind::Shooter => Variant::BossShooter,
            BossKind::Bomb => Variant::BossBomb,
            BossKind::Shield => Variant::BossShield,
        }
    }
}

/// Power-up types; the numeric code indexes the player's power-up flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Speed,
    Damage,
    Bomb,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Speed,
        PowerUpKind::Damage,
        PowerUpKind::Bomb,
        PowerUpKind::Shield,
    ];

    /// Numeric code 1..=4
    pub fn code(self) -> u8 {
        match self {
            PowerUpKind::Speed => 1,
            PowerUpKind::Damage => 2,
            PowerUpKind::Bomb => 3,
            PowerUpKind::Shield => 4,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, SimError> {
        match code {
            1 => Ok(PowerUpKind::Speed),
            2 => Ok(PowerUpKind::Damage),
            3 => Ok(PowerUpKind::Bomb),
            4 => Ok(PowerUpKind::Shield),
            other => Err(SimError::PowerCodeOutOfRange(other)),
        }
    }

    /// Resolve a power-up from its kind name, or from an explicit code that overrides it.
    ///
    /// Entry point for power-ups described in external data (level files,
    /// debug spawns). The director already holds a `PowerUpKind` and builds
    /// `Entity::power_up` directly.
    pub fn resolve(kind: &str, power: Option<u8>) -> Result<Self, SimError> {
        match power {
            Some(code) => Self::from_code(code),
            None => kind.parse(),
        }
    }

    /// Index into `PlayerData::power_ups`
    #[inline]
    pub fn slot(self) -> usize {
        usize::from(self.code() - 1)
    }
}

impl FromStr for PowerUpKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "speed" => Ok(PowerUpKind::Speed),
            "damage" => Ok(PowerUpKind::Damage),
            "bomb" => Ok(PowerUpKind::Bomb),
            "shield" => Ok(PowerUpKind::Shield),
            _ => Err(SimError::UnknownPowerUp(s.to_string())),
        }
    }
}

/// What a menu block does when activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuAction {
    Play,
    LevelSelect,
    Quit,
    StartLevel(usize),
    Back,
}

/// Player-only state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerData {
    /// Acceleration sampled from input this tick
    pub accel: Vec2,
    /// Flags indexed by `PowerUpKind::slot`
    pub power_ups: [bool; 4],
    /// Ticks the speed boost has been active
    pub speed_ticks: u32,
    pub bombs: u32,
    pub shot_cooldown: u32,
    /// Bomb input on the previous tick (bombs are edge-triggered)
    pub bomb_held: bool,
}

impl PlayerData {
    #[inline]
    pub fn has(&self, kind: PowerUpKind) -> bool {
        self.power_ups[kind.slot()]
    }
}

/// Variant-specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityData {
    Player(PlayerData),
    Spider,
    Shooter {
        shot_counter: u32,
    },
    Bomb,
    Shield {
        /// Enemy currently protected by this shield
        target: Option<u32>,
    },
    Boss {
        kind: BossKind,
        shot_counter: u32,
        /// Counts patrol reversals / wrap cycles
        phase_counter: u32,
    },
    Laser {
        /// Fired by an enemy (damages the player) rather than by the player
        hostile: bool,
    },
    PowerUp {
        kind: PowerUpKind,
    },
    Explosion {
        age: u32,
        duration: u32,
        /// Entities already damaged by this explosion; only ever grows
        hits: BTreeSet<u32>,
    },
    ShieldPowerUp,
    MenuBlock {
        action: MenuAction,
    },
}

/// A simulated object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    /// Velocity for the player, unit-ish direction for everything else
    pub vel: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub lives: i32,
    pub alive: bool,
    /// Protected by a Shield enemy (at most one shield per target)
    pub shielded: bool,
    /// Sprite rotation in degrees (render hint only)
    pub rotation: f32,
    pub data: EntityData,
}

impl Entity {
    fn base(id: u32, pos: Vec2, size: (f32, f32), speed: f32, data: EntityData) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            size: Vec2::new(size.0, size.1),
            speed,
            lives: 1,
            alive: true,
            shielded: false,
            rotation: 0.0,
            data,
        }
    }

    pub fn player(id: u32, lives: i32, bombs: u32) -> Self {
        let data = PlayerData {
            bombs,
            ..Default::default()
        };
        let mut e = Self::base(
            id,
            Vec2::new(PLAYER_START.0, PLAYER_START.1),
            PLAYER_SIZE,
            PLAYER_SPEED,
            EntityData::Player(data),
        );
        e.lives = lives;
        e
    }

    pub fn enemy(id: u32, kind: EnemyKind, pos: Vec2, lives: i32) -> Self {
        let mut e = match kind {
            EnemyKind::Spider => Self::base(id, pos, SPIDER_SIZE, ENEMY_SPEED, EntityData::Spider),
            EnemyKind::Shooter => {
                let mut e = Self::base(
                    id,
                    pos,
                    SHOOTER_SIZE,
                    ENEMY_SPEED,
                    EntityData::Shooter { shot_counter: 0 },
                );
                e.vel = Vec2::X;
                e
            }
            EnemyKind::Bomb => Self::base(id, pos, BOMB_SIZE, BOMB_SPEED, EntityData::Bomb),
            EnemyKind::Shield => Self::base(
                id,
                pos,
                SHIELD_SIZE,
                ENEMY_SPEED,
                EntityData::Shield { target: None },
            ),
        };
        if e.vel == Vec2::ZERO {
            e.vel = Vec2::Y;
        }
        e.lives = lives;
        e
    }

    pub fn boss(id: u32, kind: BossKind, lives: i32) -> Self {
        let mut e = Self::base(
            id,
            Vec2::new(BOSS_SPAWN.0, BOSS_SPAWN.1),
            BOSS_SIZE,
            BOSS_SPEED,
            EntityData::Boss {
                kind,
                shot_counter: 0,
                phase_counter: 0,
            },
        );
        e.vel = match kind {
            BossKind::Bomb => Vec2::new(1.0, 1.0).normalize(),
            BossKind::Shooter => Vec2::X,
            _ => Vec2::Y,
        };
        e.lives = lives;
        e
    }

    /// Projectile travelling along `dir` (normalized here)
    pub fn laser(id: u32, pos: Vec2, dir: Vec2, hostile: bool) -> Self {
        let mut e = Self::base(id, pos, LASER_SIZE, LASER_SPEED, EntityData::Laser { hostile });
        e.vel = dir.normalize_or(Vec2::Y);
        e
    }

    pub fn power_up(id: u32, pos: Vec2, kind: PowerUpKind) -> Self {
        let mut e = Self::base(
            id,
            pos,
            POWER_UP_SIZE,
            POWER_UP_SPEED,
            EntityData::PowerUp { kind },
        );
        e.vel = Vec2::Y;
        e
    }

    pub fn explosion(id: u32, pos: Vec2, size: Vec2, duration: u32) -> Self {
        let mut e = Self::base(
            id,
            pos,
            (size.x, size.y),
            0.0,
            EntityData::Explosion {
                age: 0,
                duration,
                hits: BTreeSet::new(),
            },
        );
        e.lives = 0;
        e
    }

    pub fn shield_overlay(id: u32, pos: Vec2) -> Self {
        Self::base(id, pos, SHIELD_OVERLAY_SIZE, 0.0, EntityData::ShieldPowerUp)
    }

    pub fn menu_block(id: u32, pos: Vec2, action: MenuAction) -> Self {
        Self::base(id, pos, MENU_BLOCK_SIZE, 0.0, EntityData::MenuBlock { action })
    }

    pub fn variant(&self) -> Variant {
        match &self.data {
            EntityData::Player(_) => Variant::Player,
            EntityData::Spider => Variant::Spider,
            EntityData::Shooter { .. } => Variant::Shooter,
            EntityData::Bomb => Variant::Bomb,
            EntityData::Shield { .. } => Variant::Shield,
            EntityData::Boss { kind, .. } => kind.variant(),
            EntityData::Laser { .. } => Variant::Laser,
            EntityData::PowerUp { .. } => Variant::PowerUp,
            EntityData::Explosion { .. } => Variant::Explosion,
            EntityData::ShieldPowerUp => Variant::ShieldPowerUp,
            EntityData::MenuBlock { .. } => Variant::MenuBlock,
        }
    }

    /// Current bounds, derived from position
    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds::from_center(self.pos, self.size)
    }

    #[inline]
    pub fn overlaps(&self, other: &Entity) -> bool {
        self.bounds().overlaps(&other.bounds())
    }

    /// Remove one life; marks the entity dead at zero. Returns true if it just died.
    pub fn take_hit(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.lives -= 1;
        if self.lives <= 0 {
            self.alive = false;
            return true;
        }
        false
    }

    pub fn player_data(&self) -> Option<&PlayerData> {
        match &self.data {
            EntityData::Player(data) => Some(data),
            _ => None,
        }
    }

    pub fn player_data_mut(&mut self) -> Option<&mut PlayerData> {
        match &mut self.data {
            EntityData::Player(data) => Some(data),
            _ => None,
        }
    }

    /// Explosion hit-set contains `id`
    pub fn has_hit(&self, id: u32) -> bool {
        match &self.data {
            EntityData::Explosion { hits, .. } => hits.contains(&id),
            _ => false,
        }
    }

    /// Record `id` in the explosion hit-set. Returns false if already present
    /// (or if this entity is not an explosion).
    pub fn register_hit(&mut self, id: u32) -> bool {
        match &mut self.data {
            EntityData::Explosion { hits, .. } => hits.insert(id),
            _ => false,
        }
    }

    /// Explosion outlived its duration
    pub fn expired(&self) -> bool {
        match &self.data {
            EntityData::Explosion { age, duration, .. } => age > duration,
            _ => false,
        }
    }

    pub fn shield_target(&self) -> Option<u32> {
        match &self.data {
            EntityData::Shield { target } => *target,
            _ => None,
        }
    }
}

/// Two explosion beams crossing at `center`: a horizontal beam on the screen
/// midline sharing the center's y, and a vertical beam sharing its x.
pub fn cross_explosions(first_id: u32, center: Vec2, duration: u32) -> [Entity; 2] {
    let horizontal = Entity::explosion(
        first_id,
        Vec2::new(SCREEN_WIDTH / 2.0, center.y),
        Vec2::new(SCREEN_WIDTH, EXPLOSION_THICKNESS),
        duration,
    );
    let mut vertical = Entity::explosion(
        first_id + 1,
        Vec2::new(center.x, SCREEN_HEIGHT / 2.0),
        Vec2::new(EXPLOSION_THICKNESS, SCREEN_HEIGHT),
        duration,
    );
    vertical.rotation = 90.0;
    [horizontal, vertical]
}
