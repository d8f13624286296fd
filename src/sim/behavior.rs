//! Movement and behavior engine
//!
//! Each variant supplies a `Behavior` strategy (advance, collision, death).
//! `Variant::behavior` is the dispatch table.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{BossKind, Entity, EntityData, PowerUpKind, Variant, cross_explosions};
use super::state::IdAllocator;
use super::tick::TickInput;
use crate::audio::SoundCue;
use crate::consts::*;
use crate::{Settings, wrap_x};

/// Read-only view of an enemy used for shield targeting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetInfo {
    pub id: u32,
    pub pos: Vec2,
    pub variant: Variant,
    pub shielded: bool,
}

impl From<&Entity> for TargetInfo {
    fn from(e: &Entity) -> Self {
        Self {
            id: e.id,
            pos: e.pos,
            variant: e.variant(),
            shielded: e.shielded,
        }
    }
}

/// Shared state handed to `Behavior::advance`
pub struct AdvanceContext<'a> {
    pub input: &'a TickInput,
    pub player_pos: Vec2,
    /// Live enemies at the start of the update pass
    pub targets: &'a mut [TargetInfo],
    pub rng: &'a mut Pcg32,
    pub ids: &'a mut IdAllocator,
    pub settings: &'a Settings,
    /// Lasers and explosions created this pass
    pub spawned: Vec<Entity>,
    /// Enemy ids newly claimed by a shield
    pub claims: Vec<u32>,
    pub cues: Vec<SoundCue>,
}

impl<'a> AdvanceContext<'a> {
    pub fn new(
        input: &'a TickInput,
        player_pos: Vec2,
        targets: &'a mut [TargetInfo],
        rng: &'a mut Pcg32,
        ids: &'a mut IdAllocator,
        settings: &'a Settings,
    ) -> Self {
        Self {
            input,
            player_pos,
            targets,
            rng,
            ids,
            settings,
            spawned: Vec::new(),
            claims: Vec::new(),
            cues: Vec::new(),
        }
    }

    /// Spawn a laser travelling along `dir`
    pub fn fire(&mut self, from: Vec2, dir: Vec2, hostile: bool, rotation: f32) {
        let mut laser = Entity::laser(self.ids.next_id(), from, dir, hostile);
        laser.rotation = rotation;
        self.spawned.push(laser);
    }
}

/// Side effects collected while processing deaths
pub struct DeathEffects<'a> {
    pub ids: &'a mut IdAllocator,
    pub explosion_ticks: u32,
    pub explosions: Vec<Entity>,
    /// Enemies whose protecting shield died
    pub released: Vec<u32>,
    pub boss_killed: Option<BossKind>,
}

impl<'a> DeathEffects<'a> {
    pub fn new(ids: &'a mut IdAllocator, explosion_ticks: u32) -> Self {
        Self {
            ids,
            explosion_ticks,
            explosions: Vec::new(),
            released: Vec::new(),
            boss_killed: None,
        }
    }

    /// Detonate a cross of explosions at `center`
    pub fn detonate(&mut self, center: Vec2) {
        let first = self.ids.reserve(2);
        self.explosions
            .extend(cross_explosions(first, center, self.explosion_ticks));
    }
}

/// Per-variant capability interface
pub trait Behavior {
    /// Advance one tick
    fn advance(&self, entity: &mut Entity, dt: f32, ctx: &mut AdvanceContext<'_>);

    /// Apply one collision; returns true if the entity is gone as a result
    fn on_collision(&self, entity: &mut Entity) -> bool {
        entity.take_hit()
    }

    /// Death side effects
    fn on_death(&self, _entity: &Entity, _fx: &mut DeathEffects<'_>) {}
}

impl Variant {
    pub fn behavior(self) -> &'static dyn Behavior {
        match self {
            Variant::Player => &PlayerBehavior,
            Variant::Spider => &SpiderBehavior,
            Variant::Shooter => &ShooterBehavior,
            Variant::Bomb => &BombBehavior,
            Variant::Shield => &ShieldBehavior,
            Variant::BossSpider
            | Variant::BossShooter
            | Variant::BossBomb
            | Variant::BossShield => &BossBehavior,
            Variant::Laser | Variant::PowerUp => &ProjectileBehavior,
            Variant::Explosion => &ExplosionBehavior,
            Variant::ShieldPowerUp => &OverlayBehavior,
            Variant::MenuBlock => &StaticBehavior,
        }
    }
}

/// position += direction * speed * dt
#[inline]
fn straight_line(entity: &mut Entity, dt: f32) {
    entity.pos += entity.vel * entity.speed * dt;
}

pub struct PlayerBehavior;

impl Behavior for PlayerBehavior {
    fn advance(&self, entity: &mut Entity, dt: f32, ctx: &mut AdvanceContext<'_>) {
        let input = ctx.input;
        let settings = ctx.settings;
        let player_id = entity.id;
        let Entity {
            pos, vel, size, data, ..
        } = entity;
        let EntityData::Player(data) = data else {
            return;
        };

        let mut accel = Vec2::ZERO;
        if input.left {
            accel.x -= 1.0;
        }
        if input.right {
            accel.x += 1.0;
        }
        if input.up {
            accel.y -= 1.0;
        }
        if input.down {
            accel.y += 1.0;
        }
        data.accel = accel;

        *vel += accel * dt / PLAYER_ACCEL_DIVISOR;
        *vel = vel.clamp_length_max(PLAYER_MAX_VEL);

        let speed_slot = PowerUpKind::Speed.slot();
        if data.speed_ticks > SPEED_BOOST_TICKS {
            data.power_ups[speed_slot] = false;
            data.speed_ticks = 0;
        }
        let boost = if data.power_ups[speed_slot] {
            data.speed_ticks += 1;
            SPEED_BOOST
        } else {
            1.0
        };

        *pos += *vel * dt * boost;

        // Friction
        *vel *= PLAYER_FRICTION;
        if vel.x.abs() < VELOCITY_SNAP {
            vel.x = 0.0;
        }
        if vel.y.abs() < VELOCITY_SNAP {
            vel.y = 0.0;
        }

        pos.x = wrap_x(pos.x);
        pos.y = pos.y.clamp(0.0, SCREEN_HEIGHT);

        // Weapons
        data.shot_cooldown = data.shot_cooldown.saturating_sub(1);
        if input.fire && data.shot_cooldown == 0 {
            data.shot_cooldown = settings.player_shot_cooldown_ticks;
            let muzzle = Vec2::new(pos.x, pos.y - size.y / 2.0);
            ctx.fire(muzzle, Vec2::NEG_Y, false, 0.0);
            if data.has(PowerUpKind::Damage) {
                ctx.fire(muzzle, Vec2::new(1.0, -1.0), false, -45.0);
                ctx.fire(muzzle, Vec2::new(-1.0, -1.0), false, 45.0);
            }
            ctx.cues.push(SoundCue::PlayerShoot);
        }

        if input.bomb && !data.bomb_held && data.bombs > 0 {
            data.bombs -= 1;
            let first = ctx.ids.reserve(2);
            for mut explosion in cross_explosions(first, *pos, settings.explosion_duration_ticks) {
                // The ship's own bomb never hurts it
                explosion.register_hit(player_id);
                ctx.spawned.push(explosion);
            }
            log::debug!("Player bomb at ({:.0}, {:.0})", pos.x, pos.y);
        }
        data.bomb_held = input.bomb;
    }
}

/// Descends while drifting toward the player's column at a quarter speed
pub struct SpiderBehavior;

impl Behavior for SpiderBehavior {
    fn advance(&self, entity: &mut Entity, dt: f32, ctx: &mut AdvanceContext<'_>) {
        entity.pos.y += entity.vel.y * entity.speed * dt;
        let step = entity.speed * dt / 4.0;
        if ctx.player_pos.x - entity.pos.x > 0.0 {
            entity.pos.x += step;
        } else {
            entity.pos.x -= step;
        }
    }
}

/// Drops to the patrol line, then sweeps between the patrol bounds and fires
pub struct ShooterBehavior;

impl Behavior for ShooterBehavior {
    fn advance(&self, entity: &mut Entity, dt: f32, ctx: &mut AdvanceContext<'_>) {
        let Entity {
            pos,
            vel,
            size,
            speed,
            data,
            ..
        } = entity;
        let EntityData::Shooter { shot_counter } = data else {
            return;
        };

        if pos.y < PATROL_DEPTH {
            pos.y += *speed * dt;
        }
        if pos.x >= PATROL_RIGHT {
            *vel = Vec2::new(-PATROL_DAMPING, 0.0);
        } else if pos.x <= PATROL_LEFT {
            *vel = Vec2::X;
        }
        pos.x += vel.x * *speed * dt / 4.0;

        if *shot_counter > SHOOTER_FIRE_TICKS {
            ctx.fire(Vec2::new(pos.x, pos.y - size.y / 2.0), Vec2::Y, true, 0.0);
            ctx.cues.push(SoundCue::EnemyShoot);
            *shot_counter = 0;
        }
        *shot_counter += 1;
    }
}

/// Falls straight down and detonates on death
pub struct BombBehavior;

impl Behavior for BombBehavior {
    fn advance(&self, entity: &mut Entity, dt: f32, _ctx: &mut AdvanceContext<'_>) {
        straight_line(entity, dt);
    }

    fn on_death(&self, entity: &Entity, fx: &mut DeathEffects<'_>) {
        fx.detonate(entity.pos);
    }
}

/// Escorts one unshielded enemy from below
pub struct ShieldBehavior;

impl Behavior for ShieldBehavior {
    fn advance(&self, entity: &mut Entity, dt: f32, ctx: &mut AdvanceContext<'_>) {
        let settings = ctx.settings;
        let tuning = &settings.shield;
        let shield_id = entity.id;
        let here = entity.pos;
        // With nothing to protect the shield sinks toward the bottom edge
        let idle_aim = Vec2::new(here.x, SCREEN_HEIGHT);

        let EntityData::Shield { target } = &mut entity.data else {
            return;
        };
        let aim = match *target {
            None => {
                if !ctx.targets.is_empty() {
                    let idx = ctx.rng.random_range(0..ctx.targets.len());
                    let candidate = &mut ctx.targets[idx];
                    let eligible = candidate.id != shield_id
                        && candidate.variant != Variant::Shield
                        && !candidate.shielded
                        && candidate.pos.y < here.y;
                    if eligible {
                        candidate.shielded = true;
                        *target = Some(candidate.id);
                        ctx.claims.push(candidate.id);
                    }
                }
                idle_aim
            }
            Some(id) => match ctx.targets.iter().find(|t| t.id == id) {
                Some(t) => t.pos,
                None => {
                    // Target died or left the field
                    *target = None;
                    idle_aim
                }
            },
        };

        let step = entity.speed * dt;
        let dx = aim.x - entity.pos.x;
        if dx > tuning.dead_band {
            entity.pos.x += step;
        } else if dx < -tuning.dead_band {
            entity.pos.x -= step;
        } else {
            entity.pos.x = aim.x;
        }

        // Positive gap: shield is below its aim point
        let gap = entity.pos.y - aim.y;
        if gap < tuning.hold_distance {
            entity.pos.y += entity.vel.y * step;
        } else if gap > tuning.hold_distance {
            entity.pos.y -= entity.vel.y * step;
        }
    }

    fn on_death(&self, entity: &Entity, fx: &mut DeathEffects<'_>) {
        if let Some(target) = entity.shield_target() {
            fx.released.push(target);
        }
    }
}

/// Boss movement and volleys, keyed on `BossKind`
pub struct BossBehavior;

/// Shooter boss patrol bounds and depth
const BOSS_PATROL_DEPTH: f32 = 80.0;
const BOSS_PATROL_ACCEL: f32 = 0.15;
const BOSS_PATROL_MAX_PHASES: u32 = 10;
/// Bomb boss bounces inside the upper half of the screen
const BOSS_BOUNCE_FLOOR: f32 = SCREEN_HEIGHT / 2.0;
const BOSS_BOUNCE_SPEEDUP: f32 = 2.0;
/// Shield boss holds this altitude while tracking
const BOSS_TRACK_DEPTH: f32 = 120.0;

/// (direction, sprite rotation) per boss volley
const SPREAD_VOLLEY: [(Vec2, f32); 3] = [
    (Vec2::Y, 0.0),
    (Vec2::new(1.0, 1.0), 45.0),
    (Vec2::new(-1.0, 1.0), -45.0),
];
const DIAGONAL_VOLLEY: [(Vec2, f32); 2] = [
    (Vec2::new(1.0, 1.0), 45.0),
    (Vec2::new(-1.0, 1.0), -45.0),
];
const STRAIGHT_VOLLEY: [(Vec2, f32); 1] = [(Vec2::Y, 0.0)];

impl Behavior for BossBehavior {
    fn advance(&self, entity: &mut Entity, dt: f32, ctx: &mut AdvanceContext<'_>) {
        let player_pos = ctx.player_pos;
        let Entity {
            pos,
            vel,
            size,
            speed,
            data,
            ..
        } = entity;
        let EntityData::Boss {
            kind,
            shot_counter,
            phase_counter,
        } = data
        else {
            return;
        };
        let step = *speed * dt;
        let half = *size * 0.5;

        match *kind {
            BossKind::Spider => {
                pos.y += step;
                if player_pos.x > pos.x {
                    pos.x += step / 2.0;
                } else {
                    pos.x -= step / 2.0;
                }
                // Cycle back to the top once fully below the screen
                if pos.y - half.y > SCREEN_HEIGHT {
                    pos.y = -half.y;
                    *phase_counter += 1;
                }
            }
            BossKind::Shooter => {
                if pos.y < BOSS_PATROL_DEPTH {
                    pos.y += step;
                }
                if pos.x + half.x >= SCREEN_WIDTH && vel.x > 0.0 {
                    vel.x = -1.0;
                    *phase_counter += 1;
                } else if pos.x - half.x <= 0.0 && vel.x < 0.0 {
                    vel.x = 1.0;
                    *phase_counter += 1;
                }
                let accel =
                    1.0 + BOSS_PATROL_ACCEL * (*phase_counter).min(BOSS_PATROL_MAX_PHASES) as f32;
                pos.x += vel.x * step * accel;
            }
            BossKind::Bomb => {
                *pos += *vel * step * BOSS_BOUNCE_SPEEDUP;
                if (pos.x - half.x <= 0.0 && vel.x < 0.0)
                    || (pos.x + half.x >= SCREEN_WIDTH && vel.x > 0.0)
                {
                    vel.x = -vel.x;
                    *phase_counter += 1;
                }
                if (pos.y - half.y <= 0.0 && vel.y < 0.0)
                    || (pos.y + half.y >= BOSS_BOUNCE_FLOOR && vel.y > 0.0)
                {
                    vel.y = -vel.y;
                    *phase_counter += 1;
                }
            }
            BossKind::Shield => {
                if pos.y < BOSS_TRACK_DEPTH {
                    pos.y += step;
                }
                // Chase the player along the shorter way around the wrap
                let mut dx = player_pos.x - pos.x;
                if dx.abs() > SCREEN_WIDTH / 2.0 {
                    dx = -dx;
                }
                if dx.abs() > step {
                    pos.x = wrap_x(pos.x + step * dx.signum());
                }
            }
        }

        if *shot_counter > BOSS_FIRE_TICKS {
            let muzzle = Vec2::new(pos.x, pos.y + half.y);
            let volley: &[(Vec2, f32)] = match *kind {
                BossKind::Spider => &[],
                BossKind::Shooter => &SPREAD_VOLLEY,
                BossKind::Bomb => &DIAGONAL_VOLLEY,
                BossKind::Shield => &STRAIGHT_VOLLEY,
            };
            for &(dir, rotation) in volley {
                ctx.fire(muzzle, dir, true, rotation);
            }
            if !volley.is_empty() {
                ctx.cues.push(SoundCue::EnemyShoot);
            }
            *shot_counter = 0;
        }
        *shot_counter += 1;
    }

    fn on_death(&self, entity: &Entity, fx: &mut DeathEffects<'_>) {
        if let EntityData::Boss { kind, .. } = &entity.data {
            if *kind == BossKind::Bomb {
                fx.detonate(entity.pos);
            }
            fx.boss_killed = Some(*kind);
        }
    }
}

/// Lasers and power-ups: straight movers consumed on first contact
pub struct ProjectileBehavior;

impl Behavior for ProjectileBehavior {
    fn advance(&self, entity: &mut Entity, dt: f32, _ctx: &mut AdvanceContext<'_>) {
        straight_line(entity, dt);
    }

    fn on_collision(&self, entity: &mut Entity) -> bool {
        let was_alive = entity.alive;
        entity.alive = false;
        was_alive
    }
}

/// Stationary; ages until its duration runs out
pub struct ExplosionBehavior;

impl Behavior for ExplosionBehavior {
    fn advance(&self, entity: &mut Entity, _dt: f32, _ctx: &mut AdvanceContext<'_>) {
        if let EntityData::Explosion { age, .. } = &mut entity.data {
            *age += 1;
        }
    }

    fn on_collision(&self, _entity: &mut Entity) -> bool {
        false
    }
}

/// Shield power-up overlay rides on the player ship
pub struct OverlayBehavior;

impl Behavior for OverlayBehavior {
    fn advance(&self, entity: &mut Entity, _dt: f32, ctx: &mut AdvanceContext<'_>) {
        entity.pos = ctx.player_pos;
    }
}

/// Menu blocks never move and cannot be destroyed
pub struct StaticBehavior;

impl Behavior for StaticBehavior {
    fn advance(&self, _entity: &mut Entity, _dt: f32, _ctx: &mut AdvanceContext<'_>) {}

    fn on_collision(&self, _entity: &mut Entity) -> bool {
        false
    }
}

/// Advance every live entity in `entities`
pub fn advance_all(entities: &mut [Entity], dt: f32, ctx: &mut AdvanceContext<'_>) {
    for entity in entities.iter_mut().filter(|e| e.alive) {
        entity.variant().behavior().advance(entity, dt, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EnemyKind;
    use rand::SeedableRng;

    struct Harness {
        input: TickInput,
        rng: Pcg32,
        ids: IdAllocator,
        settings: Settings,
        targets: Vec<TargetInfo>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                input: TickInput::default(),
                rng: Pcg32::seed_from_u64(7),
                ids: IdAllocator::default(),
                settings: Settings::default(),
                targets: Vec::new(),
            }
        }

        /// Advance `entity` `ticks` times, returning everything it spawned
        fn run(&mut self, entity: &mut Entity, player_pos: Vec2, ticks: u32) -> Vec<Entity> {
            let mut ctx = AdvanceContext::new(
                &self.input,
                player_pos,
                &mut self.targets,
                &mut self.rng,
                &mut self.ids,
                &self.settings,
            );
            for _ in 0..ticks {
                entity.variant().behavior().advance(entity, SIM_DT, &mut ctx);
            }
            ctx.spawned
        }
    }

    #[test]
    fn test_player_wraps_right_edge() {
        let mut h = Harness::new();
        h.input.right = true;
        let mut player = Entity::player(1, 3, 0);
        player.pos = Vec2::new(639.9, 540.0);
        h.run(&mut player, Vec2::ZERO, 1);
        assert!(player.pos.x < 10.0, "expected wrap, got x={}", player.pos.x);
        assert_eq!(player.pos.y, 540.0);
    }

    #[test]
    fn test_player_wraps_left_edge_and_clamps_vertically() {
        let mut h = Harness::new();
        h.input.left = true;
        h.input.up = true;
        let mut player = Entity::player(1, 3, 0);
        player.pos = Vec2::new(0.5, 0.5);
        h.run(&mut player, Vec2::ZERO, 1);
        assert!(player.pos.x > 630.0, "expected wrap, got x={}", player.pos.x);
        assert_eq!(player.pos.y, 0.0);
    }

    #[test]
    fn test_player_velocity_capped_and_decays() {
        let mut h = Harness::new();
        h.input.right = true;
        h.input.down = true;
        let mut player = Entity::player(1, 3, 0);
        h.run(&mut player, Vec2::ZERO, 30);
        assert!(player.vel.length() <= PLAYER_MAX_VEL + 1e-5);

        // Coasting: friction snaps velocity to exactly zero
        h.input = TickInput::default();
        h.run(&mut player, Vec2::ZERO, 60);
        assert_eq!(player.vel, Vec2::ZERO);
    }

    #[test]
    fn test_player_fire_and_spread() {
        let mut h = Harness::new();
        h.input.fire = true;
        let mut player = Entity::player(1, 3, 0);
        let spawned = h.run(&mut player, Vec2::ZERO, 1);
        assert_eq!(spawned.len(), 1);
        assert!(matches!(spawned[0].data, EntityData::Laser { hostile: false }));
        assert_eq!(spawned[0].vel, Vec2::NEG_Y);

        if let Some(data) = player.player_data_mut() {
            data.power_ups[PowerUpKind::Damage.slot()] = true;
            data.shot_cooldown = 0;
        }
        let spawned = h.run(&mut player, Vec2::ZERO, 1);
        assert_eq!(spawned.len(), 3);
        assert_eq!(spawned[1].rotation, -45.0);
        assert_eq!(spawned[2].rotation, 45.0);
    }

    #[test]
    fn test_player_bomb_is_edge_triggered() {
        let mut h = Harness::new();
        h.input.bomb = true;
        let mut player = Entity::player(1, 3, 2);
        let spawned = h.run(&mut player, Vec2::ZERO, 5);
        assert_eq!(spawned.len(), 2);
        assert!(spawned.iter().all(|e| e.has_hit(1)));
        assert_eq!(player.player_data().map(|d| d.bombs), Some(1));
    }

    #[test]
    fn test_speed_boost_expires() {
        let mut h = Harness::new();
        let mut player = Entity::player(1, 3, 0);
        if let Some(data) = player.player_data_mut() {
            data.power_ups[PowerUpKind::Speed.slot()] = true;
        }
        h.run(&mut player, Vec2::ZERO, SPEED_BOOST_TICKS + 2);
        assert!(!player.player_data().unwrap().has(PowerUpKind::Speed));
    }

    #[test]
    fn test_spider_pursues_player_column() {
        let mut h = Harness::new();
        let mut spider = Entity::enemy(2, EnemyKind::Spider, Vec2::new(300.0, 0.0), 1);
        h.run(&mut spider, Vec2::new(400.0, 540.0), 1);
        let step = ENEMY_SPEED * SIM_DT;
        assert!((spider.pos.y - step).abs() < 1e-4);
        assert!((spider.pos.x - (300.0 + step / 4.0)).abs() < 1e-4);

        h.run(&mut spider, Vec2::new(0.0, 540.0), 1);
        assert!((spider.pos.x - 300.0).abs() < 1e-4);
    }

    #[test]
    fn test_shooter_patrol_and_fire_cadence() {
        let mut h = Harness::new();
        let mut shooter = Entity::enemy(2, EnemyKind::Shooter, Vec2::new(585.0, -25.0), 1);
        let spawned = h.run(&mut shooter, Vec2::ZERO, 1);
        assert!(spawned.is_empty());
        // Reversed at the right bound with damping
        assert_eq!(shooter.vel, Vec2::new(-PATROL_DAMPING, 0.0));
        assert!(shooter.pos.x < 585.0);

        let spawned = h.run(&mut shooter, Vec2::ZERO, SHOOTER_FIRE_TICKS + 1);
        assert_eq!(spawned.len(), 1);
        assert!(matches!(spawned[0].data, EntityData::Laser { hostile: true }));
        assert!(shooter.pos.y >= PATROL_DEPTH);
    }

    #[test]
    fn test_shield_rejects_targets_below_it() {
        let mut h = Harness::new();
        let mut shield = Entity::enemy(10, EnemyKind::Shield, Vec2::new(320.0, 100.0), 1);
        h.targets = vec![TargetInfo {
            id: 11,
            pos: Vec2::new(320.0, 300.0),
            variant: Variant::Spider,
            shielded: false,
        }];
        h.run(&mut shield, Vec2::ZERO, 5);
        assert_eq!(shield.shield_target(), None);
        assert!(!h.targets[0].shielded);
    }

    #[test]
    fn test_shield_claims_unshielded_target_above() {
        let mut h = Harness::new();
        let mut shield = Entity::enemy(10, EnemyKind::Shield, Vec2::new(300.0, 400.0), 1);
        h.targets = vec![TargetInfo {
            id: 11,
            pos: Vec2::new(320.0, 100.0),
            variant: Variant::Spider,
            shielded: false,
        }];
        h.run(&mut shield, Vec2::ZERO, 1);
        assert_eq!(shield.shield_target(), Some(11));
        assert!(h.targets[0].shielded);

        // A second shield cannot claim the same enemy
        let mut other = Entity::enemy(12, EnemyKind::Shield, Vec2::new(340.0, 400.0), 1);
        h.run(&mut other, Vec2::ZERO, 10);
        assert_eq!(other.shield_target(), None);

        // Tracking closes in from far below
        let before = shield.pos.y;
        h.run(&mut shield, Vec2::ZERO, 1);
        assert!(shield.pos.y < before);
        assert!(shield.pos.x > 300.0);
    }

    /// Vertical move of a shield guarding an enemy `gap` pixels above it
    fn shield_climb(gap: f32) -> (f32, f32) {
        let mut h = Harness::new();
        let mut shield = Entity::enemy(10, EnemyKind::Shield, Vec2::new(320.0, 100.0 + gap), 1);
        shield.data = EntityData::Shield { target: Some(11) };
        h.targets = vec![TargetInfo {
            id: 11,
            pos: Vec2::new(320.0, 100.0),
            variant: Variant::Spider,
            shielded: true,
        }];
        let before = shield.pos.y;
        h.run(&mut shield, Vec2::ZERO, 1);
        assert_eq!(shield.shield_target(), Some(11));
        (shield.pos.y - before, shield.speed * shield.vel.y * SIM_DT)
    }

    #[test]
    fn test_shield_drops_back_when_too_close() {
        let (moved, full) = shield_climb(20.0);
        assert!((moved - full).abs() < 1e-3, "moved {moved}, expected {full}");
    }

    #[test]
    fn test_shield_holds_at_hold_distance() {
        let hold = Settings::default().shield.hold_distance;
        let (moved, _) = shield_climb(hold);
        assert_eq!(moved, 0.0);
    }

    #[test]
    fn test_shield_closes_at_full_speed_inside_far_band() {
        let (moved, full) = shield_climb(100.0);
        assert!((moved + full).abs() < 1e-3, "moved {moved}, expected {}", -full);
        let far = Settings::default().shield.far_distance;
        let (moved, full) = shield_climb(far);
        assert!((moved + full).abs() < 1e-3, "moved {moved}, expected {}", -full);
    }

    #[test]
    fn test_shield_closes_from_far_below() {
        let (moved, full) = shield_climb(300.0);
        assert!((moved + full).abs() < 1e-3, "moved {moved}, expected {}", -full);
    }

    #[test]
    fn test_shield_releases_missing_target() {
        let mut h = Harness::new();
        let mut shield = Entity::enemy(10, EnemyKind::Shield, Vec2::new(300.0, 400.0), 1);
        shield.data = EntityData::Shield { target: Some(99) };
        h.run(&mut shield, Vec2::ZERO, 1);
        assert_eq!(shield.shield_target(), None);
    }

    #[test]
    fn test_explosion_ages() {
        let mut h = Harness::new();
        let mut ex = Entity::explosion(3, Vec2::ZERO, Vec2::splat(60.0), 50);
        h.run(&mut ex, Vec2::ZERO, 50);
        assert!(!ex.expired());
        h.run(&mut ex, Vec2::ZERO, 1);
        assert!(ex.expired());
        assert_eq!(ex.pos, Vec2::ZERO);
    }

    #[test]
    fn test_boss_spider_wraps_vertically() {
        let mut h = Harness::new();
        let mut boss = Entity::boss(5, BossKind::Spider, 10);
        boss.pos = Vec2::new(320.0, SCREEN_HEIGHT + BOSS_SIZE.1 / 2.0);
        h.run(&mut boss, Vec2::new(320.0, 540.0), 1);
        assert!(boss.pos.y < 0.0);
    }

    #[test]
    fn test_boss_shooter_spread_volley() {
        let mut h = Harness::new();
        let mut boss = Entity::boss(5, BossKind::Shooter, 10);
        let spawned = h.run(&mut boss, Vec2::ZERO, BOSS_FIRE_TICKS + 2);
        assert_eq!(spawned.len(), 3);
        let dirs: Vec<Vec2> = spawned.iter().map(|l| l.vel).collect();
        assert!(dirs.contains(&Vec2::Y));
        assert!(dirs.iter().any(|d| d.x > 0.0 && d.y > 0.0));
        assert!(dirs.iter().any(|d| d.x < 0.0 && d.y > 0.0));
    }

    #[test]
    fn test_boss_bomb_stays_in_upper_half() {
        let mut h = Harness::new();
        let mut boss = Entity::boss(5, BossKind::Bomb, 10);
        boss.pos = Vec2::new(320.0, 200.0);
        h.run(&mut boss, Vec2::ZERO, 400);
        assert!(boss.pos.y < BOSS_BOUNCE_FLOOR + 10.0);
        assert!(boss.pos.x > -10.0 && boss.pos.x < SCREEN_WIDTH + 10.0);
    }

    #[test]
    fn test_boss_shield_wraps_toward_player() {
        let mut h = Harness::new();
        let mut boss = Entity::boss(5, BossKind::Shield, 10);
        boss.pos = Vec2::new(10.0, 120.0);
        // Player is closer through the left edge
        h.run(&mut boss, Vec2::new(630.0, 540.0), 5);
        assert!(boss.pos.x > SCREEN_WIDTH / 2.0);
    }

    #[test]
    fn test_laser_consumed_on_collision() {
        let mut laser = Entity::laser(1, Vec2::ZERO, Vec2::NEG_Y, false);
        assert!(Variant::Laser.behavior().on_collision(&mut laser));
        assert!(!laser.alive);
        assert!(!Variant::Laser.behavior().on_collision(&mut laser));
    }
}
