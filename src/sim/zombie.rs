//! Zombies and their behavior state machine
//!
//! A zombie is split into a [`ZombieBody`] (position, health, speed, status
//! effects) and a [`StateMachine`] of [`ZombieBehavior`]s. Behaviors mutate the
//! body through a [`ZombieCx`], which also lends them the lawn and the
//! particle system for the duration of a hook.
//!
//! Slow is a status effect on the body rather than a behavior, so a slowed
//! zombie keeps walking or chewing at reduced speed and exactly one behavior
//! is ever current.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::fsm::{State, StateMachine, Transition};
use super::lawn::Lawn;
use super::particle::{ParticleKind, ParticleSystem};
use crate::consts::{FLASH_DURATION_MS, HOUSE_X};
use crate::row_center_y;
use crate::tuning::{ZombieKind, ZombieStats};

/// How long the death animation plays before the zombie is removed (ms)
pub const DEATH_DURATION_MS: f32 = 500.0;
/// Horizontal reach of a bite
pub const MELEE_RANGE: f32 = 20.0;

const FRAME_MS: f32 = 150.0;
const FRAME_COUNT: u8 = 4;

/// World pieces a zombie may touch while it updates
pub struct Surroundings<'w> {
    pub lawn: &'w mut Lawn,
    pub particles: &'w mut ParticleSystem,
}

/// Context handed to behavior hooks
pub struct ZombieCx<'a, 'w> {
    pub body: &'a mut ZombieBody,
    pub env: &'a mut Surroundings<'w>,
}

/// Active slow effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlowEffect {
    pub factor: f32,
    pub remaining_ms: f32,
    /// Speed at the moment the slow was first applied
    pub original_speed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZombieBody {
    pub row: usize,
    pub pos: Vec2,
    pub health: i32,
    pub max_health: i32,
    /// Damage per bite
    pub damage: i32,
    pub attack_interval_ms: f32,
    pub base_speed: f32,
    /// Current speed in units per ms
    pub speed: f32,
    pub score: u32,
    pub slow: Option<SlowEffect>,
    /// Death animation finished; ready for removal
    pub dead: bool,
    /// Walked past the house line
    pub reached_house: bool,
    pub flash_ms: f32,
    pub frame: u8,
    frame_timer: f32,
    wobble_timer: f32,
}

impl ZombieBody {
    /// Slow the body down. Re-applying refreshes the timer without stacking.
    pub fn apply_slow(&mut self, factor: f32, duration_ms: f32) {
        match &mut self.slow {
            Some(effect) => effect.remaining_ms = duration_ms,
            None => {
                self.slow = Some(SlowEffect {
                    factor,
                    remaining_ms: duration_ms,
                    original_speed: self.speed,
                });
                self.speed *= factor;
            }
        }
    }

    /// Drop any slow and restore the speed it replaced
    pub fn clear_slow(&mut self) {
        if let Some(effect) = self.slow.take() {
            self.speed = effect.original_speed;
        }
    }

    fn tick_slow(&mut self, dt: f32) {
        let expired = match &mut self.slow {
            Some(effect) => {
                effect.remaining_ms -= dt;
                effect.remaining_ms <= 0.0
            }
            None => false,
        };
        if expired {
            self.clear_slow();
        }
    }

    /// Horizontal sway for rendering
    pub fn wobble(&self) -> f32 {
        self.wobble_timer.sin() * 2.0
    }

    /// Id of a live plant close enough ahead to bite, if any
    pub fn find_target(&self, lawn: &Lawn) -> Option<u32> {
        lawn.plants_in_row(self.row)
            .filter(|p| self.pos.x > p.pos.x && self.pos.x - p.pos.x <= MELEE_RANGE)
            .max_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
            .map(|p| p.id)
    }
}

/// Zombie behaviors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ZombieBehavior {
    Walking,
    Attacking { target: u32, timer: f32 },
    Dying { timer: f32 },
}

impl ZombieBehavior {
    pub fn name(&self) -> &'static str {
        match self {
            ZombieBehavior::Walking => "walking",
            ZombieBehavior::Attacking { .. } => "attacking",
            ZombieBehavior::Dying { .. } => "dying",
        }
    }
}

impl<'a, 'w> State<ZombieCx<'a, 'w>> for ZombieBehavior {
    fn enter(&mut self, cx: &mut ZombieCx<'a, 'w>) {
        match self {
            ZombieBehavior::Attacking { timer, .. } => *timer = 0.0,
            ZombieBehavior::Dying { timer } => {
                *timer = 0.0;
                cx.body.clear_slow();
                let at = cx.body.pos - Vec2::new(0.0, 20.0);
                cx.env.particles.emit(at, ParticleKind::Limb, 5);
                cx.env.particles.emit(at, ParticleKind::Spark, 3);
            }
            ZombieBehavior::Walking => {}
        }
    }

    fn tick(&mut self, cx: &mut ZombieCx<'a, 'w>, dt: f32) -> Transition<Self> {
        match self {
            ZombieBehavior::Walking => {
                cx.body.pos.x -= cx.body.speed * dt;
                if cx.body.pos.x <= HOUSE_X {
                    cx.body.reached_house = true;
                }
                match cx.body.find_target(cx.env.lawn) {
                    Some(target) => Transition::To(ZombieBehavior::Attacking { target, timer: 0.0 }),
                    None => Transition::Stay,
                }
            }
            ZombieBehavior::Attacking { target, timer } => {
                *timer += dt;
                // Re-checked every tick; the plant may have died or been dug up
                let Some(found) = cx.body.find_target(cx.env.lawn) else {
                    return Transition::Revert;
                };
                *target = found;
                if *timer >= cx.body.attack_interval_ms {
                    *timer = 0.0;
                    cx.env.lawn.damage_plant(found, cx.body.damage, cx.env.particles);
                }
                Transition::Stay
            }
            ZombieBehavior::Dying { timer } => {
                *timer += dt;
                if *timer >= DEATH_DURATION_MS {
                    cx.body.dead = true;
                }
                Transition::Stay
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Zombie {
    pub id: u32,
    pub kind: ZombieKind,
    pub body: ZombieBody,
    fsm: StateMachine<ZombieBehavior>,
}

impl Zombie {
    pub fn new(id: u32, kind: ZombieKind, stats: &ZombieStats, row: usize, x: f32) -> Self {
        Self {
            id,
            kind,
            body: ZombieBody {
                row,
                pos: Vec2::new(x, row_center_y(row)),
                health: stats.health,
                max_health: stats.health,
                damage: stats.damage,
                attack_interval_ms: stats.attack_interval_ms,
                base_speed: stats.speed,
                speed: stats.speed,
                score: stats.score,
                slow: None,
                dead: false,
                reached_house: false,
                flash_ms: 0.0,
                frame: 0,
                frame_timer: 0.0,
                wobble_timer: 0.0,
            },
            fsm: StateMachine::with_state(ZombieBehavior::Walking),
        }
    }

    pub fn state_name(&self) -> &'static str {
        self.fsm.current().map_or("none", ZombieBehavior::name)
    }

    pub fn is_dying(&self) -> bool {
        matches!(self.fsm.current(), Some(ZombieBehavior::Dying { .. }))
    }

    /// Removed from the world once this is set
    pub fn is_dead(&self) -> bool {
        self.body.dead
    }

    /// Can be hit, slowed or bitten by a mower
    pub fn is_targetable(&self) -> bool {
        !self.body.dead && !self.is_dying()
    }

    pub fn is_frozen(&self) -> bool {
        self.body.slow.is_some()
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.body.pos.x - 20.0, self.body.pos.y - 75.0, 40.0, 95.0)
    }

    pub fn health_ratio(&self) -> f32 {
        if self.body.max_health <= 0 {
            return 0.0;
        }
        (self.body.health as f32 / self.body.max_health as f32).clamp(0.0, 1.0)
    }

    pub fn tick(&mut self, dt: f32, env: &mut Surroundings<'_>) {
        if self.body.dead {
            return;
        }
        if self.body.flash_ms > 0.0 {
            self.body.flash_ms = (self.body.flash_ms - dt).max(0.0);
        }
        self.body.tick_slow(dt);

        let mut cx = ZombieCx {
            body: &mut self.body,
            env,
        };
        self.fsm.tick(&mut cx, dt);

        self.body.frame_timer += dt;
        if self.body.frame_timer >= FRAME_MS {
            self.body.frame_timer = 0.0;
            self.body.frame = (self.body.frame + 1) % FRAME_COUNT;
        }
        self.body.wobble_timer += dt * 0.005;
    }

    /// Apply damage. Returns the score awarded, which is nonzero only for the
    /// hit that kills.
    pub fn take_damage(&mut self, amount: i32, env: &mut Surroundings<'_>) -> u32 {
        if !self.is_targetable() {
            return 0;
        }
        self.body.health -= amount;
        self.body.flash_ms = FLASH_DURATION_MS;
        env.particles
            .emit(self.body.pos - Vec2::new(0.0, 20.0), ParticleKind::Spark, 2);

        if self.body.health > 0 {
            return 0;
        }
        self.body.health = 0;
        log::debug!("zombie {} ({}) down in row {}", self.id, self.kind.as_str(), self.body.row);
        let mut cx = ZombieCx {
            body: &mut self.body,
            env,
        };
        self.fsm.transition(ZombieBehavior::Dying { timer: 0.0 }, &mut cx);
        self.body.score
    }

    /// Kill outright, regardless of remaining health
    pub fn die(&mut self, env: &mut Surroundings<'_>) -> u32 {
        let health = self.body.health.max(1);
        self.take_damage(health, env)
    }

    /// Slow the zombie; ignored once it is dying
    pub fn apply_slow(&mut self, factor: f32, duration_ms: f32) {
        if self.is_targetable() {
            self.body.apply_slow(factor, duration_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell_center;
    use crate::sim::plant::Plant;
    use crate::tuning::{PlantKind, Tuning};

    struct World {
        lawn: Lawn,
        particles: ParticleSystem,
    }

    impl World {
        fn new() -> Self {
            Self {
                lawn: Lawn::new(),
                particles: ParticleSystem::new(100, 0, 1),
            }
        }

        fn env(&mut self) -> Surroundings<'_> {
            Surroundings {
                lawn: &mut self.lawn,
                particles: &mut self.particles,
            }
        }
    }

    fn normal(x: f32) -> Zombie {
        let tuning = Tuning::default();
        Zombie::new(1, ZombieKind::Normal, tuning.zombie(ZombieKind::Normal).unwrap(), 1, x)
    }

    fn plant_at(world: &mut World, row: usize, col: usize) -> u32 {
        let tuning = Tuning::default();
        let id = 100 + col as u32;
        let plant = Plant::new(id, PlantKind::Wallnut, tuning.plant(PlantKind::Wallnut).unwrap(), row, col);
        world.lawn.insert(plant);
        id
    }

    #[test]
    fn test_walks_left_at_speed() {
        let mut world = World::new();
        let mut z = normal(600.0);
        z.tick(100.0, &mut world.env());
        assert!((z.body.pos.x - 599.2).abs() < 1e-3);
        assert_eq!(z.state_name(), "walking");
    }

    #[test]
    fn test_bites_plant_in_reach_and_reverts_when_gone() {
        let mut world = World::new();
        let id = plant_at(&mut world, 1, 2);
        let plant_x = cell_center(1, 2).x;
        let mut z = normal(plant_x + 15.0);

        z.tick(16.0, &mut world.env());
        assert_eq!(z.state_name(), "attacking");

        z.tick(1500.0, &mut world.env());
        assert_eq!(world.lawn.get(id).map(|p| p.health), Some(380));

        world.lawn.remove(id);
        z.tick(16.0, &mut world.env());
        assert_eq!(z.state_name(), "walking");
    }

    #[test]
    fn test_ignores_plants_in_other_lanes_or_behind() {
        let mut world = World::new();
        plant_at(&mut world, 0, 2);
        let mut z = normal(cell_center(1, 2).x + 10.0);
        z.tick(16.0, &mut world.env());
        assert_eq!(z.state_name(), "walking");

        let mut world = World::new();
        plant_at(&mut world, 1, 5);
        let mut z = normal(cell_center(1, 5).x - 5.0);
        z.tick(16.0, &mut world.env());
        assert_eq!(z.state_name(), "walking");
    }

    #[test]
    fn test_slow_restores_speed_on_expiry() {
        let mut world = World::new();
        let mut z = normal(800.0);
        z.apply_slow(0.5, 3000.0);
        assert!((z.body.speed - 0.004).abs() < 1e-6);

        for _ in 0..29 {
            z.tick(100.0, &mut world.env());
        }
        assert!(z.is_frozen());
        assert!((z.body.speed - 0.004).abs() < 1e-6);

        z.tick(100.0, &mut world.env());
        assert!(!z.is_frozen());
        assert!((z.body.speed - 0.008).abs() < 1e-6);
    }

    #[test]
    fn test_reapplying_slow_refreshes_without_stacking() {
        let mut world = World::new();
        let mut z = normal(800.0);
        z.apply_slow(0.5, 3000.0);
        z.tick(2000.0, &mut world.env());
        z.apply_slow(0.5, 3000.0);
        assert!((z.body.speed - 0.004).abs() < 1e-6);
        z.tick(2000.0, &mut world.env());
        assert!(z.is_frozen());
        z.tick(1000.0, &mut world.env());
        assert!((z.body.speed - 0.008).abs() < 1e-6);
    }

    #[test]
    fn test_death_clears_slow_and_restores_speed() {
        let mut world = World::new();
        let mut z = normal(800.0);
        z.apply_slow(0.5, 3000.0);
        let score = z.take_damage(1000, &mut world.env());
        assert_eq!(score, 100);
        assert!(z.is_dying());
        assert!(!z.is_frozen());
        assert!((z.body.speed - 0.008).abs() < 1e-6);
        // Limbs and sparks from the death plus the hit sparks
        assert_eq!(world.particles.len(), 10);
    }

    #[test]
    fn test_dying_awards_score_once_and_finishes() {
        let mut world = World::new();
        let mut z = normal(800.0);
        assert_eq!(z.take_damage(100, &mut world.env()), 0);
        assert_eq!(z.take_damage(100, &mut world.env()), 100);
        assert_eq!(z.take_damage(100, &mut world.env()), 0);
        z.apply_slow(0.5, 1000.0);
        assert!(!z.is_frozen());

        z.tick(499.0, &mut world.env());
        assert!(!z.is_dead());
        z.tick(1.0, &mut world.env());
        assert!(z.is_dead());
    }

    #[test]
    fn test_flags_house() {
        let mut world = World::new();
        let mut z = normal(HOUSE_X + 1.0);
        z.tick(200.0, &mut world.env());
        assert!(z.body.reached_house);
    }
}
