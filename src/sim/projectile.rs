//! Pooled projectiles and lane-restricted hit resolution

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, within_x};
use super::particle::ParticleKind;
use super::pool::{Pool, Poolable};
use super::rows::RowIndex;
use super::zombie::{Surroundings, Zombie};
use crate::consts::{FIELD_EXIT_X, REFERENCE_FRAME_MS};
use crate::row_for_y;
use crate::tuning::{ProjectileStyle, ProjectileTuning};

/// Horizontal pre-filter before the exact box test
const BROAD_PHASE_X: f32 = 50.0;
/// Spin per reference frame (radians)
const SPIN: f32 = 0.2;
/// Sparks thrown by a splash impact
const SPLASH_SPARKS: usize = 8;

/// Payload carried by a projectile
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ProjectileKind {
    #[default]
    Plain,
    Slowing {
        factor: f32,
        duration_ms: f32,
    },
    Splash {
        radius: f32,
        damage: i32,
    },
}

impl ProjectileKind {
    /// Payload and body radius for a shooter's projectile style
    pub fn from_style(style: ProjectileStyle, tuning: &ProjectileTuning) -> (Self, f32) {
        match style {
            ProjectileStyle::Plain => (ProjectileKind::Plain, tuning.plain_radius),
            ProjectileStyle::Slow => (
                ProjectileKind::Slowing {
                    factor: tuning.slow_factor,
                    duration_ms: tuning.slow_duration_ms,
                },
                tuning.slow_radius,
            ),
            ProjectileStyle::Splash => (
                ProjectileKind::Splash {
                    radius: tuning.splash_area,
                    damage: tuning.splash_damage,
                },
                tuning.splash_radius,
            ),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProjectileKind::Plain => "plain",
            ProjectileKind::Slowing { .. } => "slowing",
            ProjectileKind::Splash { .. } => "splash",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub active: bool,
    pub pos: Vec2,
    /// Distance per reference frame (positive is rightward)
    pub speed: f32,
    pub damage: i32,
    pub radius: f32,
    pub kind: ProjectileKind,
    pub rotation: f32,
}

impl Default for Projectile {
    fn default() -> Self {
        Self {
            active: false,
            pos: Vec2::ZERO,
            speed: 0.0,
            damage: 0,
            radius: 10.0,
            kind: ProjectileKind::Plain,
            rotation: 0.0,
        }
    }
}

impl Poolable for Projectile {}

impl Projectile {
    pub fn bounds(&self) -> Aabb {
        Aabb::around(self.pos, self.radius)
    }
}

#[derive(Debug)]
pub struct ProjectileSystem {
    projectiles: Vec<Projectile>,
    pool: Pool<Projectile>,
    cap: usize,
}

impl ProjectileSystem {
    pub fn new(cap: usize, reserved: usize) -> Self {
        Self {
            projectiles: Vec::with_capacity(cap),
            pool: Pool::with_capacity(reserved),
            cap,
        }
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    pub fn pool(&self) -> &Pool<Projectile> {
        &self.pool
    }

    /// Launch a projectile. Dropped silently at the live cap.
    pub fn spawn(&mut self, origin: Vec2, damage: i32, speed: f32, kind: ProjectileKind, radius: f32) -> bool {
        if self.projectiles.len() >= self.cap {
            return false;
        }
        let mut p = self.pool.acquire();
        p.active = true;
        p.pos = origin;
        p.speed = speed;
        p.damage = damage;
        p.radius = radius;
        p.kind = kind;
        self.projectiles.push(p);
        true
    }

    /// Move every projectile and retire those that left the field
    pub fn advance(&mut self, dt: f32) {
        let steps = dt / REFERENCE_FRAME_MS;
        for p in self.projectiles.iter_mut().filter(|p| p.active) {
            p.pos.x += p.speed * steps;
            p.rotation = (p.rotation + SPIN * steps) % TAU;
            if p.pos.x > FIELD_EXIT_X {
                p.active = false;
            }
        }
    }

    /// Hit-test projectiles against zombies in their own lane
    ///
    /// Each projectile hits at most one zombie and is spent by it. Returns
    /// the score earned by kills.
    pub fn resolve_hits(&mut self, zombies: &mut [Zombie], rows: &RowIndex, env: &mut Surroundings<'_>) -> u32 {
        let mut score = 0;
        for p in self.projectiles.iter_mut().filter(|p| p.active) {
            let bounds = p.bounds();
            let hit = rows.in_row(row_for_y(p.pos.y)).iter().copied().find(|&i| {
                let z = &zombies[i];
                z.is_targetable()
                    && within_x(p.pos.x, z.body.pos.x, BROAD_PHASE_X)
                    && bounds.overlaps(&z.bounds())
            });
            let Some(i) = hit else {
                continue;
            };

            p.active = false;
            score += zombies[i].take_damage(p.damage, env);
            match p.kind {
                ProjectileKind::Plain => {}
                ProjectileKind::Slowing { factor, duration_ms } => {
                    zombies[i].apply_slow(factor, duration_ms);
                }
                ProjectileKind::Splash { radius, damage } => {
                    score += apply_splash(zombies, p.pos, radius, damage, env);
                    env.particles.emit(p.pos, ParticleKind::Spark, SPLASH_SPARKS);
                }
            }
        }
        score
    }

    /// Return spent projectiles to the pool
    pub fn compact(&mut self) {
        let mut i = 0;
        while i < self.projectiles.len() {
            if self.projectiles[i].active {
                i += 1;
            } else {
                let spent = self.projectiles.swap_remove(i);
                self.pool.release(spent);
            }
        }
    }
}

/// Damage every targetable zombie within `radius` of `impact`, in any lane.
/// The zombie struck directly takes this on top of the projectile's damage
/// unless that hit already killed it. Returns the score earned by kills.
pub fn apply_splash(
    zombies: &mut [Zombie],
    impact: Vec2,
    radius: f32,
    damage: i32,
    env: &mut Surroundings<'_>,
) -> u32 {
    let mut score = 0;
    for z in zombies.iter_mut().filter(|z| z.is_targetable()) {
        if z.body.pos.distance(impact) <= radius {
            score += z.take_damage(damage, env);
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row_center_y;
    use crate::sim::lawn::Lawn;
    use crate::sim::particle::ParticleSystem;
    use crate::tuning::{Tuning, ZombieKind};

    fn zombie(id: u32, row: usize, x: f32) -> Zombie {
        let stats = *Tuning::default().zombie(ZombieKind::Normal).unwrap();
        Zombie::new(id, ZombieKind::Normal, &stats, row, x)
    }

    fn harness() -> (Lawn, ParticleSystem) {
        (Lawn::new(), ParticleSystem::new(100, 0, 1))
    }

    #[test]
    fn test_spawn_respects_cap() {
        let mut shots = ProjectileSystem::new(2, 2);
        assert!(shots.spawn(Vec2::ZERO, 20, 5.0, ProjectileKind::Plain, 10.0));
        assert!(shots.spawn(Vec2::ZERO, 20, 5.0, ProjectileKind::Plain, 10.0));
        assert!(!shots.spawn(Vec2::ZERO, 20, 5.0, ProjectileKind::Plain, 10.0));
        assert_eq!(shots.len(), 2);
    }

    #[test]
    fn test_advance_scales_with_dt_and_exits_field() {
        let mut shots = ProjectileSystem::new(10, 0);
        shots.spawn(Vec2::new(100.0, 200.0), 20, 5.0, ProjectileKind::Plain, 10.0);
        shots.advance(REFERENCE_FRAME_MS * 2.0);
        assert!((shots.projectiles()[0].pos.x - 110.0).abs() < 1e-3);

        shots.spawn(Vec2::new(FIELD_EXIT_X - 1.0, 200.0), 20, 5.0, ProjectileKind::Plain, 10.0);
        shots.advance(REFERENCE_FRAME_MS);
        shots.compact();
        assert_eq!(shots.len(), 1);
        assert_eq!(shots.pool().available(), 1);
    }

    #[test]
    fn test_hits_at_most_one_zombie() {
        let (mut lawn, mut fx) = harness();
        let y = row_center_y(2);
        let mut zombies = vec![zombie(1, 2, 400.0), zombie(2, 2, 402.0)];
        let mut rows = RowIndex::default();
        rows.rebuild(&zombies);

        let mut shots = ProjectileSystem::new(10, 0);
        shots.spawn(Vec2::new(400.0, y - 10.0), 20, 5.0, ProjectileKind::Plain, 10.0);
        let mut env = Surroundings {
            lawn: &mut lawn,
            particles: &mut fx,
        };
        shots.resolve_hits(&mut zombies, &rows, &mut env);

        let damaged = zombies.iter().filter(|z| z.body.health < z.body.max_health).count();
        assert_eq!(damaged, 1);
        shots.compact();
        assert!(shots.is_empty());
    }

    #[test]
    fn test_other_lanes_are_never_tested() {
        let (mut lawn, mut fx) = harness();
        let mut zombies = vec![zombie(1, 1, 400.0)];
        let mut rows = RowIndex::default();
        rows.rebuild(&zombies);

        let mut shots = ProjectileSystem::new(10, 0);
        // Overlaps the lane-1 zombie's tall box but flies in lane 2
        shots.spawn(Vec2::new(400.0, row_center_y(2) - 40.0), 20, 5.0, ProjectileKind::Plain, 10.0);
        let mut env = Surroundings {
            lawn: &mut lawn,
            particles: &mut fx,
        };
        shots.resolve_hits(&mut zombies, &rows, &mut env);
        assert_eq!(zombies[0].body.health, zombies[0].body.max_health);
        assert!(shots.projectiles()[0].active);
    }

    #[test]
    fn test_slowing_shot_applies_slow() {
        let (mut lawn, mut fx) = harness();
        let mut zombies = vec![zombie(1, 0, 300.0)];
        let mut rows = RowIndex::default();
        rows.rebuild(&zombies);

        let (kind, radius) = ProjectileKind::from_style(ProjectileStyle::Slow, &ProjectileTuning::default());
        let mut shots = ProjectileSystem::new(10, 0);
        shots.spawn(Vec2::new(295.0, row_center_y(0) - 10.0), 20, 5.0, kind, radius);
        let mut env = Surroundings {
            lawn: &mut lawn,
            particles: &mut fx,
        };
        shots.resolve_hits(&mut zombies, &rows, &mut env);
        assert!(zombies[0].is_frozen());
        assert!((zombies[0].body.speed - 0.004).abs() < 1e-6);
    }

    #[test]
    fn test_splash_reaches_zombies_within_radius() {
        let (mut lawn, mut fx) = harness();
        let impact = Vec2::new(500.0, row_center_y(2));
        let mut zombies = vec![
            zombie(1, 2, 500.0),
            zombie(2, 2, 510.0),
            zombie(3, 2, 540.0),
            zombie(4, 2, 560.0),
        ];
        let mut env = Surroundings {
            lawn: &mut lawn,
            particles: &mut fx,
        };
        apply_splash(&mut zombies, impact, 50.0, 10, &mut env);

        let health: Vec<i32> = zombies.iter().map(|z| z.body.health).collect();
        assert_eq!(health, [140, 140, 140, 150]);
    }

    #[test]
    fn test_splash_shot_damages_target_and_neighbors() {
        let (mut lawn, mut fx) = harness();
        let y = row_center_y(2);
        // Impact at x=390: the target is 10 away, the others 40 and 60
        let mut zombies = vec![zombie(1, 2, 400.0), zombie(2, 2, 430.0), zombie(3, 2, 450.0)];
        let mut rows = RowIndex::default();
        rows.rebuild(&zombies);

        let (kind, radius) = ProjectileKind::from_style(ProjectileStyle::Splash, &ProjectileTuning::default());
        let mut shots = ProjectileSystem::new(10, 0);
        shots.spawn(Vec2::new(390.0, y), 20, 5.0, kind, radius);
        let mut env = Surroundings {
            lawn: &mut lawn,
            particles: &mut fx,
        };
        shots.resolve_hits(&mut zombies, &rows, &mut env);

        let health: Vec<i32> = zombies.iter().map(|z| z.body.health).collect();
        assert_eq!(health, [120, 140, 150]);
        // Two sparks per damaging hit: the shot, then splash on two zombies
        assert_eq!(fx.len(), 3 * 2 + SPLASH_SPARKS);
    }

    #[test]
    fn test_killing_splash_shot_scores_once() {
        let (mut lawn, mut fx) = harness();
        let mut zombies = vec![zombie(1, 2, 400.0)];
        zombies[0].body.health = 15;
        let mut rows = RowIndex::default();
        rows.rebuild(&zombies);

        let (kind, radius) = ProjectileKind::from_style(ProjectileStyle::Splash, &ProjectileTuning::default());
        let mut shots = ProjectileSystem::new(10, 0);
        shots.spawn(Vec2::new(395.0, row_center_y(2)), 20, 5.0, kind, radius);
        let mut env = Surroundings {
            lawn: &mut lawn,
            particles: &mut fx,
        };
        let score = shots.resolve_hits(&mut zombies, &rows, &mut env);
        assert_eq!(score, zombies[0].body.score);
        assert!(zombies[0].is_dying());
    }

    #[test]
    fn test_splash_crosses_lanes() {
        let (mut lawn, mut fx) = harness();
        let impact = Vec2::new(500.0, row_center_y(2) - 45.0);
        let mut zombies = vec![zombie(1, 2, 500.0), zombie(2, 1, 500.0)];
        let mut env = Surroundings {
            lawn: &mut lawn,
            particles: &mut fx,
        };
        apply_splash(&mut zombies, impact, 50.0, 10, &mut env);
        assert_eq!(zombies[0].body.health, 140);
        assert_eq!(zombies[1].body.health, 140);
    }
}
