//! Cosmetic particle effects
//!
//! Particles never affect gameplay. They live in a pooled list and are
//! integrated in reference-frame units so bursts look the same at any frame
//! rate.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pool::{Pool, Poolable};
use crate::consts::REFERENCE_FRAME_MS;

/// Visual particle families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    /// Grey sparks from hits on zombies
    #[default]
    Spark,
    /// Green fragments from plants being bitten or dug up
    Leaf,
    /// Zombie limbs scattered on death
    Limb,
    /// Round debris from explosions
    Burst,
}

impl ParticleKind {
    /// Downward acceleration per reference frame
    pub fn gravity(&self) -> f32 {
        match self {
            ParticleKind::Spark => 0.0,
            ParticleKind::Leaf => 0.05,
            ParticleKind::Limb => 0.15,
            ParticleKind::Burst => 0.1,
        }
    }

    /// Render color as 0xRRGGBB
    pub fn color(&self) -> u32 {
        match self {
            ParticleKind::Spark => 0x808080,
            ParticleKind::Leaf => 0x32CD32,
            ParticleKind::Limb => 0x6B8E23,
            ParticleKind::Burst => 0xFF4500,
        }
    }

    fn size_range(&self) -> (f32, f32) {
        match self {
            ParticleKind::Spark => (2.0, 4.0),
            ParticleKind::Leaf => (3.0, 6.0),
            ParticleKind::Limb => (5.0, 10.0),
            ParticleKind::Burst => (3.0, 6.0),
        }
    }

    /// Base lifetime in reference frames
    fn life(&self) -> f32 {
        match self {
            ParticleKind::Spark => 20.0,
            ParticleKind::Leaf => 30.0,
            ParticleKind::Limb => 40.0,
            ParticleKind::Burst => 30.0,
        }
    }

    /// Launch speed per reference frame
    fn velocity(&self) -> f32 {
        match self {
            ParticleKind::Spark => 2.0,
            ParticleKind::Leaf => 1.5,
            ParticleKind::Limb => 3.0,
            ParticleKind::Burst => 2.0,
        }
    }
}

/// A single particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub active: bool,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in reference frames
    pub life: f32,
    pub max_life: f32,
    pub kind: ParticleKind,
    pub color: u32,
    pub size: f32,
    pub alpha: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub gravity: f32,
    /// Tie alpha to the remaining-life fraction
    pub fade: bool,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            active: false,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            life: 0.0,
            max_life: 0.0,
            kind: ParticleKind::Spark,
            color: 0xFFFFFF,
            size: 2.0,
            alpha: 1.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            gravity: 0.0,
            fade: true,
        }
    }
}

impl Poolable for Particle {}

impl Particle {
    /// Advance by `steps` reference frames. Returns false once expired.
    pub fn tick(&mut self, steps: f32) -> bool {
        if !self.active {
            return false;
        }
        self.life -= steps;
        self.pos += self.vel * steps;
        self.vel.y += self.gravity * steps;
        self.rotation += self.rotation_speed * steps;

        if self.fade && self.max_life > 0.0 {
            self.alpha = (self.life / self.max_life).clamp(0.0, 1.0);
        }

        if self.life <= 0.0 {
            self.active = false;
            return false;
        }
        true
    }
}

/// Pooled particle emitter
#[derive(Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    pool: Pool<Particle>,
    /// Live particle ceiling (0 disables effects)
    cap: usize,
    rng: Pcg32,
}

impl ParticleSystem {
    pub fn new(cap: usize, reserved: usize, seed: u64) -> Self {
        Self {
            particles: Vec::with_capacity(cap),
            pool: Pool::with_capacity(reserved),
            cap,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn pool(&self) -> &Pool<Particle> {
        &self.pool
    }

    /// Room left under the live ceiling
    fn headroom(&self) -> usize {
        self.cap.saturating_sub(self.particles.len())
    }

    /// Scatter `count` particles of `kind` from `pos`
    ///
    /// Requests beyond the live ceiling are dropped. Returns how many spawned.
    pub fn emit(&mut self, pos: Vec2, kind: ParticleKind, count: usize) -> usize {
        let count = count.min(self.headroom());
        let (min_size, max_size) = kind.size_range();
        for _ in 0..count {
            let angle = self.rng.random::<f32>() * TAU;
            let speed = kind.velocity();
            let jitter_x = 0.5 + self.rng.random::<f32>();
            let jitter_y = 0.5 + self.rng.random::<f32>();
            let life = kind.life() + self.rng.random::<f32>() * 5.0;

            let mut p = self.pool.acquire();
            p.active = true;
            p.pos = pos;
            p.vel = Vec2::new(
                angle.cos() * speed * jitter_x,
                angle.sin() * speed * jitter_y - speed * 0.5,
            );
            p.life = life;
            p.max_life = life;
            p.kind = kind;
            p.color = kind.color();
            p.size = min_size + self.rng.random::<f32>() * (max_size - min_size);
            p.gravity = kind.gravity();
            p.rotation_speed = (self.rng.random::<f32>() - 0.5) * 0.2;
            self.particles.push(p);
        }
        count
    }

    /// Radial ring of debris for explosions
    pub fn explode(&mut self, pos: Vec2, color: u32) -> usize {
        let count = 15.min(self.headroom());
        for i in 0..count {
            let angle = i as f32 / count as f32 * TAU;
            let speed = 3.0 + self.rng.random::<f32>() * 2.0;
            let life = 20.0 + self.rng.random::<f32>() * 10.0;

            let mut p = self.pool.acquire();
            p.active = true;
            p.pos = pos;
            p.vel = Vec2::new(angle.cos(), angle.sin()) * speed;
            p.life = life;
            p.max_life = life;
            p.kind = ParticleKind::Burst;
            p.color = color;
            p.size = 3.0 + self.rng.random::<f32>() * 3.0;
            p.gravity = ParticleKind::Burst.gravity();
            p.rotation_speed = 0.1;
            self.particles.push(p);
        }
        count
    }

    /// Advance all particles, returning expired ones to the pool
    pub fn tick(&mut self, dt: f32) {
        let steps = dt / REFERENCE_FRAME_MS;
        let mut i = 0;
        while i < self.particles.len() {
            if self.particles[i].tick(steps) {
                i += 1;
            } else {
                let dead = self.particles.swap_remove(i);
                self.pool.release(dead);
            }
        }
    }
}
