//! Plants
//!
//! A plant never reaches into the world while it ticks. Shots, sun and
//! detonations are pushed to an action buffer that the driver applies after
//! every plant has been updated.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::particle::{ParticleKind, ParticleSystem};
use crate::cell_center;
use crate::consts::FLASH_DURATION_MS;
use crate::tuning::{AttackStats, FuseStats, PlantKind, PlantStats, ProductionStats, ProjectileStyle};

const FRAME_MS: f32 = 200.0;
const FRAME_COUNT: u8 = 2;

/// Side effect requested by a plant during its tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlantAction {
    Fire {
        origin: Vec2,
        damage: i32,
        speed: f32,
        style: ProjectileStyle,
    },
    Produce {
        plant_id: u32,
        pos: Vec2,
        value: u32,
    },
    Detonate {
        plant_id: u32,
        pos: Vec2,
        radius: f32,
        damage: i32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plant {
    pub id: u32,
    pub kind: PlantKind,
    pub row: usize,
    pub col: usize,
    pub pos: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub sun_cost: u32,
    pub attack: Option<AttackStats>,
    pub production: Option<ProductionStats>,
    pub fuse: Option<FuseStats>,
    pub active: bool,
    /// Remaining hit flash (ms)
    pub flash_ms: f32,
    /// Sprite frame
    pub frame: u8,
    attack_timer: f32,
    production_timer: f32,
    fuse_timer: f32,
    frame_timer: f32,
}

impl Plant {
    pub fn new(id: u32, kind: PlantKind, stats: &PlantStats, row: usize, col: usize) -> Self {
        Self {
            id,
            kind,
            row,
            col,
            pos: cell_center(row, col),
            health: stats.health,
            max_health: stats.health,
            sun_cost: stats.sun_cost,
            attack: stats.attack,
            production: stats.production,
            fuse: stats.fuse,
            active: true,
            flash_ms: 0.0,
            frame: 0,
            attack_timer: 0.0,
            production_timer: 0.0,
            fuse_timer: 0.0,
            frame_timer: 0.0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos.x - 20.0, self.pos.y - 40.0, 40.0, 50.0)
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }

    /// Fraction of the fuse burned, for bombs
    pub fn fuse_progress(&self) -> Option<f32> {
        self.fuse
            .map(|fuse| (self.fuse_timer / fuse.delay_ms.max(1.0)).min(1.0))
    }

    pub fn tick(&mut self, dt: f32, out: &mut Vec<PlantAction>) {
        if !self.active {
            return;
        }

        if self.flash_ms > 0.0 {
            self.flash_ms = (self.flash_ms - dt).max(0.0);
        }

        if let Some(attack) = self.attack {
            self.attack_timer += dt;
            if self.attack_timer >= attack.interval_ms {
                self.attack_timer = 0.0;
                out.push(PlantAction::Fire {
                    origin: self.pos + Vec2::new(20.0, -10.0),
                    damage: attack.damage,
                    speed: attack.speed,
                    style: attack.style,
                });
            }
        }

        if let Some(production) = self.production {
            self.production_timer += dt;
            if self.production_timer >= production.interval_ms {
                self.production_timer = 0.0;
                out.push(PlantAction::Produce {
                    plant_id: self.id,
                    pos: self.pos,
                    value: production.sun_value,
                });
            }
        }

        if let Some(fuse) = self.fuse {
            self.fuse_timer += dt;
            if self.fuse_timer >= fuse.delay_ms {
                // One detonation; the driver removes the plant
                self.active = false;
                out.push(PlantAction::Detonate {
                    plant_id: self.id,
                    pos: self.pos,
                    radius: fuse.radius,
                    damage: fuse.damage,
                });
            }
        }

        self.frame_timer += dt;
        if self.frame_timer >= FRAME_MS {
            self.frame_timer = 0.0;
            self.frame = (self.frame + 1) % FRAME_COUNT;
        }
    }

    /// Apply a bite. Returns true if this hit killed the plant.
    ///
    /// The caller owns the grid and must vacate the cell on a kill; see
    /// [`super::lawn::Lawn::damage_plant`].
    pub fn take_damage(&mut self, amount: i32, particles: &mut ParticleSystem) -> bool {
        if !self.active {
            return false;
        }
        self.health -= amount;
        self.flash_ms = FLASH_DURATION_MS;
        particles.emit(self.pos, ParticleKind::Leaf, 1);

        if self.health <= 0 {
            self.active = false;
            particles.emit(self.pos, ParticleKind::Leaf, 3);
            return true;
        }
        false
    }
}
