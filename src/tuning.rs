//! Game balance tables and level parameters
//!
//! Everything here is static content supplied to the simulation at
//! construction. `Tuning::default()` is the reference balance; JSON overrides
//! may replace any subset of it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to load a content table
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed content table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level {0} has no zombie kinds")]
    NoZombieKinds(u32),
}

/// Plant species
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantKind {
    Peashooter,
    Sunflower,
    Wallnut,
    SnowPea,
    CherryBomb,
}

impl PlantKind {
    pub const ALL: [PlantKind; 5] = [
        PlantKind::Peashooter,
        PlantKind::Sunflower,
        PlantKind::Wallnut,
        PlantKind::SnowPea,
        PlantKind::CherryBomb,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlantKind::Peashooter => "peashooter",
            PlantKind::Sunflower => "sunflower",
            PlantKind::Wallnut => "wallnut",
            PlantKind::SnowPea => "snow_pea",
            PlantKind::CherryBomb => "cherry_bomb",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "peashooter" => Some(PlantKind::Peashooter),
            "sunflower" => Some(PlantKind::Sunflower),
            "wallnut" => Some(PlantKind::Wallnut),
            "snow_pea" | "snowpea" => Some(PlantKind::SnowPea),
            "cherry_bomb" | "cherrybomb" => Some(PlantKind::CherryBomb),
            _ => None,
        }
    }
}

/// Zombie species
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZombieKind {
    Normal,
    Conehead,
    Buckethead,
    Flag,
}

impl ZombieKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZombieKind::Normal => "normal",
            ZombieKind::Conehead => "conehead",
            ZombieKind::Buckethead => "buckethead",
            ZombieKind::Flag => "flag",
        }
    }
}

/// Which projectile a shooter fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileStyle {
    #[default]
    Plain,
    Slow,
    Splash,
}

/// Shooter stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackStats {
    pub damage: i32,
    /// Time between shots (ms)
    pub interval_ms: f32,
    /// Distance per reference frame
    pub speed: f32,
    pub style: ProjectileStyle,
}

/// Sun producer stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductionStats {
    pub interval_ms: f32,
    pub sun_value: u32,
}

/// One-shot area explosion after a fuse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuseStats {
    pub delay_ms: f32,
    pub radius: f32,
    pub damage: i32,
}

/// Per-species plant stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantStats {
    pub sun_cost: u32,
    /// Seed packet recharge after planting (ms)
    pub cooldown_ms: f32,
    pub health: i32,
    #[serde(default)]
    pub attack: Option<AttackStats>,
    #[serde(default)]
    pub production: Option<ProductionStats>,
    #[serde(default)]
    pub fuse: Option<FuseStats>,
}

/// Per-species zombie stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZombieStats {
    pub health: i32,
    /// Damage per bite
    pub damage: i32,
    pub attack_interval_ms: f32,
    /// Distance per millisecond
    pub speed: f32,
    pub score: u32,
}

/// Projectile payloads
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub plain_radius: f32,
    pub slow_radius: f32,
    pub slow_factor: f32,
    pub slow_duration_ms: f32,
    pub splash_radius: f32,
    /// Area around the impact point that takes splash damage
    pub splash_area: f32,
    pub splash_damage: i32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            plain_radius: 10.0,
            slow_radius: 10.0,
            slow_factor: 0.5,
            slow_duration_ms: 3000.0,
            splash_radius: 16.0,
            splash_area: 50.0,
            splash_damage: 10,
        }
    }
}

/// Sun economy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunTuning {
    pub radius: f32,
    /// Value of naturally falling sun
    pub natural_value: u32,
    /// Natural sun interval when the level does not specify one
    pub natural_interval_ms: f32,
    /// Natural sun falls from this height
    pub drop_start_y: f32,
    pub drop_duration_ms: f32,
    /// Natural sun disappears after resting this long uncollected
    pub expire_ms: f32,
    pub collect_duration_ms: f32,
    /// Extra hit-test slack around the token
    pub grab_tolerance: f32,
}

impl Default for SunTuning {
    fn default() -> Self {
        Self {
            radius: 25.0,
            natural_value: 25,
            natural_interval_ms: 8000.0,
            drop_start_y: -50.0,
            drop_duration_ms: 2000.0,
            expire_ms: 8000.0,
            collect_duration_ms: 500.0,
            grab_tolerance: 10.0,
        }
    }
}

/// Lawn mowers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MowerTuning {
    /// Distance per reference frame once triggered
    pub speed: f32,
    /// Resting x of every mower
    pub start_x: f32,
    /// A zombie at or left of this x triggers its lane
    pub trigger_x: f32,
    /// Horizontal overlap distance for a hit
    pub hit_range: f32,
}

impl Default for MowerTuning {
    fn default() -> Self {
        Self {
            speed: 3.0,
            start_x: crate::consts::GRID_START_X - 50.0,
            trigger_x: crate::consts::GRID_START_X - 30.0,
            hit_range: 40.0,
        }
    }
}

/// Hard ceilings that protect the frame budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_projectiles: usize,
    pub max_particles: usize,
    pub max_zombies: usize,
    /// Preallocated pool sizes
    pub projectile_pool: usize,
    pub particle_pool: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_projectiles: 100,
            max_particles: 100,
            max_zombies: 20,
            projectile_pool: 100,
            particle_pool: 200,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub plants: BTreeMap<PlantKind, PlantStats>,
    pub zombies: BTreeMap<ZombieKind, ZombieStats>,
    pub projectiles: ProjectileTuning,
    pub sun: SunTuning,
    pub mower: MowerTuning,
    pub limits: Limits,
    /// Zombie spawn interval when the level does not specify one
    pub zombie_spawn_interval_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        let mut plants = BTreeMap::new();
        plants.insert(
            PlantKind::Peashooter,
            PlantStats {
                sun_cost: 100,
                cooldown_ms: 5000.0,
                health: 100,
                attack: Some(AttackStats {
                    damage: 20,
                    interval_ms: 1500.0,
                    speed: 5.0,
                    style: ProjectileStyle::Plain,
                }),
                production: None,
                fuse: None,
            },
        );
        plants.insert(
            PlantKind::Sunflower,
            PlantStats {
                sun_cost: 50,
                cooldown_ms: 5000.0,
                health: 80,
                attack: None,
                production: Some(ProductionStats {
                    interval_ms: 24000.0,
                    sun_value: 25,
                }),
                fuse: None,
            },
        );
        plants.insert(
            PlantKind::Wallnut,
            PlantStats {
                sun_cost: 50,
                cooldown_ms: 20000.0,
                health: 400,
                attack: None,
                production: None,
                fuse: None,
            },
        );
        plants.insert(
            PlantKind::SnowPea,
            PlantStats {
                sun_cost: 175,
                cooldown_ms: 5000.0,
                health: 100,
                attack: Some(AttackStats {
                    damage: 20,
                    interval_ms: 1500.0,
                    speed: 5.0,
                    style: ProjectileStyle::Slow,
                }),
                production: None,
                fuse: None,
            },
        );
        plants.insert(
            PlantKind::CherryBomb,
            PlantStats {
                sun_cost: 150,
                cooldown_ms: 30000.0,
                health: 100,
                attack: None,
                production: None,
                fuse: Some(FuseStats {
                    delay_ms: 1500.0,
                    radius: 150.0,
                    damage: 200,
                }),
            },
        );

        let mut zombies = BTreeMap::new();
        let walker = ZombieStats {
            health: 150,
            damage: 20,
            attack_interval_ms: 1500.0,
            speed: 0.008,
            score: 100,
        };
        zombies.insert(ZombieKind::Normal, walker);
        zombies.insert(
            ZombieKind::Conehead,
            ZombieStats {
                health: 400,
                score: 200,
                ..walker
            },
        );
        zombies.insert(
            ZombieKind::Buckethead,
            ZombieStats {
                health: 800,
                score: 300,
                ..walker
            },
        );
        zombies.insert(
            ZombieKind::Flag,
            ZombieStats {
                speed: 0.012,
                score: 150,
                ..walker
            },
        );

        Self {
            plants,
            zombies,
            projectiles: ProjectileTuning::default(),
            sun: SunTuning::default(),
            mower: MowerTuning::default(),
            limits: Limits::default(),
            zombie_spawn_interval_ms: 10000.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) balance table
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn plant(&self, kind: PlantKind) -> Option<&PlantStats> {
        self.plants.get(&kind)
    }

    pub fn zombie(&self, kind: ZombieKind) -> Option<&ZombieStats> {
        self.zombies.get(&kind)
    }
}

/// Resolved parameters for one level, supplied once at level start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    /// Total zombies the level spawns
    pub max_zombies: u32,
    pub zombie_kinds: Vec<ZombieKind>,
    /// Falls back to `Tuning::zombie_spawn_interval_ms`
    #[serde(default)]
    pub zombie_spawn_interval_ms: Option<f32>,
    /// Falls back to `SunTuning::natural_interval_ms`
    #[serde(default)]
    pub natural_sun_interval_ms: Option<f32>,
    pub start_sun: u32,
    /// Plants the player may place in this level
    pub allowed_plants: Vec<PlantKind>,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            id: 0,
            name: "Endless lawn".to_string(),
            max_zombies: 20,
            zombie_kinds: vec![ZombieKind::Normal, ZombieKind::Conehead, ZombieKind::Buckethead],
            zombie_spawn_interval_ms: None,
            natural_sun_interval_ms: None,
            start_sun: 150,
            allowed_plants: PlantKind::ALL.to_vec(),
        }
    }
}

impl LevelParams {
    /// Parse a level, rejecting one that could never finish spawning
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let level: LevelParams = serde_json::from_str(json)?;
        if level.max_zombies > 0 && level.zombie_kinds.is_empty() {
            return Err(TuningError::NoZombieKinds(level.id));
        }
        Ok(level)
    }

    pub fn zombie_interval_ms(&self, tuning: &Tuning) -> f32 {
        self.zombie_spawn_interval_ms.unwrap_or(tuning.zombie_spawn_interval_ms)
    }

    pub fn sun_interval_ms(&self, tuning: &Tuning) -> f32 {
        self.natural_sun_interval_ms.unwrap_or(tuning.sun.natural_interval_ms)
    }

    /// The stock campaign
    pub fn builtin() -> Vec<LevelParams> {
        use PlantKind::*;
        use ZombieKind::*;

        // (max zombies, kinds, spawn interval, sun interval, plant unlocked by winning)
        let table: [(u32, &[ZombieKind], f32, f32, Option<PlantKind>); 10] = [
            (10, &[Normal], 15000.0, 8000.0, None),
            (15, &[Normal], 12000.0, 10000.0, None),
            (20, &[Normal, Conehead], 10000.0, 10000.0, Some(Wallnut)),
            (25, &[Normal, Conehead], 9000.0, 10000.0, Some(CherryBomb)),
            (30, &[Normal, Conehead, Buckethead], 8000.0, 12000.0, Some(SnowPea)),
            (35, &[Normal, Conehead, Buckethead], 7500.0, 12000.0, None),
            (40, &[Normal, Conehead, Buckethead, Flag], 7000.0, 12000.0, None),
            (45, &[Normal, Conehead, Buckethead, Flag], 6500.0, 12000.0, None),
            (50, &[Normal, Conehead, Buckethead, Flag], 6000.0, 12000.0, None),
            (60, &[Normal, Conehead, Buckethead, Flag], 5500.0, 12000.0, None),
        ];

        let mut unlocked = vec![Peashooter, Sunflower];
        let mut levels = Vec::with_capacity(table.len());
        for (i, (max_zombies, kinds, spawn, sun, unlock)) in table.into_iter().enumerate() {
            levels.push(LevelParams {
                id: i as u32 + 1,
                name: format!("Level {}", i + 1),
                max_zombies,
                zombie_kinds: kinds.to_vec(),
                zombie_spawn_interval_ms: Some(spawn),
                natural_sun_interval_ms: Some(sun),
                start_sun: if i == 0 { 200 } else { 150 },
                allowed_plants: unlocked.clone(),
            });
            if let Some(plant) = unlock {
                unlocked.push(plant);
            }
        }
        levels
    }

    pub fn allows(&self, kind: PlantKind) -> bool {
        self.allowed_plants.contains(&kind)
    }
}
