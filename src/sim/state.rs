//! World state owned by the simulation driver
//!
//! Everything a frame mutates lives in [`GameState`]. Balance tables, level
//! parameters and settings are injected at construction and never reloaded
//! mid-level.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::clock::FrameStats;
use super::lawn::Lawn;
use super::mower::MowerLine;
use super::particle::{ParticleKind, ParticleSystem};
use super::plant::{Plant, PlantAction};
use super::projectile::ProjectileSystem;
use super::rows::RowIndex;
use super::sun::SunBank;
use super::zombie::Zombie;
use crate::consts::{GRID_COLS, GRID_ROWS};
use crate::settings::Settings;
use crate::tuning::{LevelParams, PlantKind, Tuning};

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Playing,
    Paused,
    /// Every zombie of the level spawned and was cleared
    Won,
    /// A zombie got into the house with no mower left to stop it
    Lost,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::Won => "won",
            GamePhase::Lost => "lost",
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Why a plant could not be placed. A rejected placement changes nothing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error("the game is not running")]
    NotPlaying,
    #[error("cell ({row}, {col}) is off the lawn")]
    OutOfBounds { row: usize, col: usize },
    #[error("{} is not available in this level", .0.as_str())]
    Locked(PlantKind),
    #[error("no stats for {}", .0.as_str())]
    UnknownPlant(PlantKind),
    #[error("{} is recharging ({remaining_ms:.0} ms left)", .kind.as_str())]
    CoolingDown { kind: PlantKind, remaining_ms: f32 },
    #[error("cell ({row}, {col}) is already planted")]
    Occupied { row: usize, col: usize },
    #[error("{cost} sun needed, {balance} available")]
    InsufficientSun { cost: u32, balance: u32 },
}

#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub level: LevelParams,
    pub tuning: Tuning,
    pub settings: Settings,
    pub phase: GamePhase,
    pub score: u32,
    pub zombies_killed: u32,
    pub zombies_spawned: u32,
    /// Simulated time since level start (ms)
    pub time_ms: f64,
    pub lawn: Lawn,
    pub zombies: Vec<Zombie>,
    pub rows: RowIndex,
    pub projectiles: ProjectileSystem,
    pub particles: ParticleSystem,
    pub sun: SunBank,
    pub mowers: MowerLine,
    /// Seed packet recharge remaining per plant kind (ms)
    pub cooldowns: BTreeMap<PlantKind, f32>,
    pub stats: FrameStats,
    pub(crate) zombie_timer: f32,
    pub(crate) rng: Pcg32,
    /// Scratch buffer for plant side effects
    pub(crate) actions: Vec<PlantAction>,
    next_id: u32,
}

impl GameState {
    pub fn new(level: LevelParams, tuning: Tuning, settings: Settings, seed: u64) -> Self {
        let limits = tuning.limits;
        let particle_cap = settings.max_particles(limits.max_particles);
        log::info!(
            "level {} ({}) starting: {} zombies, {} sun",
            level.id,
            level.name,
            level.max_zombies,
            level.start_sun
        );

        Self {
            seed,
            sun: SunBank::new(tuning.sun, level.start_sun, level.sun_interval_ms(&tuning)),
            mowers: MowerLine::new(tuning.mower),
            projectiles: ProjectileSystem::new(limits.max_projectiles, limits.projectile_pool),
            particles: ParticleSystem::new(particle_cap, limits.particle_pool, seed.wrapping_add(1)),
            level,
            tuning,
            settings,
            phase: GamePhase::Playing,
            score: 0,
            zombies_killed: 0,
            zombies_spawned: 0,
            time_ms: 0.0,
            lawn: Lawn::new(),
            zombies: Vec::with_capacity(limits.max_zombies),
            rows: RowIndex::default(),
            cooldowns: BTreeMap::new(),
            stats: FrameStats::default(),
            zombie_timer: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            actions: Vec::new(),
            next_id: 1,
        }
    }

    /// Level with the reference balance and default settings
    pub fn with_level(level: LevelParams, seed: u64) -> Self {
        Self::new(level, Tuning::default(), Settings::default(), seed)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn cooldown_remaining(&self, kind: PlantKind) -> f32 {
        self.cooldowns.get(&kind).copied().unwrap_or(0.0)
    }

    /// Fraction of the level's zombies defeated
    pub fn progress(&self) -> f32 {
        if self.level.max_zombies == 0 {
            return 1.0;
        }
        (self.zombies_killed as f32 / self.level.max_zombies as f32).min(1.0)
    }

    /// Plant `kind` at a cell, paying its cost and starting its recharge
    pub fn place_plant(&mut self, kind: PlantKind, row: usize, col: usize) -> Result<u32, PlacementError> {
        if self.phase != GamePhase::Playing {
            return Err(PlacementError::NotPlaying);
        }
        if row >= GRID_ROWS || col >= GRID_COLS {
            return Err(PlacementError::OutOfBounds { row, col });
        }
        if !self.level.allows(kind) {
            return Err(PlacementError::Locked(kind));
        }
        let stats = self
            .tuning
            .plant(kind)
            .cloned()
            .ok_or(PlacementError::UnknownPlant(kind))?;
        let remaining_ms = self.cooldown_remaining(kind);
        if remaining_ms > 0.0 {
            return Err(PlacementError::CoolingDown { kind, remaining_ms });
        }
        if !self.lawn.is_free(row, col) {
            return Err(PlacementError::Occupied { row, col });
        }
        if !self.sun.can_afford(stats.sun_cost) {
            return Err(PlacementError::InsufficientSun {
                cost: stats.sun_cost,
                balance: self.sun.balance(),
            });
        }

        let id = self.next_entity_id();
        self.sun.spend(stats.sun_cost);
        self.lawn.insert(Plant::new(id, kind, &stats, row, col));
        if stats.cooldown_ms > 0.0 {
            self.cooldowns.insert(kind, stats.cooldown_ms);
        }
        log::debug!("planted {} at ({row}, {col})", kind.as_str());
        Ok(id)
    }

    /// Dig up the plant at a cell. Half its cost comes back as a sun token.
    /// Returns the refund value, or `None` for an empty cell.
    pub fn remove_plant(&mut self, row: usize, col: usize) -> Option<u32> {
        if self.phase.is_over() {
            return None;
        }
        let plant = self.lawn.remove_at(row, col)?;
        self.particles.emit(plant.pos, ParticleKind::Leaf, 8);
        let refund = plant.sun_cost / 2;
        if refund > 0 {
            self.sun.place(plant.pos, refund);
        }
        log::debug!("dug up {} at ({row}, {col}), refund {refund}", plant.kind.as_str());
        Some(refund)
    }

    /// Pointer press at world coordinates; collects sun under the pointer
    pub fn handle_pointer(&mut self, pos: Vec2) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.sun.handle_pointer(pos)
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }

    /// Everything alive on the field, for frame statistics
    pub fn entity_count(&self) -> usize {
        self.lawn.len()
            + self.zombies.len()
            + self.projectiles.len()
            + self.particles.len()
            + self.sun.tokens().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::with_level(LevelParams::default(), 42)
    }

    #[test]
    fn test_place_spends_and_starts_cooldown() {
        let mut state = state();
        let id = state.place_plant(PlantKind::Peashooter, 0, 0).unwrap();
        assert_eq!(state.sun.balance(), 50);
        assert_eq!(state.lawn.plant_at(0, 0).map(|p| p.id), Some(id));
        assert_eq!(state.cooldown_remaining(PlantKind::Peashooter), 5000.0);

        let err = state.place_plant(PlantKind::Peashooter, 0, 1).unwrap_err();
        assert!(matches!(err, PlacementError::CoolingDown { .. }));
    }

    #[test]
    fn test_rejections_mutate_nothing() {
        let mut state = state();
        state.place_plant(PlantKind::Sunflower, 1, 1).unwrap();
        let balance = state.sun.balance();

        assert_eq!(
            state.place_plant(PlantKind::Wallnut, 1, 1),
            Err(PlacementError::Occupied { row: 1, col: 1 })
        );
        assert_eq!(
            state.place_plant(PlantKind::Peashooter, GRID_ROWS, 0),
            Err(PlacementError::OutOfBounds { row: GRID_ROWS, col: 0 })
        );
        assert_eq!(
            state.place_plant(PlantKind::SnowPea, 2, 2),
            Err(PlacementError::InsufficientSun { cost: 175, balance })
        );
        assert_eq!(state.sun.balance(), balance);
        assert_eq!(state.lawn.len(), 1);
        assert!(state.cooldowns.get(&PlantKind::Wallnut).is_none());
    }

    #[test]
    fn test_locked_and_paused_placement() {
        let level = LevelParams::builtin().remove(0);
        let mut state = GameState::with_level(level, 1);
        assert_eq!(
            state.place_plant(PlantKind::CherryBomb, 0, 0),
            Err(PlacementError::Locked(PlantKind::CherryBomb))
        );
        state.toggle_pause();
        assert_eq!(state.place_plant(PlantKind::Peashooter, 0, 0), Err(PlacementError::NotPlaying));
    }

    #[test]
    fn test_unknown_plant() {
        let mut tuning = Tuning::default();
        tuning.plants.remove(&PlantKind::Wallnut);
        let mut state = GameState::new(LevelParams::default(), tuning, Settings::default(), 3);
        assert_eq!(
            state.place_plant(PlantKind::Wallnut, 0, 0),
            Err(PlacementError::UnknownPlant(PlantKind::Wallnut))
        );
    }

    #[test]
    fn test_shovel_refunds_half_as_token() {
        let mut state = state();
        state.place_plant(PlantKind::Peashooter, 2, 3).unwrap();
        assert_eq!(state.remove_plant(2, 3), Some(50));
        assert!(state.lawn.is_free(2, 3));
        assert_eq!(state.sun.tokens().len(), 1);
        assert_eq!(state.sun.tokens()[0].value, 50);
        assert_eq!(state.particles.len(), 8);
        assert_eq!(state.remove_plant(2, 3), None);
    }

    #[test]
    fn test_error_messages() {
        let err = PlacementError::InsufficientSun { cost: 100, balance: 25 };
        assert_eq!(err.to_string(), "100 sun needed, 25 available");
        assert_eq!(
            PlacementError::Locked(PlantKind::SnowPea).to_string(),
            "snow_pea is not available in this level"
        );
    }
}
