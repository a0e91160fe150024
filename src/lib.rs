//! Lawn Siege - a lane-based tower defense simulation
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (actors, collisions, state machines)
//! - `tuning`: Data-driven game balance and level parameters
//! - `settings`: Quality preferences injected into the simulation
//! - `web`: Browser bindings (wasm32 only)

pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::{QualityPreset, Settings};
pub use tuning::{LevelParams, Tuning};

use glam::Vec2;

/// Playfield geometry and frame timing constants
pub mod consts {
    /// Duration of one nominal frame in milliseconds (60 Hz)
    pub const REFERENCE_FRAME_MS: f32 = 16.67;
    /// Deltas above this are treated as a stalled tab and replaced
    pub const MAX_PLAUSIBLE_FRAME_MS: f32 = 100.0;
    /// Hard cap on the delta fed to the simulation
    pub const MAX_FRAME_MS: f32 = 50.0;

    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 900.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Lawn grid
    pub const GRID_ROWS: usize = 5;
    pub const GRID_COLS: usize = 9;
    pub const CELL_WIDTH: f32 = 80.0;
    pub const CELL_HEIGHT: f32 = 90.0;
    pub const GRID_START_X: f32 = 140.0;
    pub const GRID_START_Y: f32 = 100.0;

    /// Entities past this x are off the right edge of the field
    pub const FIELD_EXIT_X: f32 = CANVAS_WIDTH + 50.0;
    /// Zombies spawn just beyond the right edge
    pub const ZOMBIE_SPAWN_X: f32 = CANVAS_WIDTH + 50.0;
    /// Zombies that walk past this x have reached the house
    pub const HOUSE_X: f32 = GRID_START_X - 60.0;

    /// Sun counter position on screen (collection target)
    pub const SUN_COUNTER_X: f32 = 20.0;
    pub const SUN_COUNTER_Y: f32 = 30.0;

    /// Hit flash after taking damage (ms)
    pub const FLASH_DURATION_MS: f32 = 100.0;
}

/// Lane index for a world-space y coordinate (may be out of range)
#[inline]
pub fn row_for_y(y: f32) -> i32 {
    ((y - consts::GRID_START_Y) / consts::CELL_HEIGHT).floor() as i32
}

/// Vertical center of a lane
#[inline]
pub fn row_center_y(row: usize) -> f32 {
    consts::GRID_START_Y + row as f32 * consts::CELL_HEIGHT + consts::CELL_HEIGHT / 2.0
}

/// Center of a grid cell in world space
#[inline]
pub fn cell_center(row: usize, col: usize) -> Vec2 {
    Vec2::new(
        consts::GRID_START_X + col as f32 * consts::CELL_WIDTH + consts::CELL_WIDTH / 2.0,
        row_center_y(row),
    )
}

/// Grid cell under a world-space point, if inside the lawn
pub fn cell_at(pos: Vec2) -> Option<(usize, usize)> {
    use consts::*;
    let local = pos - Vec2::new(GRID_START_X, GRID_START_Y);
    if local.x < 0.0 || local.y < 0.0 {
        return None;
    }
    let col = (local.x / CELL_WIDTH) as usize;
    let row = (local.y / CELL_HEIGHT) as usize;
    (row < GRID_ROWS && col < GRID_COLS).then_some((row, col))
}
