//! Planting grid
//!
//! A plant is referenced from two places: its grid cell and the active plant
//! list. Every removal path goes through [`Lawn`] so the two never disagree.

use super::particle::ParticleSystem;
use super::plant::Plant;
use crate::consts::{GRID_COLS, GRID_ROWS};

#[derive(Debug, Clone, Default)]
pub struct Lawn {
    cells: [[Option<u32>; GRID_COLS]; GRID_ROWS],
    plants: Vec<Plant>,
}

impl Lawn {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_bounds(row: usize, col: usize) -> bool {
        row < GRID_ROWS && col < GRID_COLS
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub fn plants_mut(&mut self) -> &mut [Plant] {
        &mut self.plants
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    pub fn is_free(&self, row: usize, col: usize) -> bool {
        Self::in_bounds(row, col) && self.cells[row][col].is_none()
    }

    pub fn plant_at(&self, row: usize, col: usize) -> Option<&Plant> {
        let id = (*self.cells.get(row)?.get(col)?)?;
        self.get(id)
    }

    pub fn get(&self, id: u32) -> Option<&Plant> {
        self.plants.iter().find(|p| p.id == id)
    }

    /// Active plants in a lane
    pub fn plants_in_row(&self, row: usize) -> impl Iterator<Item = &Plant> {
        self.plants.iter().filter(move |p| p.active && p.row == row)
    }

    /// Occupy the plant's cell. Returns false (and drops nothing in) if the
    /// cell is off the grid or taken.
    pub fn insert(&mut self, plant: Plant) -> bool {
        if !self.is_free(plant.row, plant.col) {
            return false;
        }
        self.cells[plant.row][plant.col] = Some(plant.id);
        self.plants.push(plant);
        true
    }

    /// Clear a cell and hand back its plant
    pub fn remove_at(&mut self, row: usize, col: usize) -> Option<Plant> {
        let id = (*self.cells.get(row)?.get(col)?)?;
        self.remove(id)
    }

    /// Remove a plant by id, clearing its cell
    pub fn remove(&mut self, id: u32) -> Option<Plant> {
        let idx = self.plants.iter().position(|p| p.id == id)?;
        let plant = self.plants.swap_remove(idx);
        if let Some(cell) = self
            .cells
            .get_mut(plant.row)
            .and_then(|r| r.get_mut(plant.col))
        {
            if *cell == Some(id) {
                *cell = None;
            }
        }
        Some(plant)
    }

    /// Bite a plant. A lethal bite vacates its cell. Returns true on a kill.
    pub fn damage_plant(&mut self, id: u32, amount: i32, particles: &mut ParticleSystem) -> bool {
        let Some(plant) = self.plants.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        if !plant.take_damage(amount, particles) {
            return false;
        }
        log::debug!("{} at ({}, {}) eaten", plant.kind.as_str(), plant.row, plant.col);
        self.remove(id);
        true
    }

    /// Drop plants that deactivated themselves
    pub fn sweep_inactive(&mut self) {
        let dead: Vec<u32> = self.plants.iter().filter(|p| !p.active).map(|p| p.id).collect();
        for id in dead {
            self.remove(id);
        }
    }
}
