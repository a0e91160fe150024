//! Lane partitioning for collision culling
//!
//! Bullets only ever test zombies in their own lane. The index is rebuilt from
//! scratch once per tick (after dead zombies are swept) and never patched.

use super::zombie::Zombie;
use crate::consts::GRID_ROWS;

/// Lane -> indices into the zombie list
#[derive(Debug, Clone)]
pub struct RowIndex {
    rows: Vec<Vec<usize>>,
}

impl Default for RowIndex {
    fn default() -> Self {
        Self::new(GRID_ROWS)
    }
}

impl RowIndex {
    pub fn new(lanes: usize) -> Self {
        Self {
            rows: vec![Vec::new(); lanes],
        }
    }

    /// Repopulate from the zombie list, keeping lane allocations
    pub fn rebuild(&mut self, zombies: &[Zombie]) {
        for row in &mut self.rows {
            row.clear();
        }
        for (i, zombie) in zombies.iter().enumerate() {
            if !zombie.is_targetable() {
                continue;
            }
            if let Some(lane) = self.rows.get_mut(zombie.body.row) {
                lane.push(i);
            }
        }
    }

    /// Zombie indices in `row`; empty for lanes off the grid
    pub fn in_row(&self, row: i32) -> &[usize] {
        if row < 0 {
            return &[];
        }
        self.rows.get(row as usize).map_or(&[], Vec::as_slice)
    }
}
