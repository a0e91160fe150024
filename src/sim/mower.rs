//! Last line of defense: one lawn mower per lane

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::zombie::{Surroundings, Zombie};
use crate::consts::{FIELD_EXIT_X, GRID_ROWS, REFERENCE_FRAME_MS};
use crate::row_center_y;
use crate::tuning::MowerTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MowerState {
    Idle,
    Running,
    Spent,
}

impl MowerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MowerState::Idle => "idle",
            MowerState::Running => "running",
            MowerState::Spent => "spent",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mower {
    pub row: usize,
    pub pos: Vec2,
    pub state: MowerState,
}

#[derive(Debug, Clone)]
pub struct MowerLine {
    mowers: Vec<Mower>,
    tuning: MowerTuning,
}

impl MowerLine {
    pub fn new(tuning: MowerTuning) -> Self {
        let mowers = (0..GRID_ROWS)
            .map(|row| Mower {
                row,
                pos: Vec2::new(tuning.start_x, row_center_y(row)),
                state: MowerState::Idle,
            })
            .collect();
        Self { mowers, tuning }
    }

    pub fn mowers(&self) -> &[Mower] {
        &self.mowers
    }

    pub fn get_mut(&mut self, row: usize) -> Option<&mut Mower> {
        self.mowers.get_mut(row)
    }

    /// Some lane can still save the house
    pub fn any_idle(&self) -> bool {
        self.mowers.iter().any(|m| m.state == MowerState::Idle)
    }

    /// Start the mower of every lane a zombie has pushed into. Mowers that
    /// already left are untouched, so repeated calls are harmless.
    pub fn check_trigger(&mut self, zombies: &[Zombie]) {
        for zombie in zombies {
            if !zombie.is_targetable() || zombie.body.pos.x > self.tuning.trigger_x {
                continue;
            }
            if let Some(mower) = self.mowers.get_mut(zombie.body.row) {
                if mower.state == MowerState::Idle {
                    mower.state = MowerState::Running;
                    log::info!("lawn mower triggered in row {}", mower.row);
                }
            }
        }
    }

    /// Drive running mowers and flatten anything they touch.
    /// Returns the score earned by kills.
    pub fn update(&mut self, dt: f32, zombies: &mut [Zombie], env: &mut Surroundings<'_>) -> u32 {
        let steps = dt / REFERENCE_FRAME_MS;
        let mut score = 0;
        for mower in self.mowers.iter_mut().filter(|m| m.state == MowerState::Running) {
            mower.pos.x += self.tuning.speed * steps;
            for zombie in zombies.iter_mut() {
                if zombie.body.row == mower.row
                    && zombie.is_targetable()
                    && (zombie.body.pos.x - mower.pos.x).abs() < self.tuning.hit_range
                {
                    score += zombie.die(env);
                }
            }
            if mower.pos.x > FIELD_EXIT_X {
                mower.state = MowerState::Spent;
            }
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lawn::Lawn;
    use crate::sim::particle::ParticleSystem;
    use crate::tuning::{Tuning, ZombieKind};

    fn zombie(id: u32, kind: ZombieKind, row: usize, x: f32) -> Zombie {
        let stats = *Tuning::default().zombie(kind).unwrap();
        Zombie::new(id, kind, &stats, row, x)
    }

    #[test]
    fn test_trigger_is_idempotent() {
        let mut line = MowerLine::new(MowerTuning::default());
        let zombies = vec![zombie(1, ZombieKind::Normal, 2, 105.0)];
        line.check_trigger(&zombies);
        let after_first: Vec<MowerState> = line.mowers().iter().map(|m| m.state).collect();
        line.check_trigger(&zombies);
        line.check_trigger(&zombies);
        let after_third: Vec<MowerState> = line.mowers().iter().map(|m| m.state).collect();
        assert_eq!(after_first, after_third);
        assert_eq!(line.mowers()[2].state, MowerState::Running);
        assert_eq!(line.mowers().iter().filter(|m| m.state == MowerState::Idle).count(), 4);
    }

    #[test]
    fn test_zombie_short_of_threshold_does_not_trigger() {
        let mut line = MowerLine::new(MowerTuning::default());
        line.check_trigger(&[zombie(1, ZombieKind::Normal, 0, 111.0)]);
        assert!(line.mowers().iter().all(|m| m.state == MowerState::Idle));
    }

    #[test]
    fn test_running_mower_kills_its_lane_and_is_spent() {
        let mut lawn = Lawn::new();
        let mut fx = ParticleSystem::new(100, 0, 1);
        let mut env = Surroundings {
            lawn: &mut lawn,
            particles: &mut fx,
        };
        let mut line = MowerLine::new(MowerTuning::default());
        let mut zombies = vec![
            zombie(1, ZombieKind::Buckethead, 1, 100.0),
            zombie(2, ZombieKind::Normal, 1, 500.0),
            zombie(3, ZombieKind::Normal, 3, 500.0),
        ];
        line.check_trigger(&zombies);

        let mut score = 0;
        for _ in 0..400 {
            score += line.update(REFERENCE_FRAME_MS, &mut zombies, &mut env);
        }
        assert!(zombies[0].is_dying());
        assert!(zombies[1].is_dying());
        assert!(zombies[2].is_targetable());
        assert_eq!(score, 400);
        assert_eq!(line.mowers()[1].state, MowerState::Spent);

        // A spent lane cannot fire again
        line.check_trigger(&[zombie(4, ZombieKind::Normal, 1, 50.0)]);
        assert_eq!(line.mowers()[1].state, MowerState::Spent);
        assert!(line.any_idle());
    }
}
