//! Sun tokens and the sun balance
//!
//! Natural sun falls from the sky with a bouncing ease and disappears if left
//! alone. Plant-made and refund sun appears in place and waits indefinitely.
//! Clicking a token flies it to the counter along a cubic Bezier; its value is
//! credited once, when it arrives.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::circle_hit;
use crate::consts::{
    CELL_HEIGHT, CELL_WIDTH, GRID_COLS, GRID_ROWS, GRID_START_X, GRID_START_Y, SUN_COUNTER_X,
    SUN_COUNTER_Y,
};
use crate::tuning::SunTuning;

/// Spin per update, for rendering
const SPIN: f32 = 0.02;

/// Standard ease-out-bounce curve on [0, 1]
pub fn ease_out_bounce(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

/// Point on a cubic Bezier curve
pub fn bezier(t: f32, p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// Where collected sun flies to
pub fn counter_target() -> Vec2 {
    Vec2::new(SUN_COUNTER_X + 20.0, SUN_COUNTER_Y + 20.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SunPhase {
    Dropping { elapsed: f32, from_y: f32, to_y: f32 },
    Resting,
    Collecting { elapsed: f32, start: Vec2 },
    Consumed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SunToken {
    pub id: u32,
    pub pos: Vec2,
    pub value: u32,
    pub radius: f32,
    pub phase: SunPhase,
    /// Fell from the sky; expires if not collected
    pub natural: bool,
    pub rotation: f32,
    /// Time spent resting on the lawn (ms)
    rest_ms: f32,
}

impl SunToken {
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, SunPhase::Consumed)
    }

    pub fn is_collecting(&self) -> bool {
        matches!(self.phase, SunPhase::Collecting { .. })
    }

    /// Pointer hit test with grab slack
    pub fn hit(&self, point: Vec2, tolerance: f32) -> bool {
        self.is_active() && !self.is_collecting() && circle_hit(self.pos, self.radius, tolerance, point)
    }

    /// Start flying to the counter
    pub fn collect(&mut self) -> bool {
        match self.phase {
            SunPhase::Dropping { .. } | SunPhase::Resting => {
                self.phase = SunPhase::Collecting {
                    elapsed: 0.0,
                    start: self.pos,
                };
                true
            }
            _ => false,
        }
    }

    /// Advance the token. Returns its value on the tick it reaches the counter.
    pub fn tick(&mut self, dt: f32, tuning: &SunTuning) -> Option<u32> {
        if !self.is_active() {
            return None;
        }
        self.rotation += SPIN;

        match &mut self.phase {
            SunPhase::Dropping { elapsed, from_y, to_y } => {
                *elapsed += dt;
                let t = (*elapsed / tuning.drop_duration_ms).min(1.0);
                self.pos.y = *from_y + (*to_y - *from_y) * ease_out_bounce(t);
                if t >= 1.0 {
                    self.phase = SunPhase::Resting;
                }
            }
            SunPhase::Collecting { elapsed, start } => {
                *elapsed += dt;
                let t = (*elapsed / tuning.collect_duration_ms).min(1.0);
                let start = *start;
                let target = counter_target();
                let cp1 = Vec2::new(start.x, start.y - 50.0);
                let cp2 = target - Vec2::splat(50.0);
                self.pos = bezier(t, start, cp1, cp2, target);
                self.radius = tuning.radius * (1.0 - t * 0.5);
                if t >= 1.0 {
                    self.phase = SunPhase::Consumed;
                    return Some(self.value);
                }
                return None;
            }
            SunPhase::Resting => {
                self.rest_ms += dt;
                if self.natural && self.rest_ms >= tuning.expire_ms {
                    self.phase = SunPhase::Consumed;
                }
            }
            SunPhase::Consumed => {}
        }
        None
    }
}

/// Sun balance plus the tokens on screen
#[derive(Debug, Clone)]
pub struct SunBank {
    balance: u32,
    tokens: Vec<SunToken>,
    tuning: SunTuning,
    natural_interval_ms: f32,
    natural_timer: f32,
    next_id: u32,
}

impl SunBank {
    pub fn new(tuning: SunTuning, start_balance: u32, natural_interval_ms: f32) -> Self {
        Self {
            balance: start_balance,
            tokens: Vec::new(),
            tuning,
            natural_interval_ms,
            natural_timer: 0.0,
            next_id: 1,
        }
    }

    pub fn balance(&self) -> u32 {
        self.balance
    }

    pub fn tokens(&self) -> &[SunToken] {
        &self.tokens
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.balance >= cost
    }

    /// Deduct `cost` if affordable
    pub fn spend(&mut self, cost: u32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.balance -= cost;
        true
    }

    pub fn credit(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
    }

    fn push(&mut self, pos: Vec2, value: u32, natural: bool, phase: SunPhase) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.tokens.push(SunToken {
            id,
            pos,
            value,
            radius: self.tuning.radius,
            phase,
            natural,
            rotation: 0.0,
            rest_ms: 0.0,
        });
        id
    }

    /// Sun that falls from above the field and lands at `landing`
    pub fn drop_natural(&mut self, landing: Vec2) -> u32 {
        let from_y = self.tuning.drop_start_y;
        self.push(
            Vec2::new(landing.x, from_y),
            self.tuning.natural_value,
            true,
            SunPhase::Dropping {
                elapsed: 0.0,
                from_y,
                to_y: landing.y,
            },
        )
    }

    /// Sun that appears in place and never expires
    pub fn place(&mut self, pos: Vec2, value: u32) -> u32 {
        self.push(pos, value, false, SunPhase::Resting)
    }

    /// Count down the sky timer and drop a token at a random spot on the lawn
    pub fn tick_spawner<R: Rng>(&mut self, dt: f32, rng: &mut R) -> Option<u32> {
        self.natural_timer += dt;
        if self.natural_timer < self.natural_interval_ms {
            return None;
        }
        self.natural_timer = 0.0;
        let landing = Vec2::new(
            GRID_START_X + rng.random::<f32>() * GRID_COLS as f32 * CELL_WIDTH,
            GRID_START_Y + rng.random::<f32>() * GRID_ROWS as f32 * CELL_HEIGHT,
        );
        log::debug!("natural sun at ({:.0}, {:.0})", landing.x, landing.y);
        Some(self.drop_natural(landing))
    }

    /// Advance tokens, credit arrivals, drop consumed tokens.
    /// Returns the amount credited this tick.
    pub fn tick(&mut self, dt: f32) -> u32 {
        let mut credited = 0;
        for token in &mut self.tokens {
            if let Some(value) = token.tick(dt, &self.tuning) {
                credited += value;
            }
        }
        self.tokens.retain(SunToken::is_active);
        self.credit(credited);
        credited
    }

    /// Start collecting the topmost token under the pointer
    pub fn handle_pointer(&mut self, point: Vec2) -> bool {
        let tolerance = self.tuning.grab_tolerance;
        match self.tokens.iter_mut().rev().find(|t| t.hit(point, tolerance)) {
            Some(token) => token.collect(),
            None => false,
        }
    }
}
