//! Frame timing: delta clamping and a rolling frame-time window

use serde::Serialize;

use crate::consts::{MAX_FRAME_MS, MAX_PLAUSIBLE_FRAME_MS, REFERENCE_FRAME_MS};

const WINDOW: usize = 60;

/// Sanitize a raw frame delta (ms)
///
/// Non-positive or implausibly long deltas (a backgrounded tab) become one
/// reference frame; anything else is capped.
pub fn clamp_frame_delta(dt: f32) -> f32 {
    let dt = if !(dt > 0.0) || dt > MAX_PLAUSIBLE_FRAME_MS {
        REFERENCE_FRAME_MS
    } else {
        dt
    };
    dt.min(MAX_FRAME_MS)
}

/// Turns host timestamps into clamped deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous timestamp. The first call yields one
    /// reference frame.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let raw = match self.last_ms {
            Some(last) => (now_ms - last) as f32,
            None => REFERENCE_FRAME_MS,
        };
        self.last_ms = Some(now_ms);
        clamp_frame_delta(raw)
    }

    /// Forget the last timestamp, e.g. after resuming from pause
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Summary of the rolling window
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FrameSummary {
    pub avg_ms: f32,
    pub min_ms: f32,
    pub max_ms: f32,
    pub fps: u32,
    pub entities: usize,
}

/// Ring buffer of the last 60 frame times
#[derive(Debug, Clone)]
pub struct FrameStats {
    frame_times: [f32; WINDOW],
    frame_index: usize,
    filled: usize,
    entities: usize,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            frame_times: [0.0; WINDOW],
            frame_index: 0,
            filled: 0,
            entities: 0,
        }
    }
}

impl FrameStats {
    pub fn record(&mut self, dt: f32, entities: usize) {
        self.frame_times[self.frame_index] = dt;
        self.frame_index = (self.frame_index + 1) % WINDOW;
        self.filled = (self.filled + 1).min(WINDOW);
        self.entities = entities;
    }

    pub fn summary(&self) -> FrameSummary {
        if self.filled == 0 {
            return FrameSummary {
                entities: self.entities,
                ..Default::default()
            };
        }
        let samples = &self.frame_times[..self.filled];
        let total: f32 = samples.iter().sum();
        let avg_ms = total / self.filled as f32;
        FrameSummary {
            avg_ms,
            min_ms: samples.iter().copied().fold(f32::INFINITY, f32::min),
            max_ms: samples.iter().copied().fold(0.0, f32::max),
            fps: if avg_ms > 0.0 { (1000.0 / avg_ms).round() as u32 } else { 0 },
            entities: self.entities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clamp_cases() {
        assert_eq!(clamp_frame_delta(0.0), REFERENCE_FRAME_MS);
        assert_eq!(clamp_frame_delta(-5.0), REFERENCE_FRAME_MS);
        assert_eq!(clamp_frame_delta(250.0), REFERENCE_FRAME_MS);
        assert_eq!(clamp_frame_delta(f32::NAN), REFERENCE_FRAME_MS);
        assert_eq!(clamp_frame_delta(80.0), MAX_FRAME_MS);
        assert_eq!(clamp_frame_delta(20.0), 20.0);
    }

    #[test]
    fn test_clock_first_frame_and_deltas() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(1000.0), REFERENCE_FRAME_MS);
        assert_eq!(clock.delta(1010.0), 10.0);
        assert_eq!(clock.delta(5000.0), REFERENCE_FRAME_MS);
        clock.reset();
        assert_eq!(clock.delta(9000.0), REFERENCE_FRAME_MS);
    }

    #[test]
    fn test_stats_window_rolls() {
        let mut stats = FrameStats::default();
        assert_eq!(stats.summary().fps, 0);
        for _ in 0..WINDOW {
            stats.record(40.0, 3);
        }
        for _ in 0..WINDOW {
            stats.record(20.0, 7);
        }
        let s = stats.summary();
        assert_eq!(s.avg_ms, 20.0);
        assert_eq!(s.max_ms, 20.0);
        assert_eq!(s.fps, 50);
        assert_eq!(s.entities, 7);
    }

    proptest! {
        #[test]
        fn prop_clamped_delta_is_always_usable(dt in prop::num::f32::ANY) {
            let out = clamp_frame_delta(dt);
            prop_assert!(out > 0.0);
            prop_assert!(out <= MAX_FRAME_MS);
        }
    }
}
