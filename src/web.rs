//! Browser bindings
//!
//! The page owns the canvas, the animation loop and all UI chrome. It drives
//! a [`WebGame`] once per animation frame and paints from the JSON snapshot.

use wasm_bindgen::prelude::*;

use crate::settings::{QualityPreset, Settings};
use crate::sim::{FrameClock, GameState, Snapshot, TickInput, tick};
use crate::tuning::{LevelParams, PlantKind, Tuning};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Lawn Siege (web) starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    clock: FrameClock,
    /// Input collected since the last frame
    pending: TickInput,
}

#[wasm_bindgen]
impl WebGame {
    /// Start a level from its JSON parameters (empty string for the default level)
    #[wasm_bindgen(constructor)]
    pub fn new(level_json: &str, seed: u32) -> Result<WebGame, JsValue> {
        let level = if level_json.trim().is_empty() {
            LevelParams::default()
        } else {
            LevelParams::from_json(level_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        Ok(Self::from_level(level, Settings::default(), seed))
    }

    /// Start one of the built-in campaign levels (1-based)
    pub fn campaign(level: u32, quality: &str, seed: u32) -> Result<WebGame, JsValue> {
        let level = LevelParams::builtin()
            .into_iter()
            .find(|l| l.id == level)
            .ok_or_else(|| JsValue::from_str(&format!("no level {level}")))?;
        let settings = Settings::from_preset(QualityPreset::from_str(quality).unwrap_or_default());
        Ok(Self::from_level(level, settings, seed))
    }

    /// Advance by the time elapsed since the previous call
    pub fn frame(&mut self, now_ms: f64) {
        let input = std::mem::take(&mut self.pending);
        if input.pause {
            // Time spent paused never reaches the simulation
            self.clock.reset();
        }
        let dt = self.clock.delta(now_ms);
        tick(&mut self.state, &input, dt);
    }

    /// Pointer press in canvas coordinates
    pub fn click(&mut self, x: f32, y: f32) {
        self.pending.pointer = Some(glam::Vec2::new(x, y));
    }

    pub fn place(&mut self, kind: &str, row: usize, col: usize) -> bool {
        let Some(kind) = PlantKind::from_str(kind) else {
            log::warn!("unknown plant kind '{kind}'");
            return false;
        };
        match self.state.place_plant(kind, row, col) {
            Ok(_) => true,
            Err(err) => {
                log::debug!("placement rejected: {err}");
                false
            }
        }
    }

    /// Shovel the plant at a cell
    pub fn remove(&mut self, row: usize, col: usize) -> bool {
        self.state.remove_plant(row, col).is_some()
    }

    pub fn toggle_pause(&mut self) {
        self.pending.pause = !self.pending.pause;
    }

    pub fn set_show_perf(&mut self, show: bool) {
        self.state.settings.show_perf = show;
    }

    pub fn snapshot_json(&self) -> String {
        Snapshot::capture(&self.state).to_json().unwrap_or_else(|e| {
            log::error!("snapshot serialization failed: {e}");
            String::from("{}")
        })
    }
}

impl WebGame {
    fn from_level(level: LevelParams, settings: Settings, seed: u32) -> Self {
        Self {
            state: GameState::new(level, Tuning::default(), settings, u64::from(seed)),
            clock: FrameClock::new(),
            pending: TickInput::default(),
        }
    }
}
