//! Lawn Siege entry point
//!
//! The browser build is driven through `lawn_siege::web`. Natively this runs a
//! headless autoplay of one level and reports the outcome.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lawn_siege::LevelParams;
    use lawn_siege::consts::REFERENCE_FRAME_MS;
    use lawn_siege::sim::{GameState, TickInput, tick};

    env_logger::init();
    log::info!("Lawn Siege (native) starting...");

    let level_id: u32 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1);
    let Some(level) = LevelParams::builtin().into_iter().find(|l| l.id == level_id) else {
        log::error!("no built-in level {level_id}");
        std::process::exit(1);
    };

    let mut state = GameState::with_level(level, 0x5EED);
    // Twenty simulated minutes is far beyond any level
    let max_frames = (20.0 * 60.0 * 1000.0 / REFERENCE_FRAME_MS) as u32;
    for _ in 0..max_frames {
        let input = TickInput {
            pause: false,
            pointer: autoplay::pick_sun(&state),
        };
        autoplay::plant(&mut state);
        tick(&mut state, &input, REFERENCE_FRAME_MS);
        if state.phase.is_over() {
            break;
        }
    }

    println!(
        "level {}: {} after {:.1}s, score {}, {}/{} zombies killed",
        state.level.id,
        state.phase.as_str(),
        state.time_ms / 1000.0,
        state.score,
        state.zombies_killed,
        state.level.max_zombies
    );
}

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use glam::Vec2;
    use lawn_siege::consts::{GRID_COLS, GRID_ROWS};
    use lawn_siege::sim::GameState;
    use lawn_siege::tuning::PlantKind;

    /// First sun token still waiting to be picked up
    pub fn pick_sun(state: &GameState) -> Option<Vec2> {
        state
            .sun
            .tokens()
            .iter()
            .find(|t| !t.is_collecting())
            .map(|t| t.pos)
    }

    /// Sunflowers in the first column, then shooters, then walls up front
    pub fn plant(state: &mut GameState) {
        let shooter = if state.level.allows(PlantKind::SnowPea) {
            PlantKind::SnowPea
        } else {
            PlantKind::Peashooter
        };
        let plan = [
            (PlantKind::Sunflower, 0..1),
            (shooter, 1..3),
            (PlantKind::Peashooter, 1..3),
            (PlantKind::Wallnut, GRID_COLS - 3..GRID_COLS - 2),
        ];
        for (kind, cols) in plan {
            for col in cols {
                for row in 0..GRID_ROWS {
                    if state.lawn.is_free(row, col) && state.place_plant(kind, row, col).is_ok() {
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is lawn_siege::web::start, this is just to satisfy the compiler
}
