//! Whole-level runs through the public API

use lawn_siege::consts::{GRID_ROWS, REFERENCE_FRAME_MS};
use lawn_siege::sim::{GamePhase, GameState, MowerState, Snapshot, TickInput, Zombie, tick};
use lawn_siege::tuning::{LevelParams, PlantKind, ZombieKind};

fn quiet_level(max_zombies: u32, spawn_interval_ms: f32) -> LevelParams {
    LevelParams {
        id: 99,
        name: "test lawn".to_string(),
        max_zombies,
        zombie_kinds: vec![ZombieKind::Normal],
        zombie_spawn_interval_ms: Some(spawn_interval_ms),
        natural_sun_interval_ms: Some(5000.0),
        start_sun: 1000,
        allowed_plants: PlantKind::ALL.to_vec(),
    }
}

fn push_zombie(state: &mut GameState, row: usize, x: f32) {
    let stats = *state.tuning.zombie(ZombieKind::Normal).unwrap();
    let id = state.next_entity_id();
    state.zombies.push(Zombie::new(id, ZombieKind::Normal, &stats, row, x));
}

fn run(state: &mut GameState, frames: u32) {
    for _ in 0..frames {
        tick(state, &TickInput::default(), REFERENCE_FRAME_MS);
        if state.phase.is_over() {
            break;
        }
    }
}

#[test]
fn test_same_seed_same_game() {
    let mut a = GameState::with_level(quiet_level(10, 2000.0), 777);
    let mut b = GameState::with_level(quiet_level(10, 2000.0), 777);
    a.place_plant(PlantKind::Peashooter, 2, 1).unwrap();
    b.place_plant(PlantKind::Peashooter, 2, 1).unwrap();

    for frame in 0..3000u32 {
        let input = TickInput {
            pause: false,
            pointer: (frame % 97 == 0).then(|| glam::Vec2::new(400.0, 300.0)),
        };
        tick(&mut a, &input, REFERENCE_FRAME_MS);
        tick(&mut b, &input, REFERENCE_FRAME_MS);
    }

    let snap_a = Snapshot::capture(&a).to_json().unwrap();
    let snap_b = Snapshot::capture(&b).to_json().unwrap();
    assert_eq!(snap_a, snap_b);
    assert_eq!(a.zombies_spawned, b.zombies_spawned);
}

#[test]
fn test_defended_lawn_wins() {
    let mut state = GameState::with_level(quiet_level(3, 3000.0), 11);

    for _ in 0..30_000 {
        for row in 0..GRID_ROWS {
            if state.lawn.is_free(row, 0) {
                let _ = state.place_plant(PlantKind::Peashooter, row, 0);
            }
        }
        tick(&mut state, &TickInput::default(), REFERENCE_FRAME_MS);
        if state.phase.is_over() {
            break;
        }
    }

    assert_eq!(state.phase, GamePhase::Won);
    assert_eq!(state.zombies_killed, 3);
    assert_eq!(state.score, 300);
    assert_eq!(state.progress(), 1.0);
    assert!(state.mowers.mowers().iter().all(|m| m.state == MowerState::Idle));
}

#[test]
fn test_undefended_house_falls_after_every_mower() {
    let mut state = GameState::with_level(quiet_level(100, 1.0e9), 3);

    // One zombie per lane uses up every mower
    for row in 0..GRID_ROWS {
        push_zombie(&mut state, row, 300.0);
    }
    run(&mut state, 3000);
    assert_eq!(state.phase, GamePhase::Playing);
    assert!(state.zombies.is_empty());
    assert!(!state.mowers.any_idle());
    assert!(state.mowers.mowers().iter().all(|m| m.state == MowerState::Spent));
    assert_eq!(state.zombies_killed, GRID_ROWS as u32);

    push_zombie(&mut state, 2, 120.0);
    run(&mut state, 1000);
    assert_eq!(state.phase, GamePhase::Lost);
}

#[test]
fn test_breach_is_ignored_while_a_mower_waits() {
    let mut state = GameState::with_level(quiet_level(100, 1.0e9), 3);
    push_zombie(&mut state, 0, 300.0);
    run(&mut state, 3000);
    assert_eq!(state.mowers.mowers()[0].state, MowerState::Spent);

    // Lane 0 has no mower left, but four other lanes do
    push_zombie(&mut state, 0, 120.0);
    run(&mut state, 1000);
    assert_eq!(state.phase, GamePhase::Playing);
    assert!(state.zombies[0].body.reached_house);
}

#[test]
fn test_paused_game_ignores_clicks_and_time() {
    let mut state = GameState::with_level(quiet_level(5, 1000.0), 8);
    let toggle = TickInput {
        pause: true,
        ..Default::default()
    };
    tick(&mut state, &toggle, REFERENCE_FRAME_MS);
    run(&mut state, 500);
    assert_eq!(state.phase, GamePhase::Paused);
    assert_eq!(state.zombies_spawned, 0);
    assert!(state.place_plant(PlantKind::Peashooter, 0, 0).is_err());

    // 61 frames cross the 1000 ms spawn interval exactly once
    tick(&mut state, &toggle, REFERENCE_FRAME_MS);
    run(&mut state, 60);
    assert_eq!(state.zombies_spawned, 1);
}
