//! Per-frame simulation step
//!
//! One call advances the whole world in a fixed order:
//! cooldowns, spawners, plants, zombies (then sweep and re-index), mowers,
//! projectiles, particles and sun, and finally the win/loss check.

use glam::Vec2;
use rand::Rng;

use super::clock::clamp_frame_delta;
use super::particle::ParticleKind;
use super::plant::PlantAction;
use super::projectile::ProjectileKind;
use super::state::{GamePhase, GameState};
use super::zombie::{Surroundings, Zombie};
use crate::consts::{GRID_ROWS, ZOMBIE_SPAWN_X};

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pause toggle
    pub pause: bool,
    /// Pointer press in world coordinates
    pub pointer: Option<Vec2>,
}

/// Advance the game by one frame of `raw_dt` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, raw_dt: f32) {
    if input.pause {
        state.toggle_pause();
    }
    if state.phase != GamePhase::Playing {
        return;
    }
    if let Some(pos) = input.pointer {
        state.handle_pointer(pos);
    }

    let dt = clamp_frame_delta(raw_dt);
    state.time_ms += f64::from(dt);

    update_cooldowns(state, dt);
    spawn_zombies(state, dt);
    state.sun.tick_spawner(dt, &mut state.rng);
    update_plants(state, dt);
    update_zombies(state, dt);

    let mut env = Surroundings {
        lawn: &mut state.lawn,
        particles: &mut state.particles,
    };
    state.mowers.check_trigger(&state.zombies);
    state.score += state.mowers.update(dt, &mut state.zombies, &mut env);

    state.projectiles.advance(dt);
    state.score += state
        .projectiles
        .resolve_hits(&mut state.zombies, &state.rows, &mut env);
    state.projectiles.compact();

    state.particles.tick(dt);
    state.sun.tick(dt);

    check_outcome(state);
    let entities = state.entity_count();
    state.stats.record(dt, entities);
}

fn update_cooldowns(state: &mut GameState, dt: f32) {
    state.cooldowns.retain(|_, remaining| {
        *remaining -= dt;
        *remaining > 0.0
    });
}

fn spawn_zombies(state: &mut GameState, dt: f32) {
    if state.zombies_spawned >= state.level.max_zombies {
        return;
    }
    state.zombie_timer += dt;
    if state.zombie_timer < state.level.zombie_interval_ms(&state.tuning)
        || state.zombies.len() >= state.tuning.limits.max_zombies
    {
        return;
    }
    state.zombie_timer = 0.0;

    let row = state.rng.random_range(0..GRID_ROWS);
    let kinds = &state.level.zombie_kinds;
    let Some(&kind) = kinds.get(state.rng.random_range(0..kinds.len().max(1))) else {
        log::warn!("level {} has no zombie kinds", state.level.id);
        return;
    };
    let Some(stats) = state.tuning.zombie(kind).copied() else {
        log::warn!("no stats for zombie kind {}", kind.as_str());
        return;
    };

    let id = state.next_entity_id();
    state.zombies.push(Zombie::new(id, kind, &stats, row, ZOMBIE_SPAWN_X));
    state.zombies_spawned += 1;
    log::debug!(
        "spawned {} zombie {id} in row {row} ({}/{})",
        kind.as_str(),
        state.zombies_spawned,
        state.level.max_zombies
    );
}

fn update_plants(state: &mut GameState, dt: f32) {
    let mut actions = std::mem::take(&mut state.actions);
    for plant in state.lawn.plants_mut() {
        plant.tick(dt, &mut actions);
    }

    for action in actions.drain(..) {
        match action {
            PlantAction::Fire {
                origin,
                damage,
                speed,
                style,
            } => {
                let (kind, radius) = ProjectileKind::from_style(style, &state.tuning.projectiles);
                state.projectiles.spawn(origin, damage, speed, kind, radius);
            }
            PlantAction::Produce { pos, value, .. } => {
                let jitter = Vec2::new(
                    (state.rng.random::<f32>() - 0.5) * 40.0,
                    (state.rng.random::<f32>() - 0.5) * 20.0,
                );
                state.sun.place(pos + jitter, value);
            }
            PlantAction::Detonate {
                plant_id,
                pos,
                radius,
                damage,
            } => {
                let mut env = Surroundings {
                    lawn: &mut state.lawn,
                    particles: &mut state.particles,
                };
                for zombie in state.zombies.iter_mut() {
                    if zombie.is_targetable() && zombie.body.pos.distance(pos) <= radius {
                        state.score += zombie.take_damage(damage, &mut env);
                    }
                }
                state.particles.emit(pos, ParticleKind::Burst, 20);
                state.particles.explode(pos, ParticleKind::Burst.color());
                state.lawn.remove(plant_id);
                log::debug!("plant {plant_id} detonated at ({:.0}, {:.0})", pos.x, pos.y);
            }
        }
    }
    state.actions = actions;
    state.lawn.sweep_inactive();
}

fn update_zombies(state: &mut GameState, dt: f32) {
    let mut env = Surroundings {
        lawn: &mut state.lawn,
        particles: &mut state.particles,
    };
    for zombie in state.zombies.iter_mut() {
        zombie.tick(dt, &mut env);
    }

    let mut i = 0;
    while i < state.zombies.len() {
        if state.zombies[i].is_dead() {
            state.zombies.swap_remove(i);
            state.zombies_killed += 1;
        } else {
            i += 1;
        }
    }
    state.rows.rebuild(&state.zombies);
}

/// Loss needs a zombie at the house and no idle mower anywhere
fn check_outcome(state: &mut GameState) {
    let breached = state
        .zombies
        .iter()
        .any(|z| z.is_targetable() && z.body.reached_house);
    if breached && !state.mowers.any_idle() {
        state.phase = GamePhase::Lost;
        log::info!(
            "level {} lost: score {}, {} zombies killed",
            state.level.id,
            state.score,
            state.zombies_killed
        );
        return;
    }

    if state.zombies_spawned >= state.level.max_zombies && state.zombies.is_empty() {
        state.phase = GamePhase::Won;
        log::info!("level {} won: score {}", state.level.id, state.score);
    }
}
