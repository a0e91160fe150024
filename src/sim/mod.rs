//! Frame-driven simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - Clamped, millisecond frame deltas
//! - Seeded RNG only
//! - Single-threaded; the driver owns every piece of mutable state

pub mod clock;
pub mod collision;
pub mod fsm;
pub mod lawn;
pub mod mower;
pub mod particle;
pub mod plant;
pub mod pool;
pub mod projectile;
pub mod rows;
pub mod snapshot;
pub mod state;
pub mod sun;
pub mod tick;
pub mod zombie;

pub use clock::{FrameClock, FrameStats, FrameSummary, clamp_frame_delta};
pub use collision::Aabb;
pub use fsm::{State, StateMachine, Transition};
pub use lawn::Lawn;
pub use mower::{Mower, MowerLine, MowerState};
pub use particle::{Particle, ParticleKind, ParticleSystem};
pub use plant::{Plant, PlantAction};
pub use pool::{Pool, Poolable};
pub use projectile::{Projectile, ProjectileKind, ProjectileSystem};
pub use rows::RowIndex;
pub use snapshot::Snapshot;
pub use state::{GamePhase, GameState, PlacementError};
pub use sun::{SunBank, SunPhase, SunToken};
pub use tick::{TickInput, tick};
pub use zombie::{Surroundings, Zombie, ZombieBehavior, ZombieBody};
