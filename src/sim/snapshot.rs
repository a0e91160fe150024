//! Read-only view of the world for renderers and the HUD

use serde::Serialize;

use super::clock::FrameSummary;
use super::particle::ParticleKind;
use super::state::{GamePhase, GameState};
use crate::tuning::{PlantKind, ZombieKind};

#[derive(Debug, Clone, Serialize)]
pub struct PlantView {
    pub id: u32,
    pub kind: PlantKind,
    pub row: usize,
    pub col: usize,
    pub x: f32,
    pub y: f32,
    pub health: f32,
    pub flash: bool,
    pub frame: u8,
    /// Fuse progress for bombs
    pub fuse: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZombieView {
    pub id: u32,
    pub kind: ZombieKind,
    pub x: f32,
    pub y: f32,
    pub state: &'static str,
    pub frozen: bool,
    pub health: f32,
    pub flash: bool,
    pub frame: u8,
    pub wobble: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileView {
    pub x: f32,
    pub y: f32,
    pub kind: &'static str,
    pub radius: f32,
    pub rotation: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticleView {
    pub x: f32,
    pub y: f32,
    pub kind: ParticleKind,
    pub color: u32,
    pub size: f32,
    pub alpha: f32,
    pub rotation: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SunView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub rotation: f32,
    pub collecting: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MowerView {
    pub row: usize,
    pub x: f32,
    pub y: f32,
    pub state: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CooldownView {
    pub kind: PlantKind,
    pub remaining_ms: f32,
    pub allowed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub level: u32,
    pub score: u32,
    pub sun: u32,
    pub zombies_killed: u32,
    pub zombies_spawned: u32,
    pub max_zombies: u32,
    pub progress: f32,
    pub cooldowns: Vec<CooldownView>,
    pub plants: Vec<PlantView>,
    pub zombies: Vec<ZombieView>,
    pub projectiles: Vec<ProjectileView>,
    pub particles: Vec<ParticleView>,
    pub suns: Vec<SunView>,
    pub mowers: Vec<MowerView>,
    /// Only present when performance display is enabled
    pub perf: Option<FrameSummary>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let level = &state.level;
        Self {
            phase: state.phase,
            level: level.id,
            score: state.score,
            sun: state.sun.balance(),
            zombies_killed: state.zombies_killed,
            zombies_spawned: state.zombies_spawned,
            max_zombies: level.max_zombies,
            progress: state.progress(),
            cooldowns: state
                .tuning
                .plants
                .keys()
                .map(|&kind| CooldownView {
                    kind,
                    remaining_ms: state.cooldown_remaining(kind),
                    allowed: level.allows(kind),
                })
                .collect(),
            plants: state
                .lawn
                .plants()
                .iter()
                .map(|p| PlantView {
                    id: p.id,
                    kind: p.kind,
                    row: p.row,
                    col: p.col,
                    x: p.pos.x,
                    y: p.pos.y,
                    health: p.health_ratio(),
                    flash: p.flash_ms > 0.0,
                    frame: p.frame,
                    fuse: p.fuse_progress(),
                })
                .collect(),
            zombies: state
                .zombies
                .iter()
                .map(|z| ZombieView {
                    id: z.id,
                    kind: z.kind,
                    x: z.body.pos.x,
                    y: z.body.pos.y,
                    state: z.state_name(),
                    frozen: z.is_frozen(),
                    health: z.health_ratio(),
                    flash: z.body.flash_ms > 0.0,
                    frame: z.body.frame,
                    wobble: z.body.wobble(),
                })
                .collect(),
            projectiles: state
                .projectiles
                .projectiles()
                .iter()
                .map(|p| ProjectileView {
                    x: p.pos.x,
                    y: p.pos.y,
                    kind: p.kind.name(),
                    radius: p.radius,
                    rotation: p.rotation,
                })
                .collect(),
            particles: state
                .particles
                .particles()
                .iter()
                .map(|p| ParticleView {
                    x: p.pos.x,
                    y: p.pos.y,
                    kind: p.kind,
                    color: p.color,
                    size: p.size,
                    alpha: p.alpha,
                    rotation: p.rotation,
                })
                .collect(),
            suns: state
                .sun
                .tokens()
                .iter()
                .map(|s| SunView {
                    id: s.id,
                    x: s.pos.x,
                    y: s.pos.y,
                    radius: s.radius,
                    rotation: s.rotation,
                    collecting: s.is_collecting(),
                })
                .collect(),
            mowers: state
                .mowers
                .mowers()
                .iter()
                .map(|m| MowerView {
                    row: m.row,
                    x: m.pos.x,
                    y: m.pos.y,
                    state: m.state.as_str(),
                })
                .collect(),
            perf: state.settings.show_perf.then(|| state.stats.summary()),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::{TickInput, tick};
    use crate::tuning::LevelParams;

    #[test]
    fn test_snapshot_reflects_world() {
        let mut state = GameState::with_level(LevelParams::default(), 5);
        state.place_plant(PlantKind::Wallnut, 1, 2).unwrap();
        tick(&mut state, &TickInput::default(), 16.0);

        let snap = Snapshot::capture(&state);
        assert_eq!(snap.plants.len(), 1);
        assert_eq!(snap.plants[0].kind, PlantKind::Wallnut);
        assert_eq!(snap.mowers.len(), 5);
        assert_eq!(snap.sun, 100);
        assert!(snap.perf.is_none());
        let wallnut = snap.cooldowns.iter().find(|c| c.kind == PlantKind::Wallnut).unwrap();
        assert!(wallnut.remaining_ms > 0.0);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let state = GameState::with_level(LevelParams::default(), 5);
        let json = Snapshot::capture(&state).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["phase"], "playing");
        assert_eq!(value["mowers"][0]["state"], "idle");
        assert_eq!(value["cooldowns"][0]["kind"], "peashooter");
    }
}
