//! Run state and session lifecycle
//!
//! Everything one run owns lives in [`GameState`]. Restarting builds a new
//! value; nothing carries over between runs.

use std::sync::Arc;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::catalog::{Catalog, ObstacleId};
use super::chaser::{Chaser, SweepDirection};
use super::generator::EntityIds;
use super::player::Player;
use super::terrain::Terrain;
use crate::tuning::Tuning;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Built but not started
    Idle,
    /// Skiing
    Running,
    /// Hit something; tumble animation playing
    Crashed,
    /// Tumble finished; leaderboard is up until restart
    LeaderboardShown,
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    Obstacle { id: u32, kind: ObstacleId },
    Chaser,
}

/// Transitions the UI cares about, queued during a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    ChaserSpawned { direction: SweepDirection },
    ChaserDespawned,
    Crashed { cause: CrashCause },
    LeaderboardShown,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: RunPhase,
    pub score: f32,
    /// Seconds survived
    pub time_survived: f32,
    /// Speed multiplier
    pub speed: f32,
    pub player: Player,
    pub chaser: Chaser,
    pub terrain: Terrain,
    pub camera: Camera,
    pub tuning: Arc<Tuning>,
    pub catalog: Arc<Catalog>,
    pub(crate) rng: Pcg32,
    pub(crate) ids: EntityIds,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle run with the given seed
    pub fn new(seed: u64, tuning: Arc<Tuning>, catalog: Arc<Catalog>) -> Self {
        let player = Player::new(&tuning.player);
        let camera = Camera::behind(player.position, &tuning.camera);
        let mut state = Self {
            seed,
            phase: RunPhase::Idle,
            score: 0.0,
            time_survived: 0.0,
            speed: tuning.progression.start_speed,
            player,
            chaser: Chaser::default(),
            terrain: Terrain::new(),
            camera,
            tuning,
            catalog,
            rng: Pcg32::seed_from_u64(seed),
            ids: EntityIds::default(),
            events: Vec::new(),
        };

        // Populate the opening stretch so the first frame already has a slope
        let player_z = state.player.position.z;
        state.terrain.advance(
            player_z,
            &state.catalog,
            &state.tuning.terrain,
            &mut state.rng,
            &mut state.ids,
        );
        state
    }

    /// A run with default tuning and the standard catalog
    pub fn with_defaults(seed: u64) -> Self {
        Self::new(seed, Arc::new(Tuning::default()), Arc::new(Catalog::standard()))
    }

    /// Idle -> Running. Returns false in any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != RunPhase::Idle {
            return false;
        }
        self.phase = RunPhase::Running;
        self.push_event(GameEvent::RunStarted);
        log::info!("Run started (seed {})", self.seed);
        true
    }

    /// Tear the run down and build a fresh idle one with `seed`
    pub fn restart(&mut self, seed: u64) {
        let tuning = Arc::clone(&self.tuning);
        let catalog = Arc::clone(&self.catalog);
        *self = Self::new(seed, tuning, catalog);
        log::info!("Run reset (seed {})", seed);
    }

    /// Once crashed, the run is over for spawning and scoring purposes
    pub fn is_over(&self) -> bool {
        matches!(self.phase, RunPhase::Crashed | RunPhase::LeaderboardShown)
    }

    /// Whole points, as shown and submitted
    pub fn score_points(&self) -> u32 {
        self.score.floor() as u32
    }

    /// Whole seconds survived
    pub fn time_seconds(&self) -> u32 {
        self.time_survived.floor() as u32
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
