//! Data-driven game balance
//!
//! Every number the simulation reads lives here so tests and hosts can inject
//! their own values. Defaults come from [`crate::consts`]; a JSON document may
//! override any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f32,
    },
}

/// Player movement, hitbox and crash animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub base_forward_speed: f32,
    pub lateral_speed: f32,
    pub boundary_x: f32,
    pub ground_y: f32,
    pub hitbox_width: f32,
    pub hitbox_depth: f32,
    pub hitbox_height: f32,
    pub hitbox_base_offset: f32,
    pub hitbox_top_trim: f32,
    pub crash_duration: f32,
    pub crash_spin_rate: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            base_forward_speed: BASE_FORWARD_SPEED,
            lateral_speed: LATERAL_SPEED,
            boundary_x: PLAYER_BOUNDARY_X,
            ground_y: PLAYER_Y,
            hitbox_width: PLAYER_HITBOX_WIDTH,
            hitbox_depth: PLAYER_HITBOX_DEPTH,
            hitbox_height: PLAYER_HITBOX_HEIGHT,
            hitbox_base_offset: PLAYER_HITBOX_BASE_OFFSET,
            hitbox_top_trim: PLAYER_HITBOX_TOP_TRIM,
            crash_duration: CRASH_DURATION,
            crash_spin_rate: CRASH_SPIN_RATE,
        }
    }
}

/// Score and difficulty escalation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionTuning {
    pub score_rate: f32,
    pub speed_growth_rate: f32,
    pub start_speed: f32,
    pub max_speed: f32,
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            score_rate: SCORE_RATE,
            speed_growth_rate: SPEED_GROWTH_RATE,
            start_speed: START_SPEED,
            max_speed: MAX_SPEED,
        }
    }
}

/// Segment streaming and obstacle placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainTuning {
    pub segment_length: f32,
    pub stride_z: f32,
    pub stride_x: f32,
    pub half_width: f32,
    pub density: f32,
    pub jitter: f32,
    pub spawn_clearing: f32,
}

impl Default for TerrainTuning {
    fn default() -> Self {
        Self {
            segment_length: SEGMENT_LENGTH,
            stride_z: GRID_STRIDE_Z,
            stride_x: GRID_STRIDE_X,
            half_width: GRID_HALF_WIDTH,
            density: OBSTACLE_DENSITY,
            jitter: JITTER,
            spawn_clearing: SPAWN_CLEARING,
        }
    }
}

/// The lateral-sweeping chaser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaserTuning {
    /// Spawns per second at multiplier 1.0 (approximately)
    pub spawn_rate: f32,
    pub base_speed: f32,
    pub spawn_distance: f32,
    pub bound_x: f32,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub hitbox_y_offset: f32,
}

impl Default for ChaserTuning {
    fn default() -> Self {
        Self {
            spawn_rate: CHASER_SPAWN_RATE,
            base_speed: CHASER_BASE_SPEED,
            spawn_distance: CHASER_SPAWN_DISTANCE,
            bound_x: CHASER_BOUND_X,
            width: CHASER_WIDTH,
            height: CHASER_HEIGHT,
            depth: CHASER_DEPTH,
            hitbox_y_offset: CHASER_HITBOX_Y_OFFSET,
        }
    }
}

/// Chase camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub height: f32,
    pub distance: f32,
    pub look_ahead: f32,
    pub follow_rate: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            height: CAMERA_HEIGHT,
            distance: CAMERA_DISTANCE,
            look_ahead: CAMERA_LOOK_AHEAD,
            follow_rate: CAMERA_FOLLOW_RATE,
        }
    }
}

/// Complete tuning set injected into a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Longest step a single frame may integrate
    pub frame_cap: f32,
    pub player: PlayerTuning,
    pub progression: ProgressionTuning,
    pub terrain: TerrainTuning,
    pub chaser: ChaserTuning,
    pub camera: CameraTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            frame_cap: FRAME_CAP,
            player: PlayerTuning::default(),
            progression: ProgressionTuning::default(),
            terrain: TerrainTuning::default(),
            chaser: ChaserTuning::default(),
            camera: CameraTuning::default(),
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            expected: "positive",
            value,
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            expected: "non-negative",
            value,
        })
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would stall or invert the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("frame_cap", self.frame_cap)?;

        let p = &self.player;
        non_negative("player.base_forward_speed", p.base_forward_speed)?;
        non_negative("player.lateral_speed", p.lateral_speed)?;
        non_negative("player.boundary_x", p.boundary_x)?;
        positive("player.hitbox_width", p.hitbox_width)?;
        positive("player.hitbox_depth", p.hitbox_depth)?;
        positive("player.hitbox_height", p.hitbox_height)?;
        if p.hitbox_base_offset + p.hitbox_top_trim >= p.hitbox_height {
            return Err(TuningError::OutOfRange {
                field: "player.hitbox_top_trim",
                expected: "less than hitbox_height - hitbox_base_offset",
                value: p.hitbox_top_trim,
            });
        }
        positive("player.crash_duration", p.crash_duration)?;

        let g = &self.progression;
        non_negative("progression.score_rate", g.score_rate)?;
        non_negative("progression.speed_growth_rate", g.speed_growth_rate)?;
        positive("progression.start_speed", g.start_speed)?;
        if !(g.max_speed >= g.start_speed) {
            return Err(TuningError::OutOfRange {
                field: "progression.max_speed",
                expected: "at least start_speed",
                value: g.max_speed,
            });
        }

        let t = &self.terrain;
        positive("terrain.segment_length", t.segment_length)?;
        positive("terrain.stride_z", t.stride_z)?;
        positive("terrain.stride_x", t.stride_x)?;
        non_negative("terrain.half_width", t.half_width)?;
        if !(0.0..=1.0).contains(&t.density) {
            return Err(TuningError::OutOfRange {
                field: "terrain.density",
                expected: "within [0, 1]",
                value: t.density,
            });
        }
        non_negative("terrain.jitter", t.jitter)?;
        non_negative("terrain.spawn_clearing", t.spawn_clearing)?;

        let c = &self.chaser;
        non_negative("chaser.spawn_rate", c.spawn_rate)?;
        positive("chaser.base_speed", c.base_speed)?;
        non_negative("chaser.spawn_distance", c.spawn_distance)?;
        positive("chaser.bound_x", c.bound_x)?;
        positive("chaser.width", c.width)?;
        positive("chaser.height", c.height)?;
        positive("chaser.depth", c.depth)?;

        non_negative("camera.follow_rate", self.camera.follow_rate)?;
        Ok(())
    }
}
