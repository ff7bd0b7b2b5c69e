//! Powder Run - An endless downhill skiing runner
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (movement, terrain streaming, collisions, run state)
//! - `tuning`: Data-driven game balance
//! - `platform`: Input providers and model availability
//! - `highscores`: Top-10 leaderboard service
//! - `settings`: Persisted player preferences
//! - `ui`: HUD snapshots and leaderboard formatting

pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use highscores::{HighScores, LeaderboardError, LeaderboardService};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Longest frame step the simulation will integrate (seconds)
    pub const FRAME_CAP: f32 = 0.1;

    /// Forward speed at multiplier 1.0 (units/s, toward -Z)
    pub const BASE_FORWARD_SPEED: f32 = 10.0;
    /// Lateral steering speed (units/s)
    pub const LATERAL_SPEED: f32 = 14.0;
    /// Player X is clamped to +/- this value
    pub const PLAYER_BOUNDARY_X: f32 = 24.0;
    /// Player ground height
    pub const PLAYER_Y: f32 = 0.0;

    /// Player hitbox
    pub const PLAYER_HITBOX_WIDTH: f32 = 1.2;
    pub const PLAYER_HITBOX_DEPTH: f32 = 1.2;
    pub const PLAYER_HITBOX_HEIGHT: f32 = 3.0;
    /// Hitbox bottom sits this far above the player's Y (skis don't collide)
    pub const PLAYER_HITBOX_BASE_OFFSET: f32 = 0.2;
    /// Trimmed off the hitbox top (helmet clearance)
    pub const PLAYER_HITBOX_TOP_TRIM: f32 = 0.4;

    /// Crash tumble length (seconds) and spin rate (radians/s)
    pub const CRASH_DURATION: f32 = 1.5;
    pub const CRASH_SPIN_RATE: f32 = 9.0;

    /// Score per second at multiplier 1.0
    pub const SCORE_RATE: f32 = 10.0;
    /// Speed multiplier growth per second of survival
    pub const SPEED_GROWTH_RATE: f32 = 0.02;
    pub const START_SPEED: f32 = 1.0;
    pub const MAX_SPEED: f32 = 3.0;

    /// Terrain segments
    pub const SEGMENT_LENGTH: f32 = 50.0;
    /// Generator grid
    pub const GRID_STRIDE_Z: f32 = 5.0;
    pub const GRID_STRIDE_X: f32 = 4.0;
    pub const GRID_HALF_WIDTH: f32 = 32.0;
    /// Chance an individual grid cell holds an obstacle
    pub const OBSTACLE_DENSITY: f32 = 0.07;
    /// Max random offset from the cell center
    pub const JITTER: f32 = 1.5;
    /// No obstacles closer than this to the start line
    pub const SPAWN_CLEARING: f32 = 20.0;

    /// Chaser
    pub const CHASER_SPAWN_RATE: f32 = 0.12;
    pub const CHASER_BASE_SPEED: f32 = 12.0;
    pub const CHASER_SPAWN_DISTANCE: f32 = 18.0;
    pub const CHASER_BOUND_X: f32 = 30.0;
    pub const CHASER_WIDTH: f32 = 2.0;
    pub const CHASER_HEIGHT: f32 = 3.0;
    pub const CHASER_DEPTH: f32 = 2.0;
    /// Hitbox center height above the chaser's feet
    pub const CHASER_HITBOX_Y_OFFSET: f32 = 1.5;

    /// Chase camera placement relative to the player
    pub const CAMERA_HEIGHT: f32 = 6.0;
    pub const CAMERA_DISTANCE: f32 = 12.0;
    pub const CAMERA_LOOK_AHEAD: f32 = 10.0;
    /// Exponential follow rate (1/s)
    pub const CAMERA_FOLLOW_RATE: f32 = 8.0;
}
