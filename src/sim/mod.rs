//! Frame-driven simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform code:
//! - One `tick` per display frame, with a clamped delta
//! - Seeded RNG per run
//! - Tuning and catalog injected, never global
//! - Collision boxes computed in exactly one place

pub mod camera;
pub mod catalog;
pub mod chaser;
pub mod collision;
pub mod generator;
pub mod player;
pub mod state;
pub mod terrain;
pub mod tick;

pub use camera::Camera;
pub use catalog::{Catalog, CatalogError, CollisionSegment, CollisionShape, ObstacleId, ObstacleKind};
pub use chaser::{Chaser, ChaserChange, SweepDirection};
pub use collision::{Aabb, chaser_hitbox, obstacle_hitboxes, player_hitbox, test_antagonist, test_obstacle};
pub use generator::{EntityIds, Obstacle, generate};
pub use player::{InputState, Player};
pub use state::{CrashCause, GameEvent, GameState, RunPhase};
pub use terrain::{StreamReport, Terrain, segment_index};
pub use tick::{FrameClock, clamp_delta, tick};
