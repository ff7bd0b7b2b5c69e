//! Platform abstraction layer
//!
//! Handles the collaborators the simulation only sees through narrow seams:
//! - Input: keyboard and on-screen controls reduced to two steering flags
//! - Models: whether a renderable exists for each obstacle kind

pub mod input;
pub mod models;

pub use input::{InputSource, JoystickInput, KeyboardInput, sample_all};
pub use models::{ModelProvider, StaticModels, audit_models};
