//! Model availability
//!
//! Renderables are loaded elsewhere. The game only asks whether one exists for
//! a key, and a missing model is never allowed to affect the simulation.

use std::collections::HashSet;

use crate::sim::{Catalog, ObstacleId};

/// Key for the skier model
pub const PLAYER_MODEL: &str = "skier";
/// Key for the chaser model
pub const CHASER_MODEL: &str = "yeti";

pub trait ModelProvider {
    fn has_model(&self, key: &str) -> bool;
}

/// A fixed set of loaded model keys
#[derive(Debug, Clone, Default)]
pub struct StaticModels {
    keys: HashSet<String>,
}

impl StaticModels {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Every model the game can ask for
    pub fn complete() -> Self {
        let mut models = Self::new(ObstacleId::ALL.iter().map(|id| id.model_key()));
        models.keys.insert(PLAYER_MODEL.to_string());
        models.keys.insert(CHASER_MODEL.to_string());
        models
    }
}

impl ModelProvider for StaticModels {
    fn has_model(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

/// Check every catalog kind (plus skier and chaser) and warn about gaps.
/// Returns the missing keys; callers fall back to placeholder visuals.
pub fn audit_models(provider: &dyn ModelProvider, catalog: &Catalog) -> Vec<&'static str> {
    let missing: Vec<&'static str> = catalog
        .all_kinds()
        .iter()
        .map(|k| k.id.model_key())
        .chain([PLAYER_MODEL, CHASER_MODEL])
        .filter(|key| !provider.has_model(key))
        .collect();

    for key in &missing {
        log::warn!("No model for '{}', using placeholder", key);
    }
    missing
}
