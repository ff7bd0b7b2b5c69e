//! Obstacle catalog
//!
//! Immutable table of obstacle kinds: visual placement, collision geometry and
//! spawn weight. Iteration order is the catalog order and is significant for
//! weighted selection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of obstacle identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleId {
    Tree,
    Rock,
    Bump,
    Pole,
}

impl ObstacleId {
    pub const ALL: [ObstacleId; 4] = [
        ObstacleId::Tree,
        ObstacleId::Rock,
        ObstacleId::Bump,
        ObstacleId::Pole,
    ];

    /// Stable key used to look up the renderable model
    pub fn model_key(self) -> &'static str {
        match self {
            ObstacleId::Tree => "tree",
            ObstacleId::Rock => "rock",
            ObstacleId::Bump => "bump",
            ObstacleId::Pole => "pole",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// One box of a multi-part obstacle, in unscaled local units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionSegment {
    pub radius: f32,
    pub height: f32,
    #[serde(default)]
    pub offset_z: f32,
    #[serde(default)]
    pub offset_y: f32,
}

/// Collision geometry of an obstacle kind (unscaled)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionShape {
    /// A single box: half-extent `radius` on X/Z, `height` tall
    Single { radius: f32, height: f32 },
    /// Independent boxes; any overlap counts
    Segmented(Vec<CollisionSegment>),
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleKind {
    pub id: ObstacleId,
    /// Uniform scale applied to the model and all collision geometry
    pub scale: f32,
    /// Vertical offset of the model (and its collision base) from the ground
    pub y_offset: f32,
    pub shape: CollisionShape,
    /// Relative spawn weight
    pub weight: f32,
}

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("obstacle kind {0:?} appears more than once")]
    Duplicate(ObstacleId),
    #[error("obstacle kind {0:?} is missing")]
    Missing(ObstacleId),
    #[error("obstacle kind {id:?} has invalid weight {weight}")]
    InvalidWeight { id: ObstacleId, weight: f32 },
    #[error("obstacle kind {0:?} has no collision segments")]
    EmptyShape(ObstacleId),
}

/// Validated obstacle table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<ObstacleKind>", into = "Vec<ObstacleKind>")]
pub struct Catalog {
    kinds: Vec<ObstacleKind>,
    /// Position in `kinds` for each `ObstacleId` slot
    lookup: [usize; 4],
    total_weight: f32,
}

impl Catalog {
    /// Build a catalog; every identifier must appear exactly once
    pub fn new(kinds: Vec<ObstacleKind>) -> Result<Self, CatalogError> {
        let mut lookup = [usize::MAX; 4];
        for (index, kind) in kinds.iter().enumerate() {
            if !(kind.weight.is_finite() && kind.weight > 0.0) {
                return Err(CatalogError::InvalidWeight {
                    id: kind.id,
                    weight: kind.weight,
                });
            }
            if matches!(&kind.shape, CollisionShape::Segmented(segments) if segments.is_empty()) {
                return Err(CatalogError::EmptyShape(kind.id));
            }
            let slot = &mut lookup[kind.id.slot()];
            if *slot != usize::MAX {
                return Err(CatalogError::Duplicate(kind.id));
            }
            *slot = index;
        }
        if let Some(missing) = ObstacleId::ALL
            .into_iter()
            .find(|id| lookup[id.slot()] == usize::MAX)
        {
            return Err(CatalogError::Missing(missing));
        }

        let total_weight = kinds.iter().map(|k| k.weight).sum();
        Ok(Self {
            kinds,
            lookup,
            total_weight,
        })
    }

    /// The built-in slope: mostly trees, some rocks, the odd bump and gate pole
    pub fn standard() -> Self {
        let kinds = vec![
            ObstacleKind {
                id: ObstacleId::Tree,
                scale: 5.0,
                y_offset: 0.0,
                shape: CollisionShape::Single {
                    radius: 0.3,
                    height: 1.6,
                },
                weight: 0.5,
            },
            ObstacleKind {
                id: ObstacleId::Rock,
                scale: 2.5,
                y_offset: -0.2,
                shape: CollisionShape::Single {
                    radius: 0.6,
                    height: 0.7,
                },
                weight: 0.3,
            },
            ObstacleKind {
                id: ObstacleId::Bump,
                scale: 3.0,
                y_offset: 0.0,
                shape: CollisionShape::Single {
                    radius: 0.5,
                    height: 0.2,
                },
                weight: 0.15,
            },
            ObstacleKind {
                id: ObstacleId::Pole,
                scale: 1.0,
                y_offset: 0.0,
                // Upright post plus a cross-bar trailing uphill from its top
                shape: CollisionShape::Segmented(vec![
                    CollisionSegment {
                        radius: 0.2,
                        height: 3.2,
                        offset_z: 0.0,
                        offset_y: 0.0,
                    },
                    CollisionSegment {
                        radius: 0.6,
                        height: 0.25,
                        offset_z: 0.6,
                        offset_y: 2.6,
                    },
                ]),
                weight: 0.05,
            },
        ];
        // The table above covers every identifier once with positive weights
        match Self::new(kinds) {
            Ok(catalog) => catalog,
            Err(e) => unreachable!("standard catalog is invalid: {e}"),
        }
    }

    /// Look up a kind; cannot fail once the catalog is built
    pub fn kind_of(&self, id: ObstacleId) -> &ObstacleKind {
        &self.kinds[self.lookup[id.slot()]]
    }

    /// All kinds in catalog order
    pub fn all_kinds(&self) -> &[ObstacleKind] {
        &self.kinds
    }

    /// Sum of all spawn weights
    pub fn total_weight(&self) -> f32 {
        self.total_weight
    }

    /// Cumulative weighted pick: the first kind whose running weight exceeds `draw`.
    ///
    /// `draw` is expected in `[0, total_weight)`. Earlier kinds win ties at a
    /// boundary; a draw at or past the total (float round-off) lands on the last kind.
    pub fn pick_weighted(&self, draw: f32) -> &ObstacleKind {
        let mut cumulative = 0.0;
        for kind in &self.kinds {
            cumulative += kind.weight;
            if cumulative > draw {
                return kind;
            }
        }
        &self.kinds[self.kinds.len() - 1]
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<ObstacleKind>> for Catalog {
    type Error = CatalogError;

    fn try_from(kinds: Vec<ObstacleKind>) -> Result<Self, Self::Error> {
        Self::new(kinds)
    }
}

impl From<Catalog> for Vec<ObstacleKind> {
    fn from(catalog: Catalog) -> Self {
        catalog.kinds
    }
}
