//! Collision detection between the skier and everything on the slope
//!
//! Every hitbox in the game is built here. Debug overlays must draw the boxes
//! returned by these functions rather than recomputing offsets themselves.
//! Response is binary: the caller crashes the run on any hit.

use glam::Vec3;

use super::catalog::{CollisionShape, ObstacleKind};
use super::generator::Obstacle;
use crate::tuning::{ChaserTuning, PlayerTuning};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box with the given X/Z half extents, standing on `base_y`
    pub fn standing(center_x: f32, center_z: f32, half_xz: f32, base_y: f32, height: f32) -> Self {
        Self {
            min: Vec3::new(center_x - half_xz, base_y, center_z - half_xz),
            max: Vec3::new(center_x + half_xz, base_y + height, center_z + half_xz),
        }
    }

    /// Box centered on `center` with full `size`
    pub fn centered(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Inclusive overlap on all three axes (touching faces count)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// The skier's hitbox at `position`
pub fn player_hitbox(position: Vec3, tuning: &PlayerTuning) -> Aabb {
    let half_w = tuning.hitbox_width * 0.5;
    let half_d = tuning.hitbox_depth * 0.5;
    Aabb {
        min: Vec3::new(
            position.x - half_w,
            position.y + tuning.hitbox_base_offset,
            position.z - half_d,
        ),
        max: Vec3::new(
            position.x + half_w,
            position.y + tuning.hitbox_height - tuning.hitbox_top_trim,
            position.z + half_d,
        ),
    }
}

/// Boxes of a placed obstacle, scaled and offset from its ground position
fn hitboxes<'a>(obstacle: &'a Obstacle, kind: &'a ObstacleKind) -> impl Iterator<Item = Aabb> + 'a {
    let pos = obstacle.position;
    let base_y = pos.y + kind.y_offset;
    let scale = kind.scale;
    let (single, segments) = match &kind.shape {
        CollisionShape::Single { radius, height } => (
            Some(Aabb::standing(pos.x, pos.z, radius * scale, base_y, height * scale)),
            &[][..],
        ),
        CollisionShape::Segmented(segments) => (None, segments.as_slice()),
    };
    single.into_iter().chain(segments.iter().map(move |seg| {
        Aabb::standing(
            pos.x,
            pos.z + seg.offset_z * scale,
            seg.radius * scale,
            base_y + seg.offset_y * scale,
            seg.height * scale,
        )
    }))
}

/// All collision boxes of a placed obstacle (one for simple kinds)
pub fn obstacle_hitboxes(obstacle: &Obstacle, kind: &ObstacleKind) -> Vec<Aabb> {
    hitboxes(obstacle, kind).collect()
}

/// True if the player box touches the obstacle (any segment for multi-part kinds)
pub fn test_obstacle(player: &Aabb, obstacle: &Obstacle, kind: &ObstacleKind) -> bool {
    hitboxes(obstacle, kind).any(|b| player.overlaps(&b))
}

/// The chaser's hitbox at `position`
pub fn chaser_hitbox(position: Vec3, tuning: &ChaserTuning) -> Aabb {
    Aabb::centered(
        position + Vec3::new(0.0, tuning.hitbox_y_offset, 0.0),
        Vec3::new(tuning.width, tuning.height, tuning.depth),
    )
}

/// True if the player box touches the chaser; an absent chaser never hits
pub fn test_antagonist(player: &Aabb, chaser: Option<Vec3>, tuning: &ChaserTuning) -> bool {
    chaser.is_some_and(|pos| player.overlaps(&chaser_hitbox(pos, tuning)))
}
