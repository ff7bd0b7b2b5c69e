//! Segment streaming
//!
//! The slope is cut into fixed-length segments indexed by downhill distance
//! (`-z`), so segment 0 starts at the start line and indices grow as the
//! skier descends. A window of segments around the skier is kept populated:
//! one behind, three ahead. Segments more than two behind are evicted, but only
//! once the skier has covered a full segment since the last sweep.

use std::collections::BTreeSet;

use rand::Rng;

use super::catalog::Catalog;
use super::generator::{EntityIds, Obstacle, generate};
use crate::tuning::TerrainTuning;

/// Segments kept behind the skier's segment
pub const LOOK_BEHIND: i32 = 1;
/// Segments generated ahead of the skier's segment
pub const LOOK_AHEAD: i32 = 3;
/// Segments further behind than this are evicted on cleanup
pub const EVICT_BEHIND: i32 = 2;

/// Segment index containing world position `z`
#[inline]
pub fn segment_index(z: f32, segment_length: f32) -> i32 {
    (-z / segment_length).floor() as i32
}

/// What one `advance` call changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamReport {
    pub segments_generated: u32,
    pub obstacles_evicted: u32,
    pub segments_dropped: u32,
}

/// Materialized segments and the obstacles living in them
#[derive(Debug, Clone, Default)]
pub struct Terrain {
    visible: BTreeSet<i32>,
    obstacles: Vec<Obstacle>,
    /// Downhill distance at the last cleanup sweep
    last_cleanup: f32,
}

impl Terrain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live obstacles in generation order
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Indices of materialized segments, ascending
    pub fn visible_segments(&self) -> impl Iterator<Item = i32> + '_ {
        self.visible.iter().copied()
    }

    pub fn is_visible(&self, segment: i32) -> bool {
        self.visible.contains(&segment)
    }

    #[cfg(test)]
    pub(crate) fn insert_for_test(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Stream segments around the skier at `player_z`
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        player_z: f32,
        catalog: &Catalog,
        tuning: &TerrainTuning,
        rng: &mut R,
        ids: &mut EntityIds,
    ) -> StreamReport {
        let length = tuning.segment_length;
        let current = segment_index(player_z, length);
        let mut report = StreamReport::default();

        for segment in (current - LOOK_BEHIND)..=(current + LOOK_AHEAD) {
            if !self.visible.insert(segment) {
                continue;
            }
            let start_z = -(segment as f32) * length;
            let end_z = start_z - length;
            let fresh = generate(start_z, end_z, catalog, tuning, rng, ids);
            log::debug!("Segment {} generated with {} obstacles", segment, fresh.len());
            self.obstacles.extend(fresh);
            report.segments_generated += 1;
        }

        let distance = -player_z;
        if distance - self.last_cleanup > length {
            self.last_cleanup = distance;
            let threshold = current - EVICT_BEHIND;

            let before = self.obstacles.len();
            self.obstacles
                .retain(|o| segment_index(o.position.z, length) >= threshold);
            report.obstacles_evicted = (before - self.obstacles.len()) as u32;

            let visible = self.visible.len();
            self.visible = self.visible.split_off(&threshold);
            report.segments_dropped = (visible - self.visible.len()) as u32;

            if report.obstacles_evicted > 0 {
                log::debug!(
                    "Evicted {} obstacles below segment {}",
                    report.obstacles_evicted,
                    threshold
                );
            }
        }

        report
    }
}
