//! Procedural obstacle placement
//!
//! A Z range is covered by a grid of cells; each cell independently rolls for
//! an obstacle, picks a kind by catalog weight and jitters it off the cell
//! center. Calls share nothing but the id allocator.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, ObstacleId};
use crate::tuning::TerrainTuning;

/// A placed obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleId,
    /// Ground position (y is 0 when placed)
    pub position: Vec3,
}

/// Monotonic entity id source for one run
#[derive(Debug, Clone)]
pub struct EntityIds {
    next_id: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

impl EntityIds {
    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Uniform in `[-amount, amount)`
fn jitter<R: Rng + ?Sized>(rng: &mut R, amount: f32) -> f32 {
    (rng.random::<f32>() * 2.0 - 1.0) * amount
}

/// Populate the slope between `start_z` and `end_z` (either order)
pub fn generate<R: Rng + ?Sized>(
    start_z: f32,
    end_z: f32,
    catalog: &Catalog,
    tuning: &TerrainTuning,
    rng: &mut R,
    ids: &mut EntityIds,
) -> Vec<Obstacle> {
    let lo = start_z.min(end_z);
    let hi = start_z.max(end_z);
    let columns = (2.0 * tuning.half_width / tuning.stride_x).floor() as u32 + 1;
    let mut obstacles = Vec::new();

    let mut row = 0u32;
    loop {
        let cell_z = lo + (row as f32 + 0.5) * tuning.stride_z;
        if cell_z >= hi {
            break;
        }
        row += 1;
        // Keep the start line clear
        if cell_z > -tuning.spawn_clearing {
            continue;
        }

        for column in 0..columns {
            let cell_x = -tuning.half_width + column as f32 * tuning.stride_x;
            if rng.random::<f32>() >= tuning.density {
                continue;
            }
            let draw = rng.random::<f32>() * catalog.total_weight();
            let kind = catalog.pick_weighted(draw).id;
            let x = cell_x + jitter(rng, tuning.jitter);
            let z = cell_z + jitter(rng, tuning.jitter);
            obstacles.push(Obstacle {
                id: ids.next_entity_id(),
                kind,
                position: Vec3::new(x, 0.0, z),
            });
        }
    }

    obstacles
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    fn open_slope() -> TerrainTuning {
        TerrainTuning {
            spawn_clearing: 0.0,
            ..TerrainTuning::default()
        }
    }

    #[test]
    fn test_density_matches_tuning() {
        let tuning = open_slope();
        let catalog = Catalog::standard();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ids = EntityIds::default();

        let obstacles = generate(-100.0, -5100.0, &catalog, &tuning, &mut rng, &mut ids);
        // 1000 rows x 17 columns x 0.07
        let expected = 1000.0 * 17.0 * tuning.density;
        let count = obstacles.len() as f32;
        assert!(
            (count - expected).abs() < 150.0,
            "got {count} obstacles, expected about {expected}"
        );
    }

    #[test]
    fn test_kind_mix_follows_weights() {
        let tuning = open_slope();
        let catalog = Catalog::standard();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut ids = EntityIds::default();

        let obstacles = generate(0.0, -20000.0, &catalog, &tuning, &mut rng, &mut ids);
        let total = obstacles.len() as f32;
        for kind in catalog.all_kinds() {
            let share = obstacles.iter().filter(|o| o.kind == kind.id).count() as f32 / total;
            let expected = kind.weight / catalog.total_weight();
            assert!(
                (share - expected).abs() < 0.04,
                "{:?}: share {share}, expected {expected}",
                kind.id
            );
        }
    }

    #[test]
    fn test_positions_stay_near_grid() {
        let tuning = open_slope();
        let catalog = Catalog::standard();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ids = EntityIds::default();

        let obstacles = generate(-50.0, -100.0, &catalog, &tuning, &mut rng, &mut ids);
        for o in &obstacles {
            assert_eq!(o.position.y, 0.0);
            assert!(o.position.x.abs() <= tuning.half_width + tuning.jitter);
            assert!(o.position.z <= -50.0 + tuning.jitter);
            assert!(o.position.z >= -100.0 - tuning.jitter);
        }
    }

    #[test]
    fn test_ids_unique_and_calls_differ() {
        let tuning = open_slope();
        let catalog = Catalog::standard();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ids = EntityIds::default();

        let first = generate(-50.0, -100.0, &catalog, &tuning, &mut rng, &mut ids);
        let second = generate(-50.0, -100.0, &catalog, &tuning, &mut rng, &mut ids);

        let all: HashSet<u32> = first.iter().chain(&second).map(|o| o.id).collect();
        assert_eq!(all.len(), first.len() + second.len());
        assert_ne!(first, second);
    }

    #[test]
    fn test_start_line_is_clear() {
        let tuning = TerrainTuning {
            density: 1.0,
            ..TerrainTuning::default()
        };
        let catalog = Catalog::standard();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut ids = EntityIds::default();

        let obstacles = generate(0.0, -50.0, &catalog, &tuning, &mut rng, &mut ids);
        assert!(!obstacles.is_empty());
        assert!(
            obstacles
                .iter()
                .all(|o| o.position.z <= -tuning.spawn_clearing + tuning.jitter)
        );
    }

    #[test]
    fn test_zero_density_is_empty() {
        let tuning = TerrainTuning {
            density: 0.0,
            ..open_slope()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ids = EntityIds::default();
        let obstacles = generate(0.0, -500.0, &Catalog::standard(), &tuning, &mut rng, &mut ids);
        assert!(obstacles.is_empty());
    }
}
