//! The chaser
//!
//! A single creature that appears at random, ahead of the skier, and sweeps
//! across the slope at a fixed depth. It never follows the skier downhill:
//! the skier runs into its lane. Spawn pressure and sweep speed both scale
//! with the current speed multiplier.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::ChaserTuning;

/// Sweep direction, fixed for one appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepDirection {
    /// Toward -X, entering from the +X bound
    Left,
    /// Toward +X, entering from the -X bound
    Right,
}

impl SweepDirection {
    pub fn sign(self) -> f32 {
        match self {
            SweepDirection::Left => -1.0,
            SweepDirection::Right => 1.0,
        }
    }
}

/// Chaser lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum Chaser {
    #[default]
    Inactive,
    Active {
        position: Vec3,
        direction: SweepDirection,
        /// Frozen at spawn; `position.z` always equals this
        spawn_z: f32,
    },
}

/// Lifecycle change produced by [`Chaser::update`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChaserChange {
    Spawned {
        direction: SweepDirection,
        spawn_z: f32,
    },
    Despawned,
}

/// Probability of spawning this frame, clamped to 1
pub fn spawn_probability(tuning: &ChaserTuning, speed: f32, dt: f32) -> f32 {
    (tuning.spawn_rate * speed * dt).clamp(0.0, 1.0)
}

impl Chaser {
    pub fn is_active(&self) -> bool {
        matches!(self, Chaser::Active { .. })
    }

    /// Current position, if the chaser is on the slope
    pub fn position(&self) -> Option<Vec3> {
        match self {
            Chaser::Active { position, .. } => Some(*position),
            Chaser::Inactive => None,
        }
    }

    /// Place a new chaser ahead of the skier
    pub fn spawn(
        &mut self,
        direction: SweepDirection,
        player_z: f32,
        speed: f32,
        tuning: &ChaserTuning,
    ) {
        // Enters from the side it is moving away from
        let start_x = -direction.sign() * tuning.bound_x;
        let spawn_z = player_z - tuning.spawn_distance * speed;
        *self = Chaser::Active {
            position: Vec3::new(start_x, 0.0, spawn_z),
            direction,
            spawn_z,
        };
    }

    /// Roll for a spawn while inactive, otherwise sweep and despawn past the far bound.
    ///
    /// A chaser never spawns and moves in the same frame. Callers only update
    /// the chaser while the run is live.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        player_z: f32,
        speed: f32,
        dt: f32,
        tuning: &ChaserTuning,
        rng: &mut R,
    ) -> Option<ChaserChange> {
        match self {
            Chaser::Inactive => {
                if rng.random::<f32>() >= spawn_probability(tuning, speed, dt) {
                    return None;
                }
                let direction = if rng.random_bool(0.5) {
                    SweepDirection::Left
                } else {
                    SweepDirection::Right
                };
                self.spawn(direction, player_z, speed, tuning);
                let spawn_z = player_z - tuning.spawn_distance * speed;
                log::debug!("Chaser spawned at z={:.1} heading {:?}", spawn_z, direction);
                Some(ChaserChange::Spawned { direction, spawn_z })
            }
            Chaser::Active {
                position,
                direction,
                spawn_z,
            } => {
                position.x += tuning.base_speed * speed * dt * direction.sign();
                position.z = *spawn_z;

                let gone = match direction {
                    SweepDirection::Left => position.x < -tuning.bound_x,
                    SweepDirection::Right => position.x > tuning.bound_x,
                };
                if gone {
                    *self = Chaser::Inactive;
                    log::debug!("Chaser left the slope");
                    return Some(ChaserChange::Despawned);
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_depth_scales_with_speed() {
        let tuning = ChaserTuning::default();
        let mut chaser = Chaser::default();
        chaser.spawn(SweepDirection::Left, -100.0, 2.0, &tuning);
        match chaser {
            Chaser::Active {
                position, spawn_z, ..
            } => {
                assert_eq!(spawn_z, -136.0);
                assert_eq!(position.z, -136.0);
                assert_eq!(position.x, tuning.bound_x);
                assert_eq!(position.y, 0.0);
            }
            Chaser::Inactive => panic!("expected an active chaser"),
        }
    }

    #[test]
    fn test_right_mover_starts_on_negative_bound() {
        let tuning = ChaserTuning::default();
        let mut chaser = Chaser::default();
        chaser.spawn(SweepDirection::Right, 0.0, 1.0, &tuning);
        assert_eq!(chaser.position().map(|p| p.x), Some(-tuning.bound_x));
    }

    #[test]
    fn test_guaranteed_spawn_then_sweep_out() {
        let tuning = ChaserTuning {
            spawn_rate: 1000.0,
            ..ChaserTuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let mut chaser = Chaser::default();

        let change = chaser.update(-10.0, 1.0, 0.1, &tuning, &mut rng);
        assert!(matches!(change, Some(ChaserChange::Spawned { .. })));
        let start = chaser.position().unwrap();

        // The skier moving on does not drag the chaser's depth along
        let mut despawned = false;
        for frame in 0..200 {
            match chaser.update(-10.0 - frame as f32, 1.0, 0.1, &tuning, &mut rng) {
                Some(ChaserChange::Despawned) => {
                    despawned = true;
                    break;
                }
                Some(ChaserChange::Spawned { .. }) => panic!("second chaser while active"),
                None => assert_eq!(chaser.position().unwrap().z, start.z),
            }
        }
        assert!(despawned);
        assert!(!chaser.is_active());
    }

    #[test]
    fn test_zero_rate_never_spawns() {
        let tuning = ChaserTuning {
            spawn_rate: 0.0,
            ..ChaserTuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let mut chaser = Chaser::default();
        for _ in 0..1000 {
            assert_eq!(chaser.update(0.0, 3.0, 0.1, &tuning, &mut rng), None);
        }
    }

    #[test]
    fn test_spawn_probability_clamped() {
        let tuning = ChaserTuning {
            spawn_rate: 50.0,
            ..ChaserTuning::default()
        };
        assert_eq!(spawn_probability(&tuning, 3.0, 0.1), 1.0);
        assert!((spawn_probability(&ChaserTuning::default(), 2.0, 0.5) - 0.12).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_sweep_is_monotonic(
            seed in any::<u64>(),
            speed in 1.0f32..3.0,
            dts in proptest::collection::vec(0.001f32..0.1, 1..300),
        ) {
            let tuning = ChaserTuning {
                spawn_rate: 5.0,
                ..ChaserTuning::default()
            };
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut chaser = Chaser::default();
            let mut last_x: Option<f32> = None;
            for dt in dts {
                let before = chaser;
                chaser.update(0.0, speed, dt, &tuning, &mut rng);
                match (before, chaser) {
                    (
                        Chaser::Active { direction, .. },
                        Chaser::Active { position, direction: after, .. },
                    ) => {
                        prop_assert_eq!(direction, after);
                        if let Some(x) = last_x {
                            prop_assert!((position.x - x) * direction.sign() > 0.0);
                        }
                        last_x = Some(position.x);
                    }
                    (_, Chaser::Active { position, .. }) => last_x = Some(position.x),
                    (_, Chaser::Inactive) => last_x = None,
                }
            }
        }
    }
}
