//! The skier
//!
//! Auto-advances downhill (toward -Z), steers laterally from the sampled
//! input and tumbles for a fixed time after a crash.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::tuning::PlayerTuning;

/// Steering flags sampled once per frame by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub steer_left: bool,
    pub steer_right: bool,
}

impl InputState {
    /// -1 (left), 0, or +1 (right); both or neither held means no steering
    pub fn lateral_axis(&self) -> f32 {
        match (self.steer_left, self.steer_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Post-crash tumble, advanced by the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrashTumble {
    pub elapsed: f32,
    /// Set once the completion has been reported
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec3,
    /// Euler rotation for the model (radians); only changes while tumbling
    pub rotation: Vec3,
    pub crash: Option<CrashTumble>,
}

impl Player {
    pub fn new(tuning: &PlayerTuning) -> Self {
        Self {
            position: Vec3::new(0.0, tuning.ground_y, 0.0),
            rotation: Vec3::ZERO,
            crash: None,
        }
    }

    pub fn is_crashed(&self) -> bool {
        self.crash.is_some()
    }

    /// Integrate one frame of skiing; does nothing after a crash
    pub fn advance(&mut self, input: &InputState, speed: f32, dt: f32, tuning: &PlayerTuning) {
        if self.is_crashed() {
            return;
        }
        self.position.z -= tuning.base_forward_speed * speed * dt;
        self.position.x += input.lateral_axis() * tuning.lateral_speed * dt;
        self.position.x = self.position.x.clamp(-tuning.boundary_x, tuning.boundary_x);
    }

    /// Freeze the skier and start the tumble. Returns false if already crashed.
    pub fn crash(&mut self) -> bool {
        if self.is_crashed() {
            return false;
        }
        self.crash = Some(CrashTumble {
            elapsed: 0.0,
            finished: false,
        });
        true
    }

    /// Advance the tumble. Returns true on the single frame it completes.
    pub fn advance_crash(&mut self, dt: f32, tuning: &PlayerTuning) -> bool {
        let Some(tumble) = self.crash.as_mut() else {
            return false;
        };
        if tumble.finished {
            return false;
        }

        tumble.elapsed = (tumble.elapsed + dt).min(tuning.crash_duration);
        let spin = tumble.elapsed * tuning.crash_spin_rate;
        self.rotation = Vec3::new(spin, spin * 0.5, spin * 0.25);

        if tumble.elapsed >= tuning.crash_duration {
            tumble.finished = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LEFT: InputState = InputState {
        steer_left: true,
        steer_right: false,
    };
    const RIGHT: InputState = InputState {
        steer_left: false,
        steer_right: true,
    };
    const BOTH: InputState = InputState {
        steer_left: true,
        steer_right: true,
    };

    #[test]
    fn test_forward_step() {
        let tuning = PlayerTuning::default();
        let mut player = Player::new(&tuning);
        player.advance(&InputState::default(), 1.0, 0.1, &tuning);
        assert!((player.position.z - (-1.0)).abs() < 1e-6);
        assert_eq!(player.position.x, 0.0);
    }

    #[test]
    fn test_steering_is_exclusive() {
        let tuning = PlayerTuning::default();
        let mut player = Player::new(&tuning);
        player.advance(&BOTH, 1.0, 0.1, &tuning);
        assert_eq!(player.position.x, 0.0);
        player.advance(&LEFT, 1.0, 0.1, &tuning);
        assert!((player.position.x + tuning.lateral_speed * 0.1).abs() < 1e-5);
        player.advance(&RIGHT, 1.0, 0.2, &tuning);
        assert!((player.position.x - tuning.lateral_speed * 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_crash_freezes_and_completes_once() {
        let tuning = PlayerTuning::default();
        let mut player = Player::new(&tuning);
        player.advance(&RIGHT, 1.0, 0.1, &tuning);
        assert!(player.crash());
        assert!(!player.crash());

        let frozen = player.position;
        player.advance(&RIGHT, 2.0, 0.1, &tuning);
        assert_eq!(player.position, frozen);

        let mut completions = 0;
        for _ in 0..200 {
            if player.advance_crash(1.0 / 60.0, &tuning) {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert!(player.rotation.x > 0.0);
    }

    #[test]
    fn test_tumble_needs_full_duration() {
        let tuning = PlayerTuning::default();
        let mut player = Player::new(&tuning);
        assert!(!player.advance_crash(10.0, &tuning));
        player.crash();
        assert!(!player.advance_crash(tuning.crash_duration * 0.5, &tuning));
        assert!(player.advance_crash(tuning.crash_duration, &tuning));
    }

    proptest! {
        #[test]
        fn prop_lateral_stays_in_bounds(
            frames in proptest::collection::vec((0u8..4, 0.0f32..0.1), 1..200),
        ) {
            let tuning = PlayerTuning::default();
            let mut player = Player::new(&tuning);
            for (buttons, dt) in frames {
                let input = InputState {
                    steer_left: buttons & 1 != 0,
                    steer_right: buttons & 2 != 0,
                };
                player.advance(&input, 3.0, dt, &tuning);
                prop_assert!(player.position.x.abs() <= tuning.boundary_x);
            }
        }

        #[test]
        fn prop_forward_displacement_exact(speed in 1.0f32..3.0, dt in 0.0f32..0.1) {
            let tuning = PlayerTuning::default();
            let mut player = Player::new(&tuning);
            player.advance(&InputState::default(), speed, dt, &tuning);
            prop_assert_eq!(player.position.z, -(tuning.base_forward_speed * speed * dt));
        }
    }
}
