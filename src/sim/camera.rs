//! Chase camera
//!
//! Sits above and uphill of the skier and eases toward its target each frame.
//! Purely presentational: nothing in the simulation reads it back.

use glam::Vec3;

use crate::tuning::CameraTuning;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Camera {
    /// Camera snapped to its resting place behind `player`
    pub fn behind(player: Vec3, tuning: &CameraTuning) -> Self {
        Self {
            position: Self::target(player, tuning),
            look_at: Self::look_target(player, tuning),
        }
    }

    fn target(player: Vec3, tuning: &CameraTuning) -> Vec3 {
        player + Vec3::new(0.0, tuning.height, tuning.distance)
    }

    fn look_target(player: Vec3, tuning: &CameraTuning) -> Vec3 {
        player - Vec3::new(0.0, 0.0, tuning.look_ahead)
    }

    /// Ease toward the player; frame-rate independent
    pub fn follow(&mut self, player: Vec3, tuning: &CameraTuning, dt: f32) {
        let t = 1.0 - (-tuning.follow_rate * dt).exp();
        self.position = self.position.lerp(Self::target(player, tuning), t);
        // Depth tracks exactly so fast runs never outpace the camera
        self.position.z = player.z + tuning.distance;
        self.look_at = self.look_at.lerp(Self::look_target(player, tuning), t);
        self.look_at.z = player.z - tuning.look_ahead;
    }
}
