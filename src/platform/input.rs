//! Input providers
//!
//! Devices report edge events as they arrive; the frame driver samples each
//! source once per frame into an [`InputState`].

use crate::sim::InputState;

/// Anything that can be sampled for steering flags
pub trait InputSource {
    fn sample(&self) -> InputState;
}

/// OR together every source; the simulation does not care where input came from
pub fn sample_all(sources: &[&dyn InputSource]) -> InputState {
    sources
        .iter()
        .map(|s| s.sample())
        .fold(InputState::default(), |acc, s| InputState {
            steer_left: acc.steer_left || s.steer_left,
            steer_right: acc.steer_right || s.steer_right,
        })
}

/// Held-key tracking from keydown/keyup events
#[derive(Debug, Clone, Default)]
pub struct KeyboardInput {
    left_held: bool,
    right_held: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Steer {
    Left,
    Right,
}

/// Map a `KeyboardEvent.code` to a steering direction
fn steer_for(code: &str) -> Option<Steer> {
    match code {
        "ArrowLeft" | "KeyA" => Some(Steer::Left),
        "ArrowRight" | "KeyD" => Some(Steer::Right),
        _ => None,
    }
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key steers (so the host can suppress scrolling)
    pub fn key_down(&mut self, code: &str) -> bool {
        match steer_for(code) {
            Some(Steer::Left) => self.left_held = true,
            Some(Steer::Right) => self.right_held = true,
            None => return false,
        }
        true
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        match steer_for(code) {
            Some(Steer::Left) => self.left_held = false,
            Some(Steer::Right) => self.right_held = false,
            None => return false,
        }
        true
    }

    /// Window lost focus: keyup events will never arrive
    pub fn release_all(&mut self) {
        self.left_held = false;
        self.right_held = false;
    }
}

impl InputSource for KeyboardInput {
    fn sample(&self) -> InputState {
        InputState {
            steer_left: self.left_held,
            steer_right: self.right_held,
        }
    }
}

/// On-screen directional control reporting a horizontal deflection
#[derive(Debug, Clone)]
pub struct JoystickInput {
    /// -1.0 (full left) to 1.0 (full right)
    axis: f32,
    deadzone: f32,
}

impl JoystickInput {
    pub fn new(deadzone: f32) -> Self {
        Self {
            axis: 0.0,
            deadzone,
        }
    }

    pub fn set_axis(&mut self, axis: f32) {
        self.axis = if axis.is_finite() {
            axis.clamp(-1.0, 1.0)
        } else {
            0.0
        };
    }

    /// Finger lifted
    pub fn release(&mut self) {
        self.axis = 0.0;
    }
}

impl InputSource for JoystickInput {
    fn sample(&self) -> InputState {
        InputState {
            steer_left: self.axis < -self.deadzone,
            steer_right: self.axis > self.deadzone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_edges() {
        let mut keys = KeyboardInput::new();
        assert!(keys.key_down("ArrowLeft"));
        assert!(!keys.key_down("Space"));
        assert_eq!(keys.sample().lateral_axis(), -1.0);

        keys.key_down("KeyD");
        // Both held cancels out
        assert_eq!(keys.sample().lateral_axis(), 0.0);

        keys.key_up("ArrowLeft");
        assert_eq!(keys.sample().lateral_axis(), 1.0);

        keys.release_all();
        assert_eq!(keys.sample(), InputState::default());
    }

    #[test]
    fn test_joystick_deadzone() {
        let mut stick = JoystickInput::new(0.25);
        stick.set_axis(0.2);
        assert_eq!(stick.sample(), InputState::default());
        stick.set_axis(-0.8);
        assert!(stick.sample().steer_left);
        stick.set_axis(f32::NAN);
        assert_eq!(stick.sample(), InputState::default());
        stick.set_axis(3.0);
        assert!(stick.sample().steer_right);
        stick.release();
        assert_eq!(stick.sample(), InputState::default());
    }

    #[test]
    fn test_sources_merge() {
        let mut keys = KeyboardInput::new();
        keys.key_down("KeyA");
        let mut stick = JoystickInput::new(0.1);
        stick.set_axis(0.5);
        let merged = sample_all(&[&keys, &stick]);
        assert!(merged.steer_left && merged.steer_right);
        assert_eq!(merged.lateral_axis(), 0.0);
    }
}
