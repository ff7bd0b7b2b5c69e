//! Player preferences
//!
//! Persisted separately from the leaderboard in LocalStorage.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Controls ===
    /// Show the on-screen steering buttons
    pub touch_controls: bool,
    /// Joystick deflection ignored around center (0.0 - 1.0)
    pub joystick_deadzone: f32,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Draw collision boxes over the scene
    pub show_hitboxes: bool,

    /// Initials pre-filled in the leaderboard form
    pub last_initials: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            touch_controls: false,
            joystick_deadzone: 0.25,
            show_fps: false,
            show_hitboxes: false,
            last_initials: String::new(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "powder_run_settings";

    /// Deadzone clamped to a usable range
    pub fn effective_deadzone(&self) -> f32 {
        if self.joystick_deadzone.is_finite() {
            self.joystick_deadzone.clamp(0.0, 0.9)
        } else {
            0.25
        }
    }

    /// Remember initials after a successful submission
    pub fn remember_initials(&mut self, initials: &str) {
        self.last_initials = initials.to_string();
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "show_fps": true }"#).unwrap();
        assert!(settings.show_fps);
        assert_eq!(settings.joystick_deadzone, 0.25);
        assert!(settings.last_initials.is_empty());
    }

    #[test]
    fn test_deadzone_is_clamped() {
        let settings = Settings {
            joystick_deadzone: 4.0,
            ..Settings::default()
        };
        assert_eq!(settings.effective_deadzone(), 0.9);
        let settings = Settings {
            joystick_deadzone: f32::NAN,
            ..Settings::default()
        };
        assert_eq!(settings.effective_deadzone(), 0.25);
    }
}
