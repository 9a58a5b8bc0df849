//! Player preferences
//!
//! Persisted as JSON: LocalStorage on the web, `settings.json` natively.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Outline every physics body
    pub debug_bodies: bool,
    /// Show FPS counter
    pub show_fps: bool,
    /// Nearest-neighbour sampling for the pixel art
    pub pixel_art: bool,
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_bodies: false,
            show_fps: false,
            pixel_art: true,
            seed: None,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "double_jump_settings";

    /// Settings file used by native builds
    #[allow(dead_code)]
    const FILE_NAME: &'static str = "settings.json";

    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Seed to start a run with: the forced one, else `fallback`
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }

    /// Flip a preference bound to a function key (F2: FPS, F3: body outlines).
    ///
    /// Returns true if `key` was one of them.
    pub fn apply_hotkey(&mut self, key: &str) -> bool {
        match key {
            "F2" => self.show_fps = !self.show_fps,
            "F3" => self.debug_bodies = !self.debug_bodies,
            _ => return false,
        }
        true
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring malformed settings: {}", e),
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

    /// Load settings from `settings.json` in the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(std::path::Path::new(Self::FILE_NAME))
    }

    /// Read settings from `path`. A missing file is created with the defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No {}, writing defaults", path.display());
                let settings = Self::default();
                settings.save_to(path);
                settings
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) {
        match self.to_json() {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => log::info!("Settings saved to {}", path.display()),
                Err(e) => log::warn!("Could not save settings: {}", e),
            },
            Err(e) => log::warn!("Could not serialize settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.debug_bodies);
        assert!(settings.pixel_art);
        assert_eq!(settings.seed_or(42), 42);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"debug_bodies": true, "seed": 7}"#).unwrap();
        assert!(settings.debug_bodies);
        assert!(settings.pixel_art);
        assert!(!settings.show_fps);
        assert_eq!(settings.seed_or(42), 7);
    }

    #[test]
    fn test_hotkeys_toggle_preferences() {
        let mut settings = Settings::default();
        assert!(settings.apply_hotkey("F2"));
        assert!(settings.show_fps);
        assert!(settings.apply_hotkey("F3"));
        assert!(settings.debug_bodies);
        assert!(settings.apply_hotkey("F2"));
        assert!(!settings.show_fps);
        assert!(!settings.apply_hotkey("ArrowUp"));
        assert!(settings.debug_bodies);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Settings::from_json("{ nope").is_err());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_round_trip_and_fallback() {
        let dir = std::env::temp_dir().join(format!("double-jump-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");

        let settings = Settings {
            show_fps: true,
            seed: Some(99),
            ..Default::default()
        };
        settings.save_to(&path);
        assert_eq!(Settings::load_from(&path), settings);

        std::fs::write(&path, "garbage").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());

        let fresh = dir.join("missing.json");
        assert_eq!(Settings::load_from(&fresh), Settings::default());
        // First run leaves a defaults file behind
        let written = std::fs::read_to_string(&fresh).unwrap();
        assert_eq!(Settings::from_json(&written).unwrap(), Settings::default());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
