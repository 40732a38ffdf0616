//! Game settings and preferences
//!
//! Persisted in LocalStorage. Only preferences live here; scores are never
//! stored.

use serde::{Deserialize, Serialize};

use crate::sim::SimConfig;

/// Which flavour of the game to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Pseudo-3D slope: seal moves in x and depth, trees approach from afar
    #[default]
    Isometric,
    /// Flat view: seal slides along the bottom, trees fall from the top
    TopDown,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Isometric => "Isometric",
            GameMode::TopDown => "Top-down",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "isometric" | "iso" | "3d" => Some(GameMode::Isometric),
            "top-down" | "topdown" | "top" | "2d" => Some(GameMode::TopDown),
            _ => None,
        }
    }

    /// The other mode
    pub fn toggled(&self) -> Self {
        match self {
            GameMode::Isometric => GameMode::TopDown,
            GameMode::TopDown => GameMode::Isometric,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Mode to start in
    pub mode: GameMode,
    /// Fixed RNG seed (None = seed from the clock)
    pub seed: Option<u64>,
    /// Force the difficulty ramp on or off (None = mode default)
    pub difficulty_ramp: Option<bool>,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: GameMode::Isometric,
            seed: None,
            difficulty_ramp: None,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Simulation parameters for the selected mode with overrides applied
    pub fn sim_config(&self) -> SimConfig {
        let mut config = SimConfig::for_mode(self.mode);
        if let Some(ramp) = self.difficulty_ramp {
            config.enable_difficulty_ramp = ramp;
        }
        config
    }

    /// Parse stored JSON, falling back to defaults for anything unreadable
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "seal_slalom_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
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
            match serde_json::to_string(self) {
                Ok(json) => {
                    if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                        log::warn!("Could not write settings to LocalStorage");
                    } else {
                        log::info!("Settings saved");
                    }
                }
                Err(e) => log::warn!("Could not serialize settings: {}", e),
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
