//! Sample settings with persistence
//!
//! Settings are read from `~/.config/keystone/settings.toml`

use std::fs;
use std::path::PathBuf;

use keystone_audio::AudioConfig;
use keystone_core::ClockConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All sample settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub audio: AudioConfig,
    pub animation: AnimationSettings,
    pub clock: ClockConfig,
    pub demo: DemoSettings,
}

impl GameSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("keystone"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                warn!("Failed to parse settings: {}, using defaults", e);
                Self::default()
            }),
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Animation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// JSON clip to play; the built-in wave is used when unset
    pub clip: Option<PathBuf>,
    pub looping: bool,
    /// Playback speed multiplier
    pub speed: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            clip: None,
            looping: true,
            speed: 1.0,
        }
    }
}

/// What the sample loop plays and for how long
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    pub bank: String,
    pub event_name: String,
    pub event_id: String,
    pub parameter: String,
    pub parameter_value: f32,
    /// Radius of the emitter's orbit around the listener
    pub orbit_radius: f32,
    pub frame_rate: u32,
    /// Number of frames to run before shutting down
    pub frames: u64,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            bank: "Master".into(),
            event_name: "Theme".into(),
            event_id: "{b56cb9d2-1d47-4099-b80e-7d257b99a823}".into(),
            parameter: "Underwater".into(),
            parameter_value: 1.0,
            orbit_radius: 5.0,
            frame_rate: 60,
            frames: 600,
        }
    }
}
