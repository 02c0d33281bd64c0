//! Bank manifests.
//!
//! A bank is a TOML file listing the events it packages:
//!
//! ```toml
//! [[event]]
//! id = "{b56cb9d2-1d47-4099-b80e-7d257b99a823}"
//! path = "event:/Music/Theme"
//! file = "theme.ogg"
//! looping = true
//!
//! [[event.parameter]]
//! name = "Underwater"
//! max = 1.0
//! seek_speed = 2.0
//! target = "volume"
//! from = 1.0
//! to = 0.3
//!
//! [[parameter]]
//! name = "Intensity"
//! ```
//!
//! Audio file paths are relative to the directory containing the bank.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BackendError;

/// Parsed contents of a `.bank` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankManifest {
    #[serde(default, rename = "event")]
    pub events: Vec<EventManifest>,
    /// Global parameters declared by this bank.
    #[serde(default, rename = "parameter")]
    pub parameters: Vec<ParameterManifest>,
}

/// One authored event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventManifest {
    pub id: Uuid,
    #[serde(default)]
    pub path: Option<String>,
    pub file: PathBuf,
    #[serde(default)]
    pub looping: bool,
    #[serde(default)]
    pub volume_db: f32,
    /// Attenuate and pan against the listener.
    #[serde(default)]
    pub spatial: bool,
    #[serde(default = "default_fade_out_ms")]
    pub fade_out_ms: u64,
    #[serde(default, rename = "parameter")]
    pub parameters: Vec<ParameterManifest>,
}

fn default_fade_out_ms() -> u64 {
    250
}

/// What a parameter drives once mapped from its range to `from..to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterTarget {
    /// Value is stored and readable but drives nothing.
    #[default]
    None,
    /// Multiplies the linear volume.
    Volume,
    /// Multiplies the playback rate.
    Pitch,
    /// Added to panning (-1.0 left, 1.0 right).
    Pan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterManifest {
    pub name: String,
    #[serde(default)]
    pub min: f32,
    #[serde(default = "one")]
    pub max: f32,
    #[serde(default)]
    pub default: f32,
    /// Units per second the applied value may move. Zero means instant.
    #[serde(default)]
    pub seek_speed: f32,
    #[serde(default)]
    pub target: ParameterTarget,
    #[serde(default)]
    pub from: f32,
    #[serde(default = "one")]
    pub to: f32,
}

fn one() -> f32 {
    1.0
}

impl BankManifest {
    /// Parse manifest text. `origin` is only used in error messages.
    pub fn parse(text: &str, origin: &Path) -> Result<Self, BackendError> {
        let manifest: BankManifest = toml::from_str(text)
            .map_err(|e| BackendError::BankFormat(origin.to_path_buf(), e.to_string()))?;
        manifest.validate(origin)?;
        Ok(manifest)
    }

    /// Read and parse a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, BackendError> {
        let text = fs::read_to_string(path)
            .map_err(|e| BackendError::LoadFailed(path.to_path_buf(), e.to_string()))?;
        Self::parse(&text, path)
    }

    fn validate(&self, origin: &Path) -> Result<(), BackendError> {
        let bad = |reason: String| Err(BackendError::BankFormat(origin.to_path_buf(), reason));
        for (i, event) in self.events.iter().enumerate() {
            if self.events[..i].iter().any(|other| other.id == event.id) {
                return bad(format!("duplicate event id {}", event.id));
            }
            if let Some(path) = &event.path {
                if !path.starts_with("event:/") {
                    return bad(format!("event path '{path}' must start with 'event:/'"));
                }
            }
            for param in &event.parameters {
                param.validate(origin)?;
            }
        }
        for param in &self.parameters {
            param.validate(origin)?;
        }
        Ok(())
    }

    /// Find an event by GUID (plain or braced) or by `event:/` path.
    pub fn find_event(&self, event_id: &str) -> Option<&EventManifest> {
        if event_id.starts_with("event:/") {
            return self
                .events
                .iter()
                .find(|e| e.path.as_deref() == Some(event_id));
        }
        let id = Uuid::parse_str(event_id).ok()?;
        self.events.iter().find(|e| e.id == id)
    }
}

impl ParameterManifest {
    fn validate(&self, origin: &Path) -> Result<(), BackendError> {
        if self.min > self.max {
            return Err(BackendError::BankFormat(
                origin.to_path_buf(),
                format!("parameter '{}' has min > max", self.name),
            ));
        }
        if self.seek_speed < 0.0 {
            return Err(BackendError::BankFormat(
                origin.to_path_buf(),
                format!("parameter '{}' has a negative seek speed", self.name),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = r#"
[[event]]
id = "{b56cb9d2-1d47-4099-b80e-7d257b99a823}"
path = "event:/Music/Theme"
file = "theme.ogg"
looping = true

[[event.parameter]]
name = "Underwater"
seek_speed = 2.0
target = "volume"
from = 1.0
to = 0.3

[[event]]
id = "0f4e7c1a-3b1e-4a55-9d0e-5f1d2c3b4a59"
file = "step.wav"
spatial = true

[[parameter]]
name = "Intensity"
max = 10.0
default = 5.0
"#;

    #[test]
    fn parses_events_and_parameters() {
        let manifest = BankManifest::parse(MASTER, Path::new("Master.bank")).unwrap();
        assert_eq!(manifest.events.len(), 2);
        assert_eq!(manifest.parameters.len(), 1);

        let theme = &manifest.events[0];
        assert!(theme.looping);
        assert_eq!(theme.fade_out_ms, 250);
        assert_eq!(theme.parameters[0].target, ParameterTarget::Volume);
        assert_eq!(theme.parameters[0].max, 1.0);

        let step = &manifest.events[1];
        assert!(step.spatial);
        assert!(step.parameters.is_empty());
        assert_eq!(manifest.parameters[0].default, 5.0);
    }

    #[test]
    fn finds_by_braced_plain_and_path() {
        let manifest = BankManifest::parse(MASTER, Path::new("Master.bank")).unwrap();
        let braced = manifest.find_event("{b56cb9d2-1d47-4099-b80e-7d257b99a823}");
        let plain = manifest.find_event("b56cb9d2-1d47-4099-b80e-7d257b99a823");
        let path = manifest.find_event("event:/Music/Theme");
        assert!(braced.is_some());
        assert_eq!(braced.map(|e| e.id), plain.map(|e| e.id));
        assert_eq!(braced.map(|e| e.id), path.map(|e| e.id));
        assert!(manifest.find_event("not-a-guid").is_none());
        assert!(manifest.find_event("event:/Missing").is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let text = r#"
[[event]]
id = "0f4e7c1a-3b1e-4a55-9d0e-5f1d2c3b4a59"
file = "a.wav"

[[event]]
id = "0f4e7c1a-3b1e-4a55-9d0e-5f1d2c3b4a59"
file = "b.wav"
"#;
        let err = BankManifest::parse(text, Path::new("dup.bank")).unwrap_err();
        assert!(matches!(err, BackendError::BankFormat(_, _)));
    }

    #[test]
    fn rejects_inverted_range() {
        let text = r#"
[[parameter]]
name = "Broken"
min = 2.0
max = 1.0
"#;
        assert!(BankManifest::parse(text, Path::new("x.bank")).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let path = std::env::temp_dir().join("keystone-no-such-bank.bank");
        let err = BankManifest::load(&path).unwrap_err();
        assert!(matches!(err, BackendError::LoadFailed(p, _) if p == path));
    }

    #[test]
    fn load_reads_from_disk() {
        let path = std::env::temp_dir().join(format!("keystone-bank-{}.bank", Uuid::new_v4()));
        fs::write(&path, MASTER).unwrap();
        let manifest = BankManifest::load(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(manifest.events.len(), 2);
    }
}
