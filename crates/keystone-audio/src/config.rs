use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Audio runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Directory holding `<name>.bank` manifests.
    pub bank_dir: PathBuf,
    /// Maximum number of live event instances.
    pub max_instances: usize,
    /// Master volume multiplier (0.0–1.0).
    pub master_volume: f64,
    /// Distance below which spatial events play at full volume.
    pub min_distance: f32,
    /// Distance beyond which spatial events stop attenuating further.
    pub max_distance: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            bank_dir: PathBuf::from("assets/banks"),
            max_instances: 32,
            master_volume: 1.0,
            min_distance: 1.0,
            max_distance: 100.0,
        }
    }
}

impl AudioConfig {
    /// Path of the manifest for a bank name.
    pub fn bank_path(&self, name: &str) -> PathBuf {
        self.bank_dir
            .join(format!("{name}.{}", crate::engine::BANK_EXTENSION))
    }
}
