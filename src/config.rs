//! Playground configuration persistence
//!
//! Stores defaults in `~/.config/maskedit/config.yaml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::controller::ControllerSettings;
use crate::correction::DEFAULT_CORRECTION_DELAY;
use crate::mask::{MaskOptions, MaskSource};

/// Playground configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaygroundConfig {
    /// Mask options used when the command line does not name a mask
    #[serde(default = "default_options")]
    pub options: MaskOptions,

    /// Delay before the deferred caret correction, in milliseconds
    #[serde(default = "default_correction_delay_ms")]
    pub correction_delay_ms: u64,
}

fn default_options() -> MaskOptions {
    MaskOptions::with_mask(MaskSource::pattern("00/00"))
}

fn default_correction_delay_ms() -> u64 {
    DEFAULT_CORRECTION_DELAY.as_millis() as u64
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            options: default_options(),
            correction_delay_ms: default_correction_delay_ms(),
        }
    }
}

impl PlaygroundConfig {
    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<PathBuf, String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn correction_delay(&self) -> Duration {
        Duration::from_millis(self.correction_delay_ms)
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            correction_delay: self.correction_delay(),
        }
    }
}
