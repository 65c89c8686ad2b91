use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Settings for a [`SoundSystem`](crate::SoundSystem). Every field has a default, so a TOML file
/// only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    /// Directory sound names are resolved against.
    pub asset_dir: PathBuf,
    /// Extensions tried, in order, when a name does not match a file as-is.
    pub extensions: Vec<String>,
    /// Upper bound of simultaneously active transports for the pooled backend.
    pub max_streams: usize,
    /// How often the event loop checks for clips that finished on their own.
    pub poll_interval_ms: u64,
    /// Clamp volume levels to `[0.0, 1.0]` instead of forwarding them untouched.
    pub clamp_volume: bool,
    /// Run without an output device. Transports are created but never heard.
    pub headless: bool,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("sounds"),
            extensions: ["wav", "ogg", "mp3", "flac"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            max_streams: 5,
            poll_interval_ms: 10,
            clamp_volume: false,
            headless: false,
        }
    }
}

impl SoundConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_streams == 0 {
            return Err(ConfigError::Invalid("max_streams must be at least 1".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be at least 1".into()));
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::Invalid("extensions must not be empty".into()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
