use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::fs::config_dir;

const FILE_NAME: &str = "core.toml";

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access the configuration file: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed configuration file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize the configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// The backend's core configuration, serialized to TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Prefix placed in front of every durable key
    pub namespace: String,
    /// Largest local image, in bytes, accepted as an avatar
    pub max_avatar_bytes: usize,
    pub contact: Contact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub email: String,
    pub phone: String,
}

impl CoreConfig {
    /// Load the configuration from the config directory, writing out the defaults if no file
    /// exists yet. A broken file is reported and replaced in memory by the defaults.
    pub fn load() -> Self {
        match config_dir() {
            Ok(dir) => Self::load_from(&dir.join(FILE_NAME)).unwrap_or_else(|err| {
                warn!("Falling back to default configuration: {err}");
                Self::default()
            }),
            Err(err) => {
                warn!("No configuration directory available: {err}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let cfg = Self::default();
            cfg.save_to(path)?;
            debug!("Wrote default configuration to {}", path.display());
            Ok(cfg)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn mock() -> Self {
        Self::default()
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            namespace: "profileCard".into(),
            max_avatar_bytes: 2 * 1024 * 1024,
            contact: Contact::default(),
        }
    }
}

impl Default for Contact {
    fn default() -> Self {
        Self {
            email: "invincible@gmail.com".into(),
            phone: "3418003822".into(),
        }
    }
}
