use std::fs;

use profile_card_lib::{config::ConfigError, fs::config_dir};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use theme::Theme;

mod theme;

const FILE_NAME: &str = "gui.toml";

/// The frontend's own configuration, serialized to TOML.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    pub theme: Theme,
}

impl GuiConfig {
    pub fn load() -> Self {
        let path = match config_dir() {
            Ok(dir) => dir.join(FILE_NAME),
            Err(err) => {
                warn!("No configuration directory available: {err}");
                return Self::default();
            }
        };

        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
                Err(err) => {
                    warn!("Failed to read {}: {err}", path.display());
                    Self::default()
                }
            }
        } else {
            let cfg = Self::default();
            cfg.save();
            cfg
        }
    }

    pub fn save(&self) {
        if let Err(err) = self.try_save() {
            warn!("Failed to save GUI configuration: {err}");
        }
    }

    fn try_save(&self) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        fs::write(config_dir()?.join(FILE_NAME), contents)?;

        Ok(())
    }

    pub fn theme(&self) -> iced::Theme {
        (&self.theme).into()
    }
}
