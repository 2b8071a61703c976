use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ingestion::error::ImportError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub import: ImportConfig,
    pub logging: LoggingConfig,
}

/// Stat-block import behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Hit dice used when an NPC block has no `HD` field.
    pub npc_default_hit_dice: String,
    /// Hit dice used for PCs whose class is unknown.
    pub pc_default_hit_dice: String,
    /// Cut `SP` text at the first semicolon outside parentheses instead of
    /// the first semicolon.
    pub paren_aware_special: bool,
    /// Roll missing NPC hit points instead of taking the average.
    pub roll_missing_hp: bool,
}

/// Log output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    /// Emit JSON lines on stderr instead of human-readable output.
    pub json: bool,
    /// Also write daily-rolling JSON logs into this directory.
    pub file_dir: Option<PathBuf>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            npc_default_hit_dice: "1d8".to_string(),
            pc_default_hit_dice: "1d4".to_string(),
            paren_aware_special: false,
            roll_missing_hp: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/dcc-statblock/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}, using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {}, using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit path, failing loudly.
    pub fn load_from(path: &Path) -> Result<Self, ImportError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ImportError::io(path, e))?;
        toml::from_str(&contents).map_err(|e| ImportError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("dcc-statblock").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
