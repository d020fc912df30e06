use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LoadwatchError;
use crate::logging::{LogConfig, LogFormat, LogLevel};
use crate::thresholds::Thresholds;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,

    /// Alert thresholds shared by all athletes
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Logging preferences
    #[serde(default)]
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// General application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Data bundle used when `--data` is not given
    pub default_data_file: Option<PathBuf>,

    /// Athlete shown when `--athlete` is not given
    pub default_athlete: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            settings: AppSettings::default(),
            thresholds: Thresholds::default(),
            logging: LogConfig::default(),
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".loadwatch")
            .join("config.toml")
    }

    /// Load configuration from `path`, falling back to defaults when it is missing
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Every dotted key understood by `get_value` / `set_value`
    pub fn keys() -> Vec<String> {
        let mut keys = vec![
            "settings.default_data_file".to_string(),
            "settings.default_athlete".to_string(),
        ];
        keys.extend(Thresholds::KEYS.iter().map(|k| format!("thresholds.{}", k)));
        keys.extend(
            ["logging.level", "logging.format", "logging.file_path"]
                .iter()
                .map(|k| k.to_string()),
        );
        keys
    }

    /// Read a value by dotted key (empty string when unset)
    pub fn get_value(&self, key: &str) -> std::result::Result<String, LoadwatchError> {
        let unknown = || LoadwatchError::UnknownConfigKey {
            key: key.to_string(),
        };

        match key.split_once('.') {
            Some(("settings", "default_data_file")) => Ok(self
                .settings
                .default_data_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()),
            Some(("settings", "default_athlete")) => {
                Ok(self.settings.default_athlete.clone().unwrap_or_default())
            }
            Some(("thresholds", field)) => self.thresholds.get(field).ok_or_else(unknown),
            Some(("logging", "level")) => Ok(self.logging.level.to_filter()),
            Some(("logging", "format")) => Ok(self.logging.format.as_str().to_string()),
            Some(("logging", "file_path")) => Ok(self
                .logging
                .file_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()),
            _ => Err(unknown()),
        }
    }

    /// Set a value by dotted key; an empty value clears optional settings
    pub fn set_value(&mut self, key: &str, value: &str) -> std::result::Result<(), LoadwatchError> {
        let value = value.trim();
        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());

        match key.split_once('.') {
            Some(("settings", "default_data_file")) => {
                self.settings.default_data_file = optional(value).map(PathBuf::from)
            }
            Some(("settings", "default_athlete")) => self.settings.default_athlete = optional(value),
            Some(("thresholds", field)) => self.thresholds.set(field, value)?,
            Some(("logging", "level")) => {
                self.logging.level = value
                    .parse::<LogLevel>()
                    .map_err(LoadwatchError::Configuration)?
            }
            Some(("logging", "format")) => {
                self.logging.format = value
                    .parse::<LogFormat>()
                    .map_err(LoadwatchError::Configuration)?
            }
            Some(("logging", "file_path")) => {
                self.logging.file_path = optional(value).map(PathBuf::from)
            }
            _ => {
                return Err(LoadwatchError::UnknownConfigKey {
                    key: key.to_string(),
                })
            }
        }

        self.metadata.updated_at = Utc::now();
        Ok(())
    }

    /// Restore default thresholds
    pub fn reset_thresholds(&mut self) {
        self.thresholds = Thresholds::default();
        self.metadata.updated_at = Utc::now();
    }
}
