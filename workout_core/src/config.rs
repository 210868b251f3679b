//! Configuration file support for FitTrack.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/fittrack/config.toml`.

use crate::session::PauseAccounting;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub equipment: EquipmentConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub recommendations: RecommendationConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Optional JSON exercise catalog replacing the built-in one
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            catalog_path: None,
        }
    }
}

/// Equipment availability configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EquipmentConfig {
    #[serde(default = "default_equipment")]
    pub available: Vec<String>,
}

impl Default for EquipmentConfig {
    fn default() -> Self {
        Self {
            available: default_equipment(),
        }
    }
}

/// Session timer configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    #[serde(default)]
    pub pause_accounting: PauseAccounting,
}

/// Recommendation scorer parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecommendationConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Recent volume above which a primary muscle costs 2 points
    #[serde(default = "default_high_fatigue_volume")]
    pub high_fatigue_volume: f64,

    /// Recent volume above which a primary muscle costs 1 point
    #[serde(default = "default_moderate_fatigue_volume")]
    pub moderate_fatigue_volume: f64,

    /// Window of completed sessions used to build the recent-volume map
    #[serde(default = "default_history_days")]
    pub history_days: i64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            high_fatigue_volume: default_high_fatigue_volume(),
            moderate_fatigue_volume: default_moderate_fatigue_volume(),
            history_days: default_history_days(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|_| PathBuf::from("."))
    });
    base.join("fittrack")
}

fn default_equipment() -> Vec<String> {
    vec!["Dumbbells".into(), "Bench".into(), "Pull-up Bar".into()]
}

fn default_max_results() -> usize {
    5
}

fn default_high_fatigue_volume() -> f64 {
    5000.0
}

fn default_moderate_fatigue_volume() -> f64 {
    3000.0
}

/// Longest recent-volume window accepted from config (100 years)
pub const MAX_HISTORY_DAYS: i64 = 36_500;

fn default_history_days() -> i64 {
    7
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject parameter combinations the scorer cannot use
    pub fn validate(&self) -> Result<()> {
        let rec = &self.recommendations;
        if rec.moderate_fatigue_volume > rec.high_fatigue_volume {
            return Err(Error::Config(format!(
                "moderate_fatigue_volume ({}) exceeds high_fatigue_volume ({})",
                rec.moderate_fatigue_volume, rec.high_fatigue_volume
            )));
        }
        if !(0..=MAX_HISTORY_DAYS).contains(&rec.history_days) {
            return Err(Error::Config(format!(
                "history_days must be between 0 and {} (got {})",
                MAX_HISTORY_DAYS, rec.history_days
            )));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|_| PathBuf::from("."))
        });
        base.join("fittrack").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
