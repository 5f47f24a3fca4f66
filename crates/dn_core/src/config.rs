//! Game configuration
//!
//! Loaded from a JSON file; `DN_CONFIG_PATH` points at it when the host does
//! not pass a config explicitly.

use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::MealSlot;
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::regime::DEFAULT_REGIME_ID;

pub const CONFIG_PATH_ENV: &str = "DN_CONFIG_PATH";

/// Storage key of the snapshot (kept from the browser version)
pub const DEFAULT_STORAGE_KEY: &str = "disciplineNutritionState";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Key the snapshot is stored under
    pub storage_key: String,
    /// Adds the snack slot to every day
    pub include_snack: bool,
    /// Regime on first run
    pub default_regime: String,
    /// Archived day records kept
    pub history_capacity: usize,
    /// Durable store location; in-memory when unset
    pub save_dir: Option<PathBuf>,
    /// Where older JSON exports are looked up
    pub legacy_dir: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            include_snack: false,
            default_regime: DEFAULT_REGIME_ID.to_string(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            save_dir: None,
            legacy_dir: None,
        }
    }
}

impl GameConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Config named by `DN_CONFIG_PATH`, or defaults when it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        log::info!("Loading config from {}='{}'", CONFIG_PATH_ENV, path);
        Self::load(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Validation("storage_key must not be empty".to_string()));
        }
        if self.default_regime.trim().is_empty() {
            return Err(ConfigError::Validation("default_regime must not be empty".to_string()));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Validation(
                "history_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Meal slots of every day, in display order
    pub fn meal_slots(&self) -> Vec<MealSlot> {
        let mut slots = MealSlot::MAIN.to_vec();
        if self.include_snack {
            slots.push(MealSlot::Snack);
        }
        slots
    }

    pub fn has_slot(&self, slot: MealSlot) -> bool {
        slot != MealSlot::Snack || self.include_snack
    }
}
