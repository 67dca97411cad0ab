//! Session configuration: timing, persistence and scoring knobs.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    ANSWER_POINTS, KEY_POINTS, LOCATION_TIME_LIMIT_SECS, MAX_CATCH_UP_SECS, STARTING_HEALTH,
    STORAGE_KEY, TICK_INTERVAL_MS, VAULT_BONUS, WRONG_ANSWER_PENALTY,
};

/// Errors raised while loading or validating a [`GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("storage key must not be empty")]
    EmptyStorageKey,
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Points and penalties applied by the command interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringCfg {
    pub key_points: u64,
    pub answer_points: u64,
    pub vault_bonus: u64,
    pub wrong_answer_penalty: i32,
    pub starting_health: i32,
}

impl Default for ScoringCfg {
    fn default() -> Self {
        Self {
            key_points: KEY_POINTS,
            answer_points: ANSWER_POINTS,
            vault_bonus: VAULT_BONUS,
            wrong_answer_penalty: WRONG_ANSWER_PENALTY,
            starting_health: STARTING_HEALTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Period of the real-time tick loop.
    pub tick_interval_ms: u64,
    /// Countdown granted on entering a special location.
    pub location_time_limit_secs: f64,
    /// Cap on real seconds credited per tick or resume.
    pub max_catch_up_secs: f64,
    pub storage_key: String,
    pub scoring: ScoringCfg,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            location_time_limit_secs: LOCATION_TIME_LIMIT_SECS,
            max_catch_up_secs: MAX_CATCH_UP_SECS,
            storage_key: STORAGE_KEY.to_string(),
            scoring: ScoringCfg::default(),
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate ranges.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        #[allow(clippy::cast_precision_loss)]
        let tick_ms = self.tick_interval_ms as f64;
        let positives = [
            ("tick_interval_ms", tick_ms),
            ("location_time_limit_secs", self.location_time_limit_secs),
            ("max_catch_up_secs", self.max_catch_up_secs),
        ];
        for (field, value) in positives {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        Ok(())
    }
}
