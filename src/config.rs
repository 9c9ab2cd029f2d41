//! Analysis configuration
//!
//! Serde-backed with defaults for every field, so a JSON file only needs the
//! values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{ExpiryFloor, LevelsError, LevelsResult};
use crate::levels::LevelConfig;

/// Configuration for a full level analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Level ranking settings
    pub levels: LevelConfig,
    /// Lookback window for historical high/low, in calendar days
    /// Default: 90
    pub history_window_days: u32,
    /// Minimum time to expiry
    /// Default: one week
    pub expiry_floor: ExpiryFloor,
    /// Levels per side shown in reports
    /// Default: 5
    pub top_n: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            levels: LevelConfig::default(),
            history_window_days: 90,
            expiry_floor: ExpiryFloor::default(),
            top_n: 5,
        }
    }
}

impl AnalysisConfig {
    /// Load from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> LevelsResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| LevelsError::config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty JSON
    pub fn save_json_file(&self, path: impl AsRef<Path>) -> LevelsResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LevelsError::Serialization(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> LevelsResult<()> {
        if self.history_window_days == 0 {
            return Err(LevelsError::config("history_window_days must be at least 1"));
        }
        let w = &self.levels.weights;
        if w.oi_divisor <= 0.0 || w.volume_divisor <= 0.0 {
            return Err(LevelsError::config("score divisors must be positive"));
        }
        Ok(())
    }
}
