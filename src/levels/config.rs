//! Configuration for level scoring and ranking

use serde::{Deserialize, Serialize};

/// Default open-interest threshold for level candidates
pub const DEFAULT_OI_THRESHOLD: u64 = 1500;

/// Configuration for level ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Rows need open interest strictly above this to become candidates
    /// Default: 1500
    pub oi_threshold: u64,
    /// Scale constants for the composite score
    pub weights: ScoreWeights,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            oi_threshold: DEFAULT_OI_THRESHOLD,
            weights: ScoreWeights::default(),
        }
    }
}

impl LevelConfig {
    /// Aggressive settings: lower liquidity bar, more levels
    pub fn aggressive() -> Self {
        Self {
            oi_threshold: 500,
            ..Default::default()
        }
    }

    /// Conservative settings: only heavily held strikes
    pub fn conservative() -> Self {
        Self {
            oi_threshold: 5000,
            ..Default::default()
        }
    }

    pub fn with_oi_threshold(mut self, oi_threshold: u64) -> Self {
        self.oi_threshold = oi_threshold;
        self
    }
}

/// Scale constants for each score component
///
/// Each raw quantity is normalised by division or multiplication so no single
/// component dominates the sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Open interest is divided by this
    /// Default: 1000
    pub oi_divisor: f64,
    /// Volume is divided by this
    /// Default: 500
    pub volume_divisor: f64,
    /// Implied volatility is multiplied by this
    /// Default: 100
    pub iv_multiplier: f64,
    /// |delta| is multiplied by this
    /// Default: 1000
    pub delta_multiplier: f64,
    /// Gamma is multiplied by this
    /// Default: 10000
    pub gamma_multiplier: f64,
    /// Vega is multiplied by this
    /// Default: 100
    pub vega_multiplier: f64,
    /// |theta| is multiplied by this
    /// Default: 100
    pub theta_multiplier: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            oi_divisor: 1000.0,
            volume_divisor: 500.0,
            iv_multiplier: 100.0,
            delta_multiplier: 1000.0,
            gamma_multiplier: 10000.0,
            vega_multiplier: 100.0,
            theta_multiplier: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(LevelConfig::default().oi_threshold, 1500);
        assert!(LevelConfig::aggressive().oi_threshold < LevelConfig::default().oi_threshold);
        assert!(LevelConfig::conservative().oi_threshold > LevelConfig::default().oi_threshold);
        assert_eq!(LevelConfig::default().with_oi_threshold(42).oi_threshold, 42);
    }

    #[test]
    fn test_partial_json() {
        let config: LevelConfig = serde_json::from_str(r#"{"oi_threshold": 800}"#).unwrap();
        assert_eq!(config.oi_threshold, 800);
        assert_eq!(config.weights, ScoreWeights::default());

        let config: LevelConfig =
            serde_json::from_str(r#"{"weights": {"gamma_multiplier": 5000.0}}"#).unwrap();
        assert_eq!(config.oi_threshold, DEFAULT_OI_THRESHOLD);
        assert_eq!(config.weights.gamma_multiplier, 5000.0);
        assert_eq!(config.weights.oi_divisor, 1000.0);
    }
}
