//! LevelDetector - facade over scoring and ranking
//!
//! Holds a configuration and runs the full ranking pipeline on a chain.

use crate::core::{LevelsResult, OptionChain, PricingContext};

use super::{rank_levels, LevelConfig, LevelSet};

/// Runs the level ranking pipeline with a fixed configuration
pub struct LevelDetector {
    config: LevelConfig,
}

impl LevelDetector {
    /// Create a new detector with default configuration
    pub fn new() -> Self {
        Self {
            config: LevelConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(config: LevelConfig) -> Self {
        Self { config }
    }

    /// Get current configuration
    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Update configuration
    pub fn set_config(&mut self, config: LevelConfig) {
        self.config = config;
    }

    /// Rank the levels of one expiry chain
    pub fn detect(&self, chain: &OptionChain, ctx: &PricingContext) -> LevelsResult<LevelSet> {
        rank_levels(&chain.calls, &chain.puts, ctx, &self.config)
    }
}

impl Default for LevelDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to rank a chain with the default configuration
pub fn detect_levels(chain: &OptionChain, ctx: &PricingContext) -> LevelsResult<LevelSet> {
    LevelDetector::new().detect(chain, ctx)
}

/// Convenience function with custom config
pub fn detect_levels_with_config(
    chain: &OptionChain,
    ctx: &PricingContext,
    config: LevelConfig,
) -> LevelsResult<LevelSet> {
    LevelDetector::with_config(config).detect(chain, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{HistoricalExtremes, RawQuote};
    use chrono::NaiveDate;

    fn create_test_chain() -> OptionChain {
        let expiry = NaiveDate::from_ymd_opt(2025, 3, 21).unwrap();
        let mut chain = OptionChain::new("SPY", expiry);

        // Strikes 90..=110 around spot 100, OI peaking at 105 calls and 95 puts
        for i in 0..21 {
            let strike = 90.0 + i as f64;
            let call_oi = 3000 - ((strike - 105.0_f64).abs() as u64) * 200;
            let put_oi = 3000 - ((strike - 95.0_f64).abs() as u64) * 200;
            chain.calls.push(RawQuote::new(strike, call_oi, 200, 0.22));
            chain.puts.push(RawQuote::new(strike, put_oi, 200, 0.25));
        }
        chain
    }

    fn context() -> PricingContext {
        PricingContext::new(100.0, 14.0 / 365.0, HistoricalExtremes::new(108.0, 92.0))
    }

    #[test]
    fn test_full_pipeline() {
        let result = detect_levels(&create_test_chain(), &context()).unwrap();

        assert!(!result.support.is_empty(), "Should find support");
        assert!(!result.resistance.is_empty(), "Should find resistance");

        let support = result.strongest_support().unwrap();
        let resistance = result.strongest_resistance().unwrap();
        assert!(support.strike() < 100.0);
        assert!(resistance.strike() > 100.0);
    }

    #[test]
    fn test_conservative_config() {
        let chain = create_test_chain();
        let ctx = context();

        let conservative = LevelDetector::with_config(LevelConfig::conservative());
        let aggressive = LevelDetector::with_config(LevelConfig::aggressive());

        let result_conservative = conservative.detect(&chain, &ctx).unwrap();
        let result_aggressive = aggressive.detect(&chain, &ctx).unwrap();

        // Conservative threshold (5000) is above every row's OI
        assert!(result_conservative.is_empty());
        assert!(
            result_aggressive.support.len() + result_aggressive.resistance.len()
                >= result_conservative.support.len() + result_conservative.resistance.len(),
            "Aggressive config should produce at least as many levels"
        );
    }

    #[test]
    fn test_set_config() {
        let mut detector = LevelDetector::default();
        assert_eq!(detector.config().oi_threshold, 1500);

        detector.set_config(LevelConfig::aggressive());
        assert_eq!(detector.config().oi_threshold, 500);

        let result = detect_levels_with_config(&create_test_chain(), &context(), LevelConfig::aggressive()).unwrap();
        assert_eq!(result, detector.detect(&create_test_chain(), &context()).unwrap());
    }
}
