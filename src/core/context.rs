//! Pricing context shared by every row of one analysis run

use serde::{Deserialize, Serialize};

use super::error::{LevelsError, LevelsResult};
use super::option::OptionType;

/// Default risk-free rate
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.05;

/// Historical high/low over a lookback window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalExtremes {
    pub high: f64,
    pub low: f64,
}

impl HistoricalExtremes {
    pub fn new(high: f64, low: f64) -> Self {
        Self { high, low }
    }

    /// Build from a series of daily highs and lows, skipping gaps
    pub fn from_series(highs: &[Option<f64>], lows: &[Option<f64>]) -> Option<Self> {
        let high = highs
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))?;
        let low = lows
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))))?;
        Some(Self { high, low })
    }
}

/// Inputs shared by every chain row
///
/// Spot may sit outside `[historical_low, historical_high]`: the market can gap
/// outside the lookback window and scoring tolerates it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingContext {
    /// Underlying spot price
    pub spot: f64,
    /// Risk-free rate
    pub rate: f64,
    /// Time to expiry in years (floored)
    pub time_to_expiry: f64,
    /// Historical high over the lookback window
    pub historical_high: f64,
    /// Historical low over the lookback window
    pub historical_low: f64,
}

impl PricingContext {
    pub fn new(spot: f64, time_to_expiry: f64, extremes: HistoricalExtremes) -> Self {
        Self {
            spot,
            rate: DEFAULT_RISK_FREE_RATE,
            time_to_expiry,
            historical_high: extremes.high,
            historical_low: extremes.low,
        }
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    /// Historical extreme a level of this class is measured against
    pub fn historical_extreme(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => self.historical_high,
            OptionType::Put => self.historical_low,
        }
    }

    /// Reject inputs that would turn scores into NaN or infinity
    pub fn validate(&self) -> LevelsResult<()> {
        if !(self.spot.is_finite() && self.spot > 0.0) {
            return Err(LevelsError::domain(format!(
                "spot must be positive, got {}",
                self.spot
            )));
        }
        if !(self.historical_high.is_finite() && self.historical_high > 0.0) {
            return Err(LevelsError::domain(format!(
                "historical high must be positive, got {}",
                self.historical_high
            )));
        }
        if !(self.historical_low.is_finite() && self.historical_low > 0.0) {
            return Err(LevelsError::domain(format!(
                "historical low must be positive, got {}",
                self.historical_low
            )));
        }
        if !self.rate.is_finite() {
            return Err(LevelsError::domain("risk-free rate must be finite"));
        }
        if !self.time_to_expiry.is_finite() {
            return Err(LevelsError::domain("time to expiry must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PricingContext {
        PricingContext::new(450.0, 30.0 / 365.0, HistoricalExtremes::new(480.0, 410.0))
    }

    #[test]
    fn test_defaults_and_extremes() {
        let ctx = context();
        assert_eq!(ctx.rate, DEFAULT_RISK_FREE_RATE);
        assert_eq!(ctx.historical_extreme(OptionType::Call), 480.0);
        assert_eq!(ctx.historical_extreme(OptionType::Put), 410.0);
        assert_eq!(ctx.with_rate(0.03).rate, 0.03);
    }

    #[test]
    fn test_validate() {
        assert!(context().validate().is_ok());

        // Spot outside the historical window is allowed
        let gapped = PricingContext { spot: 500.0, ..context() };
        assert!(gapped.validate().is_ok());

        let zero_low = PricingContext { historical_low: 0.0, ..context() };
        assert!(matches!(zero_low.validate(), Err(LevelsError::Domain(_))));

        let zero_high = PricingContext { historical_high: 0.0, ..context() };
        assert!(matches!(zero_high.validate(), Err(LevelsError::Domain(_))));

        let bad_spot = PricingContext { spot: -1.0, ..context() };
        assert!(bad_spot.validate().is_err());

        let nan_spot = PricingContext { spot: f64::NAN, ..context() };
        assert!(nan_spot.validate().is_err());
    }

    #[test]
    fn test_extremes_from_series() {
        let highs = vec![Some(101.0), None, Some(105.5), Some(f64::NAN)];
        let lows = vec![Some(95.0), Some(93.2), None, Some(96.0)];
        let ext = HistoricalExtremes::from_series(&highs, &lows).unwrap();
        assert_eq!(ext.high, 105.5);
        assert_eq!(ext.low, 93.2);

        assert!(HistoricalExtremes::from_series(&[None], &[Some(1.0)]).is_none());
    }
}
