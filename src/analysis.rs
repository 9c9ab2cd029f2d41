//! Analysis boundary
//!
//! Fetches everything a run needs from a [`MarketDataProvider`], validates it
//! into a [`PricingContext`] and ranks the nearest expiry's levels. Fetch
//! failures are returned as-is; nothing here retries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::core::{days_to_expiry, time_to_expiry, LevelsError, LevelsResult, PricingContext};
use crate::data::{upcoming_expiries, MarketDataProvider};
use crate::levels::{LevelDetector, LevelSet};
use crate::positioning::{analyze_positioning, PositioningSummary};

/// Result of one level analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub ticker: String,
    pub expiry: NaiveDate,
    pub days_to_expiry: i64,
    pub generated_at: DateTime<Utc>,
    pub context: PricingContext,
    /// Volatility index level, when it could be fetched
    pub volatility_index: Option<f64>,
    pub oi_threshold: u64,
    /// Rows in the fetched chain (calls, puts)
    pub chain_size: (usize, usize),
    pub levels: LevelSet,
}

/// Runs level and positioning analyses against a data provider
pub struct LevelAnalyzer<P: MarketDataProvider> {
    provider: P,
    config: AnalysisConfig,
}

impl<P: MarketDataProvider> LevelAnalyzer<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, AnalysisConfig::default())
    }

    pub fn with_config(provider: P, config: AnalysisConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Rank support/resistance for the nearest expiry as of now
    pub fn analyze(&self, ticker: &str) -> LevelsResult<AnalysisReport> {
        self.analyze_at(ticker, Utc::now())
    }

    /// Rank support/resistance for the nearest expiry as of `now`
    pub fn analyze_at(&self, ticker: &str, now: DateTime<Utc>) -> LevelsResult<AnalysisReport> {
        let chain = self.provider.option_chain_on(ticker, now.date_naive())?;
        let spot = self.provider.spot_price(ticker)?;
        let extremes = self
            .provider
            .historical_extremes(ticker, self.config.history_window_days)?;
        let rate = self.provider.risk_free_rate()?;

        let volatility_index = match self.provider.volatility_index() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Volatility index unavailable: {}", e);
                None
            }
        };

        let t = time_to_expiry(chain.expiry, now, self.config.expiry_floor);
        let ctx = PricingContext::new(spot, t, extremes).with_rate(rate);

        let detector = LevelDetector::with_config(self.config.levels.clone());
        let levels = detector.detect(&chain, &ctx)?;

        tracing::info!(
            "{} {}: {} support, {} resistance levels (spot {:.2}, T {:.4}y)",
            ticker,
            chain.expiry,
            levels.support.len(),
            levels.resistance.len(),
            spot,
            t
        );

        Ok(AnalysisReport {
            ticker: ticker.to_string(),
            expiry: chain.expiry,
            days_to_expiry: days_to_expiry(chain.expiry, now),
            generated_at: now,
            context: ctx,
            volatility_index,
            oi_threshold: self.config.levels.oi_threshold,
            chain_size: (chain.calls.len(), chain.puts.len()),
            levels,
        })
    }

    /// Positioning ratios over the next `max_expiries` expirations as of now
    pub fn positioning(&self, ticker: &str, max_expiries: usize) -> LevelsResult<PositioningSummary> {
        self.positioning_at(ticker, max_expiries, Utc::now())
    }

    /// Positioning ratios over the next `max_expiries` expirations as of `now`
    ///
    /// Expiries whose chain cannot be fetched are skipped with a warning; the
    /// run fails only when none are left.
    pub fn positioning_at(
        &self,
        ticker: &str,
        max_expiries: usize,
        now: DateTime<Utc>,
    ) -> LevelsResult<PositioningSummary> {
        let today = now.date_naive();
        let expiries: Vec<NaiveDate> = upcoming_expiries(&self.provider.expirations(ticker)?, today)
            .into_iter()
            .take(max_expiries)
            .collect();
        if expiries.is_empty() {
            return Err(LevelsError::data(format!("no valid expiration dates for {}", ticker)));
        }

        let spot = self.provider.spot_price(ticker)?;
        if !(spot.is_finite() && spot > 0.0) {
            return Err(LevelsError::domain(format!("spot must be positive, got {}", spot)));
        }
        let rate = self.provider.risk_free_rate()?;

        let mut rows = Vec::with_capacity(expiries.len());
        for expiry in expiries {
            match self.provider.option_chain_for(ticker, expiry) {
                Ok(chain) => {
                    rows.push(analyze_positioning(&chain, spot, days_to_expiry(expiry, now), rate));
                }
                Err(e) => {
                    tracing::warn!("Failed to get chain for {}: {}", expiry, e);
                }
            }
        }

        if rows.is_empty() {
            return Err(LevelsError::data(format!("no option chains available for {}", ticker)));
        }

        Ok(PositioningSummary::from_expiries(ticker, spot, rows))
    }
}
