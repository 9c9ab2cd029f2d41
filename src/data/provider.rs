//! Market data collaborator interface
//!
//! The level engine never fetches anything itself. Everything it needs from
//! the outside world comes through [`MarketDataProvider`].

use chrono::{NaiveDate, Utc};

use crate::core::{
    HistoricalExtremes, LevelsError, LevelsResult, OptionChain, DEFAULT_RISK_FREE_RATE,
};

/// Source of option chains, prices and reference rates
pub trait MarketDataProvider {
    /// Available option expiration dates
    fn expirations(&self, ticker: &str) -> LevelsResult<Vec<NaiveDate>>;

    /// Option chain for a specific expiration
    fn option_chain_for(&self, ticker: &str, expiry: NaiveDate) -> LevelsResult<OptionChain>;

    /// Current price of the underlying
    fn spot_price(&self, ticker: &str) -> LevelsResult<f64>;

    /// Highest high and lowest low over the last `window_days` calendar days
    fn historical_extremes(&self, ticker: &str, window_days: u32) -> LevelsResult<HistoricalExtremes>;

    /// Market volatility index level (display only)
    fn volatility_index(&self) -> LevelsResult<f64>;

    /// Risk-free rate; a fixed constant unless overridden
    fn risk_free_rate(&self) -> LevelsResult<f64> {
        Ok(DEFAULT_RISK_FREE_RATE)
    }

    /// Chain for the nearest expiration on or after `today`
    fn option_chain_on(&self, ticker: &str, today: NaiveDate) -> LevelsResult<OptionChain> {
        let expiries = self.expirations(ticker)?;
        let expiry = nearest_expiry(&expiries, today).ok_or_else(|| {
            LevelsError::data(format!("no valid expiration dates for {}", ticker))
        })?;
        self.option_chain_for(ticker, expiry)
    }

    /// Chain for the nearest expiration from today
    fn option_chain(&self, ticker: &str) -> LevelsResult<OptionChain> {
        self.option_chain_on(ticker, Utc::now().date_naive())
    }
}

/// Earliest expiration on or after `today`
pub fn nearest_expiry(expiries: &[NaiveDate], today: NaiveDate) -> Option<NaiveDate> {
    expiries.iter().copied().filter(|d| *d >= today).min()
}

/// Expirations on or after `today`, ascending
pub fn upcoming_expiries(expiries: &[NaiveDate], today: NaiveDate) -> Vec<NaiveDate> {
    let mut upcoming: Vec<NaiveDate> = expiries.iter().copied().filter(|d| *d >= today).collect();
    upcoming.sort();
    upcoming.dedup();
    upcoming
}
