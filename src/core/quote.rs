//! Option quote data
//!
//! Chain rows move through three immutable stages:
//! - `RawQuote`: a row as fetched, without its option class
//! - `OptionQuote`: the row tagged with its class at ingestion
//! - `PricedQuote`: the tagged row with Black-Scholes Greeks attached

use serde::{Deserialize, Serialize};

use super::greeks::Greeks;
use super::option::OptionType;

/// Option chain row as delivered by a data provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuote {
    /// Contract symbol (exchange-specific)
    pub contract_symbol: Option<String>,
    /// Strike price
    pub strike: f64,
    /// Open interest
    pub open_interest: u64,
    /// Trading volume
    pub volume: u64,
    /// Implied volatility
    pub implied_vol: f64,
    /// Last traded price
    pub last_price: Option<f64>,
}

impl RawQuote {
    pub fn new(strike: f64, open_interest: u64, volume: u64, implied_vol: f64) -> Self {
        Self {
            contract_symbol: None,
            strike,
            open_interest,
            volume,
            implied_vol,
            last_price: None,
        }
    }
}

/// Chain row tagged with its option class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    pub contract_symbol: Option<String>,
    pub strike: f64,
    pub option_type: OptionType,
    pub open_interest: u64,
    pub volume: u64,
    pub implied_vol: f64,
    pub last_price: Option<f64>,
}

impl OptionQuote {
    /// Tag a raw row with its option class
    pub fn from_raw(raw: &RawQuote, option_type: OptionType) -> Self {
        Self {
            contract_symbol: raw.contract_symbol.clone(),
            strike: raw.strike,
            option_type,
            open_interest: raw.open_interest,
            volume: raw.volume,
            implied_vol: raw.implied_vol,
            last_price: raw.last_price,
        }
    }

    /// Tag every row of one chain side
    pub fn tag_all(rows: &[RawQuote], option_type: OptionType) -> Vec<Self> {
        rows.iter().map(|r| Self::from_raw(r, option_type)).collect()
    }

    /// Attach computed Greeks, producing a new record
    pub fn with_greeks(self, greeks: Greeks) -> PricedQuote {
        PricedQuote {
            quote: self,
            greeks,
        }
    }
}

/// Tagged chain row with Greeks attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedQuote {
    #[serde(flatten)]
    pub quote: OptionQuote,
    pub greeks: Greeks,
}

impl PricedQuote {
    pub fn strike(&self) -> f64 {
        self.quote.strike
    }

    pub fn option_type(&self) -> OptionType {
        self.quote.option_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagging_preserves_fields() {
        let mut raw = RawQuote::new(460.0, 2500, 300, 0.22);
        raw.contract_symbol = Some("SPY250620C00460000".to_string());
        raw.last_price = Some(3.15);

        let quote = OptionQuote::from_raw(&raw, OptionType::Call);
        assert_eq!(quote.option_type, OptionType::Call);
        assert_eq!(quote.strike, 460.0);
        assert_eq!(quote.open_interest, 2500);
        assert_eq!(quote.volume, 300);
        assert_eq!(quote.contract_symbol.as_deref(), Some("SPY250620C00460000"));
        assert_eq!(quote.last_price, Some(3.15));
    }

    #[test]
    fn test_tag_all_and_price() {
        let rows = vec![RawQuote::new(440.0, 10, 1, 0.3), RawQuote::new(430.0, 20, 2, 0.3)];
        let tagged = OptionQuote::tag_all(&rows, OptionType::Put);
        assert_eq!(tagged.len(), 2);
        assert!(tagged.iter().all(|q| q.option_type == OptionType::Put));

        let priced = tagged[0].clone().with_greeks(Greeks::new(-0.3, 0.01, -5.0, 20.0));
        assert_eq!(priced.strike(), 440.0);
        assert_eq!(priced.option_type(), OptionType::Put);
        assert_eq!(priced.greeks.delta, -0.3);
    }
}
