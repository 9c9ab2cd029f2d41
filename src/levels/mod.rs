//! Support/Resistance Levels from Option Positioning
//!
//! Ranks strikes by a composite score built from open interest, volume,
//! implied volatility, Black-Scholes Greeks and distance to spot and to the
//! historical extremes.
//!
//! Pipeline:
//! 1. **Tag**: each raw row gets its option class
//! 2. **Price**: Greeks per row
//! 3. **Filter**: open interest above the liquidity threshold
//! 4. **Partition**: calls above spot are resistance, puts below spot support
//! 5. **Score & sort**: composite score, descending

mod config;
mod detector;
mod ranking;
mod scoring;

pub use config::*;
pub use detector::*;
pub use ranking::*;
pub use scoring::*;

use serde::{Deserialize, Serialize};

use crate::core::{OptionType, PricedQuote};

/// Which side of spot a level sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelSide {
    /// Price floor below spot, from puts
    Support,
    /// Price ceiling above spot, from calls
    Resistance,
}

impl LevelSide {
    pub fn label(&self) -> &'static str {
        match self {
            LevelSide::Support => "Support",
            LevelSide::Resistance => "Resistance",
        }
    }

    /// Option class whose rows feed this side
    pub fn option_type(&self) -> OptionType {
        match self {
            LevelSide::Support => OptionType::Put,
            LevelSide::Resistance => OptionType::Call,
        }
    }
}

/// Composite score with every component kept for inspection
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelScore {
    /// Sum of all component scores
    pub total: f64,
    pub oi_score: f64,
    pub volume_score: f64,
    pub iv_score: f64,
    pub distance_score: f64,
    pub historical_score: f64,
    pub delta_score: f64,
    pub gamma_score: f64,
    pub vega_score: f64,
    pub theta_score: f64,
    /// Relative distance from spot on the level's side
    pub price_distance: f64,
    /// Relative distance from the historical extreme
    pub historical_distance: f64,
}

/// A scored level candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedLevel {
    #[serde(flatten)]
    pub quote: PricedQuote,
    pub score: LevelScore,
}

impl RankedLevel {
    pub fn strike(&self) -> f64 {
        self.quote.strike()
    }

    pub fn side(&self) -> LevelSide {
        match self.quote.option_type() {
            OptionType::Call => LevelSide::Resistance,
            OptionType::Put => LevelSide::Support,
        }
    }

    /// Short one-line description
    pub fn tooltip(&self) -> String {
        format!(
            "K={:.2} | {} | Score: {:.2} | OI: {} | Vol: {} | IV: {:.1}% | Distance: {:.2}%",
            self.strike(),
            self.side().label(),
            self.score.total,
            self.quote.quote.open_interest,
            self.quote.quote.volume,
            self.quote.quote.implied_vol * 100.0,
            self.score.price_distance * 100.0
        )
    }
}

/// Ranked support and resistance, each sorted by score descending
///
/// Either side may be empty, meaning no significant level was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    pub support: Vec<RankedLevel>,
    pub resistance: Vec<RankedLevel>,
}

impl LevelSet {
    pub fn is_empty(&self) -> bool {
        self.support.is_empty() && self.resistance.is_empty()
    }

    /// Levels on one side
    pub fn side(&self, side: LevelSide) -> &[RankedLevel] {
        match side {
            LevelSide::Support => &self.support,
            LevelSide::Resistance => &self.resistance,
        }
    }

    /// Highest-scoring support
    pub fn strongest_support(&self) -> Option<&RankedLevel> {
        self.support.first()
    }

    /// Highest-scoring resistance
    pub fn strongest_resistance(&self) -> Option<&RankedLevel> {
        self.resistance.first()
    }

    /// Best `n` levels per side
    pub fn top(&self, n: usize) -> LevelSet {
        LevelSet {
            support: self.support.iter().take(n).cloned().collect(),
            resistance: self.resistance.iter().take(n).cloned().collect(),
        }
    }
}
