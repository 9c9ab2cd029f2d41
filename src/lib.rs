//! # Option Levels - Option-Implied Support and Resistance
//!
//! Estimates support/resistance price levels for an underlying from its
//! option chain. Open interest, volume and implied volatility are combined
//! with Black-Scholes Greeks into a composite score per strike.
//!
//! ## Key Components
//!
//! - **Time to Expiry**: year fraction with a configurable floor
//! - **Black-Scholes**: delta, gamma, theta and vega per chain row
//! - **Level Scorer**: one composite score per priced row
//! - **Level Ranker**: liquidity filter, support/resistance partition, sort
//! - **Positioning**: skew, volume, open-interest and exposure ratios
//! - **Data Fetching**: Yahoo Finance behind the `MarketDataProvider` trait
//!
//! ## Usage
//!
//! ```rust,no_run
//! use option_levels::prelude::*;
//!
//! let yahoo = YahooClient::new().unwrap();
//! let analyzer = LevelAnalyzer::new(yahoo);
//! let report = analyzer.analyze("SPY").unwrap();
//!
//! for level in report.levels.top(3).support {
//!     println!("{}", level.tooltip());
//! }
//! ```
//!
//! The engine itself is pure:
//!
//! ```rust
//! use option_levels::prelude::*;
//!
//! let ctx = PricingContext::new(450.0, 30.0 / 365.0, HistoricalExtremes::new(480.0, 410.0));
//! let calls = vec![RawQuote::new(460.0, 12_000, 2_500, 0.18)];
//! let puts = vec![RawQuote::new(440.0, 9_000, 1_800, 0.23)];
//!
//! let levels = compute_levels(&calls, &puts, &ctx, DEFAULT_OI_THRESHOLD).unwrap();
//! assert_eq!(levels.strongest_resistance().unwrap().strike(), 460.0);
//! assert_eq!(levels.strongest_support().unwrap().strike(), 440.0);
//! ```
//!
//! ## What This Does NOT Do
//!
//! - Price options in real time
//! - Store market data
//! - Aggregate across tickers or portfolios

pub mod analysis;
pub mod config;
pub mod core;
pub mod data;
pub mod levels;
pub mod models;
pub mod positioning;
pub mod report;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        days_to_expiry, time_to_expiry, time_to_expiry_now, ExpiryFloor, Greeks,
        HistoricalExtremes, LevelsError, LevelsResult, OptionChain, OptionQuote, OptionType,
        PricedQuote, PricingContext, RawQuote, DEFAULT_RISK_FREE_RATE,
    };

    // Data fetching
    pub use crate::data::{MarketDataProvider, SpotQuote, YahooClient};

    // Models
    pub use crate::models::{greeks as bs_greeks, norm_cdf, norm_pdf};

    // Levels
    pub use crate::levels::{
        compute_levels, detect_levels, detect_levels_with_config, rank_levels, score_level,
        LevelConfig, LevelDetector, LevelScore, LevelSet, LevelSide, RankedLevel, ScoreWeights,
        DEFAULT_OI_THRESHOLD,
    };

    // Positioning
    pub use crate::positioning::{analyze_positioning, ExpiryPositioning, PositioningSummary};

    // Analysis
    pub use crate::analysis::{AnalysisReport, LevelAnalyzer};
    pub use crate::config::AnalysisConfig;
}

// Re-export main types at crate root
pub use crate::core::{LevelsError, LevelsResult};
pub use crate::levels::compute_levels;
pub use crate::models::greeks as compute_greeks;
