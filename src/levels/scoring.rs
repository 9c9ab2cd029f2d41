//! Level scoring
//!
//! Turns one priced chain row into a composite significance score. Higher
//! scores mark strikes more likely to act as support or resistance.

use crate::core::{OptionType, PricedQuote};

use super::{LevelScore, ScoreWeights};

/// Relative distance of the strike from spot, positive on the level's side
///
/// Calls measure upward (strike above spot), puts downward.
pub fn price_distance(option_type: OptionType, strike: f64, spot: f64) -> f64 {
    match option_type {
        OptionType::Call => (strike - spot) / spot,
        OptionType::Put => (spot - strike) / spot,
    }
}

/// Relative distance of the strike from the historical extreme
///
/// The extreme is the historical high for calls and the historical low for
/// puts. It must be non-zero; callers validate it up front.
pub fn historical_distance(option_type: OptionType, strike: f64, extreme: f64) -> f64 {
    match option_type {
        OptionType::Call => (strike - extreme).abs() / extreme,
        OptionType::Put => (extreme - strike).abs() / extreme,
    }
}

/// Score one priced row
///
/// Pure and unbounded above. A zero `historical_extreme` divides by zero, so
/// it must be rejected before calling.
pub fn score_level(
    quote: &PricedQuote,
    spot: f64,
    historical_extreme: f64,
    weights: &ScoreWeights,
) -> LevelScore {
    let q = &quote.quote;
    let g = &quote.greeks;

    let price_distance = price_distance(q.option_type, q.strike, spot);
    let historical_distance = historical_distance(q.option_type, q.strike, historical_extreme);

    let oi_score = q.open_interest as f64 / weights.oi_divisor;
    let volume_score = q.volume as f64 / weights.volume_divisor;
    let iv_score = q.implied_vol * weights.iv_multiplier;
    let distance_score = 1.0 / (1.0 + price_distance);
    let historical_score = 1.0 / (1.0 + historical_distance);
    let delta_score = g.delta.abs() * weights.delta_multiplier;
    let gamma_score = g.gamma * weights.gamma_multiplier;
    let vega_score = g.vega * weights.vega_multiplier;
    let theta_score = g.theta.abs() * weights.theta_multiplier;

    let total = oi_score
        + volume_score
        + iv_score
        + distance_score
        + historical_score
        + delta_score
        + gamma_score
        + vega_score
        + theta_score;

    LevelScore {
        total,
        oi_score,
        volume_score,
        iv_score,
        distance_score,
        historical_score,
        delta_score,
        gamma_score,
        vega_score,
        theta_score,
        price_distance,
        historical_distance,
    }
}
