//! Level ranking
//!
//! Applies the Greek calculator and the level scorer across a full chain,
//! filters by liquidity, partitions into support and resistance and sorts.

use rayon::prelude::*;

use crate::core::{LevelsError, LevelsResult, OptionQuote, OptionType, PricedQuote, PricingContext, RawQuote};
use crate::models::black_scholes;

use super::{score_level, LevelConfig, LevelSet, LevelSide, RankedLevel, ScoreWeights};

/// Rank a chain into support and resistance levels with default weights
///
/// Rows need open interest strictly greater than `oi_threshold`. Resistance
/// comes from calls struck above spot, support from puts struck below it.
/// Both sequences are sorted by score descending; ties keep chain order.
pub fn compute_levels(
    calls: &[RawQuote],
    puts: &[RawQuote],
    ctx: &PricingContext,
    oi_threshold: u64,
) -> LevelsResult<LevelSet> {
    rank_levels(
        calls,
        puts,
        ctx,
        &LevelConfig::default().with_oi_threshold(oi_threshold),
    )
}

/// Rank a chain using a full configuration
///
/// Only rows above the open-interest threshold are checked for a valid
/// strike; a non-positive or NaN strike on such a row fails the whole run
/// with a `Domain` error, while illiquid rows are dropped unchecked.
pub fn rank_levels(
    calls: &[RawQuote],
    puts: &[RawQuote],
    ctx: &PricingContext,
    config: &LevelConfig,
) -> LevelsResult<LevelSet> {
    ctx.validate()?;
    validate_strikes(calls, OptionType::Call, config.oi_threshold)?;
    validate_strikes(puts, OptionType::Put, config.oi_threshold)?;

    // Steps 1-2: tag and price every row
    let priced_calls = price_all(OptionQuote::tag_all(calls, OptionType::Call), ctx);
    let priced_puts = price_all(OptionQuote::tag_all(puts, OptionType::Put), ctx);

    // Steps 3-4: liquidity filter and partition around spot
    let resistance = select_candidates(priced_calls, LevelSide::Resistance, ctx.spot, config.oi_threshold);
    let support = select_candidates(priced_puts, LevelSide::Support, ctx.spot, config.oi_threshold);

    // Steps 5-6: score and sort
    let resistance = score_and_sort(resistance, ctx, &config.weights)?;
    let support = score_and_sort(support, ctx, &config.weights)?;

    tracing::debug!(
        calls = calls.len(),
        puts = puts.len(),
        resistance = resistance.len(),
        support = support.len(),
        oi_threshold = config.oi_threshold,
        "ranked option levels"
    );

    Ok(LevelSet { support, resistance })
}

/// Attach Black-Scholes Greeks to every row
pub fn price_all(quotes: Vec<OptionQuote>, ctx: &PricingContext) -> Vec<PricedQuote> {
    quotes
        .into_par_iter()
        .map(|q| {
            let greeks = black_scholes::greeks(
                ctx.spot,
                q.strike,
                ctx.time_to_expiry,
                ctx.rate,
                q.implied_vol,
                q.option_type,
            );
            q.with_greeks(greeks)
        })
        .collect()
}

/// Whether a strike lies on the given side of spot
pub fn is_on_side(side: LevelSide, strike: f64, spot: f64) -> bool {
    match side {
        LevelSide::Resistance => strike > spot,
        LevelSide::Support => strike < spot,
    }
}

fn select_candidates(
    priced: Vec<PricedQuote>,
    side: LevelSide,
    spot: f64,
    oi_threshold: u64,
) -> Vec<PricedQuote> {
    priced
        .into_iter()
        .filter(|p| p.quote.open_interest > oi_threshold)
        .filter(|p| is_on_side(side, p.strike(), spot))
        .collect()
}

fn score_and_sort(
    candidates: Vec<PricedQuote>,
    ctx: &PricingContext,
    weights: &ScoreWeights,
) -> LevelsResult<Vec<RankedLevel>> {
    let mut levels: Vec<RankedLevel> = candidates
        .into_par_iter()
        .map(|quote| {
            let extreme = ctx.historical_extreme(quote.option_type());
            let score = score_level(&quote, ctx.spot, extreme, weights);
            if !score.total.is_finite() {
                return Err(LevelsError::numerical(format!(
                    "non-finite score for {} at strike {}",
                    quote.option_type(),
                    quote.strike()
                )));
            }
            Ok(RankedLevel { quote, score })
        })
        .collect::<LevelsResult<Vec<_>>>()?;

    // Stable: equal scores keep chain order
    levels.sort_by(|a, b| b.score.total.total_cmp(&a.score.total));
    Ok(levels)
}

fn validate_strikes(rows: &[RawQuote], option_type: OptionType, oi_threshold: u64) -> LevelsResult<()> {
    let bad = rows
        .iter()
        .filter(|r| r.open_interest > oi_threshold)
        .find(|r| !(r.strike.is_finite() && r.strike > 0.0));
    match bad {
        Some(bad) => Err(LevelsError::domain(format!(
            "{} strike must be positive, got {}",
            option_type, bad.strike
        ))),
        None => Ok(()),
    }
}
