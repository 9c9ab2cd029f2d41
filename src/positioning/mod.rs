//! Options Positioning Ratios
//!
//! Chain-wide sentiment ratios per expiry, each normalised to roughly [-1, 1]:
//! - **Skew shift**: below-spot vs above-spot implied volatility, call and put
//!   sides blended by how far each deviates from the overall mean
//! - **Volume / open interest**: call vs put activity
//! - **Delta / gamma exposure**: open-interest weighted Greeks, call vs put
//!
//! Positive values lean bullish (call-heavy), negative bearish.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{OptionChain, OptionType, RawQuote, DAYS_PER_YEAR};
use crate::models::black_scholes;

/// Rows with implied volatility below this are ignored by the skew ratio
pub const MIN_IMPLIED_VOL: f64 = 0.001;

/// Trading days per year used to scale implied volatility into a price range
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// `(a - b) / (a + b)`, or zero when the denominator vanishes
fn normalized_difference(a: f64, b: f64) -> f64 {
    let total = a + b;
    if total != 0.0 {
        (a - b) / total
    } else {
        0.0
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Implied-volatility skew of one chain side around spot
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SkewProfile {
    /// (left IV - right IV) / (left IV + right IV)
    pub skew_ratio: f64,
    /// Anticipated move using the below-spot IV
    pub left_price_range: f64,
    /// Anticipated move using the above-spot IV
    pub right_price_range: f64,
    /// Mean IV of strikes below spot (0 when none)
    pub left_avg_iv: f64,
    /// Mean IV of strikes above spot (0 when none)
    pub right_avg_iv: f64,
}

/// Skew profile for rows of a single option class
///
/// Rows with IV under [`MIN_IMPLIED_VOL`] are dropped; strikes equal to spot
/// count on neither side. `days_to_expiry` is floored at one day.
pub fn skew_profile(rows: &[RawQuote], spot: f64, days_to_expiry: i64) -> SkewProfile {
    let usable = || rows.iter().filter(|q| q.implied_vol >= MIN_IMPLIED_VOL);

    let left_avg_iv = mean(usable().filter(|q| q.strike < spot).map(|q| q.implied_vol)).unwrap_or(0.0);
    let right_avg_iv = mean(usable().filter(|q| q.strike > spot).map(|q| q.implied_vol)).unwrap_or(0.0);

    let days = days_to_expiry.max(1) as f64;
    let annual_factor = (TRADING_DAYS_PER_YEAR / days).sqrt();

    SkewProfile {
        skew_ratio: normalized_difference(left_avg_iv, right_avg_iv),
        left_price_range: spot * (left_avg_iv * annual_factor).exp(),
        right_price_range: spot * (right_avg_iv * annual_factor).exp(),
        left_avg_iv,
        right_avg_iv,
    }
}

/// Blend call and put skew by each side's deviation from the overall mean IV
pub fn weighted_skew_ratio(call: &SkewProfile, put: &SkewProfile) -> f64 {
    let overall = (call.left_avg_iv + call.right_avg_iv + put.left_avg_iv + put.right_avg_iv) / 4.0;
    let call_dev = ((call.left_avg_iv + call.right_avg_iv) / 2.0 - overall).abs();
    let put_dev = ((put.left_avg_iv + put.right_avg_iv) / 2.0 - overall).abs();

    let total_dev = call_dev + put_dev;
    let (call_weight, put_weight) = if total_dev != 0.0 {
        (call_dev / total_dev, put_dev / total_dev)
    } else {
        (0.5, 0.5)
    };

    call_weight * call.skew_ratio + put_weight * put.skew_ratio
}

/// (call volume - put volume) / total volume
pub fn volume_ratio(calls: &[RawQuote], puts: &[RawQuote]) -> f64 {
    let call: u64 = calls.iter().map(|q| q.volume).sum();
    let put: u64 = puts.iter().map(|q| q.volume).sum();
    normalized_difference(call as f64, put as f64)
}

/// (call open interest - put open interest) / total open interest
pub fn open_interest_ratio(calls: &[RawQuote], puts: &[RawQuote]) -> f64 {
    let call: u64 = calls.iter().map(|q| q.open_interest).sum();
    let put: u64 = puts.iter().map(|q| q.open_interest).sum();
    normalized_difference(call as f64, put as f64)
}

/// Sum of open-interest weighted delta and gamma for one side
fn exposures(rows: &[RawQuote], option_type: OptionType, spot: f64, time: f64, rate: f64) -> (f64, f64) {
    rows.iter().fold((0.0, 0.0), |(delta, gamma), q| {
        let g = black_scholes::greeks(spot, q.strike, time, rate, q.implied_vol, option_type)
            .scale(q.open_interest as f64);
        (delta + g.delta, gamma + g.gamma * spot)
    })
}

/// Positioning ratios for one expiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiryPositioning {
    pub expiry: NaiveDate,
    pub days_to_expiry: i64,
    /// Deviation-weighted blend of call and put skew
    pub skew_ratio: f64,
    pub call_skew: SkewProfile,
    pub put_skew: SkewProfile,
    pub volume_ratio: f64,
    pub open_interest_ratio: f64,
    /// Net OI-weighted delta over gross absolute exposure
    pub delta_exposure_ratio: f64,
    /// (call - put) over total OI-weighted dollar gamma
    pub gamma_exposure_ratio: f64,
}

/// Compute every positioning ratio for one expiry chain
///
/// Exposure Greeks use `(days_to_expiry + 1) / 365` years, counting the
/// expiry day itself.
pub fn analyze_positioning(
    chain: &OptionChain,
    spot: f64,
    days_to_expiry: i64,
    rate: f64,
) -> ExpiryPositioning {
    let call_skew = skew_profile(&chain.calls, spot, days_to_expiry);
    let put_skew = skew_profile(&chain.puts, spot, days_to_expiry);

    let time = (days_to_expiry + 1) as f64 / DAYS_PER_YEAR;
    let (call_delta, call_gamma) = exposures(&chain.calls, OptionType::Call, spot, time, rate);
    let (put_delta, put_gamma) = exposures(&chain.puts, OptionType::Put, spot, time, rate);

    let gross_delta = call_delta.abs() + put_delta.abs();
    let delta_exposure_ratio = if gross_delta != 0.0 {
        (call_delta + put_delta) / gross_delta
    } else {
        0.0
    };

    ExpiryPositioning {
        expiry: chain.expiry,
        days_to_expiry,
        skew_ratio: weighted_skew_ratio(&call_skew, &put_skew),
        call_skew,
        put_skew,
        volume_ratio: volume_ratio(&chain.calls, &chain.puts),
        open_interest_ratio: open_interest_ratio(&chain.calls, &chain.puts),
        delta_exposure_ratio,
        gamma_exposure_ratio: normalized_difference(call_gamma, put_gamma),
    }
}

/// Positioning across expiries with the mean of each ratio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositioningSummary {
    pub underlying: String,
    pub spot: f64,
    pub expiries: Vec<ExpiryPositioning>,
    pub avg_skew_ratio: f64,
    pub avg_volume_ratio: f64,
    pub avg_open_interest_ratio: f64,
    pub avg_delta_exposure_ratio: f64,
    pub avg_gamma_exposure_ratio: f64,
}

impl PositioningSummary {
    /// Averages are zero when there are no expiries
    pub fn from_expiries(underlying: impl Into<String>, spot: f64, expiries: Vec<ExpiryPositioning>) -> Self {
        let avg = |f: fn(&ExpiryPositioning) -> f64| mean(expiries.iter().map(f)).unwrap_or(0.0);

        Self {
            underlying: underlying.into(),
            spot,
            avg_skew_ratio: avg(|e| e.skew_ratio),
            avg_volume_ratio: avg(|e| e.volume_ratio),
            avg_open_interest_ratio: avg(|e| e.open_interest_ratio),
            avg_delta_exposure_ratio: avg(|e| e.delta_exposure_ratio),
            avg_gamma_exposure_ratio: avg(|e| e.gamma_exposure_ratio),
            expiries,
        }
    }
}
