//! Black-Scholes Model
//!
//! Closed-form Greeks for European options without dividends. The level
//! scorer consumes delta, gamma, theta and vega from here.

use std::f64::consts::{PI, SQRT_2};

use statrs::function::erf::erfc;

use crate::core::{Greeks, OptionType};

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Black-Scholes d1 parameter
pub fn d1(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> f64 {
    ((spot / strike).ln() + (rate + 0.5 * vol * vol) * time) / (vol * time.sqrt())
}

/// Black-Scholes d2 parameter
pub fn d2(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> f64 {
    d1(spot, strike, time, rate, vol) - vol * time.sqrt()
}

/// Inputs outside the model's domain produce zero Greeks instead of NaN
fn is_degenerate(spot: f64, strike: f64, time: f64, vol: f64) -> bool {
    let positive = |x: f64| x > 0.0;
    !(positive(time) && positive(vol) && positive(spot) && positive(strike))
}

/// Black-Scholes Greeks
///
/// Theta is annualised and vega is per unit of volatility. Returns
/// [`Greeks::ZERO`] when time or volatility is non-positive, and likewise for
/// non-positive spot or strike (NaN inputs included).
pub fn greeks(
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    vol: f64,
    option_type: OptionType,
) -> Greeks {
    if is_degenerate(spot, strike, time, vol) {
        return Greeks::ZERO;
    }

    let sqrt_t = time.sqrt();
    let d1 = d1(spot, strike, time, rate, vol);
    let d2 = d1 - vol * sqrt_t;
    let pdf_d1 = norm_pdf(d1);
    let df = (-rate * time).exp();

    let delta = match option_type {
        OptionType::Call => norm_cdf(d1),
        OptionType::Put => norm_cdf(d1) - 1.0,
    };

    // Gamma and vega are the same for call and put
    let gamma = pdf_d1 / (spot * vol * sqrt_t);
    let vega = spot * sqrt_t * pdf_d1;

    let decay = -(spot * pdf_d1 * vol) / (2.0 * sqrt_t);
    let theta = match option_type {
        OptionType::Call => decay - rate * strike * df * norm_cdf(d2),
        OptionType::Put => decay + rate * strike * df * norm_cdf(-d2),
    };

    Greeks::new(delta, gamma, theta, vega)
}
