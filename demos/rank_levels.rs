//! Rank levels on a hand-built chain, no network needed
//!
//! Run: cargo run --example rank_levels

use option_levels::prelude::*;

fn main() -> LevelsResult<()> {
    let ctx = PricingContext::new(450.0, 30.0 / 365.0, HistoricalExtremes::new(480.0, 410.0));

    let calls = vec![
        RawQuote::new(445.0, 2_000, 400, 0.21),
        RawQuote::new(455.0, 6_500, 1_900, 0.19),
        RawQuote::new(460.0, 12_000, 2_500, 0.18),
        RawQuote::new(470.0, 4_800, 700, 0.17),
        RawQuote::new(480.0, 1_200, 150, 0.17),
    ];
    let puts = vec![
        RawQuote::new(420.0, 8_000, 900, 0.27),
        RawQuote::new(430.0, 7_000, 1_100, 0.25),
        RawQuote::new(440.0, 9_000, 1_800, 0.23),
        RawQuote::new(445.0, 1_000, 5_000, 0.22),
        RawQuote::new(455.0, 3_000, 600, 0.21),
    ];

    println!("Spot ${:.2}, T = {:.4}y\n", ctx.spot, ctx.time_to_expiry);

    for (name, config) in [
        ("aggressive", LevelConfig::aggressive()),
        ("default", LevelConfig::default()),
        ("conservative", LevelConfig::conservative()),
    ] {
        let levels = rank_levels(&calls, &puts, &ctx, &config)?;
        println!(
            "[{}] OI > {}: {} resistance, {} support",
            name,
            config.oi_threshold,
            levels.resistance.len(),
            levels.support.len()
        );
        let best = levels.top(2);
        for level in best.resistance.iter().chain(&best.support) {
            println!("  {}", level.tooltip());
        }
        println!();
    }

    Ok(())
}
