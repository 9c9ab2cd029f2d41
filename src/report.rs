//! Console rendering of analysis results

use std::fmt;

use crate::analysis::AnalysisReport;
use crate::levels::{LevelSide, RankedLevel};
use crate::positioning::{ExpiryPositioning, PositioningSummary};

/// Level report showing the best `top_n` levels per side
pub struct LevelsView<'a> {
    pub report: &'a AnalysisReport,
    pub top_n: usize,
}

impl fmt::Display for LevelsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let ctx = &report.context;

        writeln!(f, "=== {} Option Levels ===\n", report.ticker)?;
        writeln!(f, "Spot:          ${:.2}", ctx.spot)?;
        writeln!(
            f,
            "Expiry:        {} ({} days, T = {:.4}y)",
            report.expiry, report.days_to_expiry, ctx.time_to_expiry
        )?;
        writeln!(f, "Risk-free:     {:.2}%", ctx.rate * 100.0)?;
        writeln!(
            f,
            "History:       high ${:.2} / low ${:.2}",
            ctx.historical_high, ctx.historical_low
        )?;
        match report.volatility_index {
            Some(vix) => writeln!(f, "VIX:           {:.2}", vix)?,
            None => writeln!(f, "VIX:           n/a")?,
        }
        writeln!(
            f,
            "Chain:         {} calls, {} puts (OI > {})",
            report.chain_size.0, report.chain_size.1, report.oi_threshold
        )?;

        for side in [LevelSide::Resistance, LevelSide::Support] {
            let levels = report.levels.side(side);
            writeln!(f, "\n--- {} Levels ---\n", side.label())?;
            if levels.is_empty() {
                writeln!(f, "No significant {} levels found.", side.label().to_lowercase())?;
                continue;
            }
            for (rank, level) in levels.iter().take(self.top_n).enumerate() {
                write_level(f, rank + 1, level)?;
            }
        }

        Ok(())
    }
}

fn write_level(f: &mut fmt::Formatter<'_>, rank: usize, level: &RankedLevel) -> fmt::Result {
    let q = &level.quote.quote;
    let g = &level.quote.greeks;
    writeln!(
        f,
        "{:>2}. Strike {:>9.2} | Score {:>10.2} | OI {:>8} | Vol {:>7} | IV {:>6.1}% | Δ {:>6.3} | Γ {:.4} | Dist {:>5.2}%",
        rank,
        q.strike,
        level.score.total,
        q.open_interest,
        q.volume,
        q.implied_vol * 100.0,
        g.delta,
        g.gamma,
        level.score.price_distance * 100.0
    )
}

/// Render a level report, showing the best `top_n` levels per side
pub fn render_levels(report: &AnalysisReport, top_n: usize) -> String {
    LevelsView { report, top_n }.to_string()
}

type RatioAccessor = fn(&ExpiryPositioning) -> f64;

impl fmt::Display for PositioningSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} Positioning ===\n", self.underlying)?;
        writeln!(f, "Stock Price: {:.2}", self.spot)?;

        let sections: [(&str, RatioAccessor, f64); 5] = [
            ("Skew Shift Ratio", |e| e.skew_ratio, self.avg_skew_ratio),
            ("Put/Call Volume Ratio", |e| e.volume_ratio, self.avg_volume_ratio),
            ("Open Interest Ratio", |e| e.open_interest_ratio, self.avg_open_interest_ratio),
            ("Delta Exposure Ratio", |e| e.delta_exposure_ratio, self.avg_delta_exposure_ratio),
            ("Gamma Exposure Ratio", |e| e.gamma_exposure_ratio, self.avg_gamma_exposure_ratio),
        ];

        for (name, value, average) in sections {
            writeln!(f, "\n{}s:", name)?;
            for e in &self.expiries {
                writeln!(f, "Expiration: {}, {}: {:.2}", e.expiry, name, value(e))?;
            }
            writeln!(f, "Average {}: {:.2}", name, average)?;
        }

        Ok(())
    }
}

/// Render positioning ratios per expiry with their averages
pub fn render_positioning(summary: &PositioningSummary) -> String {
    summary.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::core::{HistoricalExtremes, OptionChain, PricingContext, RawQuote};
    use crate::levels::{compute_levels, LevelSet};
    use crate::positioning::analyze_positioning;

    fn report(levels: LevelSet) -> AnalysisReport {
        AnalysisReport {
            ticker: "SPY".to_string(),
            expiry: NaiveDate::from_ymd_opt(2025, 1, 24).unwrap(),
            days_to_expiry: 10,
            generated_at: Utc.with_ymd_and_hms(2025, 1, 14, 0, 0, 0).unwrap(),
            context: PricingContext::new(450.0, 10.0 / 365.0, HistoricalExtremes::new(480.0, 410.0)),
            volatility_index: None,
            oi_threshold: 1500,
            chain_size: (2, 1),
            levels,
        }
    }

    #[test]
    fn test_render_levels() {
        let ctx = PricingContext::new(450.0, 10.0 / 365.0, HistoricalExtremes::new(480.0, 410.0));
        let calls = vec![RawQuote::new(460.0, 9000, 100, 0.2), RawQuote::new(465.0, 4000, 100, 0.2)];
        let levels = compute_levels(&calls, &[], &ctx, 1500).unwrap();

        let text = render_levels(&report(levels), 1);
        assert!(text.contains("SPY Option Levels"));
        assert!(text.contains("Resistance Levels"));
        assert!(text.contains(" 1. Strike"));
        assert!(!text.contains(" 2. Strike"));
        assert!(text.contains("No significant support levels found."));
        assert!(text.contains("VIX:           n/a"));
    }

    #[test]
    fn test_render_positioning() {
        let mut chain = OptionChain::new("RKLB", NaiveDate::from_ymd_opt(2025, 1, 24).unwrap());
        chain.calls = vec![RawQuote::new(25.0, 100, 50, 0.8)];
        chain.puts = vec![RawQuote::new(20.0, 300, 10, 0.9)];
        let rows = vec![analyze_positioning(&chain, 22.0, 10, 0.05)];
        let summary = PositioningSummary::from_expiries("RKLB", 22.0, rows);

        let text = render_positioning(&summary);
        assert!(text.contains("Stock Price: 22.00"));
        assert!(text.contains("Expiration: 2025-01-24, Put/Call Volume Ratio: 0.67"));
        assert!(text.contains("Average Open Interest Ratio: -0.50"));
    }
}
