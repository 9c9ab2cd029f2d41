//! Option Levels CLI
//!
//! Ranks option-implied support/resistance for a ticker, prints positioning
//! ratios across expiries, or evaluates Black-Scholes Greeks for one contract.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use option_levels::prelude::*;
use option_levels::report::{render_levels, render_positioning};

#[derive(Parser, Debug)]
#[command(author, version, about = "Option-implied support and resistance levels")]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank support/resistance levels for the nearest expiry
    Levels {
        /// Underlying ticker, e.g. SPY
        ticker: String,

        /// JSON analysis config; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Minimum open interest (exclusive)
        #[arg(long)]
        oi_threshold: Option<u64>,

        /// Historical high/low lookback in days
        #[arg(long)]
        window_days: Option<u32>,

        /// Minimum time to expiry: day or week
        #[arg(long)]
        expiry_floor: Option<ExpiryFloor>,

        /// Levels shown per side
        #[arg(long)]
        top: Option<usize>,

        /// Print the full report as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Put/call positioning ratios over the next expiries
    Positioning {
        ticker: String,

        #[arg(long, default_value = "4")]
        max_expiries: usize,

        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Black-Scholes Greeks for a single contract
    Greeks {
        #[arg(long)]
        spot: f64,

        #[arg(long)]
        strike: f64,

        /// Calendar days to expiry
        #[arg(long, default_value = "30")]
        days: f64,

        #[arg(long, default_value = "0.05")]
        rate: f64,

        /// Implied volatility as a decimal
        #[arg(long)]
        vol: f64,

        /// call or put
        #[arg(long = "type", default_value = "call")]
        option_type: OptionType,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> LevelsResult<()> {
    match command {
        Command::Levels {
            ticker,
            config,
            oi_threshold,
            window_days,
            expiry_floor,
            top,
            json,
        } => {
            let mut cfg = match config {
                Some(path) => AnalysisConfig::from_json_file(path)?,
                None => AnalysisConfig::default(),
            };
            if let Some(threshold) = oi_threshold {
                cfg.levels.oi_threshold = threshold;
            }
            if let Some(days) = window_days {
                cfg.history_window_days = days;
            }
            if let Some(floor) = expiry_floor {
                cfg.expiry_floor = floor;
            }
            if let Some(n) = top {
                cfg.top_n = n;
            }
            cfg.validate()?;

            let top_n = cfg.top_n;
            let analyzer = LevelAnalyzer::with_config(YahooClient::new()?, cfg);
            let report = analyzer.analyze(&ticker.to_uppercase())?;

            if json {
                println!("{}", to_json(&report)?);
            } else {
                print!("{}", render_levels(&report, top_n));
            }
        }

        Command::Positioning {
            ticker,
            max_expiries,
            json,
        } => {
            let analyzer = LevelAnalyzer::new(YahooClient::new()?);
            let summary = analyzer.positioning(&ticker.to_uppercase(), max_expiries)?;

            if json {
                println!("{}", to_json(&summary)?);
            } else {
                print!("{}", render_positioning(&summary));
            }
        }

        Command::Greeks {
            spot,
            strike,
            days,
            rate,
            vol,
            option_type,
        } => {
            let time = days / 365.0;
            let g = bs_greeks(spot, strike, time, rate, vol, option_type);

            println!("{} {:.2} @ spot {:.2}, {:.0} days, vol {:.1}%", option_type, strike, spot, days, vol * 100.0);
            println!("  Delta: {:.4}", g.delta);
            println!("  Gamma: {:.6}", g.gamma);
            println!("  Theta: {:.4} (per year)", g.theta);
            println!("  Vega:  {:.4} (per unit vol)", g.vega);
        }
    }

    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> LevelsResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| LevelsError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels_flags() {
        let cli = Cli::try_parse_from([
            "option-levels",
            "levels",
            "spy",
            "--expiry-floor",
            "day",
            "--oi-threshold",
            "750",
        ])
        .unwrap();

        match cli.command {
            Command::Levels {
                ticker,
                expiry_floor,
                oi_threshold,
                ..
            } => {
                assert_eq!(ticker, "spy");
                assert_eq!(expiry_floor, Some(ExpiryFloor::Day));
                assert_eq!(oi_threshold, Some(750));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_floor() {
        assert!(Cli::try_parse_from(["option-levels", "levels", "SPY", "--expiry-floor", "month"]).is_err());
    }

    #[test]
    fn test_parse_greeks_type() {
        let cli = Cli::try_parse_from([
            "option-levels", "greeks", "--spot", "450", "--strike", "440", "--vol", "0.2", "--type", "put",
        ])
        .unwrap();

        match cli.command {
            Command::Greeks { option_type, days, .. } => {
                assert_eq!(option_type, OptionType::Put);
                assert_eq!(days, 30.0);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
