//! Market data collaborators
//!
//! Handles:
//! - The `MarketDataProvider` interface consumed by the analysis
//! - Yahoo Finance API implementation (free, delayed)

pub mod provider;
pub mod yahoo;

pub use provider::*;
pub use yahoo::*;
