//! Core data types for option level analysis
//!
//! Defines fundamental types:
//! - OptionType / OptionChain: option class and a single-expiry chain
//! - RawQuote / OptionQuote / PricedQuote: chain rows at each stage
//! - PricingContext: spot, rate, time and historical extremes
//! - Time-to-expiry conversion

pub mod context;
pub mod error;
pub mod expiry;
pub mod greeks;
pub mod option;
pub mod quote;

pub use context::*;
pub use error::*;
pub use expiry::*;
pub use greeks::*;
pub use option::*;
pub use quote::*;
