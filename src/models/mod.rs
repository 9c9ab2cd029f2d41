//! Pricing Models
//!
//! Implements:
//! - Black-Scholes (Greeks for chain rows)

pub mod black_scholes;

pub use black_scholes::*;
