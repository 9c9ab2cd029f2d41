//! Option Greeks
//!
//! First order sensitivities used by the level scorer.

use serde::{Deserialize, Serialize};

/// Option Greeks (sensitivities)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta: dV/dS (sensitivity to spot)
    pub delta: f64,
    /// Gamma: d²V/dS² (sensitivity of delta to spot)
    pub gamma: f64,
    /// Theta: dV/dt (annualised time decay)
    pub theta: f64,
    /// Vega: dV/dσ (per unit of volatility)
    pub vega: f64,
}

impl Greeks {
    /// All-zero Greeks, returned for degenerate inputs
    pub const ZERO: Greeks = Greeks {
        delta: 0.0,
        gamma: 0.0,
        theta: 0.0,
        vega: 0.0,
    };

    pub fn new(delta: f64, gamma: f64, theta: f64, vega: f64) -> Self {
        Self {
            delta,
            gamma,
            theta,
            vega,
        }
    }

    /// Scale Greeks by a factor (e.g., open interest)
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            delta: self.delta * factor,
            gamma: self.gamma * factor,
            theta: self.theta * factor,
            vega: self.vega * factor,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn is_finite(&self) -> bool {
        self.delta.is_finite()
            && self.gamma.is_finite()
            && self.theta.is_finite()
            && self.vega.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale() {
        let g = Greeks::new(0.5, 0.02, -10.0, 30.0).scale(100.0);
        assert_eq!(g.delta, 50.0);
        assert_eq!(g.gamma, 2.0);
        assert_eq!(g.theta, -1000.0);
        assert_eq!(g.vega, 3000.0);
    }

    #[test]
    fn test_zero() {
        assert!(Greeks::ZERO.is_zero());
        assert!(Greeks::default().is_zero());
        assert!(!Greeks::new(0.1, 0.0, 0.0, 0.0).is_zero());
        assert!(!Greeks::new(f64::NAN, 0.0, 0.0, 0.0).is_finite());
    }
}
