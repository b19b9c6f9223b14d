use statrs::distribution::{ContinuousCDF, Normal};

use crate::OptionRight;

/// European Black-Scholes pricing with a flat risk-free rate and no dividends.
///
/// d1 = (ln(S/K) + (r + sigma^2/2) T) / (sigma sqrt(T))
/// d2 = d1 - sigma sqrt(T)
/// call = S Phi(d1) - K e^(-rT) Phi(d2)
/// put  = K e^(-rT) Phi(-d2) - S Phi(-d1)
#[derive(Debug, Clone)]
pub struct BlackScholes {
    /// Standard normal distribution (created once, reused)
    normal: Normal,
    rate: f64,
}

impl BlackScholes {
    pub fn new(rate: f64) -> Self {
        Self {
            normal: Normal::standard(),
            rate,
        }
    }

    /// Theoretical price for `right` at volatility `sigma`.
    /// `t` is in years and must be positive, as must `sigma`.
    #[inline]
    pub fn price(&self, right: OptionRight, spot: f64, strike: f64, t: f64, sigma: f64) -> f64 {
        let sigma_sqrt_t = sigma * t.sqrt();
        let d1 = ((spot / strike).ln() + (self.rate + 0.5 * sigma * sigma) * t) / sigma_sqrt_t;
        let d2 = d1 - sigma_sqrt_t;
        let discounted_strike = strike * (-self.rate * t).exp();

        match right {
            OptionRight::Call => spot * self.normal.cdf(d1) - discounted_strike * self.normal.cdf(d2),
            OptionRight::Put => discounted_strike * self.normal.cdf(-d2) - spot * self.normal.cdf(-d1),
        }
    }
}
