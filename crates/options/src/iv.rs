use chrono::{DateTime, Utc};
use tracing::debug;

use crate::solver::brent;
use crate::{BlackScholes, OptionContract, OptionRight};

/// Inverts Black-Scholes to recover implied volatility from a quoted mid price.
#[derive(Debug, Clone)]
pub struct ImpliedVolSolver {
    model: BlackScholes,
    vol_lower: f64,
    vol_upper: f64,
}

impl ImpliedVolSolver {
    pub fn new(risk_free_rate: f64, vol_lower: f64, vol_upper: f64) -> Self {
        Self {
            model: BlackScholes::new(risk_free_rate),
            vol_lower,
            vol_upper,
        }
    }

    pub fn model(&self) -> &BlackScholes {
        &self.model
    }

    /// Implied volatility of `contract` given the underlying price at `now`.
    ///
    /// `None` when the mid price is not positive, when fewer than one whole
    /// day remains to expiry, or when no volatility in the search bracket
    /// reproduces the mid price.
    pub fn implied_volatility(
        &self,
        contract: &OptionContract,
        underlying_price: f64,
        now: DateTime<Utc>,
    ) -> Option<f64> {
        let market_price = contract.mid_price();
        if market_price <= 0.0 {
            return None;
        }

        let t = contract.years_to_expiry(now);
        if t <= 0.0 {
            debug!(contract = %contract.symbol, "Skipping contract with non-positive time to expiry");
            return None;
        }

        self.solve(contract.right, underlying_price, contract.strike, t, market_price)
    }

    /// Volatility in `[vol_lower, vol_upper]` whose model price equals
    /// `market_price`, or `None` when the bracket holds no root.
    pub fn solve(
        &self,
        right: OptionRight,
        spot: f64,
        strike: f64,
        t: f64,
        market_price: f64,
    ) -> Option<f64> {
        let objective = |sigma: f64| self.model.price(right, spot, strike, t, sigma) - market_price;
        match brent(objective, self.vol_lower, self.vol_upper) {
            Ok(sigma) => Some(sigma),
            Err(e) => {
                debug!(right = %right, strike, market_price, error = %e, "No implied volatility in bracket");
                None
            }
        }
    }
}

impl Default for ImpliedVolSolver {
    fn default() -> Self {
        Self::new(0.01, 0.01, 2.0)
    }
}
