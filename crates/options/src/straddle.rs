use chrono::{DateTime, Utc};
use tracing::{debug, info};

use common::TradeIntent;

use crate::{atm_options, ChainFilter, ImpliedVolSolver, OptionContract, StraddleConfig};

/// Outcome of one straddle evaluation cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum StraddleDecision {
    /// No ATM call or no ATM put in the chain.
    NoAtmOptions,
    /// At least one leg has no implied volatility.
    IvUnavailable,
    /// Mean IV at or above the threshold.
    Hold { call_iv: f64, put_iv: f64, avg_iv: f64 },
    /// Buy both legs.
    Enter {
        call: String,
        put: String,
        call_iv: f64,
        put_iv: f64,
        avg_iv: f64,
    },
}

/// Stateless long-straddle decision engine on a single underlying.
pub struct StraddleEngine {
    config: StraddleConfig,
    solver: ImpliedVolSolver,
    filter: ChainFilter,
}

impl StraddleEngine {
    pub fn new(config: StraddleConfig) -> Self {
        let solver = ImpliedVolSolver::new(config.risk_free_rate, config.vol_lower, config.vol_upper);
        let filter = ChainFilter {
            strike_window: config.strike_window,
            max_expiry_days: config.max_expiry_days,
        };
        Self { config, solver, filter }
    }

    pub fn config(&self) -> &StraddleConfig {
        &self.config
    }

    pub fn filter(&self) -> &ChainFilter {
        &self.filter
    }

    /// Decide on one chain snapshot. The chain is used as given; apply
    /// [`ChainFilter`] beforehand to mirror the universe filter.
    pub fn decide(
        &self,
        chain: &[OptionContract],
        underlying_price: f64,
        now: DateTime<Utc>,
    ) -> StraddleDecision {
        let (Some(call), Some(put)) = atm_options(chain, underlying_price) else {
            debug!("No ATM options found");
            return StraddleDecision::NoAtmOptions;
        };

        let call_iv = self.solver.implied_volatility(call, underlying_price, now);
        let put_iv = self.solver.implied_volatility(put, underlying_price, now);
        let (Some(call_iv), Some(put_iv)) = (call_iv, put_iv) else {
            debug!(call = %call.symbol, put = %put.symbol, "Could not calculate implied volatility");
            return StraddleDecision::IvUnavailable;
        };

        Self::decide_on_ivs(self.config.iv_threshold, call, put, call_iv, put_iv)
    }

    /// Threshold rule on already-computed leg volatilities: enter when the
    /// simple mean is strictly below `threshold`.
    pub fn decide_on_ivs(
        threshold: f64,
        call: &OptionContract,
        put: &OptionContract,
        call_iv: f64,
        put_iv: f64,
    ) -> StraddleDecision {
        let avg_iv = (call_iv + put_iv) / 2.0;
        info!(
            call_iv = %format!("{:.2}%", call_iv * 100.0),
            put_iv = %format!("{:.2}%", put_iv * 100.0),
            avg_iv = %format!("{:.2}%", avg_iv * 100.0),
            "ATM implied volatility"
        );

        if avg_iv < threshold {
            StraddleDecision::Enter {
                call: call.symbol.clone(),
                put: put.symbol.clone(),
                call_iv,
                put_iv,
                avg_iv,
            }
        } else {
            StraddleDecision::Hold { call_iv, put_iv, avg_iv }
        }
    }

    /// Run one evaluation cycle and return the intents it produces:
    /// a buy of `leg_quantity` on each leg, or nothing.
    pub fn evaluate(
        &self,
        chain: &[OptionContract],
        underlying_price: f64,
        now: DateTime<Utc>,
    ) -> Vec<TradeIntent> {
        match self.decide(chain, underlying_price, now) {
            StraddleDecision::Enter { call, put, .. } => {
                info!(call = %call, put = %put, "Placed straddle");
                vec![
                    TradeIntent::MarketOrder { symbol: call, quantity: self.config.leg_quantity },
                    TradeIntent::MarketOrder { symbol: put, quantity: self.config.leg_quantity },
                ]
            }
            _ => Vec::new(),
        }
    }
}
