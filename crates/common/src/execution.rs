use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{Fill, Result};

/// Abstraction over the host's execution layer.
///
/// `PaperBroker` implements this for replays. The decision engines never
/// hold a reference to an `ExecutionClient`; they only return
/// `TradeIntent`s, and `IntentExecutor` in `crates/engine` is the one
/// component that turns intents into calls on this trait.
#[async_trait]
pub trait ExecutionClient: Send + Sync {
    /// Close the whole holding in `symbol`. `Ok(None)` when already flat.
    async fn liquidate(&self, symbol: &str) -> Result<Option<Fill>>;

    /// Rebalance `symbol` to `fraction` of total portfolio value.
    /// `Ok(None)` when the holding is already on target.
    async fn set_holdings(&self, symbol: &str, fraction: f64) -> Result<Option<Fill>>;

    /// Buy (`quantity > 0`) or sell (`quantity < 0`) a fixed quantity.
    async fn market_order(&self, symbol: &str, quantity: f64) -> Result<Fill>;

    /// Record the latest mark for a symbol and advance the simulated clock.
    async fn update_price(&self, symbol: &str, price: f64, time: DateTime<Utc>);

    /// Cash plus the marked value of every holding.
    async fn portfolio_value(&self) -> Result<f64>;

    /// Non-zero holdings, keyed by symbol.
    async fn holdings(&self) -> Result<HashMap<String, f64>>;
}
