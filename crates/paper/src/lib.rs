use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use common::{Error, ExecutionClient, Fill, OrderSide, Result};

/// Quantities below this are treated as flat.
const QTY_EPSILON: f64 = 1e-12;

#[derive(Debug, Default)]
struct Ledger {
    cash: f64,
    /// Signed quantity per symbol.
    holdings: HashMap<String, f64>,
    /// Latest mark per symbol, updated via `update_price`.
    prices: HashMap<String, f64>,
    /// Simulated clock used to timestamp fills.
    clock: Option<DateTime<Utc>>,
}

impl Ledger {
    fn portfolio_value(&self) -> f64 {
        self.cash
            + self
                .holdings
                .iter()
                .map(|(s, q)| q * self.prices.get(s).copied().unwrap_or(0.0))
                .sum::<f64>()
    }
}

/// Simulated execution layer for replays.
///
/// Fills happen at the latest mark with a flat slippage in basis points.
/// Nothing leaves the process.
pub struct PaperBroker {
    ledger: RwLock<Ledger>,
    /// Slippage in basis points applied to all fills.
    slippage_bps: f64,
}

impl PaperBroker {
    pub fn new(initial_cash: f64, slippage_bps: f64) -> Self {
        info!(cash = initial_cash, slippage_bps = slippage_bps, "PaperBroker initialized");
        Self {
            ledger: RwLock::new(Ledger {
                cash: initial_cash,
                ..Ledger::default()
            }),
            slippage_bps,
        }
    }

    pub async fn cash(&self) -> f64 {
        self.ledger.read().await.cash
    }

    /// Apply a signed quantity change at the current mark.
    fn fill(&self, ledger: &mut Ledger, symbol: &str, delta: f64) -> Result<Fill> {
        let mark = ledger.prices.get(symbol).copied().ok_or_else(|| {
            Error::Execution(format!(
                "PaperBroker has no price for '{symbol}'. Ensure market data is flowing."
            ))
        })?;
        let side = OrderSide::from_delta(delta);
        let price = match side {
            OrderSide::Buy => mark * (1.0 + self.slippage_bps / 10_000.0),
            OrderSide::Sell => mark * (1.0 - self.slippage_bps / 10_000.0),
        };

        ledger.cash -= delta * price;
        let held = ledger.holdings.entry(symbol.to_string()).or_insert(0.0);
        *held += delta;
        if held.abs() < QTY_EPSILON {
            ledger.holdings.remove(symbol);
        }

        let timestamp = ledger.clock.unwrap_or_else(Utc::now);
        let fill = Fill::new(symbol, side, price, delta.abs(), timestamp);
        debug!(
            symbol = %symbol,
            side = %side,
            mark = mark,
            price = price,
            qty = fill.quantity,
            "Paper fill simulated"
        );
        Ok(fill)
    }
}

#[async_trait]
impl ExecutionClient for PaperBroker {
    async fn liquidate(&self, symbol: &str) -> Result<Option<Fill>> {
        let mut ledger = self.ledger.write().await;
        let held = ledger.holdings.get(symbol).copied().unwrap_or(0.0);
        if held.abs() < QTY_EPSILON {
            return Ok(None);
        }
        self.fill(&mut ledger, symbol, -held).map(Some)
    }

    async fn set_holdings(&self, symbol: &str, fraction: f64) -> Result<Option<Fill>> {
        let mut ledger = self.ledger.write().await;
        let mark = ledger
            .prices
            .get(symbol)
            .copied()
            .filter(|p| *p > 0.0)
            .ok_or_else(|| Error::Execution(format!("No usable price for '{symbol}'")))?;

        let target_qty = fraction * ledger.portfolio_value() / mark;
        let held = ledger.holdings.get(symbol).copied().unwrap_or(0.0);
        let delta = target_qty - held;
        if delta.abs() < QTY_EPSILON {
            return Ok(None);
        }
        self.fill(&mut ledger, symbol, delta).map(Some)
    }

    async fn market_order(&self, symbol: &str, quantity: f64) -> Result<Fill> {
        if quantity == 0.0 || !quantity.is_finite() {
            return Err(Error::Execution(format!("Invalid order quantity {quantity} for '{symbol}'")));
        }
        let mut ledger = self.ledger.write().await;
        self.fill(&mut ledger, symbol, quantity)
    }

    async fn update_price(&self, symbol: &str, price: f64, time: DateTime<Utc>) {
        let mut ledger = self.ledger.write().await;
        ledger.prices.insert(symbol.to_string(), price);
        if ledger.clock.map_or(true, |c| time > c) {
            ledger.clock = Some(time);
        }
    }

    async fn portfolio_value(&self) -> Result<f64> {
        Ok(self.ledger.read().await.portfolio_value())
    }

    async fn holdings(&self) -> Result<HashMap<String, f64>> {
        Ok(self.ledger.read().await.holdings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn set_holdings_targets_fraction_of_portfolio() {
        let broker = PaperBroker::new(100_000.0, 0.0);
        broker.update_price("AAPL", 200.0, t0()).await;

        let fill = broker.set_holdings("AAPL", 0.05).await.unwrap().unwrap();
        assert_eq!(fill.side, OrderSide::Buy);
        assert!((fill.quantity - 25.0).abs() < 1e-9);
        assert_eq!(fill.timestamp, t0());
        assert!((broker.cash().await - 95_000.0).abs() < 1e-6);
        assert!((broker.portfolio_value().await.unwrap() - 100_000.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn set_holdings_on_target_is_a_no_op() {
        let broker = PaperBroker::new(10_000.0, 0.0);
        broker.update_price("XOM", 100.0, t0()).await;
        broker.set_holdings("XOM", 0.5).await.unwrap();
        assert!(broker.set_holdings("XOM", 0.5).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn liquidate_sells_everything_at_latest_mark() {
        let broker = PaperBroker::new(10_000.0, 0.0);
        broker.update_price("BTCUSD", 1_000.0, t0()).await;
        broker.set_holdings("BTCUSD", 0.1).await.unwrap();
        broker.update_price("BTCUSD", 1_100.0, t0() + chrono::Duration::days(1)).await;

        let fill = broker.liquidate("BTCUSD").await.unwrap().unwrap();
        assert_eq!(fill.side, OrderSide::Sell);
        assert!((fill.quantity - 1.0).abs() < 1e-9);
        assert!(broker.holdings().await.unwrap().is_empty());
        assert!((broker.cash().await - 10_100.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn liquidate_when_flat_returns_none() {
        let broker = PaperBroker::new(10_000.0, 0.0);
        assert!(broker.liquidate("ETHUSD").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn slippage_moves_fill_against_the_trader() {
        let broker = PaperBroker::new(10_000.0, 10.0);
        broker.update_price("OPT", 5.0, t0()).await;
        let buy = broker.market_order("OPT", 1.0).await.unwrap();
        assert!((buy.price - 5.005).abs() < 1e-9);
        let sell = broker.market_order("OPT", -1.0).await.unwrap();
        assert!((sell.price - 4.995).abs() < 1e-9);
    }

    #[tokio::test]
    async fn order_without_price_fails() {
        let broker = PaperBroker::new(10_000.0, 0.0);
        let err = broker.market_order("NOPE", 1.0).await.unwrap_err();
        assert!(matches!(err, Error::Execution(_)));
        assert!(broker.set_holdings("NOPE", 0.05).await.is_err());
    }

    #[tokio::test]
    async fn clock_never_moves_backwards() {
        let broker = PaperBroker::new(1_000.0, 0.0);
        broker.update_price("A", 1.0, t0() + chrono::Duration::days(2)).await;
        broker.update_price("B", 1.0, t0()).await;
        let fill = broker.market_order("B", 1.0).await.unwrap();
        assert_eq!(fill.timestamp, t0() + chrono::Duration::days(2));
    }
}
