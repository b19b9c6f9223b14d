use std::sync::Arc;

use tracing::{error, info};

use common::{ExecutionClient, Fill, TradeIntent};

/// What happened to one batch of intents.
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    pub fills: Vec<Fill>,
    /// Intents that were already satisfied (e.g. liquidating a flat symbol).
    pub skipped: usize,
    pub failed: usize,
}

/// Hands decision-engine intents to the execution layer, in order.
///
/// Intents are fire-and-forget: a failure is logged and the rest of the
/// batch still runs. This is the only component that calls
/// [`ExecutionClient`] order methods.
pub struct IntentExecutor {
    client: Arc<dyn ExecutionClient>,
}

impl IntentExecutor {
    pub fn new(client: Arc<dyn ExecutionClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<dyn ExecutionClient> {
        &self.client
    }

    pub async fn execute(&self, intents: &[TradeIntent]) -> ExecutionReport {
        let mut report = ExecutionReport::default();

        for intent in intents {
            let outcome = match intent {
                TradeIntent::Liquidate { symbol, reason } => {
                    info!(symbol = %symbol, reason = %reason, "Liquidating");
                    self.client.liquidate(symbol).await
                }
                TradeIntent::SetHoldings { symbol, fraction } => {
                    self.client.set_holdings(symbol, *fraction).await
                }
                TradeIntent::MarketOrder { symbol, quantity } => {
                    self.client.market_order(symbol, *quantity).await.map(Some)
                }
            };

            match outcome {
                Ok(Some(fill)) => {
                    info!(
                        symbol = %fill.symbol,
                        side = %fill.side,
                        price = fill.price,
                        qty = fill.quantity,
                        "Order filled"
                    );
                    report.fills.push(fill);
                }
                Ok(None) => report.skipped += 1,
                Err(e) => {
                    error!(symbol = %intent.symbol(), error = %e, "Intent execution failed");
                    report.failed += 1;
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use tokio::sync::Mutex;

    use common::{Error, ExitReason, OrderSide, Result};

    /// Records calls; rejects any order on "BAD".
    #[derive(Default)]
    struct RecordingClient {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingClient {
        async fn record(&self, call: String) {
            self.calls.lock().await.push(call);
        }

        fn fill(symbol: &str, quantity: f64) -> Result<Fill> {
            if symbol == "BAD" {
                return Err(Error::Execution("rejected".into()));
            }
            Ok(Fill::new(symbol, OrderSide::from_delta(quantity), 1.0, quantity.abs(), Utc::now()))
        }
    }

    #[async_trait]
    impl ExecutionClient for RecordingClient {
        async fn liquidate(&self, symbol: &str) -> Result<Option<Fill>> {
            self.record(format!("liquidate {symbol}")).await;
            Ok(None)
        }

        async fn set_holdings(&self, symbol: &str, fraction: f64) -> Result<Option<Fill>> {
            self.record(format!("set_holdings {symbol} {fraction}")).await;
            Self::fill(symbol, 1.0).map(Some)
        }

        async fn market_order(&self, symbol: &str, quantity: f64) -> Result<Fill> {
            self.record(format!("market_order {symbol} {quantity}")).await;
            Self::fill(symbol, quantity)
        }

        async fn update_price(&self, _symbol: &str, _price: f64, _time: DateTime<Utc>) {}

        async fn portfolio_value(&self) -> Result<f64> {
            Ok(0.0)
        }

        async fn holdings(&self) -> Result<HashMap<String, f64>> {
            Ok(HashMap::new())
        }
    }

    #[tokio::test]
    async fn intents_run_in_order_and_failures_do_not_stop_the_batch() {
        let client = Arc::new(RecordingClient::default());
        let executor = IntentExecutor::new(client.clone());

        let report = executor
            .execute(&[
                TradeIntent::Liquidate { symbol: "XOM".into(), reason: ExitReason::HardStop },
                TradeIntent::MarketOrder { symbol: "BAD".into(), quantity: 1.0 },
                TradeIntent::SetHoldings { symbol: "AAPL".into(), fraction: 0.05 },
            ])
            .await;

        assert_eq!(
            *client.calls.lock().await,
            vec![
                "liquidate XOM".to_string(),
                "market_order BAD 1".to_string(),
                "set_holdings AAPL 0.05".to_string(),
            ]
        );
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.fills.len(), 1);
        assert_eq!(report.fills[0].symbol, "AAPL");
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let executor = IntentExecutor::new(Arc::new(RecordingClient::default()));
        let report = executor.execute(&[]).await;
        assert!(report.fills.is_empty());
        assert_eq!((report.skipped, report.failed), (0, 0));
    }
}
