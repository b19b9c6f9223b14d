use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar for a symbol, as recorded in replay data files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

/// Indicator values for one symbol at one step.
///
/// Produced by the host (or the replay indicator bank) and consumed by the
/// momentum engine. `price` is the bar close for the step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub price: f64,
    pub atr: f64,
    pub rsi: f64,
    pub ema_short: f64,
    pub ema_long: f64,
    pub macd: f64,
    pub macd_signal: f64,
}

impl IndicatorSnapshot {
    /// MACD histogram: MACD line minus signal line.
    pub fn histogram(&self) -> f64 {
        self.macd - self.macd_signal
    }
}

/// Why a tracked position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Held for at least `max_holding_days`.
    TimeLimit,
    /// Price fell below the ATR stop fixed at entry.
    HardStop,
    /// Price fell below the ratcheting trailing stop.
    TrailingStop,
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitReason::TimeLimit => write!(f, "time-based stop"),
            ExitReason::HardStop => write!(f, "ATR stop-loss"),
            ExitReason::TrailingStop => write!(f, "trailing stop-loss"),
        }
    }
}

/// Request emitted by a decision engine for the execution layer.
/// All intents are fire-and-forget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TradeIntent {
    Liquidate { symbol: String, reason: ExitReason },
    SetHoldings { symbol: String, fraction: f64 },
    MarketOrder { symbol: String, quantity: f64 },
}

impl TradeIntent {
    pub fn symbol(&self) -> &str {
        match self {
            TradeIntent::Liquidate { symbol, .. }
            | TradeIntent::SetHoldings { symbol, .. }
            | TradeIntent::MarketOrder { symbol, .. } => symbol,
        }
    }
}

/// Side of a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Side implied by a signed quantity delta.
    pub fn from_delta(delta: f64) -> Self {
        if delta >= 0.0 {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Confirmation of an executed order returned by the execution layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fill {
    pub id: String,
    pub symbol: String,
    pub side: OrderSide,
    pub price: f64,
    /// Always positive; direction is carried by `side`.
    pub quantity: f64,
    pub timestamp: DateTime<Utc>,
}

impl Fill {
    pub fn new(
        symbol: impl Into<String>,
        side: OrderSide,
        price: f64,
        quantity: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            symbol: symbol.into(),
            side,
            price,
            quantity,
            timestamp,
        }
    }
}
