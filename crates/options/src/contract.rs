use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionRight {
    Call,
    Put,
}

impl std::fmt::Display for OptionRight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionRight::Call => write!(f, "call"),
            OptionRight::Put => write!(f, "put"),
        }
    }
}

/// One quoted option contract in a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    pub symbol: String,
    pub strike: f64,
    pub right: OptionRight,
    pub bid: f64,
    pub ask: f64,
    pub expiry: DateTime<Utc>,
}

impl OptionContract {
    pub fn mid_price(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }

    /// Whole days to expiry (truncated), over 365.
    pub fn years_to_expiry(&self, now: DateTime<Utc>) -> f64 {
        (self.expiry - now).num_days() as f64 / 365.0
    }
}

/// Option chain for one underlying at one instant, as recorded in replay files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub time: DateTime<Utc>,
    pub underlying_price: f64,
    pub contracts: Vec<OptionContract>,
}
