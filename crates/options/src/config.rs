use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// `[straddle]` section of the strategy config file (TOML).
///
/// ```toml
/// [straddle]
/// underlying = "TSLA"
/// iv_threshold = 0.5
/// strike_window = 2
/// max_expiry_days = 30
/// market_open_utc = "14:30:00"
/// minutes_after_open = 30
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StraddleConfig {
    pub underlying: String,
    pub risk_free_rate: f64,
    /// Enter when the mean ATM implied volatility is strictly below this.
    pub iv_threshold: f64,
    /// Root-finding bracket for implied volatility.
    pub vol_lower: f64,
    pub vol_upper: f64,
    /// Contracts bought per leg.
    pub leg_quantity: f64,
    /// Keep strikes within this many steps of the ATM strike.
    pub strike_window: usize,
    /// Keep expiries within this many days of now.
    pub max_expiry_days: i64,
    /// Fixed UTC open. The default matches US equities outside daylight
    /// saving; use "13:30:00" for a summer replay.
    pub market_open_utc: NaiveTime,
    /// Evaluate on the first snapshot this long after the open, weekdays only.
    pub minutes_after_open: i64,
}

impl Default for StraddleConfig {
    fn default() -> Self {
        Self {
            underlying: "TSLA".to_string(),
            risk_free_rate: 0.01,
            iv_threshold: 0.5,
            vol_lower: 0.01,
            vol_upper: 2.0,
            leg_quantity: 1.0,
            strike_window: 2,
            max_expiry_days: 30,
            market_open_utc: NaiveTime::from_hms_opt(14, 30, 0).unwrap_or(NaiveTime::MIN),
            minutes_after_open: 30,
        }
    }
}
