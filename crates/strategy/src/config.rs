use serde::{Deserialize, Serialize};

/// `[momentum]` section of the strategy config file (TOML).
///
/// Example `config/strategies.toml`:
/// ```toml
/// [momentum]
/// rsi_buy_bot = 50.0
/// rsi_buy_top = 80.0
/// atr_multiplier = 2.0
/// max_holding_days = 10
///
/// [[universe]]
/// asset_class = "crypto"
/// symbols = ["BTCUSD", "ETHUSD"]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MomentumConfig {
    /// Lower bound of the RSI entry band (inclusive).
    pub rsi_buy_bot: f64,
    /// Upper bound of the RSI entry band (inclusive).
    pub rsi_buy_top: f64,
    /// Accepted for parameter compatibility; no exit rule reads it.
    pub rsi_sell_bot: f64,
    /// Accepted for parameter compatibility; no exit rule reads it.
    pub rsi_sell_top: f64,
    pub ema_short_period: usize,
    pub ema_long_period: usize,
    /// Hard stop distance below entry, in ATRs.
    pub atr_multiplier: f64,
    pub max_holding_days: i64,
    /// Days of data fed to indicators before the engine may trade.
    pub warm_up_days: i64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            rsi_buy_bot: 50.0,
            rsi_buy_top: 80.0,
            rsi_sell_bot: 40.0,
            rsi_sell_top: 90.0,
            ema_short_period: 12,
            ema_long_period: 26,
            atr_multiplier: 2.0,
            max_holding_days: 10,
            warm_up_days: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Crypto,
    Tech,
    Energy,
    Fx,
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetClass::Crypto => write!(f, "crypto"),
            AssetClass::Tech => write!(f, "tech"),
            AssetClass::Energy => write!(f, "energy"),
            AssetClass::Fx => write!(f, "fx"),
        }
    }
}

/// One `[[universe]]` entry: the symbols traded for an asset class.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UniverseGroup {
    pub asset_class: AssetClass,
    pub symbols: Vec<String>,
}

impl UniverseGroup {
    fn new(asset_class: AssetClass, symbols: &[&str]) -> Self {
        Self {
            asset_class,
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The default 30-symbol universe: crypto, tech, energy, then FX.
    pub fn defaults() -> Vec<UniverseGroup> {
        vec![
            Self::new(
                AssetClass::Crypto,
                &["BTCUSD", "ETHUSD", "SOLUSD", "XRPUSD", "ADAUSD", "DOGEUSD"],
            ),
            Self::new(
                AssetClass::Tech,
                &["AAPL", "MSFT", "NVDA", "GOOGL", "AMZN", "META", "TSLA", "AVGO", "TSM", "BABA"],
            ),
            Self::new(AssetClass::Energy, &["XOM", "CVX", "BP", "TOT", "COP", "SHEL"]),
            Self::new(
                AssetClass::Fx,
                &["EURUSD", "USDJPY", "GBPUSD", "AUDUSD", "USDCAD", "EURJPY", "GBPJPY", "EURGBP"],
            ),
        ]
    }

    /// Flatten groups into one ordered symbol list, dropping repeats.
    pub fn flatten(groups: &[UniverseGroup]) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        groups
            .iter()
            .flat_map(|g| g.symbols.iter())
            .filter(|s| seen.insert(s.as_str()))
            .cloned()
            .collect()
    }
}
