use std::path::Path;

use serde::{Deserialize, Serialize};

use common::{Error, Result};
use options::StraddleConfig;
use strategy::{MomentumConfig, UniverseGroup};

/// Top-level structure of `config/strategies.toml`.
///
/// Every section is optional; a missing section falls back to defaults,
/// and a missing `[[universe]]` list to the full 30-symbol universe.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StrategyFileConfig {
    #[serde(default)]
    pub momentum: MomentumConfig,
    #[serde(default = "UniverseGroup::defaults")]
    pub universe: Vec<UniverseGroup>,
    #[serde(default)]
    pub straddle: StraddleConfig,
}

impl Default for StrategyFileConfig {
    fn default() -> Self {
        Self {
            momentum: MomentumConfig::default(),
            universe: UniverseGroup::defaults(),
            straddle: StraddleConfig::default(),
        }
    }
}

impl StrategyFileConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read strategy config at '{}': {e}",
                path.display()
            ))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        let m = &self.momentum;
        if m.rsi_buy_bot > m.rsi_buy_top {
            return Err(Error::Config(format!(
                "rsi_buy_bot ({}) must not exceed rsi_buy_top ({})",
                m.rsi_buy_bot, m.rsi_buy_top
            )));
        }
        if m.ema_short_period == 0 || m.ema_long_period == 0 {
            return Err(Error::Config("EMA periods must be positive".into()));
        }
        day_count("momentum.warm_up_days", m.warm_up_days)?;
        day_count("momentum.max_holding_days", m.max_holding_days)?;
        let s = &self.straddle;
        day_count("straddle.max_expiry_days", s.max_expiry_days)?;
        if !(0..24 * 60).contains(&s.minutes_after_open) {
            return Err(Error::Config(format!(
                "straddle.minutes_after_open must be within one day, got {}",
                s.minutes_after_open
            )));
        }
        if !(s.vol_lower > 0.0 && s.vol_lower < s.vol_upper) {
            return Err(Error::Config(format!(
                "Volatility bracket [{}, {}] is invalid",
                s.vol_lower, s.vol_upper
            )));
        }
        Ok(())
    }
}

/// Upper bound on any day-count setting, about 27 years.
const MAX_CONFIG_DAYS: i64 = 10_000;

fn day_count(key: &str, days: i64) -> Result<()> {
    if (0..=MAX_CONFIG_DAYS).contains(&days) {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "{key} must be between 0 and {MAX_CONFIG_DAYS} days, got {days}"
        )))
    }
}
