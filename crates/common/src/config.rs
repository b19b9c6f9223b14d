use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Which decision engine the replay drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Momentum,
    Straddle,
}

impl std::str::FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "momentum" => Ok(StrategyKind::Momentum),
            "straddle" => Ok(StrategyKind::Straddle),
            other => Err(Error::Config(format!(
                "STRATEGY_KIND must be 'momentum' or 'straddle', got: '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Momentum => write!(f, "momentum"),
            StrategyKind::Straddle => write!(f, "straddle"),
        }
    }
}

/// Process configuration loaded from environment variables at startup.
/// Strategy parameters live in the TOML file at `strategy_config_path`.
#[derive(Debug, Clone)]
pub struct Config {
    pub strategy_kind: StrategyKind,
    pub strategy_config_path: PathBuf,
    /// Recorded bars (momentum) or chain snapshots (straddle), JSON.
    pub market_data_path: PathBuf,
    pub initial_cash: f64,
    pub paper_slippage_bps: f64,
}

impl Config {
    /// Load configuration from the environment, reading `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let strategy_kind = optional_env("STRATEGY_KIND")
            .unwrap_or_else(|| "momentum".to_string())
            .parse()?;

        Ok(Config {
            strategy_kind,
            strategy_config_path: optional_env("STRATEGY_CONFIG_PATH")
                .unwrap_or_else(|| "config/strategies.toml".to_string())
                .into(),
            market_data_path: required_env("MARKET_DATA_PATH")?.into(),
            initial_cash: parse_env("INITIAL_CASH", 100_000.0)?,
            paper_slippage_bps: parse_env("PAPER_SLIPPAGE_BPS", 0.0)?,
        })
    }
}

fn required_env(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        Error::Config(format!(
            "Required environment variable '{key}' is not set. Check your .env file."
        ))
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_env(key: &str, default: f64) -> Result<f64> {
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|e| Error::Config(format!("{key}: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_kind_parses_case_insensitively() {
        assert_eq!("Momentum".parse::<StrategyKind>().unwrap(), StrategyKind::Momentum);
        assert_eq!(" straddle ".parse::<StrategyKind>().unwrap(), StrategyKind::Straddle);
    }

    #[test]
    fn unknown_strategy_kind_is_config_error() {
        let err = "pairs".parse::<StrategyKind>().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
