use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use common::{Bar, Error, Result};
use options::ChainSnapshot;

/// Bars grouped by timestamp; each entry is one replay step.
pub type BarSteps = BTreeMap<DateTime<Utc>, Vec<Bar>>;

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        Error::MarketData(format!("Failed to read market data at '{}': {e}", path.display()))
    })
}

/// Load a JSON array of bars and group it into steps.
pub fn load_bars(path: &Path) -> Result<BarSteps> {
    let steps = parse_bars(&read(path)?)?;
    info!(path = %path.display(), steps = steps.len(), "Bars loaded");
    Ok(steps)
}

/// Parse a JSON array of bars. Within a step, bars keep file order;
/// a repeated symbol at the same timestamp is rejected.
pub fn parse_bars(json: &str) -> Result<BarSteps> {
    let bars: Vec<Bar> = serde_json::from_str(json)?;
    let mut steps = BarSteps::new();
    for bar in bars {
        if !(bar.close.is_finite() && bar.close > 0.0) {
            return Err(Error::MarketData(format!(
                "Bar for '{}' at {} has non-positive close {}",
                bar.symbol, bar.time, bar.close
            )));
        }
        let step = steps.entry(bar.time).or_default();
        if step.iter().any(|b| b.symbol == bar.symbol) {
            return Err(Error::MarketData(format!(
                "Duplicate bar for '{}' at {}",
                bar.symbol, bar.time
            )));
        }
        step.push(bar);
    }
    Ok(steps)
}

/// Load a JSON array of chain snapshots, sorted by time.
pub fn load_chains(path: &Path) -> Result<Vec<ChainSnapshot>> {
    let chains = parse_chains(&read(path)?)?;
    info!(path = %path.display(), snapshots = chains.len(), "Option chains loaded");
    Ok(chains)
}

pub fn parse_chains(json: &str) -> Result<Vec<ChainSnapshot>> {
    let mut chains: Vec<ChainSnapshot> = serde_json::from_str(json)?;
    chains.sort_by_key(|c| c.time);
    Ok(chains)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_group_by_timestamp_in_order() {
        let json = r#"[
            {"symbol":"AAPL","time":"2024-01-03T00:00:00Z","open":1,"high":2,"low":0.5,"close":1.5,"volume":10},
            {"symbol":"AAPL","time":"2024-01-02T00:00:00Z","open":1,"high":2,"low":0.5,"close":1.2},
            {"symbol":"XOM","time":"2024-01-02T00:00:00Z","open":1,"high":2,"low":0.5,"close":1.1}
        ]"#;
        let steps = parse_bars(json).unwrap();
        assert_eq!(steps.len(), 2);

        let (first_time, first) = steps.iter().next().unwrap();
        assert_eq!(first_time.to_rfc3339(), "2024-01-02T00:00:00+00:00");
        let symbols: Vec<&str> = first.iter().map(|b| b.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "XOM"]);
        assert_eq!(first[0].volume, 0.0);
    }

    #[test]
    fn duplicate_bar_is_rejected() {
        let json = r#"[
            {"symbol":"AAPL","time":"2024-01-02T00:00:00Z","open":1,"high":1,"low":1,"close":1},
            {"symbol":"AAPL","time":"2024-01-02T00:00:00Z","open":1,"high":1,"low":1,"close":1}
        ]"#;
        assert!(matches!(parse_bars(json).unwrap_err(), Error::MarketData(_)));
    }

    #[test]
    fn zero_close_is_rejected() {
        let json = r#"[{"symbol":"X","time":"2024-01-02T00:00:00Z","open":0,"high":0,"low":0,"close":0}]"#;
        assert!(matches!(parse_bars(json).unwrap_err(), Error::MarketData(_)));
    }

    #[test]
    fn malformed_json_is_json_error() {
        assert!(matches!(parse_bars("{").unwrap_err(), Error::Json(_)));
    }

    #[test]
    fn chains_are_sorted_by_time() {
        let json = r#"[
            {"time":"2024-01-03T15:00:00Z","underlying_price":250.0,"contracts":[]},
            {"time":"2024-01-02T15:00:00Z","underlying_price":245.0,"contracts":[
                {"symbol":"TSLA C250","strike":250.0,"right":"call","bid":4.0,"ask":4.4,
                 "expiry":"2024-01-19T21:00:00Z"}
            ]}
        ]"#;
        let chains = parse_chains(json).unwrap();
        assert_eq!(chains[0].underlying_price, 245.0);
        assert_eq!(chains[0].contracts.len(), 1);
        assert_eq!(chains[1].underlying_price, 250.0);
    }
}
