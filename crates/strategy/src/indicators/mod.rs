pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use atr::AtrIndicator;
pub use macd::{MacdIndicator, MacdValue};
pub use rsi::RsiIndicator;

use std::collections::{HashMap, VecDeque};

use common::{Bar, IndicatorSnapshot};

use crate::MomentumConfig;

/// Periods for the indicators feeding the momentum engine.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSettings {
    pub rsi_period: usize,
    pub ema_short_period: usize,
    pub ema_long_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub atr_period: usize,
}

impl IndicatorSettings {
    pub fn from_config(cfg: &MomentumConfig) -> Self {
        Self {
            ema_short_period: cfg.ema_short_period,
            ema_long_period: cfg.ema_long_period,
            ..Self::default()
        }
    }
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            ema_short_period: 12,
            ema_long_period: 26,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            atr_period: 14,
        }
    }
}

/// Per-symbol rolling bar history that turns closed bars into
/// [`IndicatorSnapshot`]s.
pub struct IndicatorBank {
    rsi: RsiIndicator,
    macd: MacdIndicator,
    atr: AtrIndicator,
    ema_short_period: usize,
    ema_long_period: usize,
    history: HashMap<String, VecDeque<Bar>>,
    max_history: usize,
}

impl IndicatorBank {
    const DEFAULT_MAX_HISTORY: usize = 250;

    pub fn new(settings: IndicatorSettings) -> Self {
        let rsi = RsiIndicator::new(settings.rsi_period);
        let macd = MacdIndicator::new(settings.macd_fast, settings.macd_slow, settings.macd_signal);
        let atr = AtrIndicator::new(settings.atr_period);
        let required = (settings.rsi_period + 1)
            .max(settings.ema_long_period)
            .max(settings.ema_short_period)
            .max(macd.min_len())
            .max(settings.atr_period);

        Self {
            rsi,
            macd,
            atr,
            ema_short_period: settings.ema_short_period,
            ema_long_period: settings.ema_long_period,
            history: HashMap::new(),
            max_history: Self::DEFAULT_MAX_HISTORY.max(required * 3),
        }
    }

    /// Append a closed bar and return the symbol's snapshot, or `None`
    /// while any indicator is still short of history.
    pub fn update(&mut self, bar: &Bar) -> Option<IndicatorSnapshot> {
        let history = self.history.entry(bar.symbol.clone()).or_default();
        history.push_back(bar.clone());
        if history.len() > self.max_history {
            history.pop_front();
        }
        self.snapshot(&bar.symbol)
    }

    /// Snapshot from the history currently held for `symbol`.
    pub fn snapshot(&self, symbol: &str) -> Option<IndicatorSnapshot> {
        let history = self.history.get(symbol)?;
        let closes: Vec<f64> = history.iter().map(|b| b.close).collect();

        let rsi = self.rsi.compute(&closes)?;
        let ema_short = ema::ema(&closes, self.ema_short_period)?;
        let ema_long = ema::ema(&closes, self.ema_long_period)?;
        let macd = self.macd.compute(&closes)?;
        let atr = self.atr.compute(history.iter())?;

        Some(IndicatorSnapshot {
            price: *closes.last()?,
            atr,
            rsi,
            ema_short,
            ema_long,
            macd: macd.macd,
            macd_signal: macd.signal,
        })
    }

    pub fn history_len(&self, symbol: &str) -> usize {
        self.history.get(symbol).map_or(0, VecDeque::len)
    }
}
