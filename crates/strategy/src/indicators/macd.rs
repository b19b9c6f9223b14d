use super::ema::ema_series;

/// MACD (Moving Average Convergence/Divergence) indicator.
///
/// MACD line = EMA(fast) − EMA(slow), Signal = EMA(macd_line, signal).
#[derive(Debug, Clone)]
pub struct MacdIndicator {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

/// Latest MACD line and signal line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: f64,
}

impl MacdIndicator {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast < slow, "MACD fast period must be less than slow period");
        assert!(signal >= 1, "MACD signal period must be >= 1");
        Self { fast, slow, signal }
    }

    /// Minimum number of closes before `compute` returns a value.
    pub fn min_len(&self) -> usize {
        self.slow + self.signal - 1
    }

    /// Compute the latest MACD/signal pair from close prices (oldest first).
    /// Returns `None` if there isn't enough data.
    pub fn compute(&self, closes: &[f64]) -> Option<MacdValue> {
        if closes.len() < self.min_len() {
            return None;
        }

        let fast = ema_series(closes, self.fast);
        let slow = ema_series(closes, self.slow);

        // Align the fast series with the slow one: both end at the last close.
        let offset = fast.len() - slow.len();
        let macd_line: Vec<f64> = slow
            .iter()
            .enumerate()
            .map(|(i, s)| fast[i + offset] - s)
            .collect();

        let signal_line = ema_series(&macd_line, self.signal);
        let signal = *signal_line.last()?;
        let macd = *macd_line.last()?;

        Some(MacdValue { macd, signal })
    }
}
