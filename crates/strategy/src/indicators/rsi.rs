/// RSI (Relative Strength Index) over simple averages of the last `period`
/// close-to-close changes.
///
/// Returns `None` until at least `period + 1` closes are available. A window
/// with no losses reads 100, flat windows included.
#[derive(Debug, Clone)]
pub struct RsiIndicator {
    pub period: usize,
}

impl RsiIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 2, "RSI period must be >= 2");
        Self { period }
    }

    /// Compute RSI from a slice of close prices (oldest first).
    pub fn compute(&self, closes: &[f64]) -> Option<f64> {
        if closes.len() < self.period + 1 {
            return None;
        }

        let recent = &closes[closes.len() - self.period - 1..];
        let (gains, losses) = recent
            .windows(2)
            .map(|w| w[1] - w[0])
            .fold((0.0, 0.0), |(g, l), change: f64| {
                (g + change.max(0.0), l + (-change).max(0.0))
            });

        let avg_gain = gains / self.period as f64;
        let avg_loss = losses / self.period as f64;
        if avg_loss == 0.0 {
            return Some(100.0);
        }

        let rs = avg_gain / avg_loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }
}
