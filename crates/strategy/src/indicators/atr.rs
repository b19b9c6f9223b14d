use common::Bar;

/// ATR (Average True Range) with a simple mean over `period` true ranges.
///
/// The first bar's true range is `high - low`; later bars also consider
/// gaps against the previous close. Returns `None` with fewer than
/// `period` bars.
#[derive(Debug, Clone)]
pub struct AtrIndicator {
    pub period: usize,
}

impl AtrIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self { period }
    }

    pub fn compute<'a, I>(&self, bars: I) -> Option<f64>
    where
        I: IntoIterator<Item = &'a Bar>,
    {
        let mut ranges = Vec::new();
        let mut prev_close: Option<f64> = None;
        for bar in bars {
            ranges.push(true_range(bar, prev_close));
            prev_close = Some(bar.close);
        }

        if ranges.len() < self.period {
            return None;
        }
        let recent = &ranges[ranges.len() - self.period..];
        Some(recent.iter().sum::<f64>() / self.period as f64)
    }
}

fn true_range(bar: &Bar, prev_close: Option<f64>) -> f64 {
    let hl = bar.high - bar.low;
    match prev_close {
        Some(pc) => hl.max((bar.high - pc).abs()).max((bar.low - pc).abs()),
        None => hl,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bar(high: f64, low: f64, close: f64) -> Bar {
        Bar {
            symbol: "T".into(),
            time: Utc::now(),
            open: close,
            high,
            low,
            close,
            volume: 0.0,
        }
    }

    #[test]
    fn atr_needs_period_bars() {
        let atr = AtrIndicator::new(3);
        let bars = vec![bar(11.0, 9.0, 10.0), bar(11.0, 9.0, 10.0)];
        assert!(atr.compute(&bars).is_none());
    }

    #[test]
    fn atr_averages_high_low_ranges() {
        let atr = AtrIndicator::new(2);
        let bars = vec![bar(12.0, 8.0, 10.0), bar(11.0, 9.0, 10.0), bar(13.0, 9.0, 10.0)];
        // Ranges: 4, 2, 4 → last two average 3
        assert_eq!(atr.compute(&bars), Some(3.0));
    }

    #[test]
    fn atr_counts_gaps_from_previous_close() {
        let atr = AtrIndicator::new(1);
        // Gap up: prev close 10, bar 15..14 → TR = |15 - 10| = 5
        let bars = vec![bar(10.5, 9.5, 10.0), bar(15.0, 14.0, 14.5)];
        assert_eq!(atr.compute(&bars), Some(5.0));
    }
}
