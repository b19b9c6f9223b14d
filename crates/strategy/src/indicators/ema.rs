/// Exponential moving average series over `data` (oldest first).
///
/// Seeded with the SMA of the first `period` values, then
/// `ema = price * k + ema_prev * (1 - k)` with `k = 2 / (period + 1)`.
/// Element `i` of the result corresponds to `data[i + period - 1]`; the
/// result is empty when there are fewer than `period` values.
pub fn ema_series(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return Vec::new();
    }
    let k = 2.0 / (period as f64 + 1.0);
    let seed = data[..period].iter().sum::<f64>() / period as f64;

    let mut out = Vec::with_capacity(data.len() - period + 1);
    out.push(seed);
    let mut prev = seed;
    for &price in &data[period..] {
        prev = price * k + prev * (1.0 - k);
        out.push(prev);
    }
    out
}

/// Latest EMA value, or `None` with fewer than `period` values.
pub fn ema(data: &[f64], period: usize) -> Option<f64> {
    ema_series(data, period).last().copied()
}
