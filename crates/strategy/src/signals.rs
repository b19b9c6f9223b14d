use common::IndicatorSnapshot;

use crate::MomentumConfig;

/// Momentum entry conditions on one snapshot.
///
/// All three must hold:
/// - short EMA above long EMA,
/// - RSI inside `[rsi_buy_bot, rsi_buy_top]`,
/// - positive MACD histogram.
///
/// Whether the symbol is already held is the caller's concern.
pub fn entry_conditions_met(cfg: &MomentumConfig, snap: &IndicatorSnapshot) -> bool {
    snap.ema_short > snap.ema_long
        && (cfg.rsi_buy_bot..=cfg.rsi_buy_top).contains(&snap.rsi)
        && snap.histogram() > 0.0
}
