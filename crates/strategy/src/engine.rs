use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use common::{IndicatorSnapshot, TradeIntent};
use risk::{ExitRules, PositionBook, TrackedPosition};

use crate::signals::entry_conditions_met;
use crate::{MomentumConfig, UniverseGroup};

/// Portfolio fraction requested on every entry.
pub const POSITION_FRACTION: f64 = 0.05;

/// Multi-asset momentum decision engine.
///
/// Holds the [`PositionBook`] across steps. Each call to [`on_step`]
/// runs a full exit sweep over tracked positions, then a full entry sweep
/// over the universe, both against the same batch.
///
/// [`on_step`]: MomentumEngine::on_step
pub struct MomentumEngine {
    config: MomentumConfig,
    exit_rules: ExitRules,
    universe: Vec<String>,
    book: PositionBook,
}

impl MomentumEngine {
    pub fn new(config: MomentumConfig, universe: &[UniverseGroup]) -> Self {
        let universe = UniverseGroup::flatten(universe);
        info!(symbols = universe.len(), "Momentum engine initialized");
        Self {
            exit_rules: ExitRules { max_holding_days: config.max_holding_days },
            config,
            universe,
            book: PositionBook::new(),
        }
    }

    pub fn config(&self) -> &MomentumConfig {
        &self.config
    }

    pub fn universe(&self) -> &[String] {
        &self.universe
    }

    pub fn positions(&self) -> &PositionBook {
        &self.book
    }

    /// Evaluate one step. `batch` holds a snapshot for every symbol that has
    /// data at `now`; symbols absent from it are skipped entirely.
    ///
    /// Returns intents in emission order: liquidations from the exit sweep,
    /// then entries in universe order.
    pub fn on_step(
        &mut self,
        now: DateTime<Utc>,
        batch: &HashMap<String, IndicatorSnapshot>,
    ) -> Vec<TradeIntent> {
        let mut intents: Vec<TradeIntent> = self
            .exit_rules
            .sweep(&mut self.book, batch, now)
            .into_iter()
            .map(|(symbol, reason)| TradeIntent::Liquidate { symbol, reason })
            .collect();

        for symbol in &self.universe {
            let Some(snap) = batch.get(symbol) else {
                continue;
            };
            if self.book.contains(symbol) || !entry_conditions_met(&self.config, snap) {
                continue;
            }

            let position = TrackedPosition::open(
                symbol.clone(),
                snap.price,
                snap.atr,
                now,
                self.config.atr_multiplier,
            );
            if self.book.open(position).is_some() {
                info!(symbol = %symbol, price = snap.price, rsi = snap.rsi, "Buying");
                intents.push(TradeIntent::SetHoldings {
                    symbol: symbol.clone(),
                    fraction: POSITION_FRACTION,
                });
            }
        }

        debug!(at = %now, intents = intents.len(), open = self.book.len(), "Step evaluated");
        intents
    }
}
