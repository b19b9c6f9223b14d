use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use common::{ExitReason, IndicatorSnapshot};

use crate::{PositionBook, TrackedPosition};

/// Exit policy for tracked positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExitRules {
    /// Close any position held for at least this many whole days.
    pub max_holding_days: i64,
}

impl Default for ExitRules {
    fn default() -> Self {
        Self { max_holding_days: 10 }
    }
}

impl ExitRules {
    /// Decide whether `position` exits at `price`.
    ///
    /// Checks run in priority order and stop at the first hit:
    /// time limit, hard stop, then trailing stop. The trailing stop is
    /// ratcheted before its own check, and only when neither earlier rule
    /// fired.
    pub fn evaluate(
        &self,
        position: &mut TrackedPosition,
        price: f64,
        atr: f64,
        now: DateTime<Utc>,
    ) -> Option<ExitReason> {
        if position.days_held(now) >= self.max_holding_days {
            return Some(ExitReason::TimeLimit);
        }

        if price < position.stop_loss() {
            return Some(ExitReason::HardStop);
        }

        if position.ratchet_trailing(price, atr) {
            debug!(
                symbol = %position.symbol(),
                trailing_stop = position.trailing_stop(),
                "Trailing stop raised"
            );
        }

        if price < position.trailing_stop() {
            return Some(ExitReason::TrailingStop);
        }

        None
    }

    /// Run the exit sweep over every tracked position.
    ///
    /// Symbols missing from `batch` are skipped for this step. Exited
    /// positions are removed from `book` before returning, and the closed
    /// symbols are reported in ascending symbol order.
    pub fn sweep(
        &self,
        book: &mut PositionBook,
        batch: &HashMap<String, IndicatorSnapshot>,
        now: DateTime<Utc>,
    ) -> Vec<(String, ExitReason)> {
        let mut exits = Vec::new();

        for symbol in book.symbols() {
            let Some(snapshot) = batch.get(&symbol) else {
                continue;
            };
            let Some(position) = book.get_mut(&symbol) else {
                continue;
            };

            if let Some(reason) = self.evaluate(position, snapshot.price, snapshot.atr, now) {
                info!(symbol = %symbol, price = snapshot.price, reason = %reason, "Exit triggered");
                book.close(&symbol);
                exits.push((symbol, reason));
            }
        }

        exits
    }
}
