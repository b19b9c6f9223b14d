use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Trailing stops sit this many ATRs below the best price seen.
/// Compiled-in constant, not user-configurable.
pub const TRAILING_ATR_MULTIPLIER: f64 = 1.5;

/// Risk metadata for one open position.
///
/// All four levels are created together by [`TrackedPosition::open`] and
/// dropped together when the position leaves the [`PositionBook`]. Only the
/// trailing stop changes while the position is held, and it only moves up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedPosition {
    symbol: String,
    entry_price: f64,
    entry_date: DateTime<Utc>,
    stop_loss: f64,
    trailing_stop: f64,
}

impl TrackedPosition {
    /// Build the tracking record for a fresh entry at `price`.
    ///
    /// `stop_loss = price - atr_multiplier * atr` and
    /// `trailing_stop = price - 1.5 * atr`.
    pub fn open(
        symbol: impl Into<String>,
        price: f64,
        atr: f64,
        entry_date: DateTime<Utc>,
        atr_multiplier: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            entry_price: price,
            entry_date,
            stop_loss: price - atr_multiplier * atr,
            trailing_stop: price - TRAILING_ATR_MULTIPLIER * atr,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn entry_price(&self) -> f64 {
        self.entry_price
    }

    pub fn entry_date(&self) -> DateTime<Utc> {
        self.entry_date
    }

    pub fn stop_loss(&self) -> f64 {
        self.stop_loss
    }

    pub fn trailing_stop(&self) -> f64 {
        self.trailing_stop
    }

    /// Whole days elapsed since entry (truncated).
    pub fn days_held(&self, now: DateTime<Utc>) -> i64 {
        (now - self.entry_date).num_days()
    }

    /// Raise the trailing stop to `price - 1.5 * atr` when that is higher.
    /// Only applies while the price is above entry. Returns `true` if the
    /// stop moved.
    pub fn ratchet_trailing(&mut self, price: f64, atr: f64) -> bool {
        if price <= self.entry_price {
            return false;
        }
        let candidate = price - TRAILING_ATR_MULTIPLIER * atr;
        if candidate > self.trailing_stop {
            self.trailing_stop = candidate;
            true
        } else {
            false
        }
    }
}

/// The single source of truth for which symbols are held.
///
/// A symbol maps to a [`TrackedPosition`] iff a position is open; absence of
/// the key is the flat state. Iteration is in ascending symbol order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionBook {
    positions: BTreeMap<String, TrackedPosition>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `position`. Returns `None` and leaves the book unchanged
    /// if the symbol is already tracked.
    pub fn open(&mut self, position: TrackedPosition) -> Option<&TrackedPosition> {
        match self.positions.entry(position.symbol.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                info!(
                    symbol = %position.symbol,
                    entry = position.entry_price,
                    stop_loss = position.stop_loss,
                    trailing_stop = position.trailing_stop,
                    "Position tracking opened"
                );
                Some(slot.insert(position))
            }
        }
    }

    /// Stop tracking `symbol`, removing every field at once.
    pub fn close(&mut self, symbol: &str) -> Option<TrackedPosition> {
        let removed = self.positions.remove(symbol);
        if let Some(position) = &removed {
            info!(symbol = %position.symbol, "Position removed from tracking after close");
        }
        removed
    }

    pub fn get(&self, symbol: &str) -> Option<&TrackedPosition> {
        self.positions.get(symbol)
    }

    pub fn get_mut(&mut self, symbol: &str) -> Option<&mut TrackedPosition> {
        self.positions.get_mut(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.positions.contains_key(symbol)
    }

    /// Tracked symbols, ascending.
    pub fn symbols(&self) -> Vec<String> {
        self.positions.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
