//! Numeric badge display bounds.

use futures_signals::signal::{Signal, SignalExt};

/// Display bounds for a numeric badge: counts below `min` display as `min`,
/// counts above `max` display as `"max+"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BadgeBounds {
    pub min: u64,
    pub max: u64,
}

impl Default for BadgeBounds {
    fn default() -> Self {
        Self { min: 0, max: 999 }
    }
}

impl BadgeBounds {
    /// Bounds with `max` raised to `min` when the pair is inverted.
    pub fn new(min: u64, max: u64) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    pub fn display(&self, value: u64) -> String {
        let lower = value.max(self.min);
        if lower > self.max {
            format!("{}+", self.max)
        } else {
            lower.to_string()
        }
    }

    /// Distinct-until-changed display stream for a reactive count.
    pub fn display_signal(self, values: impl Signal<Item = u64>) -> impl Signal<Item = String> {
        values.map(move |value| self.display(value)).dedupe_cloned()
    }
}
