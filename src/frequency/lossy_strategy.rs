//! Periodic whole-table decrement ("lossy counting"), run once per insert to
//! bound a sketch's effective memory by forgetting small counts over time.

use super::table::SketchTable;

/// Selects the decrement threshold applied at the end of each decay window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdFunction {
    /// Never decrement (the no-op lossy strategy disables forgetting entirely).
    None,
    /// LCU-1: always decrement counters equal to exactly 1.
    One,
    /// LCU-WS: decrement counters up to the number of windows seen so far.
    WindowSize,
    /// LCU-SWS: decrement counters up to the square root of the window count.
    SqrtWindowSize,
}

impl ThresholdFunction {
    fn threshold(&self, window_count: u64) -> f64 {
        match self {
            ThresholdFunction::None => f64::INFINITY,
            ThresholdFunction::One => 1.0,
            ThresholdFunction::WindowSize => window_count as f64,
            ThresholdFunction::SqrtWindowSize => (window_count as f64).sqrt(),
        }
    }
}

/// Runs before every insert. Every `window_size = 1/gamma` inserts, advances
/// to a new decay window and decrements every table counter in
/// `(0, threshold(window_count)]`.
///
/// With `threshold_func` set to [`ThresholdFunction::None`] this is LCU-ALL:
/// a no-op strategy, matching a sketch configured to never forget.
pub struct LossyStrategy {
    window_size: f64,
    threshold_func: ThresholdFunction,
    count: f64,
    window_count: u64,
}

impl LossyStrategy {
    /// Build a strategy decaying every `1/gamma` inserts using `threshold_func`.
    pub fn new(gamma: f64, threshold_func: ThresholdFunction) -> Self {
        Self {
            window_size: 1.0 / gamma,
            threshold_func,
            count: 0.0,
            window_count: 0,
        }
    }

    /// Build a strategy that never decrements (LCU-ALL).
    pub fn none() -> Self {
        Self::new(1.0, ThresholdFunction::None)
    }

    /// Called once per insert, before the update strategy is applied.
    pub fn tick(&mut self, table: &mut dyn SketchTable) {
        if matches!(self.threshold_func, ThresholdFunction::None) {
            return;
        }
        self.count += 1.0;
        if self.count > self.window_size {
            self.count = 0.0;
            self.window_count += 1;
            let threshold = self.threshold_func.threshold(self.window_count);
            table.decrement_all(0, threshold);
        }
    }

    /// Number of decay windows elapsed so far.
    pub fn window_count(&self) -> u64 {
        self.window_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::table::DenseTable;

    #[test]
    fn none_strategy_never_decrements() {
        let mut table = DenseTable::new(1, 4);
        table.increment(0, 0, 1).unwrap();
        let mut lossy = LossyStrategy::none();
        for _ in 0..100 {
            lossy.tick(&mut table);
        }
        assert_eq!(table.get(0, 0), 1);
        assert_eq!(lossy.window_count(), 0);
    }

    #[test]
    fn one_threshold_decrements_only_counters_at_one() {
        let mut table = DenseTable::new(1, 2);
        table.increment(0, 0, 1).unwrap();
        table.increment(0, 1, 5).unwrap();
        let mut lossy = LossyStrategy::new(1.0, ThresholdFunction::One);
        lossy.tick(&mut table); // count=1, not yet > window_size(1.0)
        lossy.tick(&mut table); // count=2 > 1.0 -> window advances, decrement
        assert_eq!(table.get(0, 0), 0);
        assert_eq!(table.get(0, 1), 5);
        assert_eq!(lossy.window_count(), 1);
    }

    #[test]
    fn window_size_threshold_grows_with_window_count() {
        let mut table = DenseTable::new(1, 1);
        table.increment(0, 0, 10).unwrap();
        let mut lossy = LossyStrategy::new(1.0, ThresholdFunction::WindowSize);
        lossy.tick(&mut table);
        lossy.tick(&mut table); // window_count -> 1, threshold 1, no effect on v=10
        assert_eq!(table.get(0, 0), 10);
    }
}
