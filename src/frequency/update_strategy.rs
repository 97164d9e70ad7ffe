//! Strategies for writing a new observation into a sketch table's indexed
//! row cells, and for estimating each row's "noise" baseline used by the
//! count-mean-min refinement.

use super::table::SketchTable;
use crate::common::Result;

/// Applies a single observation of `count` occurrences, indexed by `indices`
/// (one index per row), to a table.
pub trait UpdateStrategy {
    /// Apply the update and return the resulting estimate for this item
    /// (the minimum across the touched rows, after the update is applied).
    ///
    /// Fails if the underlying table's counters would overflow (only
    /// reachable with a bounded table back-end).
    fn update(&self, table: &mut dyn SketchTable, indices: &[u64], count: u64) -> Result<u64>;

    /// For each row touched by `indices`, estimate the noise contributed by
    /// unrelated items hashing into that row's cell — used by the
    /// count-mean-min estimator to subtract out collision bias.
    fn baselines(&self, table: &dyn SketchTable, indices: &[u64]) -> Vec<f64>;
}

/// Every row is incremented independently; the minimum across rows is the
/// standard count-min estimate. Never produces negative counts, but has the
/// largest positive collision bias of the two strategies.
pub struct NaiveUpdateStrategy;

impl UpdateStrategy for NaiveUpdateStrategy {
    fn update(&self, table: &mut dyn SketchTable, indices: &[u64], count: u64) -> Result<u64> {
        let mut min = None;
        for (row, &col) in indices.iter().enumerate() {
            let new_value = table.increment(row, col as usize, count)?;
            min = Some(min.map_or(new_value, |m: u64| m.min(new_value)));
        }
        Ok(min.unwrap_or(0))
    }

    fn baselines(&self, table: &dyn SketchTable, indices: &[u64]) -> Vec<f64> {
        let width = table.width() as f64;
        indices
            .iter()
            .enumerate()
            .map(|(row, &col)| {
                let value = table.get(row, col as usize) as f64;
                if width > 1.0 {
                    (table.total() as f64 - value) / (width - 1.0)
                } else {
                    0.0
                }
            })
            .collect()
    }
}

/// Only raises a row's counter up to the new minimum across all touched
/// rows, never overwriting a cell that is already at or above that minimum.
/// Reduces overestimation bias relative to [`NaiveUpdateStrategy`] at the
/// cost of being harder to merge or decrement correctly.
pub struct ConservativeUpdateStrategy;

impl UpdateStrategy for ConservativeUpdateStrategy {
    fn update(&self, table: &mut dyn SketchTable, indices: &[u64], count: u64) -> Result<u64> {
        let current_values: Vec<u64> = indices
            .iter()
            .enumerate()
            .map(|(row, &col)| table.get(row, col as usize))
            .collect();
        let current_min = current_values.iter().copied().min().unwrap_or(0);
        let new_min = current_min.saturating_add(count);
        for (row, &col) in indices.iter().enumerate() {
            if current_values[row] < new_min {
                table.set(row, col as usize, new_min)?;
            }
        }
        Ok(new_min)
    }

    fn baselines(&self, table: &dyn SketchTable, indices: &[u64]) -> Vec<f64> {
        let width = table.width() as f64;
        indices
            .iter()
            .enumerate()
            .map(|(row, &col)| {
                let value = table.get(row, col as usize) as f64;
                let row_sum = table.row_sum(row) as f64;
                if width > 1.0 {
                    (row_sum - value) / (width - 1.0)
                } else {
                    0.0
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::table::DenseTable;

    #[test]
    fn naive_update_reports_min_across_rows() {
        let mut table = DenseTable::new(3, 16);
        let strat = NaiveUpdateStrategy;
        let indices = [1u64, 1, 1];
        assert_eq!(strat.update(&mut table, &indices, 5).unwrap(), 5);
        // collide row 0 with another item
        table.increment(0, 1, 100).unwrap();
        assert_eq!(strat.update(&mut table, &indices, 1).unwrap(), 6);
    }

    #[test]
    fn conservative_update_never_exceeds_naive() {
        let mut naive_table = DenseTable::new(3, 16);
        let mut cons_table = DenseTable::new(3, 16);
        let naive = NaiveUpdateStrategy;
        let cons = ConservativeUpdateStrategy;
        let indices = [2u64, 5, 9];

        // simulate a colliding item inflating row 0 and row 2
        naive_table.increment(0, 2, 50).unwrap();
        cons_table.increment(0, 2, 50).unwrap();
        naive_table.increment(2, 9, 20).unwrap();
        cons_table.increment(2, 9, 20).unwrap();

        let naive_est = naive.update(&mut naive_table, &indices, 1).unwrap();
        let cons_est = cons.update(&mut cons_table, &indices, 1).unwrap();
        assert!(cons_est <= naive_est);
    }

    #[test]
    fn conservative_update_leaves_higher_cell_untouched() {
        let mut table = DenseTable::new(2, 8);
        let strat = ConservativeUpdateStrategy;
        table.set(0, 0, 10).unwrap();
        table.set(1, 0, 2).unwrap();
        let est = strat.update(&mut table, &[0, 0], 1).unwrap();
        assert_eq!(est, 3);
        assert_eq!(table.get(0, 0), 10);
        assert_eq!(table.get(1, 0), 3);
    }
}
