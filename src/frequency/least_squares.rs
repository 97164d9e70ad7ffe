//! Least-squares refinement of the top-N tracked counts.
//!
//! The sketch's raw per-row cells are treated as noisy linear observations
//! of the tracked items' true counts plus a shared "everything else" noise
//! term, and a least-squares solve recovers a refined count per tracked item.
//!
//! Building the full `(depth*width) x (n+1)` design matrix the reference
//! implementation constructs (via `numpy.linalg.lstsq`) is wasteful here:
//! each tracked item's column in that matrix has exactly `depth` nonzero
//! entries (one per table row), and the noise column is all-ones. The normal
//! equations `AᵀA x = Aᵀb` can be assembled directly from the hashed row
//! indices in `O(depth * n^2)` instead of `O(depth * width * n)`, then solved
//! densely since `n` (the top-N width) is always small. This crate has no
//! BLAS/LAPACK dependency, so the solve itself is Gaussian elimination with
//! partial pivoting over `ndarray` arrays rather than `ndarray-linalg`'s
//! `lstsq` (see DESIGN.md).

use crate::frequency::hashing_strategy::HashingStrategy;
use crate::frequency::table::SketchTable;
use ndarray::{Array1, Array2};
use std::hash::Hash;

/// Solve for refined counts of `tracked` items against `table`, given the
/// `depth` row-indices each item hashes to.
///
/// Returns one refined count per tracked item, in the same order as
/// `tracked`, with the shared noise coefficient discarded.
pub fn refine_counts<T, H>(table: &dyn SketchTable, hashing: &H, tracked: &[T]) -> Vec<i64>
where
    T: Hash + Eq + Clone,
    H: HashingStrategy<T> + ?Sized,
{
    let n = tracked.len();
    if n == 0 {
        return Vec::new();
    }
    let depth = table.depth();
    let width = table.width() as f64;

    let item_rows: Vec<Vec<u64>> = tracked.iter().map(|item| hashing.hash(item)).collect();

    let dim = n + 1; // n tracked items + 1 noise term
    let mut gram = Array2::<f64>::zeros((dim, dim));
    let mut rhs = Array1::<f64>::zeros(dim);

    let total_cells = (depth as f64) * width;
    let table_sum: f64 = (0..depth).map(|r| table.row_sum(r) as f64).sum();

    // A^T A and A^T b for the n tracked-item columns.
    for l in 0..n {
        for r in 0..depth {
            let col_l = item_rows[l][r] as usize;
            rhs[l] += table.get(r, col_l) as f64;
        }
        for m in 0..n {
            let mut shared_rows = 0.0;
            for r in 0..depth {
                if item_rows[l][r] == item_rows[m][r] {
                    shared_rows += 1.0;
                }
            }
            gram[[l, m]] = shared_rows;
        }
        gram[[l, n]] = depth as f64;
        gram[[n, l]] = depth as f64;
    }
    gram[[n, n]] = total_cells;
    rhs[n] = table_sum;

    let solution = solve_symmetric(&gram, &rhs);
    solution[..n].iter().map(|&x| x.round() as i64).collect()
}

/// Solve `a x = b` via Gaussian elimination with partial pivoting.
/// `a` is assumed square; if it is singular (can happen with very few
/// tracked items or heavy hash collisions), the affected entries are
/// returned as zero rather than propagating a division by zero.
fn solve_symmetric(a: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let n = b.len();
    let mut m = a.clone();
    let mut rhs = b.clone();

    for col in 0..n {
        let mut pivot_row = col;
        let mut pivot_val = m[[col, col]].abs();
        for row in (col + 1)..n {
            if m[[row, col]].abs() > pivot_val {
                pivot_val = m[[row, col]].abs();
                pivot_row = row;
            }
        }
        if pivot_val < 1e-12 {
            continue; // singular column; leave the corresponding solution at 0
        }
        if pivot_row != col {
            for k in 0..n {
                let tmp = m[[col, k]];
                m[[col, k]] = m[[pivot_row, k]];
                m[[pivot_row, k]] = tmp;
            }
            rhs.swap(col, pivot_row);
        }
        for row in (col + 1)..n {
            let factor = m[[row, col]] / m[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                m[[row, k]] -= factor * m[[col, k]];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut x = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        if m[[row, row]].abs() < 1e-12 {
            continue;
        }
        let mut sum = rhs[row];
        for k in (row + 1)..n {
            sum -= m[[row, k]] * x[k];
        }
        x[row] = sum / m[[row, row]];
    }
    x
}
