//! The composed frequency sketch: a table plus pluggable hashing, update and
//! lossy strategies, an optional top-N tracker, and a choice of estimator.
//!
//! Every sketch variant named in this crate (plain count-min, conservative
//! count-min, top-N count-min, the double-hashing "hash pair" variant,
//! count-mean-min, and least-squares top-N) is this one struct configured
//! differently, rather than a chain of subclasses — each variant only
//! changes which strategies are plugged in and which estimator reads the
//! table back out.

use super::hashing_strategy::{DoubleHashingStrategy, HashingStrategy, NaiveHashingStrategy};
use super::least_squares;
use super::lossy_strategy::LossyStrategy;
use super::table::{DenseTable, SketchTable};
use super::topn::TopNTracker;
use super::universal_hash::UniversalHashFunctionGenerator;
use super::update_strategy::{ConservativeUpdateStrategy, NaiveUpdateStrategy, UpdateStrategy};
use crate::common::validation::{validate_probability, validate_width_depth};
use crate::common::Result;
use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;

/// Which estimator `get`/`most_common` apply on top of the raw table reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estimator {
    /// Plain count-min: the minimum raw value across the touched rows.
    Standard,
    /// Count-mean-min: subtracts each row's estimated collision noise before
    /// taking the median, capped by the standard minimum.
    CountMeanMin,
    /// Least-squares: `get` behaves like [`Estimator::Standard`]; `most_common`
    /// refines the tracked top-N counts via a least-squares solve.
    LeastSquares,
}

/// A configured count-min sketch variant.
pub struct Sketch<T: Hash + Eq + Clone> {
    table: Box<dyn SketchTable>,
    hashing: Box<dyn HashingStrategy<T>>,
    update: Box<dyn UpdateStrategy>,
    lossy: LossyStrategy,
    estimator: Estimator,
    top_n: Option<TopNTracker<T>>,
}

/// Depth/width sizing for the naive (single-hash-per-row) sketch family:
/// `depth = ceil(ln(1/delta))`, `width = ceil(e/epsilon)`.
fn size_naive(epsilon: f64, delta: f64) -> (u64, usize) {
    let width = (std::f64::consts::E / epsilon).ceil() as u64;
    let depth = ((1.0 / delta).ln().ceil() as usize).max(1);
    (width, depth)
}

/// Depth/width sizing for the double-hashing sketch family. `width` must be
/// prime for the Kirsch-Mitzenmacher scheme, and the effective depth formula
/// is taken from the source verbatim (including its use of `epsilon` rather
/// than `delta` in the depth term — see DESIGN.md).
fn size_double_hashing(epsilon: f64, delta: f64) -> (u64, usize) {
    let _ = delta;
    let e = std::f64::consts::E;
    let min_width = (2.0 * e / epsilon).ceil() as u64;
    let width = super::universal_hash::next_prime(min_width);
    let depth = ((1.0 / (epsilon - epsilon / (2.0 * e * e))).ln().ceil() as usize).max(1);
    (width, depth)
}

impl<T: Hash + Eq + Clone> Sketch<T> {
    /// Plain count-min sketch: naive update, no top-N tracking, no lossy decay.
    pub fn count_min(epsilon: f64, delta: f64) -> Result<Self> {
        validate_probability(epsilon, "epsilon")?;
        validate_probability(delta, "delta")?;
        let (width, depth) = size_naive(epsilon, delta);
        validate_width_depth(width, depth)?;
        let mut gen = UniversalHashFunctionGenerator::new(width);
        Ok(Self {
            table: Box::new(DenseTable::new(depth, width as usize)),
            hashing: Box::new(NaiveHashingStrategy::new(depth, width, &mut gen)),
            update: Box::new(NaiveUpdateStrategy),
            lossy: LossyStrategy::none(),
            estimator: Estimator::Standard,
            top_n: None,
        })
    }

    /// Count-min sketch with conservative update, reducing overestimation
    /// bias relative to [`Sketch::count_min`] at equal dimensions.
    pub fn conservative_count_min(epsilon: f64, delta: f64) -> Result<Self> {
        validate_probability(epsilon, "epsilon")?;
        validate_probability(delta, "delta")?;
        let (width, depth) = size_naive(epsilon, delta);
        validate_width_depth(width, depth)?;
        let mut gen = UniversalHashFunctionGenerator::new(width);
        Ok(Self {
            table: Box::new(DenseTable::new(depth, width as usize)),
            hashing: Box::new(NaiveHashingStrategy::new(depth, width, &mut gen)),
            update: Box::new(ConservativeUpdateStrategy),
            lossy: LossyStrategy::none(),
            estimator: Estimator::Standard,
            top_n: None,
        })
    }

    /// Count-min sketch additionally tracking the `n` most frequent items.
    pub fn top_n_count_min(epsilon: f64, delta: f64, n: usize, conservative: bool) -> Result<Self> {
        let mut sketch = if conservative {
            Self::conservative_count_min(epsilon, delta)?
        } else {
            Self::count_min(epsilon, delta)?
        };
        sketch.top_n = Some(TopNTracker::new(n));
        Ok(sketch)
    }

    /// The double-hashing ("hash pair") top-N sketch: only two hash
    /// functions are drawn per copy regardless of depth, trading a slightly
    /// larger table for a cheaper per-insert hash cost.
    pub fn hash_pair_count_min(epsilon: f64, delta: f64, n: usize) -> Result<Self> {
        let gen = UniversalHashFunctionGenerator::new(super::universal_hash::ARBITRARY_LARGE_PRIME);
        Self::hash_pair_count_min_with_generator(epsilon, delta, n, Rc::new(RefCell::new(gen)))
    }

    /// Like [`Sketch::hash_pair_count_min`], but drawing its two hash
    /// functions from a caller-supplied shared generator, so multiple
    /// copies stay mutually independent (used by the multi-copy sketch).
    pub fn hash_pair_count_min_with_generator(
        epsilon: f64,
        delta: f64,
        n: usize,
        hash_gen: Rc<RefCell<UniversalHashFunctionGenerator>>,
    ) -> Result<Self> {
        validate_probability(epsilon, "epsilon")?;
        validate_probability(delta, "delta")?;
        let (width, depth) = size_double_hashing(epsilon, delta);
        validate_width_depth(width, depth)?;
        Ok(Self {
            table: Box::new(DenseTable::new(depth, width as usize)),
            hashing: Box::new(DoubleHashingStrategy::new(depth, width, &hash_gen)),
            update: Box::new(NaiveUpdateStrategy),
            lossy: LossyStrategy::none(),
            estimator: Estimator::Standard,
            top_n: Some(TopNTracker::new(n)),
        })
    }

    /// Count-mean-min sketch: a top-N count-min sketch whose `get`/`most_common`
    /// subtract each row's estimated collision noise before taking the median.
    pub fn count_mean_min(epsilon: f64, delta: f64, n: usize, conservative: bool) -> Result<Self> {
        let mut sketch = Self::top_n_count_min(epsilon, delta, n, conservative)?;
        sketch.estimator = Estimator::CountMeanMin;
        Ok(sketch)
    }

    /// Least-squares top-N sketch: refines the tracked top-N counts by
    /// solving a least-squares system over the raw table cells.
    pub fn least_squares_top_n(epsilon: f64, delta: f64, n: usize) -> Result<Self> {
        let mut sketch = Self::top_n_count_min(epsilon, delta, n, false)?;
        sketch.estimator = Estimator::LeastSquares;
        Ok(sketch)
    }

    /// Replace this sketch's lossy-counting strategy (defaults to never
    /// decaying).
    pub fn with_lossy(mut self, lossy: LossyStrategy) -> Self {
        self.lossy = lossy;
        self
    }

    /// Number of table rows.
    pub fn depth(&self) -> usize {
        self.table.depth()
    }

    /// Number of table columns.
    pub fn width(&self) -> usize {
        self.table.width()
    }

    /// Whether this sketch tracks a bounded top-N set.
    pub fn tracks_top_n(&self) -> bool {
        self.top_n.is_some()
    }

    /// The failure probability this sketch's depth actually guarantees,
    /// `e^(-depth)`. For a [`Sketch::hash_pair_count_min`] (or its
    /// multi-copy caller), this is the effective `delta` implied by the
    /// depth `size_double_hashing` derived from the requested `epsilon` —
    /// not necessarily the `delta` originally requested (see DESIGN.md).
    pub fn effective_delta(&self) -> f64 {
        (-(self.depth() as f64)).exp()
    }

    /// Record `count` occurrences of `item`, returning the sketch's updated
    /// estimate for it.
    ///
    /// Every constructor above backs this sketch with [`DenseTable`], whose
    /// counters are unbounded, so the update can never overflow; the
    /// [`SketchTable::increment`]/[`SketchTable::set`] fallibility only
    /// matters for callers driving a bounded table back-end directly.
    pub fn insert(&mut self, item: T, count: u64) -> u64 {
        self.lossy.tick(self.table.as_mut());
        let indices = self.hashing.hash(&item);
        let new_min = self
            .update
            .update(self.table.as_mut(), &indices, count)
            .expect("dense table backing this sketch never overflows");
        if let Some(top_n) = &mut self.top_n {
            top_n.observe(item, new_min);
        }
        new_min
    }

    /// Estimate the count of `item`.
    pub fn get(&self, item: &T) -> u64 {
        match self.estimator {
            Estimator::Standard | Estimator::LeastSquares => self.standard_estimate(item),
            Estimator::CountMeanMin => self.count_mean_min_estimate(item),
        }
    }

    /// The plain count-min estimate (minimum raw cell across touched rows),
    /// ignoring whatever [`Estimator`] this sketch is configured with. Useful
    /// for comparing a refined estimate against the unrefined one it was
    /// derived from.
    pub fn standard_estimate(&self, item: &T) -> u64 {
        let indices = self.hashing.hash(item);
        indices
            .iter()
            .enumerate()
            .map(|(row, &col)| self.table.get(row, col as usize))
            .min()
            .unwrap_or(0)
    }

    fn count_mean_min_estimate(&self, item: &T) -> u64 {
        let indices = self.hashing.hash(item);
        let values: Vec<f64> = indices
            .iter()
            .enumerate()
            .map(|(row, &col)| self.table.get(row, col as usize) as f64)
            .collect();
        let baselines = self.update.baselines(self.table.as_ref(), &indices);
        let mut diffs: Vec<f64> = values
            .iter()
            .zip(baselines.iter())
            .map(|(v, b)| v - b)
            .collect();
        diffs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let median = median_of_sorted(&diffs);
        let min_value = values.iter().cloned().fold(f64::INFINITY, f64::min);
        median.min(min_value).max(0.0).round() as u64
    }

    /// Apply `count` occurrences of every item in `items`, in order,
    /// returning each insert's resulting estimate. Equivalent to calling
    /// [`Sketch::insert`] once per item with a count of `1`.
    pub fn update<I: IntoIterator<Item = T>>(&mut self, items: I) -> Vec<u64> {
        items.into_iter().map(|item| self.insert(item, 1)).collect()
    }

    /// Apply one `(item, count)` pair at a time, in order, returning each
    /// insert's resulting estimate. Equivalent to the sequential composition
    /// of [`Sketch::insert`] calls; provides no batch atomicity.
    pub fn update_with_counts<I: IntoIterator<Item = (T, u64)>>(&mut self, items: I) -> Vec<u64> {
        items
            .into_iter()
            .map(|(item, count)| self.insert(item, count))
            .collect()
    }

    /// Estimate the inner product of the frequency vectors underlying
    /// `item_a` and `item_b`: the minimum, across touched rows, of the
    /// product of their two raw cell values in that row.
    ///
    /// This is an estimate of `sum_x count(x, a) * count(x, b)` only when
    /// `item_a` and `item_b` come from two independently-built sketches over
    /// two streams; called on counts from the same sketch it instead bounds
    /// how much the two items' rows collide with each other.
    pub fn inner_product(&self, item_a: &T, item_b: &T) -> u64 {
        let indices_a = self.hashing.hash(item_a);
        let indices_b = self.hashing.hash(item_b);
        indices_a
            .iter()
            .zip(indices_b.iter())
            .enumerate()
            .map(|(row, (&col_a, &col_b))| {
                self.table.get(row, col_a as usize) * self.table.get(row, col_b as usize)
            })
            .min()
            .unwrap_or(0)
    }

    /// The `k` most frequent tracked items (or all tracked, if `k` is `None`),
    /// refined according to this sketch's estimator. Returns an empty vector
    /// if this sketch was not configured to track a top-N set.
    pub fn most_common(&self, k: Option<usize>) -> Vec<(T, u64)> {
        let Some(top_n) = &self.top_n else {
            return Vec::new();
        };
        match self.estimator {
            Estimator::Standard => top_n.most_common(k),
            Estimator::CountMeanMin => {
                let tracked = top_n.most_common(None);
                let mut refined: Vec<(T, u64)> = tracked
                    .into_iter()
                    .map(|(item, _)| {
                        let estimate = self.count_mean_min_estimate(&item);
                        (item, estimate)
                    })
                    .collect();
                refined.sort_by(|a, b| b.1.cmp(&a.1));
                let limit = k.map(|k| k.min(top_n.capacity())).unwrap_or(top_n.capacity());
                refined.truncate(limit);
                refined
            }
            Estimator::LeastSquares => {
                let tracked = top_n.most_common(None);
                let tracked_items: Vec<T> = tracked.into_iter().map(|(item, _)| item).collect();
                let refined_counts =
                    least_squares::refine_counts(self.table.as_ref(), self.hashing.as_ref(), &tracked_items);
                let mut refined: Vec<(T, u64)> = tracked_items
                    .into_iter()
                    .zip(refined_counts)
                    .map(|(item, count)| (item, count.max(0) as u64))
                    .collect();
                refined.sort_by(|a, b| b.1.cmp(&a.1));
                let limit = k.map(|k| k.min(top_n.capacity())).unwrap_or(top_n.capacity());
                refined.truncate(limit);
                refined
            }
        }
    }
}

impl<T: Hash + Eq + Clone> super::counter_hybrid::FrequencySketch<T> for Sketch<T> {
    fn insert(&mut self, item: T, count: u64) -> u64 {
        Sketch::insert(self, item, count)
    }

    fn get(&self, item: &T) -> u64 {
        Sketch::get(self, item)
    }

    fn most_common(&self, k: Option<usize>) -> Vec<(T, u64)> {
        Sketch::most_common(self, k)
    }
}

fn median_of_sorted(values: &[f64]) -> f64 {
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    if len % 2 == 1 {
        values[len / 2]
    } else {
        (values[len / 2 - 1] + values[len / 2]) / 2.0
    }
}
