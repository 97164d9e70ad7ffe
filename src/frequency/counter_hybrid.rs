//! An exact-counting buffer placed in front of any frequency sketch, flushed
//! into the sketch once its buffered total crosses a batch threshold.
//!
//! For workloads with a small number of genuinely hot keys this avoids
//! paying the sketch's approximation error on every single insert: repeat
//! hits to the same key accumulate exactly in a `HashMap` until the buffer's
//! total crosses `batch_size`, at which point every buffered `(item, count)`
//! pair is applied to the sketch in one pass.

use std::collections::HashMap;
use std::hash::Hash;

/// Default flush threshold, matching the reference implementation.
pub const DEFAULT_BATCH_SIZE: u64 = 10_000;

/// Minimal contract a wrapped sketch must provide.
pub trait FrequencySketch<T> {
    /// Apply one observation of `count` occurrences of `item`.
    fn insert(&mut self, item: T, count: u64) -> u64;
    /// Estimate the count of `item`.
    fn get(&self, item: &T) -> u64;
    /// The `k` most frequent tracked items, or all tracked items if `k` is `None`.
    fn most_common(&self, k: Option<usize>) -> Vec<(T, u64)>;
}

/// Wraps a sketch `S` with an exact buffer, flushed once the buffered total
/// exceeds `batch_size`, or forced to flush before any `most_common` query.
pub struct SketchCounterHybrid<T: Hash + Eq + Clone, S: FrequencySketch<T>> {
    sketch: S,
    buffer: HashMap<T, u64>,
    batch_size: u64,
    current_batch: u64,
}

impl<T: Hash + Eq + Clone, S: FrequencySketch<T>> SketchCounterHybrid<T, S> {
    /// Wrap `sketch` with the default batch size.
    pub fn new(sketch: S) -> Self {
        Self::with_batch_size(sketch, DEFAULT_BATCH_SIZE)
    }

    /// Wrap `sketch`, flushing once the buffered total exceeds `batch_size`.
    pub fn with_batch_size(sketch: S, batch_size: u64) -> Self {
        Self {
            sketch,
            buffer: HashMap::new(),
            batch_size,
            current_batch: 0,
        }
    }

    /// Record `count` occurrences of `item` in the exact buffer, flushing
    /// into the underlying sketch if the buffered total now exceeds the
    /// configured batch size.
    pub fn insert(&mut self, item: T, count: u64) {
        *self.buffer.entry(item).or_insert(0) += count;
        self.current_batch += count;
        if self.current_batch > self.batch_size {
            self.flush();
        }
    }

    /// Estimated count of `item`: the exact buffered count plus the
    /// underlying sketch's estimate.
    pub fn get(&self, item: &T) -> u64 {
        let buffered = self.buffer.get(item).copied().unwrap_or(0);
        buffered + self.sketch.get(item)
    }

    /// The `k` most frequent items, forcing a flush of the exact buffer first
    /// so the result reflects every observation made so far.
    pub fn most_common(&mut self, k: Option<usize>) -> Vec<(T, u64)> {
        self.flush();
        self.sketch.most_common(k)
    }

    /// Apply every buffered `(item, count)` pair to the underlying sketch
    /// and clear the buffer.
    pub fn flush(&mut self) {
        for (item, count) in self.buffer.drain() {
            self.sketch.insert(item, count);
        }
        self.current_batch = 0;
    }

    /// Access the wrapped sketch directly (e.g. for dimension introspection).
    pub fn inner(&self) -> &S {
        &self.sketch
    }
}
