//! Multiple independent double-hashing sketch copies, combined by taking the
//! minimum estimate across copies, with their own bounded top-N tracker fed
//! by that combined minimum.
//!
//! The copies share a single [`UniversalHashFunctionGenerator`] so that no
//! two copies can draw the same `(a, b)` coefficients, guaranteeing the
//! copies behave as truly independent estimators of the same stream.

use super::sketch::Sketch;
use super::topn::TopNTracker;
use super::universal_hash::{UniversalHashFunctionGenerator, ARBITRARY_LARGE_PRIME};
use crate::common::validation::validate_probability;
use crate::common::Result;
use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;

/// A bank of independent [`Sketch`] copies (built with
/// [`Sketch::hash_pair_count_min_with_generator`]), combined by minimum.
pub struct MultiHashPairTopNCms<T: Hash + Eq + Clone> {
    copies: Vec<Sketch<T>>,
    top_n: TopNTracker<T>,
}

impl<T: Hash + Eq + Clone> MultiHashPairTopNCms<T> {
    /// Build `ceil(ln(1/delta) / ln(1/epsilon))` independent double-hashing
    /// copies, each tracking its own per-copy top-N, sharing one hash
    /// generator, combined into a single top-N tracker of size `n` fed by the
    /// per-item minimum across copies.
    pub fn new(epsilon: f64, delta: f64, n: usize) -> Result<Self> {
        validate_probability(epsilon, "epsilon")?;
        validate_probability(delta, "delta")?;
        let copy_count = (((1.0 / delta).ln()) / ((1.0 / epsilon).ln()))
            .ceil()
            .max(1.0) as usize;

        let hash_gen = Rc::new(RefCell::new(UniversalHashFunctionGenerator::new(
            ARBITRARY_LARGE_PRIME,
        )));
        let mut copies = Vec::with_capacity(copy_count);
        for _ in 0..copy_count {
            copies.push(Sketch::hash_pair_count_min_with_generator(
                epsilon,
                delta,
                n,
                Rc::clone(&hash_gen),
            )?);
        }
        Ok(Self {
            copies,
            top_n: TopNTracker::new(n),
        })
    }

    /// Number of independent copies backing this sketch.
    pub fn copy_count(&self) -> usize {
        self.copies.len()
    }

    /// Insert `item` into every copy, returning the combined (minimum)
    /// estimate and recording it in the shared top-N tracker.
    pub fn insert(&mut self, item: T, count: u64) -> u64 {
        let new_min = self
            .copies
            .iter_mut()
            .map(|copy| copy.insert(item.clone(), count))
            .min()
            .unwrap_or(0);
        self.top_n.observe(item, new_min);
        new_min
    }

    /// Estimate the count of `item`: the minimum estimate across all copies.
    pub fn get(&self, item: &T) -> u64 {
        self.copies
            .iter()
            .map(|copy| copy.get(item))
            .min()
            .unwrap_or(0)
    }

    /// The `k` most frequent tracked items (or all tracked, if `k` is `None`).
    pub fn most_common(&self, k: Option<usize>) -> Vec<(T, u64)> {
        self.top_n.most_common(k)
    }

    /// Estimate the inner product of `item_a` and `item_b`: the minimum,
    /// across copies, of each copy's own inner-product estimate.
    pub fn inner_product(&self, item_a: &T, item_b: &T) -> u64 {
        self.copies
            .iter()
            .map(|copy| copy.inner_product(item_a, item_b))
            .min()
            .unwrap_or(0)
    }
}
