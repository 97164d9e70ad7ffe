//! Strategies for turning an item into the `depth` row-indices used to probe
//! a sketch table.

use super::universal_hash::{next_prime, UniversalHashFunction, UniversalHashFunctionGenerator};
use crate::common::hash::item_to_u64;
use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;

/// Maps an item to one index per table row.
pub trait HashingStrategy<T> {
    /// Compute the `depth` row-indices for `item`, one per table row.
    fn hash(&self, item: &T) -> Vec<u64>;

    /// Number of rows (and therefore indices) this strategy produces.
    fn depth(&self) -> usize;
}

/// One independent universal hash function per row, each with its own `(a, b)`
/// coefficients and output range `[0, width)`.
pub struct NaiveHashingStrategy {
    hashes: Vec<UniversalHashFunction>,
}

impl NaiveHashingStrategy {
    /// Build a strategy with `depth` independent hash functions over
    /// `[0, width)`, drawing coefficients from `hash_gen`.
    pub fn new(
        depth: usize,
        _width: u64,
        hash_gen: &mut UniversalHashFunctionGenerator,
    ) -> Self {
        let hashes = (0..depth).map(|_| hash_gen.next_function()).collect();
        Self { hashes }
    }

    /// Build a strategy with a fresh, privately-owned generator.
    pub fn with_new_generator(depth: usize, width: u64) -> Self {
        let mut gen = UniversalHashFunctionGenerator::new(width);
        Self::new(depth, width, &mut gen)
    }
}

impl<T: Hash> HashingStrategy<T> for NaiveHashingStrategy {
    fn hash(&self, item: &T) -> Vec<u64> {
        let x = item_to_u64(item);
        self.hashes.iter().map(|h| h.apply(x)).collect()
    }

    fn depth(&self) -> usize {
        self.hashes.len()
    }
}

/// The Kirsch-Mitzenmacher double-hashing scheme: only two independent hash
/// functions are drawn, and row `i`'s index is `(first(x) + i * second(x)) mod width`.
///
/// Requires `width` to be prime; a [`HashPairCMS`](super::sketch) constructor
/// sizes `width` with [`next_prime`] before building this strategy.
pub struct DoubleHashingStrategy {
    depth: usize,
    width: u64,
    first: UniversalHashFunction,
    second: UniversalHashFunction,
}

impl DoubleHashingStrategy {
    /// Build a double-hashing strategy over a table with `width` rows (must
    /// be prime), drawing its two hash functions from a shared generator so
    /// that multiple copies of a sketch remain mutually independent.
    ///
    /// The generator's own output range is the hash-family modulus itself
    /// (not `width`): its two draws are reduced mod `width` per-probe inside
    /// [`UniversalHashFunction::apply`].
    pub fn new(
        depth: usize,
        width: u64,
        hash_gen: &Rc<RefCell<UniversalHashFunctionGenerator>>,
    ) -> Self {
        let mut gen = hash_gen.borrow_mut();
        let first = gen.next_function();
        let second = gen.next_function();
        drop(gen);
        Self {
            depth,
            width,
            first,
            second,
        }
    }

    /// Size for a double-hashing table's width given a desired minimum width.
    pub fn size_width(min_width: u64) -> u64 {
        next_prime(min_width)
    }
}

impl<T: Hash> HashingStrategy<T> for DoubleHashingStrategy {
    fn hash(&self, item: &T) -> Vec<u64> {
        let x = item_to_u64(item);
        let h1 = self.first.apply(x);
        let h2 = self.second.apply(x);
        (0..self.depth)
            .map(|i| (h1 + i as u64 * h2) % self.width)
            .collect()
    }

    fn depth(&self) -> usize {
        self.depth
    }
}
