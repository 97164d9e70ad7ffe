//! The single entry point from an arbitrary hashable item into this crate's
//! hash strategies: every universal hash function operates on a `u64` key,
//! never on the item itself, so this is the only place that touches `T`.

use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

/// Map any hashable item to a fixed-seed 64-bit key.
///
/// The seed is fixed at `0` rather than drawn from `RandomState`, so that two
/// runs over the same item sequence always land on the same buckets —
/// reproducibility a sketch needs for testing and for comparing independent
/// sketch copies over the same stream.
pub fn item_to_u64<T: Hash>(item: &T) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    item.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_across_calls() {
        assert_eq!(item_to_u64(&"hello"), item_to_u64(&"hello"));
    }

    #[test]
    fn distinguishes_different_items() {
        assert_ne!(item_to_u64(&"hello"), item_to_u64(&"world"));
    }

    #[test]
    fn distinguishes_different_integers() {
        assert_ne!(item_to_u64(&1u64), item_to_u64(&2u64));
    }
}
