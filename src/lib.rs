//! minsketch: a count-min sketch family for approximate frequency counting
//! and top-N tracking over a stream of hashable items.
//!
//! Implements plain and conservative-update count-min sketches, a
//! double-hashing ("hash pair") variant, bounded top-N tracking via an
//! indexed min-heap, lossy periodic decay, count-mean-min and least-squares
//! refinement of the tracked top-N counts, a multi-copy sketch sharing one
//! hash generator, and an exact-counting accelerator that can sit in front
//! of any of the above.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod common;
pub mod frequency;

pub use common::{hash, Result, SketchError};
pub use frequency::{
    ConservativeUpdateStrategy, DoubleHashingStrategy, Estimator, FrequencySketch,
    HashingStrategy, LossyStrategy, MultiHashPairTopNCms, NaiveHashingStrategy,
    NaiveUpdateStrategy, Sketch, SketchCounterHybrid, SketchTable, ThresholdFunction,
    TopNTracker, UniversalHashFunction, UniversalHashFunctionGenerator, UpdateStrategy,
    DEFAULT_BATCH_SIZE,
};

/// Error types and result aliases for sketch operations
pub mod error {
    pub use crate::common::{Result, SketchError};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_compiles_and_basic_sketch_works() {
        let mut sketch = Sketch::<&str>::count_min(0.01, 0.01).unwrap();
        sketch.insert("x", 3);
        assert!(sketch.get(&"x") >= 3);
    }
}
