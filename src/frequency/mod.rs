//! Count-min sketch family: approximate frequency counting and top-N
//! tracking over a stream of hashable items.

pub mod counter_hybrid;
pub mod hashing_strategy;
pub mod heap;
pub mod least_squares;
pub mod lossy_strategy;
pub mod multi_hash_pair;
pub mod sketch;
pub mod table;
pub mod topn;
pub mod universal_hash;
pub mod update_strategy;

pub use counter_hybrid::{FrequencySketch, SketchCounterHybrid, DEFAULT_BATCH_SIZE};
pub use hashing_strategy::{DoubleHashingStrategy, HashingStrategy, NaiveHashingStrategy};
pub use heap::IndexedMinHeap;
pub use lossy_strategy::{LossyStrategy, ThresholdFunction};
pub use multi_hash_pair::MultiHashPairTopNCms;
pub use sketch::{Estimator, Sketch};
pub use table::{BitPackedTable, DenseTable, FixedWidthTable, MatrixTable, SketchTable};
pub use topn::TopNTracker;
pub use universal_hash::{UniversalHashFunction, UniversalHashFunctionGenerator};
pub use update_strategy::{ConservativeUpdateStrategy, NaiveUpdateStrategy, UpdateStrategy};
