//! Sketch table back-ends: the `depth x width` counter grid that a hashing
//! strategy indexes into.
//!
//! Four back-ends trade memory density for counter range, matching the
//! storage options named for the reference frequency sketches: an unbounded
//! dense table, a fixed-width array with checked overflow, a generic
//! row-major matrix, and a true bit-packed table whose counters are not
//! byte-aligned.

use crate::common::validation::validate_counter_bits;
use crate::common::{Result, SketchError};

/// A `depth x width` grid of counters addressed by `(row, col)`.
pub trait SketchTable {
    /// Number of rows.
    fn depth(&self) -> usize;

    /// Number of columns per row.
    fn width(&self) -> usize;

    /// Read the counter at `(row, col)`.
    fn get(&self, row: usize, col: usize) -> u64;

    /// Overwrite the counter at `(row, col)`.
    ///
    /// Fails with [`SketchError::Overflow`] if `value` does not fit in this
    /// table's counter width; the unbounded dense back-end never fails.
    fn set(&mut self, row: usize, col: usize, value: u64) -> Result<()>;

    /// Add `value` to the counter at `(row, col)` and return the new value.
    ///
    /// Fails with [`SketchError::Overflow`] under the same conditions as
    /// [`set`](Self::set).
    fn increment(&mut self, row: usize, col: usize, value: u64) -> Result<u64>;

    /// Running total of every value ever passed to [`increment`](Self::increment),
    /// independent of later decrements.
    fn total(&self) -> u64;

    /// Sum of the counters in a single row.
    fn row_sum(&self, row: usize) -> u64 {
        (0..self.width()).map(|c| self.get(row, c)).sum()
    }

    /// Flatten the whole table into a single vector, row-major.
    fn to_vector(&self) -> Vec<u64> {
        let mut out = Vec::with_capacity(self.depth() * self.width());
        for row in 0..self.depth() {
            for col in 0..self.width() {
                out.push(self.get(row, col));
            }
        }
        out
    }

    /// Decrement every counter whose value `v` satisfies `lower_excl < v <= upper_incl`.
    ///
    /// `total` is left untouched: lossy decrements forget counts, they do not
    /// retroactively shrink the running total of applied increments.
    fn decrement_all(&mut self, lower_excl: u64, upper_incl: f64) {
        for row in 0..self.depth() {
            for col in 0..self.width() {
                let v = self.get(row, col);
                if v as f64 <= upper_incl && v > lower_excl {
                    // v - 1 is already within range since v was a valid
                    // counter value; this write cannot overflow.
                    self.set(row, col, v - 1)
                        .expect("decrementing a valid counter cannot overflow");
                }
            }
        }
    }
}

/// Unbounded per-counter width, backed by a flat `Vec<u64>`.
pub struct DenseTable {
    width: usize,
    depth: usize,
    cells: Vec<u64>,
    total: u64,
}

impl DenseTable {
    /// Construct a `depth x width` dense table, all counters starting at zero.
    pub fn new(depth: usize, width: usize) -> Self {
        Self {
            width,
            depth,
            cells: vec![0u64; depth * width],
            total: 0,
        }
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }
}

impl SketchTable for DenseTable {
    fn depth(&self) -> usize {
        self.depth
    }

    fn width(&self) -> usize {
        self.width
    }

    fn get(&self, row: usize, col: usize) -> u64 {
        self.cells[self.index(row, col)]
    }

    fn set(&mut self, row: usize, col: usize, value: u64) -> Result<()> {
        let idx = self.index(row, col);
        self.cells[idx] = value;
        Ok(())
    }

    fn increment(&mut self, row: usize, col: usize, value: u64) -> Result<u64> {
        let idx = self.index(row, col);
        self.cells[idx] = self.cells[idx].saturating_add(value);
        self.total = self.total.saturating_add(value);
        Ok(self.cells[idx])
    }

    fn total(&self) -> u64 {
        self.total
    }
}

/// Fixed-width counters (8/16/32/64 bits), overflow-checked rather than
/// silently saturating past the configured width.
pub struct FixedWidthTable {
    width: usize,
    depth: usize,
    bits: u32,
    max_value: u64,
    cells: Vec<u64>,
    total: u64,
}

impl FixedWidthTable {
    /// Construct a table whose counters are capped at `bits` bits wide.
    /// `bits` must be one of 8, 16, 32, 64.
    pub fn new(depth: usize, width: usize, bits: u32) -> Result<Self> {
        validate_counter_bits(bits)?;
        let max_value = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
        Ok(Self {
            width,
            depth,
            bits,
            max_value,
            cells: vec![0u64; depth * width],
            total: 0,
        })
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }
}

impl SketchTable for FixedWidthTable {
    fn depth(&self) -> usize {
        self.depth
    }

    fn width(&self) -> usize {
        self.width
    }

    fn get(&self, row: usize, col: usize) -> u64 {
        self.cells[self.index(row, col)]
    }

    fn set(&mut self, row: usize, col: usize, value: u64) -> Result<()> {
        if value > self.max_value {
            return Err(SketchError::Overflow {
                context: format!(
                    "value {value} exceeds {}-bit counter max {}",
                    self.bits, self.max_value
                ),
            });
        }
        let idx = self.index(row, col);
        self.cells[idx] = value;
        Ok(())
    }

    fn increment(&mut self, row: usize, col: usize, value: u64) -> Result<u64> {
        let idx = self.index(row, col);
        let new_value = self.cells[idx].saturating_add(value);
        if new_value > self.max_value {
            return Err(SketchError::Overflow {
                context: format!(
                    "incrementing counter at ({row}, {col}) by {value} exceeds {}-bit counter max {}",
                    self.bits, self.max_value
                ),
            });
        }
        self.cells[idx] = new_value;
        self.total = self.total.saturating_add(value);
        Ok(new_value)
    }

    fn total(&self) -> u64 {
        self.total
    }
}

impl FixedWidthTable {
    /// The configured counter width in bits.
    pub fn counter_bits(&self) -> u32 {
        self.bits
    }

    /// Largest value a counter in this table can hold.
    pub fn max_value(&self) -> u64 {
        self.max_value
    }
}

/// Generic row-major matrix, parameterized at construction by the same
/// fixed-width counter semantics as [`FixedWidthTable`], but exposing
/// `to_vector` purely as a reshape (no transformation) over its storage.
pub struct MatrixTable {
    inner: FixedWidthTable,
}

impl MatrixTable {
    /// Construct a `depth x width` matrix table with `bits`-wide counters.
    pub fn new(depth: usize, width: usize, bits: u32) -> Result<Self> {
        Ok(Self {
            inner: FixedWidthTable::new(depth, width, bits)?,
        })
    }
}

impl SketchTable for MatrixTable {
    fn depth(&self) -> usize {
        self.inner.depth()
    }

    fn width(&self) -> usize {
        self.inner.width()
    }

    fn get(&self, row: usize, col: usize) -> u64 {
        self.inner.get(row, col)
    }

    fn set(&mut self, row: usize, col: usize, value: u64) -> Result<()> {
        self.inner.set(row, col, value)
    }

    fn increment(&mut self, row: usize, col: usize, value: u64) -> Result<u64> {
        self.inner.increment(row, col, value)
    }

    fn total(&self) -> u64 {
        self.inner.total()
    }
}

/// Counters packed as contiguous bitfields of `counter_bits` width, not
/// byte-aligned — the only back-end that actually saves memory over
/// [`FixedWidthTable`] for narrow counters.
pub struct BitPackedTable {
    width: usize,
    depth: usize,
    counter_bits: u32,
    max_value: u64,
    bits: Vec<u64>, // one u64 word per 64 packed bits
    total: u64,
}

impl BitPackedTable {
    /// Construct a `depth x width` table whose counters are `counter_bits` wide.
    pub fn new(depth: usize, width: usize, counter_bits: u32) -> Result<Self> {
        if counter_bits == 0 || counter_bits > 64 {
            return Err(SketchError::InvalidArgument {
                param: "counter_bits".to_string(),
                value: counter_bits.to_string(),
                constraint: "must be in range [1, 64]".to_string(),
            });
        }
        let total_bits = depth * width * counter_bits as usize;
        let words = total_bits.div_ceil(64);
        let max_value = if counter_bits == 64 {
            u64::MAX
        } else {
            (1u64 << counter_bits) - 1
        };
        Ok(Self {
            width,
            depth,
            counter_bits,
            max_value,
            bits: vec![0u64; words],
            total: 0,
        })
    }

    fn bit_offset(&self, row: usize, col: usize) -> usize {
        (row * self.width + col) * self.counter_bits as usize
    }

    fn read_bits(&self, offset: usize) -> u64 {
        let width = self.counter_bits as usize;
        let mut value = 0u64;
        for i in 0..width {
            let bit_pos = offset + i;
            let word = bit_pos / 64;
            let bit = bit_pos % 64;
            if (self.bits[word] >> bit) & 1 == 1 {
                value |= 1 << i;
            }
        }
        value
    }

    fn write_bits(&mut self, offset: usize, value: u64) {
        let width = self.counter_bits as usize;
        for i in 0..width {
            let bit_pos = offset + i;
            let word = bit_pos / 64;
            let bit = bit_pos % 64;
            let set = (value >> i) & 1 == 1;
            if set {
                self.bits[word] |= 1 << bit;
            } else {
                self.bits[word] &= !(1u64 << bit);
            }
        }
    }
}

impl SketchTable for BitPackedTable {
    fn depth(&self) -> usize {
        self.depth
    }

    fn width(&self) -> usize {
        self.width
    }

    fn get(&self, row: usize, col: usize) -> u64 {
        self.read_bits(self.bit_offset(row, col))
    }

    fn set(&mut self, row: usize, col: usize, value: u64) -> Result<()> {
        if value > self.max_value {
            return Err(SketchError::Overflow {
                context: format!(
                    "value {value} exceeds {}-bit counter max {}",
                    self.counter_bits, self.max_value
                ),
            });
        }
        let offset = self.bit_offset(row, col);
        self.write_bits(offset, value);
        Ok(())
    }

    fn increment(&mut self, row: usize, col: usize, value: u64) -> Result<u64> {
        let offset = self.bit_offset(row, col);
        let current = self.read_bits(offset);
        let new_value = current.saturating_add(value);
        if new_value > self.max_value {
            return Err(SketchError::Overflow {
                context: format!(
                    "incrementing counter at ({row}, {col}) by {value} exceeds {}-bit counter max {}",
                    self.counter_bits, self.max_value
                ),
            });
        }
        self.write_bits(offset, new_value);
        self.total = self.total.saturating_add(value);
        Ok(new_value)
    }

    fn total(&self) -> u64 {
        self.total
    }

    fn decrement_all(&mut self, lower_excl: u64, upper_incl: f64) {
        // Unpack/repack only cells inside the bound; entries outside it are
        // never touched, avoiding a full table unpack on every lossy pass.
        for row in 0..self.depth {
            for col in 0..self.width {
                let offset = self.bit_offset(row, col);
                let v = self.read_bits(offset);
                if v as f64 <= upper_incl && v > lower_excl {
                    self.write_bits(offset, v - 1);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_table_increment_and_total() {
        let mut t = DenseTable::new(3, 8);
        assert_eq!(t.increment(0, 2, 5).unwrap(), 5);
        assert_eq!(t.increment(0, 2, 3).unwrap(), 8);
        assert_eq!(t.get(0, 2), 8);
        assert_eq!(t.total(), 8);
        assert_eq!(t.get(1, 2), 0);
    }

    #[test]
    fn fixed_width_table_rejects_bad_bits() {
        assert!(FixedWidthTable::new(2, 4, 12).is_err());
        assert!(FixedWidthTable::new(2, 4, 8).is_ok());
    }

    #[test]
    fn fixed_width_table_fails_on_overflow() {
        let mut t = FixedWidthTable::new(1, 1, 8).unwrap();
        assert!(t.increment(0, 0, 300).is_err());
        // the rejected write leaves the counter and total untouched
        assert_eq!(t.get(0, 0), 0);
        assert_eq!(t.total(), 0);
        assert!(t.increment(0, 0, 200).is_ok());
        assert!(t.increment(0, 0, 100).is_err());
        assert_eq!(t.get(0, 0), 200);
    }

    #[test]
    fn matrix_table_to_vector_is_row_major() {
        let mut t = MatrixTable::new(2, 3, 16).unwrap();
        t.set(0, 0, 1).unwrap();
        t.set(0, 2, 3).unwrap();
        t.set(1, 1, 9).unwrap();
        assert_eq!(t.to_vector(), vec![1, 0, 3, 0, 9, 0]);
    }

    #[test]
    fn bit_packed_table_roundtrip() {
        let mut t = BitPackedTable::new(2, 10, 5).unwrap();
        for col in 0..10 {
            t.set(0, col, col as u64).unwrap();
            t.set(1, col, 31 - col as u64).unwrap();
        }
        for col in 0..10 {
            assert_eq!(t.get(0, col), col as u64);
            assert_eq!(t.get(1, col), 31 - col as u64);
        }
    }

    #[test]
    fn bit_packed_table_fails_on_overflow() {
        let mut t = BitPackedTable::new(1, 1, 3).unwrap();
        assert!(t.increment(0, 0, 100).is_err());
        assert_eq!(t.get(0, 0), 0);
        assert!(t.set(0, 0, 8).is_err());
        assert!(t.set(0, 0, 7).is_ok());
    }

    #[test]
    fn decrement_all_respects_bounds_and_leaves_total() {
        let mut t = DenseTable::new(1, 3);
        t.increment(0, 0, 1).unwrap();
        t.increment(0, 1, 5).unwrap();
        t.increment(0, 2, 10).unwrap();
        t.decrement_all(0, 5.0);
        assert_eq!(t.get(0, 0), 0);
        assert_eq!(t.get(0, 1), 4);
        assert_eq!(t.get(0, 2), 10);
        assert_eq!(t.total(), 16);
    }

    #[test]
    fn bit_packed_decrement_all_matches_dense_semantics() {
        let mut t = BitPackedTable::new(1, 3, 8).unwrap();
        t.increment(0, 0, 1).unwrap();
        t.increment(0, 1, 5).unwrap();
        t.increment(0, 2, 10).unwrap();
        t.decrement_all(0, 5.0);
        assert_eq!(t.get(0, 0), 0);
        assert_eq!(t.get(0, 1), 4);
        assert_eq!(t.get(0, 2), 10);
    }
}
