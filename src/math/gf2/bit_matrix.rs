//! Bit matrices over GF(2).
//!
//! A [`BitMatrix`] stores its cells in one [`BitVector`] using row-major flattening:
//! cell `(r, c)` lives at bit `r * cols + c`. Every accessor, the byte conversions and
//! the product all go through that mapping.
//!
//! Matrices are always taken by reference, so there is no "absent matrix" case to
//! tolerate; shape and index violations are reported as errors instead of being
//! silently turned into zeros.

use crate::error::{Error, Result};
use crate::math::gf2::BitVector;
use bitvec::field::BitField;
use log::trace;
use std::fmt::{Display, Formatter};

/// Widest row that fits into a single byte
const BYTE_BITS: usize = 8;

/// A `rows x cols` matrix of bits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    rows: usize,
    cols: usize,
    /// Cells in row-major order
    vector: BitVector,
}

impl BitMatrix {
    /// Creates a zero matrix with the given shape.
    ///
    /// # Arguments
    ///
    /// * `rows` - Number of rows
    /// * `cols` - Number of columns
    ///
    /// # Returns
    ///
    /// The new matrix, or [`Error::AllocationFailed`] if `rows * cols` bits cannot be stored
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let bits = rows
            .checked_mul(cols)
            .ok_or(Error::AllocationFailed { bits: usize::MAX })?;
        let vector = BitVector::new(bits)?;

        Ok(BitMatrix { rows, cols, vector })
    }

    /// Creates the `n x n` identity matrix
    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::new(n, n)?;
        for i in 0..n {
            m.set_bit(i, i)?;
        }
        Ok(m)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// A matrix with a zero dimension holds no cells and cannot take part in a product
    pub fn is_degenerate(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn set_bit(&mut self, row: usize, col: usize) -> Result<()> {
        let index = self.index(row, col)?;
        self.vector.set(index)
    }

    pub fn clear_bit(&mut self, row: usize, col: usize) -> Result<()> {
        let index = self.index(row, col)?;
        self.vector.clear(index)
    }

    /// Flips the cell at `(row, col)`
    pub fn toggle_bit(&mut self, row: usize, col: usize) -> Result<()> {
        let index = self.index(row, col)?;
        self.vector.toggle(index)
    }

    pub fn get_bit(&self, row: usize, col: usize) -> Result<bool> {
        let index = self.index(row, col)?;
        self.vector.get(index)
    }

    /// Builds a `1 x length` row matrix from the low `length` bits of `byte`.
    ///
    /// Bit `i` of the byte becomes column `i`, so `from_byte(0b1100, 4)` is `[0 0 1 1]`.
    ///
    /// # Arguments
    ///
    /// * `byte` - Source bits
    /// * `length` - Number of columns, at most 8
    ///
    /// # Returns
    ///
    /// The row matrix, or [`Error::InvalidLength`] if `length > 8`. Nothing is allocated
    /// in the error case.
    pub fn from_byte(byte: u8, length: usize) -> Result<Self> {
        if length > BYTE_BITS {
            return Err(Error::InvalidLength {
                length,
                max_length: BYTE_BITS,
            });
        }

        let mut m = Self::new(1, length)?;
        for col in 0..length {
            if byte & (1 << col) != 0 {
                m.set_bit(0, col)?;
            }
        }
        Ok(m)
    }

    /// Packs row 0 back into a byte, column `i` becoming bit `i`.
    ///
    /// Columns past the eighth are ignored. A matrix without rows packs to 0.
    pub fn to_byte(&self) -> u8 {
        let width = self.cols.min(BYTE_BITS);
        if self.rows == 0 || width == 0 {
            return 0;
        }

        // Row 0 occupies the first `cols` bits of the vector
        self.vector.as_bitslice()[..width].load_le::<u8>()
    }

    /// Computes `self * rhs` over GF(2).
    ///
    /// Cell `(i, j)` of the product is the XOR over `k` of `self[i, k] AND rhs[k, j]`,
    /// i.e. the parity of the positions where row `i` and column `j` are both set.
    ///
    /// # Arguments
    ///
    /// * `rhs` - Right operand, which must have as many rows as `self` has columns
    ///
    /// # Returns
    ///
    /// A `self.rows() x rhs.cols()` matrix, [`Error::DimensionMismatch`] when the shared
    /// dimension disagrees, or [`Error::DegenerateMatrix`] when either operand has a zero
    /// dimension.
    pub fn multiply(&self, rhs: &BitMatrix) -> Result<BitMatrix> {
        if self.cols != rhs.rows {
            return Err(Error::DimensionMismatch {
                left_cols: self.cols,
                right_rows: rhs.rows,
            });
        }
        for operand in [self, rhs] {
            if operand.is_degenerate() {
                return Err(Error::DegenerateMatrix {
                    rows: operand.rows,
                    cols: operand.cols,
                });
            }
        }

        trace!(
            "multiplying {}x{} by {}x{}",
            self.rows,
            self.cols,
            rhs.rows,
            rhs.cols
        );

        let mut product = BitMatrix::new(self.rows, rhs.cols)?;
        let shared = self.cols;
        for cell in 0..product.vector.len() {
            let (i, j) = (cell / rhs.cols, cell % rhs.cols);
            for k in 0..shared {
                let term = self.get_bit(i, k)? & rhs.get_bit(k, j)?;
                product.vector.xor_assign(cell, term)?;
            }
        }

        Ok(product)
    }

    /// Writes the matrix to stdout, one row per line
    pub fn print(&self) {
        print!("{}", self);
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::CellOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }
}

impl Display for BitMatrix {
    /// Each row as space-separated '0'/'1' characters followed by a newline
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let bit = self.get_bit(row, col).map_err(|_| std::fmt::Error)?;
                if col > 0 {
                    f.write_str(" ")?;
                }
                f.write_str(if bit { "1" } else { "0" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_rows(rows: &[&[u8]]) -> BitMatrix {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut m = BitMatrix::new(rows.len(), cols).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, &bit) in row.iter().enumerate() {
                if bit == 1 {
                    m.set_bit(r, c).unwrap();
                }
            }
        }
        m
    }

    #[test]
    fn test_row_major_layout() {
        let mut m = BitMatrix::new(2, 3).unwrap();
        m.set_bit(1, 0).unwrap();
        assert_eq!(m.shape(), (2, 3));
        // (1, 0) is bit 3 of the backing vector
        assert!(m.vector.get(3).unwrap());
        assert_eq!(m.vector.count_ones(), 1);

        m.toggle_bit(1, 0).unwrap();
        m.toggle_bit(0, 2).unwrap();
        assert!(!m.get_bit(1, 0).unwrap());
        assert!(m.get_bit(0, 2).unwrap());
        m.clear_bit(0, 2).unwrap();
        assert!(!m.get_bit(0, 2).unwrap());
    }

    #[test]
    fn test_cell_bounds_are_checked() {
        let mut m = BitMatrix::new(2, 3).unwrap();
        // (0, 3) would alias (1, 0) without the column check
        assert!(matches!(
            m.set_bit(0, 3),
            Err(Error::CellOutOfBounds {
                row: 0,
                col: 3,
                rows: 2,
                cols: 3
            })
        ));
        assert!(matches!(
            m.get_bit(0, 3),
            Err(Error::CellOutOfBounds { row: 0, col: 3, .. })
        ));
        assert!(matches!(
            m.toggle_bit(2, 0),
            Err(Error::CellOutOfBounds { row: 2, col: 0, .. })
        ));
        assert!(matches!(
            m.clear_bit(5, 5),
            Err(Error::CellOutOfBounds { .. })
        ));
        assert!(!m.get_bit(1, 0).unwrap());
        assert_eq!(m.vector.count_ones(), 0);
    }

    #[test]
    fn test_from_byte_and_to_byte() {
        let m = BitMatrix::from_byte(0b1100, 4).unwrap();
        assert_eq!(m.shape(), (1, 4));
        assert_eq!(m.to_string(), "0 0 1 1\n");
        assert_eq!(m.to_byte(), 12);

        for length in 1..=8usize {
            let mask = ((1u16 << length) - 1) as u8;
            for byte in 0..=255u8 {
                let m = BitMatrix::from_byte(byte, length).unwrap();
                assert_eq!(m.to_byte(), byte & mask);
            }
        }
    }

    #[test]
    fn test_from_byte_rejects_wide_rows() {
        assert!(matches!(
            BitMatrix::from_byte(0xFF, 9),
            Err(Error::InvalidLength {
                length: 9,
                max_length: 8
            })
        ));
    }

    #[test]
    fn test_to_byte_ignores_extra_columns_and_rows() {
        let mut m = BitMatrix::new(2, 10).unwrap();
        m.set_bit(0, 0).unwrap();
        m.set_bit(0, 9).unwrap();
        m.set_bit(1, 1).unwrap();
        assert_eq!(m.to_byte(), 1);

        assert_eq!(BitMatrix::new(0, 4).unwrap().to_byte(), 0);
        assert_eq!(BitMatrix::new(1, 0).unwrap().to_byte(), 0);

        let mut wide = BitMatrix::new(1, 12).unwrap();
        for col in [1, 7, 8, 11] {
            wide.set_bit(0, col).unwrap();
        }
        assert_eq!(wide.to_byte(), 0b1000_0010);
    }

    #[test]
    fn test_multiply_small() {
        let a = from_rows(&[&[1, 0, 1], &[0, 1, 1]]);
        let b = from_rows(&[&[1, 1], &[0, 1], &[1, 0]]);
        let c = a.multiply(&b).unwrap();

        // Over the integers this is [[2, 1], [1, 1]]; reduced mod 2
        assert_eq!(c, from_rows(&[&[0, 1], &[1, 1]]));
    }

    #[test]
    fn test_multiply_by_identity() {
        let a = from_rows(&[&[1, 1, 0, 1], &[0, 1, 1, 1], &[1, 0, 0, 0]]);
        let i = BitMatrix::identity(4).unwrap();
        assert_eq!(a.multiply(&i).unwrap(), a);
    }

    #[test]
    fn test_multiply_dimension_law() {
        for (m, n, p, q) in [(1, 4, 4, 8), (1, 8, 8, 4), (3, 2, 5, 2), (2, 2, 3, 3)] {
            let a = BitMatrix::new(m, n).unwrap();
            let b = BitMatrix::new(p, q).unwrap();
            match a.multiply(&b) {
                Ok(c) => {
                    assert_eq!(n, p);
                    assert_eq!(c.shape(), (m, q));
                }
                Err(Error::DimensionMismatch {
                    left_cols,
                    right_rows,
                }) => {
                    assert_ne!(n, p);
                    assert_eq!((left_cols, right_rows), (n, p));
                }
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
    }

    #[test]
    fn test_multiply_rejects_degenerate() {
        let a = BitMatrix::new(0, 3).unwrap();
        let b = BitMatrix::new(3, 2).unwrap();
        assert!(matches!(
            a.multiply(&b),
            Err(Error::DegenerateMatrix { rows: 0, cols: 3 })
        ));
    }

    #[test]
    fn test_display() {
        let m = from_rows(&[&[1, 0], &[0, 1]]);
        assert_eq!(m.to_string(), "1 0\n0 1\n");
    }
}
