//! Fixed-length packed bit storage.

use crate::error::{Error, Result};
use bitvec::prelude::*;
use std::fmt::{Display, Formatter};

/// A fixed-length sequence of bits packed into `ceil(len / 8)` bytes.
///
/// The length is chosen at creation and never changes. Every accessor checks the index
/// and fails with [`Error::IndexOutOfBounds`] rather than touching memory past the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitVector {
    bits: BitVec<u8, Lsb0>,
}

impl BitVector {
    /// Creates a vector of `length` bits, all cleared.
    ///
    /// # Arguments
    ///
    /// * `length` - Number of addressable bits
    ///
    /// # Returns
    ///
    /// The new vector, or [`Error::AllocationFailed`] if the backing bytes could not be reserved
    pub fn new(length: usize) -> Result<Self> {
        let bytes = length.div_ceil(8);
        let mut raw: Vec<u8> = Vec::new();
        raw.try_reserve_exact(bytes)
            .map_err(|_| Error::AllocationFailed { bits: length })?;
        raw.resize(bytes, 0);

        let mut bits = BitVec::from_vec(raw);
        bits.truncate(length);

        Ok(BitVector { bits })
    }

    /// Number of addressable bits
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns the bit at `index`
    pub fn get(&self, index: usize) -> Result<bool> {
        self.check(index)?;
        Ok(self.bits[index])
    }

    /// Forces the bit at `index` to 1
    pub fn set(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        self.bits.set(index, true);
        Ok(())
    }

    /// Forces the bit at `index` to 0
    pub fn clear(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        self.bits.set(index, false);
        Ok(())
    }

    /// Inverts the bit at `index`
    pub fn toggle(&mut self, index: usize) -> Result<()> {
        self.xor_assign(index, true)
    }

    /// Replaces the bit at `index` with `current ^ bit`.
    ///
    /// This is addition in GF(2), used to accumulate the terms of a matrix product.
    pub fn xor_assign(&mut self, index: usize, bit: bool) -> Result<()> {
        self.check(index)?;
        let current = self.bits[index];
        self.bits.set(index, current ^ bit);
        Ok(())
    }

    /// Read-only view of the packed bits
    pub(crate) fn as_bitslice(&self) -> &BitSlice<u8, Lsb0> {
        &self.bits
    }

    /// Number of bits set to 1
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    fn check(&self, index: usize) -> Result<()> {
        if index >= self.bits.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                length: self.bits.len(),
            });
        }
        Ok(())
    }
}

impl Display for BitVector {
    /// Renders the bits as '0'/'1' characters, index 0 first
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for bit in self.bits.iter() {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
