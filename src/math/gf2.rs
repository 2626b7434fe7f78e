//! Linear algebra over GF(2).
//!
//! GF(2) is the two-element field {0, 1} where addition is XOR and multiplication is AND.
//! This module provides the two structures the Hamming codec is built on:
//!
//! - [`BitVector`]: a fixed-length, packed sequence of individually addressable bits
//! - [`BitMatrix`]: a row-major matrix over a single `BitVector`, with byte conversion
//!   and multiplication modulo 2
//!
//! # Examples
//!
//! ```
//! use hamming84::math::gf2::BitMatrix;
//!
//! // [1 0 1] x I3 = [1 0 1]
//! let row = BitMatrix::from_byte(0b101, 3).unwrap();
//! let identity = BitMatrix::identity(3).unwrap();
//! let product = row.multiply(&identity).unwrap();
//! assert_eq!(product.to_byte(), 0b101);
//! ```

pub mod bit_matrix;
pub mod bit_vector;

pub use bit_matrix::BitMatrix;
pub use bit_vector::BitVector;
