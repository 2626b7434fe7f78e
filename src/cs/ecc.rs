//! Error correction code implementations.
//!
//! This module provides a Hamming(8,4) systematic code built on the GF(2) matrix engine in
//! [`crate::math::gf2`], together with the byte-stream framing that turns it into a whole-file
//! codec:
//!
//! - [`hamming`]: the codec itself, one nibble in, one codeword out
//! - [`stream`]: nibble framing over slices and `Read`/`Write` streams, with decode statistics
//!
//! # Examples
//!
//! ```rust
//! use hamming84::ecc::{hamming_8_4, ErrorCorrection};
//!
//! let codec = hamming_8_4().unwrap();
//! let mut encoded = ErrorCorrection::encode(codec, b"hello").unwrap();
//! encoded[3] ^= 0x10;
//! assert_eq!(ErrorCorrection::decode(codec, &encoded).unwrap(), b"hello");
//! ```

pub use crate::error::Result;

/// Trait for error correction code implementations
pub trait ErrorCorrection {
    /// Encode data with error correction symbols
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decode data and correct errors if possible
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Hamming(8,4) codec
pub mod hamming;
pub use hamming::{
    hamming_8_4, hamming_decode, hamming_encode, Decoded, HammingCodec, Status,
};

pub mod stream;
pub use stream::{decode_bytes, decode_stream, encode_bytes, encode_stream, DecodeStats};

impl ErrorCorrection for HammingCodec {
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        encode_bytes(self, data)
    }

    /// Uncorrectable codewords are passed through; use [`decode_bytes`] to see the counts
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        decode_bytes(self, data).map(|(decoded, _)| decoded)
    }
}
