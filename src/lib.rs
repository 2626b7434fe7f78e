pub mod cs;
pub mod error;
pub mod math;

pub use cs::ecc;
pub use cs::ecc::hamming::{hamming_8_4, Decoded, HammingCodec, Status};
pub use error::{Error, Result};
pub use math::gf2::{BitMatrix, BitVector};
