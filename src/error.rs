//! Error types shared by the GF(2) matrix engine and the Hamming codec.

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while building matrices, multiplying them or framing codeword streams.
///
/// A decode that cannot repair a codeword is not an error; it is reported through
/// [`crate::cs::ecc::hamming::Status::Uncorrectable`].
#[derive(Debug, Error)]
pub enum Error {
    /// Storage for a bit vector could not be obtained
    #[error("failed to allocate storage for {bits} bits")]
    AllocationFailed { bits: usize },

    /// `A * B` was requested with `A.cols != B.rows`
    #[error("cannot multiply: left operand has {left_cols} columns but right operand has {right_rows} rows")]
    DimensionMismatch { left_cols: usize, right_rows: usize },

    /// A matrix with a zero dimension was used as a multiplication operand
    #[error("degenerate {rows}x{cols} matrix cannot be multiplied")]
    DegenerateMatrix { rows: usize, cols: usize },

    /// A byte conversion asked for more bits than a byte holds
    #[error("length {length} exceeds the maximum of {max_length} bits")]
    InvalidLength { length: usize, max_length: usize },

    /// A bit index fell outside the vector
    #[error("bit index {index} is out of bounds for length {length}")]
    IndexOutOfBounds { index: usize, length: usize },

    /// A matrix cell fell outside the matrix shape
    #[error("cell ({row}, {col}) is outside a {rows}x{cols} matrix")]
    CellOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// A codeword stream ended in the middle of a pair
    #[error("codeword stream of {length} bytes is not a whole number of pairs")]
    TruncatedStream { length: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
