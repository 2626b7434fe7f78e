//! Hamming(8,4) systematic error correction code.
//!
//! Hamming codes are a family of linear error-correcting codes developed by Richard Hamming in 1950.
//! This module implements the extended (8,4) variant in systematic form: a 4-bit message `m` is
//! encoded as the row vector `m * G`, where the generator `G = [I4 | P]` copies the message into
//! codeword bits 0..4 and appends four parity bits. `P` has a 1 everywhere except its main
//! diagonal, so parity bit `j` is the XOR of the three message bits other than `j`.
//!
//! Decoding multiplies the received codeword by `Ht = [P ; I4]`, the transpose of the
//! parity-check matrix. The product is a 4-bit syndrome that is zero for every valid codeword.
//! A single flipped bit produces the syndrome equal to the corresponding row of `Ht`, and a
//! lookup table maps it back to the bit position to repair.
//!
//! Every row of `Ht` has odd weight, so any two flipped bits produce a non-zero even-weight
//! syndrome, which the table marks as uncorrectable. Three or more flipped bits can alias a
//! single-bit syndrome and are "corrected" to the wrong message; that is inherent to a code
//! with minimum distance 4.
//!
//! # Applications
//!
//! - Computer memory (ECC RAM)
//! - Teletext and other broadcast side channels
//! - Protecting small fixed-size fields in storage formats

use crate::error::Result;
use crate::math::gf2::BitMatrix;
use log::{debug, trace};
use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

/// Message bits per codeword
pub const MESSAGE_BITS: usize = 4;
/// Bits per codeword
pub const CODEWORD_BITS: usize = 8;

/// Maps a syndrome to the codeword bit that produced it, or `None` when no single-bit
/// error explains it. Index 0 is never consulted.
const SYNDROME_TABLE: [Option<usize>; 16] = [
    Some(0),
    Some(4),
    Some(5),
    None,
    Some(6),
    None,
    None,
    Some(3),
    Some(7),
    None,
    None,
    Some(2),
    None,
    Some(1),
    Some(0),
    None,
];

/// Outcome of decoding a single codeword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The syndrome was zero; the codeword was accepted as received
    Ok,
    /// A single-bit error was found and repaired
    Corrected,
    /// The syndrome does not correspond to any single-bit error
    Uncorrectable,
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Ok => write!(f, "ok"),
            Status::Corrected => write!(f, "corrected"),
            Status::Uncorrectable => write!(f, "uncorrectable"),
        }
    }
}

/// Result of [`HammingCodec::decode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// Recovered 4-bit message; `None` when the codeword was uncorrectable
    pub message: Option<u8>,
    pub status: Status,
    /// Syndrome computed from the received codeword
    pub syndrome: u8,
    /// Codeword bit that was flipped during correction
    pub flipped: Option<usize>,
}

/// Hamming(8,4) encoder/decoder holding the generator and parity-check transpose.
///
/// Both matrices are built once and never mutated, so one codec can be shared freely
/// between threads. Use [`hamming_8_4`] for the process-wide instance.
#[derive(Debug, Clone)]
pub struct HammingCodec {
    /// Generator matrix G (4x8)
    generator: BitMatrix,
    /// Transposed parity-check matrix Ht (8x4)
    parity_check: BitMatrix,
}

impl HammingCodec {
    /// Builds the generator and parity-check transpose.
    ///
    /// # Returns
    ///
    /// A new codec, or an allocation error if the matrices could not be stored
    pub fn new() -> Result<Self> {
        let mut generator = BitMatrix::new(MESSAGE_BITS, CODEWORD_BITS)?;
        for i in 0..MESSAGE_BITS {
            for j in 0..MESSAGE_BITS {
                if i == j {
                    generator.set_bit(i, j)?;
                } else {
                    generator.set_bit(i, MESSAGE_BITS + j)?;
                }
            }
        }

        let mut parity_check = BitMatrix::new(CODEWORD_BITS, MESSAGE_BITS)?;
        for i in 0..MESSAGE_BITS {
            for j in 0..MESSAGE_BITS {
                if i == j {
                    parity_check.set_bit(MESSAGE_BITS + i, j)?;
                } else {
                    parity_check.set_bit(i, j)?;
                }
            }
        }

        debug!("built Hamming(8,4) generator and parity-check matrices");

        Ok(HammingCodec {
            generator,
            parity_check,
        })
    }

    /// Generator matrix G = [I4 | P]
    pub fn generator(&self) -> &BitMatrix {
        &self.generator
    }

    /// Parity-check transpose Ht = [P ; I4]
    pub fn parity_check(&self) -> &BitMatrix {
        &self.parity_check
    }

    /// Encodes the low nibble of `message` into an 8-bit codeword.
    ///
    /// The upper four bits of `message` are ignored. Codeword bits 0..4 hold the message
    /// and bits 4..8 the parity.
    ///
    /// # Arguments
    ///
    /// * `message` - Byte whose low 4 bits are encoded
    ///
    /// # Returns
    ///
    /// The codeword
    pub fn encode(&self, message: u8) -> Result<u8> {
        let row = BitMatrix::from_byte(message & 0x0F, MESSAGE_BITS)?;
        let codeword = row.multiply(&self.generator)?.to_byte();
        trace!("encoded {:#06b} as {:#010b}", message & 0x0F, codeword);
        Ok(codeword)
    }

    /// Computes the 4-bit syndrome of a received codeword
    pub fn syndrome(&self, codeword: u8) -> Result<u8> {
        let row = BitMatrix::from_byte(codeword, CODEWORD_BITS)?;
        Ok(row.multiply(&self.parity_check)?.to_byte())
    }

    /// Decodes a codeword, repairing a single-bit error when possible.
    ///
    /// # Arguments
    ///
    /// * `codeword` - Received 8-bit codeword
    ///
    /// # Returns
    ///
    /// The recovered message together with the decode [`Status`]. Matrix failures are
    /// returned as errors and never folded into the status.
    pub fn decode(&self, codeword: u8) -> Result<Decoded> {
        let mut received = BitMatrix::from_byte(codeword, CODEWORD_BITS)?;
        let syndrome = received.multiply(&self.parity_check)?.to_byte();

        if syndrome == 0 {
            return Ok(Decoded {
                message: Some(received.to_byte() & 0x0F),
                status: Status::Ok,
                syndrome,
                flipped: None,
            });
        }

        match SYNDROME_TABLE[usize::from(syndrome)] {
            Some(position) => {
                received.toggle_bit(0, position)?;
                let message = received.to_byte() & 0x0F;
                debug!(
                    "corrected bit {} of {:#010b} (syndrome {:#06b})",
                    position, codeword, syndrome
                );
                Ok(Decoded {
                    message: Some(message),
                    status: Status::Corrected,
                    syndrome,
                    flipped: Some(position),
                })
            }
            None => {
                debug!(
                    "uncorrectable codeword {:#010b} (syndrome {:#06b})",
                    codeword, syndrome
                );
                Ok(Decoded {
                    message: None,
                    status: Status::Uncorrectable,
                    syndrome,
                    flipped: None,
                })
            }
        }
    }
}

impl Display for HammingCodec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Hamming(8,4) generator:")?;
        write!(f, "{}", self.generator)?;
        writeln!(f, "parity-check transpose:")?;
        write!(f, "{}", self.parity_check)
    }
}

static CODEC: OnceLock<HammingCodec> = OnceLock::new();

/// Returns the process-wide Hamming(8,4) codec, building it on first use
pub fn hamming_8_4() -> Result<&'static HammingCodec> {
    if let Some(codec) = CODEC.get() {
        return Ok(codec);
    }
    let codec = HammingCodec::new()?;
    Ok(CODEC.get_or_init(|| codec))
}

/// Encodes a nibble with the shared codec
pub fn hamming_encode(message: u8) -> Result<u8> {
    hamming_8_4()?.encode(message)
}

/// Decodes a codeword with the shared codec
pub fn hamming_decode(codeword: u8) -> Result<Decoded> {
    hamming_8_4()?.decode(codeword)
}
