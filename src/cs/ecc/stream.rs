//! Byte-stream framing for the Hamming(8,4) codec.
//!
//! Each input byte is split into its low and high nibble and each nibble is encoded on its
//! own, so one byte becomes two codewords written low first. Decoding consumes codewords in
//! `(low, high)` pairs and packs the two recovered nibbles back into a byte.
//!
//! A codeword stream with an odd number of bytes is malformed and rejected with
//! [`Error::TruncatedStream`]. When a codeword is uncorrectable its data nibble is emitted
//! exactly as received (the code is systematic) and the event is counted in [`DecodeStats`].

use crate::cs::ecc::hamming::{Decoded, HammingCodec, Status};
use crate::error::{Error, Result};
use log::debug;
use std::fmt::{Display, Formatter};
use std::io::{BufWriter, ErrorKind, Read, Write};

const BUFFER_SIZE: usize = 64 << 10;

/// Extracts the lower 4 bits of a byte
pub fn lower_nibble(value: u8) -> u8 {
    value & 0x0F
}

/// Extracts the upper 4 bits of a byte
pub fn upper_nibble(value: u8) -> u8 {
    value >> 4
}

/// Packs two nibbles into a byte
pub fn pack_byte(upper: u8, lower: u8) -> u8 {
    (upper << 4) | (lower & 0x0F)
}

/// Counters collected while decoding a codeword stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Codeword bytes consumed
    pub bytes_processed: u64,
    pub ok: u64,
    pub corrected: u64,
    pub uncorrectable: u64,
}

impl DecodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one decoded codeword
    pub fn record(&mut self, status: Status) {
        self.bytes_processed += 1;
        match status {
            Status::Ok => self.ok += 1,
            Status::Corrected => self.corrected += 1,
            Status::Uncorrectable => self.uncorrectable += 1,
        }
    }

    /// Fraction of processed codewords that could not be corrected
    pub fn error_rate(&self) -> f64 {
        if self.bytes_processed == 0 {
            return 0.0;
        }
        self.uncorrectable as f64 / self.bytes_processed as f64
    }

    /// Adds the counters of `other` to `self`
    pub fn merge(&mut self, other: &DecodeStats) {
        self.bytes_processed += other.bytes_processed;
        self.ok += other.ok;
        self.corrected += other.corrected;
        self.uncorrectable += other.uncorrectable;
    }
}

impl Display for DecodeStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total bytes processed: {}", self.bytes_processed)?;
        writeln!(f, "Uncorrected errors: {}", self.uncorrectable)?;
        writeln!(f, "Corrected errors: {}", self.corrected)?;
        writeln!(f, "Error rate: {:.6}", self.error_rate())
    }
}

/// Encodes one byte into its `[low, high]` codeword pair
pub fn encode_byte(codec: &HammingCodec, byte: u8) -> Result<[u8; 2]> {
    Ok([
        codec.encode(lower_nibble(byte))?,
        codec.encode(upper_nibble(byte))?,
    ])
}

/// Decodes a `(low, high)` codeword pair back into one byte, recording both outcomes
pub fn decode_pair(
    codec: &HammingCodec,
    low: u8,
    high: u8,
    stats: &mut DecodeStats,
) -> Result<u8> {
    let lower = recover_nibble(codec.decode(low)?, low, stats);
    let upper = recover_nibble(codec.decode(high)?, high, stats);
    Ok(pack_byte(upper, lower))
}

fn recover_nibble(decoded: Decoded, codeword: u8, stats: &mut DecodeStats) -> u8 {
    stats.record(decoded.status);
    decoded.message.unwrap_or(lower_nibble(codeword))
}

/// Encodes a byte slice into twice as many codewords
pub fn encode_bytes(codec: &HammingCodec, data: &[u8]) -> Result<Vec<u8>> {
    let mut encoded = Vec::with_capacity(data.len() * 2);
    for &byte in data {
        encoded.extend_from_slice(&encode_byte(codec, byte)?);
    }
    Ok(encoded)
}

/// Decodes a codeword slice.
///
/// # Arguments
///
/// * `codec` - Codec to decode with
/// * `encoded` - Codeword pairs as produced by [`encode_bytes`]
///
/// # Returns
///
/// The recovered bytes and the decode statistics, or [`Error::TruncatedStream`] when
/// `encoded` has an odd length
pub fn decode_bytes(codec: &HammingCodec, encoded: &[u8]) -> Result<(Vec<u8>, DecodeStats)> {
    if encoded.len() % 2 != 0 {
        return Err(Error::TruncatedStream {
            length: encoded.len() as u64,
        });
    }

    let mut stats = DecodeStats::new();
    let mut decoded = Vec::with_capacity(encoded.len() / 2);
    for pair in encoded.chunks_exact(2) {
        decoded.push(decode_pair(codec, pair[0], pair[1], &mut stats)?);
    }
    Ok((decoded, stats))
}

/// Encodes everything `reader` yields into `writer`.
///
/// # Returns
///
/// The number of input bytes consumed
pub fn encode_stream<R: Read, W: Write>(
    codec: &HammingCodec,
    mut reader: R,
    writer: W,
) -> Result<u64> {
    let mut writer = BufWriter::with_capacity(BUFFER_SIZE, writer);
    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        writer.write_all(&encode_bytes(codec, &buffer[..read])?)?;
        total += read as u64;
    }

    writer.flush()?;
    debug!("encoded {} bytes into {} codewords", total, total * 2);
    Ok(total)
}

/// Decodes every codeword pair `reader` yields into `writer`.
///
/// Complete pairs are written and flushed before a trailing unpaired codeword is reported
/// as [`Error::TruncatedStream`].
pub fn decode_stream<R: Read, W: Write>(
    codec: &HammingCodec,
    mut reader: R,
    writer: W,
) -> Result<DecodeStats> {
    let mut writer = BufWriter::with_capacity(BUFFER_SIZE, writer);
    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut stats = DecodeStats::new();
    let mut pending: Option<u8> = None;

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        let mut out = Vec::with_capacity(read / 2 + 1);
        for &codeword in &buffer[..read] {
            match pending.take() {
                Some(low) => out.push(decode_pair(codec, low, codeword, &mut stats)?),
                None => pending = Some(codeword),
            }
        }
        writer.write_all(&out)?;
    }

    writer.flush()?;

    if pending.is_some() {
        return Err(Error::TruncatedStream {
            length: stats.bytes_processed + 1,
        });
    }

    debug!(
        "decoded {} codewords: {} ok, {} corrected, {} uncorrectable",
        stats.bytes_processed, stats.ok, stats.corrected, stats.uncorrectable
    );
    Ok(stats)
}

/// Parallel counterpart of [`encode_bytes`]
#[cfg(feature = "parallel")]
pub fn par_encode_bytes(codec: &HammingCodec, data: &[u8]) -> Result<Vec<u8>> {
    use rayon::prelude::*;

    let pairs = data
        .par_iter()
        .map(|&byte| encode_byte(codec, byte))
        .collect::<Result<Vec<[u8; 2]>>>()?;
    Ok(pairs.into_iter().flatten().collect())
}

/// Parallel counterpart of [`decode_bytes`]
#[cfg(feature = "parallel")]
pub fn par_decode_bytes(codec: &HammingCodec, encoded: &[u8]) -> Result<(Vec<u8>, DecodeStats)> {
    use rayon::prelude::*;

    if encoded.len() % 2 != 0 {
        return Err(Error::TruncatedStream {
            length: encoded.len() as u64,
        });
    }

    let decoded = encoded
        .par_chunks_exact(2)
        .map(|pair| {
            let mut stats = DecodeStats::new();
            decode_pair(codec, pair[0], pair[1], &mut stats).map(|byte| (byte, stats))
        })
        .collect::<Result<Vec<(u8, DecodeStats)>>>()?;

    let mut stats = DecodeStats::new();
    let mut bytes = Vec::with_capacity(decoded.len());
    for (byte, pair_stats) in decoded {
        stats.merge(&pair_stats);
        bytes.push(byte);
    }
    Ok((bytes, stats))
}
