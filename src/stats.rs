//! Index-wide impact statistics record — the parameters the evaluator
//! needs to reproduce the impact normalisation applied at build time.
//!
//! On disk this is a fixed-width, CRC32-checked record: decode the fields,
//! then recompute the checksum over them and compare against the stored
//! value.

use std::io;

use crc32fast::Hasher as Crc32;
use thiserror::Error;

use crate::encoding::{Decode, Encode, EncodingError};

/// Current on-disk version of [`IndexImpactStats`].
pub const STATS_VERSION: u32 = 1;

/// Errors produced loading or validating an [`IndexImpactStats`] record.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Encoding/decoding error.
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// The record's stored CRC32 did not match the recomputed checksum.
    #[error("index impact statistics checksum mismatch")]
    ChecksumMismatch,

    /// The record's version tag is not one this crate understands.
    #[error("unsupported index impact statistics version {0}")]
    UnsupportedVersion(u32),
}

/// Index-wide parameters for pivoted impact normalisation and
/// quantisation, computed once at build time and loaded with the index.
///
/// This crate declares and sticks to little-endian, matching
/// [`crate::encoding`]'s existing convention; cross-endian byte-swap is
/// not implemented (see `DESIGN.md`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexImpactStats {
    /// Minimum query-side weight observed at build time.
    pub w_qt_min: f64,
    /// Maximum query-side weight observed at build time.
    pub w_qt_max: f64,
    /// Slope parameter of the pivoted normalisation.
    pub slope: f64,
    /// Average `f_t` across the collection's vocabulary.
    pub avg_f_t: f64,
    /// Number of bits document-side impacts were quantised into.
    pub quant_bits: u32,
    /// On-disk format version.
    pub version: u32,
    /// Reserved for future use; always written as `0`.
    pub reserved: u32,
}

impl IndexImpactStats {
    /// Byte length of the encoded record, including its trailing CRC32.
    pub const ENCODED_LEN: usize = 8 * 4 + 4 * 3 + 4;

    /// Serializes this record, appending a CRC32 of the preceding bytes.
    pub fn write_to(&self, buf: &mut Vec<u8>) -> Result<(), EncodingError> {
        let start = buf.len();
        self.w_qt_min.encode_to(buf)?;
        self.w_qt_max.encode_to(buf)?;
        self.slope.encode_to(buf)?;
        self.avg_f_t.encode_to(buf)?;
        self.quant_bits.encode_to(buf)?;
        self.version.encode_to(buf)?;
        self.reserved.encode_to(buf)?;

        let mut hasher = Crc32::new();
        hasher.update(&buf[start..]);
        hasher.finalize().encode_to(buf)?;
        Ok(())
    }

    /// Decodes and CRC32-validates a record from the start of `buf`.
    ///
    /// Returns `(record, bytes_consumed)`.
    pub fn read_from(buf: &[u8]) -> Result<(Self, usize), StatsError> {
        let (w_qt_min, n) = f64::decode_from(buf)?;
        let mut off = n;
        let (w_qt_max, n) = f64::decode_from(&buf[off..])?;
        off += n;
        let (slope, n) = f64::decode_from(&buf[off..])?;
        off += n;
        let (avg_f_t, n) = f64::decode_from(&buf[off..])?;
        off += n;
        let (quant_bits, n) = u32::decode_from(&buf[off..])?;
        off += n;
        let (version, n) = u32::decode_from(&buf[off..])?;
        off += n;
        let (reserved, n) = u32::decode_from(&buf[off..])?;
        off += n;

        let (stored_crc, n) = u32::decode_from(&buf[off..])?;
        let body_len = off;
        off += n;

        let mut hasher = Crc32::new();
        hasher.update(&buf[..body_len]);
        let computed = hasher.finalize();
        if stored_crc != computed {
            return Err(StatsError::ChecksumMismatch);
        }

        if version != STATS_VERSION {
            return Err(StatsError::UnsupportedVersion(version));
        }

        Ok((
            Self {
                w_qt_min,
                w_qt_max,
                slope,
                avg_f_t,
                quant_bits,
                version,
                reserved,
            },
            off,
        ))
    }
}
