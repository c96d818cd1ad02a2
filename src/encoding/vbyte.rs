//! Variable-byte (vbyte) integer codec for posting-list bytes.
//!
//! This is a different wire format from the fixed-width [`super::Encode`]/
//! [`super::Decode`] traits used elsewhere in this crate: postings are
//! written by an external index builder using a 7-bit little-endian
//! continuation encoding (the high bit of each byte means "more bytes
//! follow"), and decoding must distinguish "the buffer ended mid-number,
//! ask the caller to refill" from "the bytes are actually malformed" —
//! the former is routine (posting-list windows are read in bounded
//! chunks), the latter is fatal to the query.
//!
//! # Wire format
//!
//! Each byte contributes its low 7 bits to the value, least-significant
//! group first. The high bit set means another byte follows.
//!
//! ```text
//! byte:  1xxxxxxx 1xxxxxxx 0xxxxxxx
//! value: bits 0-6  bits 7-13 bits 14-20  (little-endian group order)
//! ```
//!
//! # Zero-panic guarantee
//!
//! No function in this module uses `unwrap()`, `expect()`, or indexing
//! that can panic on a short buffer.

use thiserror::Error;

/// Maximum encoded length in bytes of a vbyte-encoded `u64` (`ceil(64/7)`).
pub const MAX_VBYTE_LEN: usize = 10;

/// Errors produced while decoding a vbyte-encoded integer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VbyteError {
    /// The buffer ended before the number's continuation bit cleared.
    /// The caller should refill its window (keeping these bytes) and
    /// retry — this is not a fatal condition on its own.
    #[error("buffer exhausted mid-number, need more bytes")]
    NeedMore,

    /// More than [`MAX_VBYTE_LEN`] bytes were read without the
    /// continuation bit clearing, or the accumulated value overflowed
    /// `u64`. The posting list is corrupt.
    #[error("vbyte integer overflowed u64 or exceeded {MAX_VBYTE_LEN} bytes")]
    Malformed,
}

/// Decode one non-negative integer from the start of `buf`.
///
/// Returns `(value, bytes_consumed)` on success. Returns
/// [`VbyteError::NeedMore`] if `buf` runs out before the continuation
/// bit clears — in that case the caller's buffer position must **not**
/// be advanced, since the bytes read so far are still needed once more
/// data arrives.
pub fn read(buf: &[u8]) -> Result<(u64, usize), VbyteError> {
    let mut value: u64 = 0;
    for (i, &byte) in buf.iter().enumerate() {
        if i >= MAX_VBYTE_LEN {
            return Err(VbyteError::Malformed);
        }

        let payload = (byte & 0x7F) as u64;
        let shift = i * 7;

        // A 10th byte can only validly contribute to the top 64-7*9=1 bit;
        // anything else is overflow.
        if shift >= 64 || (shift > 0 && payload >> (64 - shift) != 0) {
            return Err(VbyteError::Malformed);
        }

        value |= payload << shift;

        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(VbyteError::NeedMore)
}

/// Skip `n` successive vbyte-encoded integers without materialising
/// their values. Returns the total number of bytes consumed.
///
/// Used when a caller wants to advance past data it doesn't need to
/// decode (e.g. scanning forward without reading docnos).
pub fn skip(buf: &[u8], n: usize) -> Result<usize, VbyteError> {
    let mut consumed = 0;
    for _ in 0..n {
        let (_, len) = read(&buf[consumed..])?;
        consumed += len;
    }
    Ok(consumed)
}

/// Append the vbyte encoding of `value` to `buf`.
///
/// Used by the synthetic posting-list fixture builder and benchmarks;
/// production posting lists are written by the (out-of-scope) index
/// builder, but this crate still needs to construct valid lists for
/// tests.
pub fn write(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
            buf.push(byte);
        } else {
            buf.push(byte);
            break;
        }
    }
}

/// Byte length of `value` when vbyte-encoded, without actually encoding it.
pub fn encoded_len(value: u64) -> usize {
    let mut len = 1;
    let mut v = value >> 7;
    while v != 0 {
        len += 1;
        v >>= 7;
    }
    len
}
