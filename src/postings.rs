//! Posting-list source (C2) — streaming cursor over one term's postings.
//!
//! # Wire format
//!
//! ```text
//! list        := block+
//! block       := vbyte(blocksize) vbyte(impact_minus_one) delta{blocksize}
//! delta       := vbyte(d)   -- first delta in block is absolute, rest are prev+d+1
//! ```
//!
//! Blocks appear in descending impact order; docnos within a block ascend.
//!
//! Two backing stores implement [`ListSource`]: [`DiskListSource`] pins a
//! byte range of a posting file (via [`crate::fileset::FileSet`]) and reads
//! it through a budgeted in-memory window, and [`InlineListSource`] wraps a
//! byte vector already materialised inside the vocabulary entry.

use std::ops::Deref;

use thiserror::Error;
use tracing::trace;

use crate::encoding::vbyte;
use crate::fileset::FileSetError;

/// Errors produced while streaming a posting list.
#[derive(Debug, Error)]
pub enum PostingsError {
    /// The underlying file-set pin/read failed.
    #[error("fileset error: {0}")]
    FileSet(#[from] FileSetError),

    /// The scratch budget is too small to read even one block header.
    #[error("scratch budget too small to make progress on this list")]
    ResourceExhausted,

    /// The list's declared byte range extends past the backing file.
    #[error("posting list byte range exceeds backing file")]
    Truncated,

    /// A caller passed a `keep_bytes` value larger than the current window.
    #[error("invalid read_more request: {0}")]
    Invalid(&'static str),
}

/// Result of a [`ListSource::read_more`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMoreOutcome {
    /// The window was extended with new bytes (or the kept bytes were
    /// simply repositioned, if nothing new was available but more may
    /// still come on a later call — not used by either shipped source,
    /// retained so future backing stores with true partial I/O can use it).
    Ok,
    /// Nothing more can ever be added: the backing store is exhausted.
    /// The window now holds exactly the `keep_bytes` the caller asked to
    /// preserve; a non-empty window here means the list was truncated.
    Finish,
}

/// A streaming source of posting-list bytes for one query term.
///
/// Implementors own a bounded in-memory window and refill it on demand.
/// `close()` from the original design is modeled as [`Drop`] — there is no
/// explicit method to forget to call.
pub trait ListSource {
    /// Preserve the last `keep_bytes` of the current window, then extend
    /// it with as many further bytes as the backing store and budget
    /// allow.
    fn read_more(&mut self, keep_bytes: usize) -> Result<ReadMoreOutcome, PostingsError>;

    /// The current window of available, not-yet-consumed-by-refill bytes.
    fn window(&self) -> &[u8];
}

// ------------------------------------------------------------------------------------------------
// DiskListSource
// ------------------------------------------------------------------------------------------------

/// Streams a posting list from a pinned byte range of a file, through a
/// window bounded by a caller-supplied memory budget.
pub struct DiskListSource<G: Deref<Target = [u8]>> {
    guard: G,
    file_offset: u64,
    total_len: u64,
    delivered: u64,
    budget: usize,
    buf: Vec<u8>,
}

impl<G: Deref<Target = [u8]>> DiskListSource<G> {
    /// Opens a source over `[file_offset, file_offset + total_len)` of the
    /// file backing `guard`, bounded by `budget` bytes of in-memory window.
    /// Primes the initial window before returning.
    pub fn open(
        guard: G,
        file_offset: u64,
        total_len: u64,
        budget: usize,
    ) -> Result<Self, PostingsError> {
        let mut source = Self {
            guard,
            file_offset,
            total_len,
            delivered: 0,
            budget,
            buf: Vec::new(),
        };
        source.read_more(0)?;
        Ok(source)
    }
}

impl<G: Deref<Target = [u8]>> ListSource for DiskListSource<G> {
    fn read_more(&mut self, keep_bytes: usize) -> Result<ReadMoreOutcome, PostingsError> {
        if keep_bytes > self.buf.len() {
            return Err(PostingsError::Invalid("keep_bytes exceeds window length"));
        }
        self.buf.drain(0..self.buf.len() - keep_bytes);

        let remaining_in_list = (self.total_len - self.delivered) as usize;
        if remaining_in_list == 0 {
            trace!(
                delivered = self.delivered,
                kept = keep_bytes,
                "posting list backing store exhausted"
            );
            return Ok(ReadMoreOutcome::Finish);
        }

        let room = self.budget.saturating_sub(keep_bytes);
        if room == 0 {
            return Err(PostingsError::ResourceExhausted);
        }

        let want = room.min(remaining_in_list);
        let start = (self.file_offset + self.delivered) as usize;
        let end = start + want;
        if end > self.guard.len() {
            return Err(PostingsError::Truncated);
        }

        self.buf.extend_from_slice(&self.guard[start..end]);
        self.delivered += want as u64;
        trace!(want, delivered = self.delivered, "posting list window refilled");
        Ok(ReadMoreOutcome::Ok)
    }

    fn window(&self) -> &[u8] {
        &self.buf
    }
}

// ------------------------------------------------------------------------------------------------
// InlineListSource
// ------------------------------------------------------------------------------------------------

/// Streams a posting list that is already fully materialised in memory
/// (stored inline in the vocabulary entry). No I/O, no budget enforcement
/// — the whole list becomes the window on the first call.
pub struct InlineListSource {
    remaining: Vec<u8>,
    buf: Vec<u8>,
}

impl InlineListSource {
    /// Wraps `bytes` as a list source, priming the initial window.
    pub fn new(bytes: Vec<u8>) -> Result<Self, PostingsError> {
        let mut source = Self {
            remaining: bytes,
            buf: Vec::new(),
        };
        source.read_more(0)?;
        Ok(source)
    }
}

impl ListSource for InlineListSource {
    fn read_more(&mut self, keep_bytes: usize) -> Result<ReadMoreOutcome, PostingsError> {
        if keep_bytes > self.buf.len() {
            return Err(PostingsError::Invalid("keep_bytes exceeds window length"));
        }
        self.buf.drain(0..self.buf.len() - keep_bytes);

        if self.remaining.is_empty() {
            return Ok(ReadMoreOutcome::Finish);
        }

        self.buf.append(&mut self.remaining);
        Ok(ReadMoreOutcome::Ok)
    }

    fn window(&self) -> &[u8] {
        &self.buf
    }
}

// ------------------------------------------------------------------------------------------------
// Synthetic list construction — test/benchmark fixture builder only.
//
// This is not a production bulk-loader: it encodes one caller-provided
// sequence of (impact, docnos) blocks directly to wire format, with no
// merging, vocabulary registration, or file management.
// ------------------------------------------------------------------------------------------------

/// Appends one impact block (`impact`, ascending `docnos`) to `buf` in
/// wire format. `docnos` must be strictly increasing.
pub fn write_block(impact: u64, docnos: &[u64], buf: &mut Vec<u8>) {
    vbyte::write(docnos.len() as u64, buf);
    vbyte::write(impact - 1, buf);
    let mut prev: Option<u64> = None;
    for &docno in docnos {
        let delta = match prev {
            None => docno,
            Some(p) => docno - p - 1,
        };
        vbyte::write(delta, buf);
        prev = Some(docno);
    }
}

/// Builds a complete impact-ordered posting list from `[(impact, docnos)]`,
/// descending by impact. Panics in debug builds (via the `write_block`
/// delta-underflow) if a block's impact does not strictly decrease or its
/// docnos are not ascending — this is test-fixture code, not a validator.
pub fn build_list(blocks: &[(u64, Vec<u64>)]) -> Vec<u8> {
    let mut buf = Vec::new();
    for (impact, docnos) in blocks {
        write_block(*impact, docnos, &mut buf);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_source_delivers_whole_list_on_open() {
        let bytes = build_list(&[(5, vec![1, 3]), (2, vec![2])]);
        let expected_len = bytes.len();
        let source = InlineListSource::new(bytes).unwrap();
        assert_eq!(source.window().len(), expected_len);
    }

    #[test]
    fn inline_source_finishes_when_fully_kept() {
        let bytes = build_list(&[(5, vec![1])]);
        let mut source = InlineListSource::new(bytes.clone()).unwrap();
        let outcome = source.read_more(source.window().len()).unwrap();
        assert_eq!(outcome, ReadMoreOutcome::Finish);
        assert_eq!(source.window().len(), bytes.len());
    }

    #[test]
    fn disk_source_refills_within_budget() {
        let bytes = build_list(&[(5, vec![1, 2, 3, 4, 5, 6, 7, 8])]);
        let total_len = bytes.len() as u64;
        // Small budget forces multiple refills.
        let mut source = DiskListSource::open(bytes.as_slice(), 0, total_len, 4).unwrap();
        assert!(source.window().len() <= 4);

        let mut all = Vec::new();
        loop {
            all.extend_from_slice(source.window());
            let kept = 0;
            match source.read_more(kept).unwrap() {
                ReadMoreOutcome::Ok => {}
                ReadMoreOutcome::Finish => break,
            }
        }
        assert_eq!(all, bytes);
    }

    #[test]
    fn disk_source_budget_too_small_is_resource_exhausted() {
        let bytes = build_list(&[(5, vec![1, 2, 3])]);
        let total_len = bytes.len() as u64;
        // budget smaller than keep_bytes room forces ResourceExhausted on
        // the next refill once nothing more fits.
        let mut source = DiskListSource::open(bytes.as_slice(), 0, total_len, 1).unwrap();
        let keep = source.window().len();
        let err = source.read_more(keep).unwrap_err();
        assert!(matches!(err, PostingsError::ResourceExhausted));
    }

    #[test]
    fn disk_source_out_of_range_is_truncated() {
        let bytes = build_list(&[(5, vec![1])]);
        let declared_len = bytes.len() as u64 + 100;
        let err = DiskListSource::open(bytes.as_slice(), 0, declared_len, 4096).unwrap_err();
        assert!(matches!(err, PostingsError::Truncated));
    }
}
