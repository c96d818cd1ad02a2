//! Term-cursor state (C4) — per-term traversal state and heap ordering.
//!
//! A [`TermCursor`] is a passive record: current impact contribution,
//! quantised query weight, bytes remaining in the open block, the last
//! decoded docno, and the attached [`ListSource`]. The evaluator is the
//! only thing that mutates it.

use crate::postings::ListSource;

/// Sentinel `current_impact` meaning "not yet initialised — schedule this
/// cursor first so it can read its first block header."
///
/// Retained as a plain sentinel rather than an `Uninitialised | Block(u64)`
/// enum: the heap-ordering contract (uninitialised cursors sort first)
/// falls out of ordinary descending-integer comparison, and an enum would
/// need a hand-written `Ord` expressing the same rule with more code.
pub const UNINITIALISED_IMPACT: u64 = u64::MAX;

/// Per-term traversal state.
pub struct TermCursor {
    /// Position of this term within the sorted, post-term-fine survivor
    /// list — used only for diagnostics and tie-break-free logging.
    pub term_idx: usize,

    /// Quantised query-side weight for this term, after term-fine.
    pub w_qt: u64,

    /// `(block_impact + 1) * w_qt`; the heap priority. [`UNINITIALISED_IMPACT`]
    /// before the first block header has been read.
    pub current_impact: u64,

    /// Docnos left to decode in the currently open block.
    pub block_remaining: u64,

    /// Last fully decoded docno in the current block; `None` at block start.
    pub last_docno: Option<u64>,

    /// Offset into `source.window()` of the first not-yet-consumed byte.
    pub pos: usize,

    /// The attached streaming source. Dropping the cursor drops the
    /// source, releasing any pinned file range.
    pub source: Box<dyn ListSource>,
}

impl TermCursor {
    /// Creates a cursor in its pre-initialised state: `current_impact` is
    /// the sentinel, forcing it to be popped and its first block header
    /// read before any scoring happens.
    pub fn new(term_idx: usize, w_qt: u64, source: Box<dyn ListSource>) -> Self {
        Self {
            term_idx,
            w_qt,
            current_impact: UNINITIALISED_IMPACT,
            block_remaining: 0,
            last_docno: None,
            pos: 0,
            source,
        }
    }

    /// The not-yet-consumed suffix of the source's current window.
    pub fn window(&self) -> &[u8] {
        &self.source.window()[self.pos..]
    }
}

/// Max-heap wrapper ordering [`TermCursor`]s by `current_impact` descending.
///
/// Unlike the k-way merge heap elsewhere in this codebase (which reverses
/// its natural `Ord` to turn `BinaryHeap`'s max-heap into a min-heap),
/// this wrapper needs no reversal: we want the cursor with the *largest*
/// `current_impact` popped first, which is exactly `BinaryHeap`'s native
/// ordering.
pub struct CursorHeapEntry(pub TermCursor);

impl PartialEq for CursorHeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.0.current_impact == other.0.current_impact
    }
}

impl Eq for CursorHeapEntry {}

impl PartialOrd for CursorHeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CursorHeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.current_impact.cmp(&other.0.current_impact)
    }
}
