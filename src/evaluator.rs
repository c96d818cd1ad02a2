//! Impact evaluator (C5) — orchestrates C1-C4 into the main query-evaluation
//! loop: term weighting, source opening, heap-driven block traversal, and
//! accumulator updates.
//!
//! # Algorithm
//!
//! 1. Look up each query term in the vocabulary, dropping misses. Sort the
//!    survivors by ascending `f_t` (most selective first), compute each
//!    term's quantised query weight, and apply a **term fine** that drops
//!    low-selectivity terms outright.
//! 2. Open a [`ListSource`] per surviving term, dividing the scratch
//!    budget evenly among them.
//! 3. Heapify the cursors by `current_impact` descending and repeatedly
//!    pop the highest-impact cursor, apply its open block to the
//!    accumulator table, read its next block header, and reinsert it —
//!    until the heap empties or the top's impact no longer exceeds the
//!    accumulated **block fine**.
//! 4. The caller reads the final ranking via [`crate::results::top_k`].

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::accumulator::AccumulatorTable;
use crate::cursor::{CursorHeapEntry, TermCursor, UNINITIALISED_IMPACT};
use crate::encoding::vbyte::{self, VbyteError};
use crate::fileset::{FileSet, FileSetError};
use crate::postings::{DiskListSource, InlineListSource, ListSource, PostingsError, ReadMoreOutcome};
use crate::query::Query;
use crate::stats::IndexImpactStats;
use crate::vocabulary::{ListDescriptor, Vocabulary};

use std::collections::BinaryHeap;

/// Configuration carried into one [`evaluate`] call.
///
/// Mirrors `EngineConfig` in spirit: a plain struct, not a CLI/env parser.
#[derive(Debug, Clone, Copy)]
pub struct EvaluatorConfig {
    /// Soft cap on the number of distinct documents the accumulator table
    /// may hold before switching blocks to update-only decoding.
    pub acc_limit: usize,

    /// Total in-memory budget, in bytes, divided among the per-term
    /// posting-list windows.
    pub scratch_budget_bytes: usize,
}

/// Errors that can abort an [`evaluate`] call.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A posting-list source failed (I/O, budget, or truncation).
    #[error("posting list error: {0}")]
    Postings(#[from] PostingsError),

    /// The file set could not produce a pinned byte range.
    #[error("fileset error: {0}")]
    FileSet(#[from] FileSetError),

    /// A posting list's bytes could not be decoded (corrupt vbyte,
    /// truncated block, or `FINISH` with an unconsumed residual).
    #[error("malformed posting list: {0}")]
    Malformed(String),

    /// The scratch budget could not admit even one term's source.
    #[error("scratch budget too small to open a term source")]
    ResourceExhausted,
}

/// Evaluates `query` against `vocabulary`/`fileset`/`stats`, writing
/// per-document partial scores into `accumulators`.
///
/// `accumulators` is caller-owned so its soft `limit` can be set once and
/// reused across the call; in practice its lifetime is scoped to exactly
/// one `evaluate` invocation.
pub fn evaluate<V: Vocabulary, F: FileSet>(
    vocabulary: &V,
    fileset: &F,
    stats: &IndexImpactStats,
    query: &Query,
    accumulators: &mut AccumulatorTable,
    config: &EvaluatorConfig,
) -> Result<(), EvalError> {
    let cursors = open_term_cursors(vocabulary, fileset, stats, query, config)?;
    traverse(cursors, accumulators, config.acc_limit)
}

/// Step 1 (term weighting) + Step 2 (source opening). Split out from
/// [`evaluate`] so the heap-driven traversal (Step 3) can be exercised
/// directly in tests and benchmarks against hand-built cursors, without
/// needing the weighting formula to reproduce a specific `w_qt`.
fn open_term_cursors<V: Vocabulary, F: FileSet>(
    vocabulary: &V,
    fileset: &F,
    stats: &IndexImpactStats,
    query: &Query,
    config: &EvaluatorConfig,
) -> Result<Vec<TermCursor>, EvalError> {
    let mut hits: Vec<(u64, u64, ListDescriptor)> = Vec::new();
    for qt in &query.terms {
        match vocabulary.lookup(&qt.term) {
            Some(entry) => hits.push((entry.stats.f_t, qt.f_qt, entry.descriptor)),
            None => {
                debug!(
                    term = %String::from_utf8_lossy(&qt.term),
                    "vocabulary miss, dropping term"
                );
            }
        }
    }

    if hits.is_empty() {
        return Ok(Vec::new());
    }

    // Most selective (lowest f_t) first.
    hits.sort_by_key(|(f_t, _, _)| *f_t);

    let norm_b = pivot_norm(stats.w_qt_min, stats.w_qt_max);

    let mut survivors: Vec<(u64, ListDescriptor)> = Vec::with_capacity(hits.len());
    for (i, (f_t, f_qt, descriptor)) in hits.into_iter().enumerate() {
        let raw_w = (1.0 + (f_qt as f64).ln()) * (1.0 + stats.avg_f_t / f_t as f64).ln();
        let normalized = raw_w / norm_b;
        let quantized = quantize(normalized, stats.quant_bits, stats.w_qt_min, stats.w_qt_max);
        let termfine = (i + 1).saturating_sub(2) as u64;

        if termfine >= quantized {
            trace!(term_idx = i, quantized, termfine, "term fined to zero, dropping");
            continue;
        }

        survivors.push((quantized - termfine, descriptor));
    }

    if survivors.is_empty() {
        return Ok(Vec::new());
    }

    let t = survivors.len();
    let mut remaining_budget = config.scratch_budget_bytes;
    let mut cursors = Vec::with_capacity(t);

    for (i, (w_qt, descriptor)) in survivors.into_iter().enumerate() {
        let share = remaining_budget / (t - i);
        remaining_budget -= share;

        let source: Box<dyn ListSource> = match descriptor {
            ListDescriptor::Inline(bytes) => Box::new(InlineListSource::new(bytes)?),
            ListDescriptor::Disk {
                file_id,
                offset,
                len,
            } => {
                let budget = (share as u64).min(len) as usize;
                if budget == 0 {
                    return Err(EvalError::ResourceExhausted);
                }
                let guard = fileset.pin(file_id)?;
                Box::new(DiskListSource::open(guard, offset, len, budget)?)
            }
        };

        cursors.push(TermCursor::new(i, w_qt, source));
    }

    Ok(cursors)
}

/// The normalisation constant `(w_qt_max/w_qt_min)^(w_qt_min/(w_qt_max-w_qt_min))`
/// used to pivot query-side raw weights onto the same scale as document-side
/// impacts. Degenerates to `1.0` when the index has a single-valued range.
fn pivot_norm(w_qt_min: f64, w_qt_max: f64) -> f64 {
    let span = w_qt_max - w_qt_min;
    if span.abs() <= f64::EPSILON || w_qt_min <= 0.0 {
        1.0
    } else {
        (w_qt_max / w_qt_min).powf(w_qt_min / span)
    }
}

/// Quantises a real-valued weight into `0..=2^quant_bits - 1`, linearly
/// over `[w_qt_min, w_qt_max]`.
fn quantize(w_prime: f64, quant_bits: u32, w_qt_min: f64, w_qt_max: f64) -> u64 {
    let lo = w_qt_min.min(w_qt_max);
    let hi = w_qt_min.max(w_qt_max);
    let clamped = w_prime.clamp(lo, hi);
    let span = hi - lo;
    let frac = if span.abs() > f64::EPSILON {
        (clamped - lo) / span
    } else {
        0.0
    };
    let levels = ((1u64 << quant_bits.min(63)) - 1) as f64;
    (frac * levels).round() as u64
}

/// Step 3: heap-driven traversal over already-opened term cursors.
///
/// `T`, the initial survivor count used for the block-fine rule, is fixed
/// to `cursors.len()` at call time (not the heap's shrinking size) — see
/// `DESIGN.md`.
pub fn traverse(
    cursors: Vec<TermCursor>,
    accumulators: &mut AccumulatorTable,
    acc_limit: usize,
) -> Result<(), EvalError> {
    let initial_survivors = cursors.len() as u64;
    let mut heap: BinaryHeap<CursorHeapEntry> = cursors.into_iter().map(CursorHeapEntry).collect();

    let mut blockfine: u64 = 0;
    let mut blocks_read: u64 = 0;

    while let Some(CursorHeapEntry(mut top)) = heap.pop() {
        if top.current_impact <= blockfine {
            // No remaining block, from any term, can beat this bound.
            break;
        }

        let contrib = top.current_impact - blockfine;
        let create_or_update = if accumulators.size() < acc_limit {
            accumulators.reserve(top.block_remaining as usize) as u64 >= top.block_remaining
        } else {
            false
        };

        decode_block(&mut top, contrib, accumulators, create_or_update)?;

        if top.block_remaining == 0 {
            if top.window().is_empty() {
                match top.source.read_more(0)? {
                    ReadMoreOutcome::Finish => {
                        if top.current_impact == UNINITIALISED_IMPACT {
                            return Err(EvalError::Malformed(
                                "posting list has no blocks at all".into(),
                            ));
                        }
                        debug!(term_idx = top.term_idx, "list exhausted, cursor retired");
                        continue;
                    }
                    ReadMoreOutcome::Ok => {
                        top.pos = 0;
                    }
                }
            }

            let blocksize = read_vbyte(&mut top)?;
            let impact_minus_one = read_vbyte(&mut top)?;

            blocks_read += 1;
            if blocks_read > initial_survivors {
                blockfine += 1;
            }

            top.block_remaining = blocksize;
            top.current_impact = (impact_minus_one + 1) * top.w_qt;
            top.last_docno = None;
            trace!(
                term_idx = top.term_idx,
                blocksize,
                impact = top.current_impact,
                blockfine,
                "block header read"
            );
        }

        heap.push(CursorHeapEntry(top));
    }

    Ok(())
}

/// Decodes the `block_remaining` docno deltas of the currently open block,
/// adding `contrib` to each document's accumulator entry. Pulls more
/// bytes from the source reactively whenever a delta's vbyte encoding
/// crosses the current window boundary.
fn decode_block(
    top: &mut TermCursor,
    contrib: u64,
    accumulators: &mut AccumulatorTable,
    create_or_update: bool,
) -> Result<(), EvalError> {
    while top.block_remaining > 0 {
        let delta = read_vbyte(top)?;
        let docno = match top.last_docno {
            None => delta,
            Some(prev) => prev + delta + 1,
        };
        top.last_docno = Some(docno);
        top.block_remaining -= 1;

        if create_or_update {
            let (score, _existed) = accumulators.find_or_insert(docno, 0);
            *score += contrib;
        } else if let Some(score) = accumulators.find(docno) {
            *score += contrib;
        }
    }
    Ok(())
}

/// Reads one vbyte integer from `top`'s window, pulling more bytes from
/// its source whenever the current window ends mid-number. A `FINISH`
/// from the source while still mid-number means the list was truncated.
fn read_vbyte(top: &mut TermCursor) -> Result<u64, EvalError> {
    loop {
        match vbyte::read(top.window()) {
            Ok((value, consumed)) => {
                top.pos += consumed;
                return Ok(value);
            }
            Err(VbyteError::Malformed) => {
                return Err(EvalError::Malformed(
                    "corrupt vbyte integer in posting list".into(),
                ));
            }
            Err(VbyteError::NeedMore) => {
                let keep = top.window().len();
                match top.source.read_more(keep)? {
                    ReadMoreOutcome::Ok => top.pos = 0,
                    ReadMoreOutcome::Finish => {
                        warn!(term_idx = top.term_idx, "posting list truncated mid-number");
                        return Err(EvalError::Malformed(
                            "posting list truncated before decode completed".into(),
                        ));
                    }
                }
            }
        }
    }
}
