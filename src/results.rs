//! Thin post-processing layer turning final accumulator state into a
//! ranked result set. As far into "ranking" as the impact core goes —
//! per-document normalisation from the docmap belongs to the excluded
//! non-impact rankers.

use crate::accumulator::AccumulatorTable;

/// One ranked result: a document and its final (approximate) score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredDoc {
    /// The document's identifier.
    pub docno: u64,
    /// Its final accumulated score.
    pub score: u64,
}

/// Returns the `k` highest-scoring documents in `accumulators`, ties
/// broken by smaller `docno` first.
pub fn top_k(accumulators: &AccumulatorTable, k: usize) -> Vec<ScoredDoc> {
    accumulators
        .iter_top_k(k)
        .into_iter()
        .map(|(docno, score)| ScoredDoc { docno, score })
        .collect()
}
