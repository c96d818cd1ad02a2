//! Accumulator table (C3) — bounded-capacity `docno -> partial score` map.
//!
//! A hash map keyed by document id with a soft entry-count cap. Once the
//! cap is reached, [`AccumulatorTable::reserve`] starts reporting less
//! room than requested, signalling the evaluator to switch that block to
//! update-only decoding rather than admitting new documents. This trades
//! exact top-k for predictable memory, per the evaluator's approximation
//! contract.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Maps `docno -> partial_score`, capped at a soft entry limit.
#[derive(Debug)]
pub struct AccumulatorTable {
    scores: HashMap<u64, u64>,
    limit: usize,
}

impl AccumulatorTable {
    /// Creates an empty table with the given soft entry limit.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            scores: HashMap::new(),
            limit,
        }
    }

    /// Hints that up to `n` new entries may be inserted.
    ///
    /// Returns how many of those `n` entries the table can accept without
    /// exceeding its soft limit (0..=n). This is advisory, not a hard
    /// allocation guarantee — it does not account for hash collisions
    /// within the requested batch.
    pub fn reserve(&mut self, n: usize) -> usize {
        let room = self.limit.saturating_sub(self.scores.len());
        let grant = room.min(n);
        if grant > 0 {
            self.scores.reserve(grant);
        }
        grant
    }

    /// Returns a mutable reference to `docno`'s score, inserting `initial`
    /// if absent. The second element of the tuple is `true` if the entry
    /// already existed.
    pub fn find_or_insert(&mut self, docno: u64, initial: u64) -> (&mut u64, bool) {
        match self.scores.entry(docno) {
            Entry::Occupied(e) => (e.into_mut(), true),
            Entry::Vacant(e) => (e.insert(initial), false),
        }
    }

    /// Returns a mutable reference to `docno`'s score if present.
    pub fn find(&mut self, docno: u64) -> Option<&mut u64> {
        self.scores.get_mut(&docno)
    }

    /// Current number of accumulated documents.
    pub fn size(&self) -> usize {
        self.scores.len()
    }

    /// Soft entry-count cap this table was constructed with.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the `k` entries with the largest score, ties broken by
    /// smaller `docno` first.
    ///
    /// Uses a partial sort (`select_nth_unstable_by`) to find the top-k
    /// boundary in expected linear time, then a full sort of just that
    /// prefix — cheaper than sorting the whole table when `k` is small
    /// relative to `size()`.
    pub fn iter_top_k(&self, k: usize) -> Vec<(u64, u64)> {
        let mut entries: Vec<(u64, u64)> = self.scores.iter().map(|(&d, &s)| (d, s)).collect();
        let k = k.min(entries.len());
        if k == 0 {
            return Vec::new();
        }

        if k < entries.len() {
            entries.select_nth_unstable_by(k - 1, Self::rank_cmp);
            entries.truncate(k);
        }
        entries.sort_unstable_by(Self::rank_cmp);
        entries
    }

    fn rank_cmp(a: &(u64, u64), b: &(u64, u64)) -> std::cmp::Ordering {
        b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0))
    }
}
