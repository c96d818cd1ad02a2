//! Document map (consumed) — `docno -> document metadata`.
//!
//! Treated as a black-box oracle: the impact core itself never calls this
//! trait, only the surrounding (out-of-scope) ranker that normalises
//! per-document scores using length and weight. Shipped here only as a
//! trait plus a trivial in-memory stand-in for integration tests that want
//! to resolve a result set's docnos to something human-readable.

use std::collections::HashMap;

/// Metadata the surrounding ranker needs for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocInfo {
    /// Total byte length of the document.
    pub bytes: u64,
    /// Total word count.
    pub words: u64,
    /// Distinct word count.
    pub distinct_words: u64,
    /// Build-time document weight (length-normalisation factor).
    pub weight: f64,
    /// Opaque auxiliary string (e.g. title or URL), surfaced in results.
    pub aux_string: String,
}

/// Looks up per-document metadata by docno.
pub trait DocMap {
    /// Returns this docno's metadata, or `None` if it is out of range.
    fn get(&self, docno: u64) -> Option<DocInfo>;
}

/// Trivial in-memory [`DocMap`] for integration tests. Not a production
/// implementation — no on-disk storage, no lazy loading.
#[derive(Debug, Default)]
pub struct MapDocMap {
    entries: HashMap<u64, DocInfo>,
}

impl MapDocMap {
    /// Creates an empty doc map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers metadata for `docno`.
    pub fn insert(&mut self, docno: u64, info: DocInfo) {
        self.entries.insert(docno, info);
    }
}

impl DocMap for MapDocMap {
    fn get(&self, docno: u64) -> Option<DocInfo> {
        self.entries.get(&docno).cloned()
    }
}
