//! Vocabulary lookup (E1) — term → posting-list descriptor.
//!
//! The production vocabulary is a disk-backed B+tree; that structure is out
//! of scope here (see the crate root docs). This module defines the
//! [`Vocabulary`] trait the evaluator depends on, plus [`MapVocabulary`], a
//! minimal in-memory implementation sufficient to exercise the evaluator
//! end-to-end in tests and examples.

use std::collections::HashMap;

/// Where a term's posting list lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListDescriptor {
    /// Postings live on disk, addressed by file id and byte range.
    Disk {
        /// Identifier of the posting file within the active [`crate::fileset::FileSet`].
        file_id: u32,
        /// Byte offset of the list's first block header.
        offset: u64,
        /// Total byte length of the list.
        len: u64,
    },
    /// The list is short enough to be stored inline in the vocabulary entry.
    Inline(Vec<u8>),
}

impl ListDescriptor {
    /// Byte length of the list, regardless of backing store.
    pub fn byte_len(&self) -> u64 {
        match self {
            ListDescriptor::Disk { len, .. } => *len,
            ListDescriptor::Inline(bytes) => bytes.len() as u64,
        }
    }
}

/// Collection-side statistics the vocabulary precomputes for each term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermStats {
    /// Total number of postings for this term across the collection.
    pub f_t: u64,
    /// Number of distinct documents the term occurs in.
    pub docs: u64,
    /// Total raw occurrences of the term across the collection.
    pub occurs: u64,
    /// Highest docno present in the term's posting list, if any.
    pub last_docno: Option<u64>,
}

/// A single vocabulary entry: where the list lives plus its statistics.
#[derive(Debug, Clone)]
pub struct VocabEntry {
    /// Where to find the term's postings.
    pub descriptor: ListDescriptor,
    /// Precomputed collection-side statistics.
    pub stats: TermStats,
}

/// Maps a query term to its posting-list descriptor and statistics.
///
/// A lookup miss is not an error — the evaluator drops the term silently
/// and continues with the remaining query terms.
pub trait Vocabulary {
    /// Look up `term`, returning `None` if it is not in the vocabulary.
    fn lookup(&self, term: &[u8]) -> Option<VocabEntry>;
}

/// Minimal in-memory [`Vocabulary`] implementation, backed by a `HashMap`.
///
/// Not a production vocabulary — no on-disk persistence, no B+tree range
/// queries. Exists so the evaluator (and its tests) can run without the
/// surrounding index-build pipeline.
#[derive(Debug, Default)]
pub struct MapVocabulary {
    entries: HashMap<Vec<u8>, VocabEntry>,
}

impl MapVocabulary {
    /// Creates an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a term backed by an on-disk posting list.
    pub fn insert_disk(
        &mut self,
        term: impl Into<Vec<u8>>,
        file_id: u32,
        offset: u64,
        len: u64,
        stats: TermStats,
    ) {
        self.entries.insert(
            term.into(),
            VocabEntry {
                descriptor: ListDescriptor::Disk {
                    file_id,
                    offset,
                    len,
                },
                stats,
            },
        );
    }

    /// Registers a term whose posting list is stored inline (no file I/O).
    pub fn insert_inline(&mut self, term: impl Into<Vec<u8>>, bytes: Vec<u8>, stats: TermStats) {
        self.entries.insert(
            term.into(),
            VocabEntry {
                descriptor: ListDescriptor::Inline(bytes),
                stats,
            },
        );
    }

    /// Number of terms registered.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the vocabulary has no terms.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Vocabulary for MapVocabulary {
    fn lookup(&self, term: &[u8]) -> Option<VocabEntry> {
        self.entries.get(term).cloned()
    }
}
