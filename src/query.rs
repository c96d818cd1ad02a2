//! Parsed query types consumed by the evaluator.
//!
//! Tokenisation, stop-word filtering, and stemming are out of scope — a
//! [`Query`] is assumed to already hold the final term bytes and their
//! in-query frequencies.

/// Maximum byte length of a single term.
pub const MAX_TERM_LEN: usize = 255;

/// One term within a query, before vocabulary lookup.
#[derive(Debug, Clone)]
pub struct QueryTerm {
    /// The term's bytes (length `<= MAX_TERM_LEN`).
    pub term: Vec<u8>,

    /// Frequency of this term within the query (`>= 1`).
    pub f_qt: u64,
}

impl QueryTerm {
    /// Creates a query term with the given in-query frequency.
    pub fn new(term: impl Into<Vec<u8>>, f_qt: u64) -> Self {
        Self {
            term: term.into(),
            f_qt,
        }
    }
}

/// A parsed bag-of-words query: an unordered multiset of terms.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// The query's terms, in caller-supplied order (re-sorted internally
    /// by the evaluator's preliminary filtering step).
    pub terms: Vec<QueryTerm>,
}

impl Query {
    /// Builds a query from term strings, each with `f_qt = 1`.
    ///
    /// Convenience for tests and simple callers; repeated terms are not
    /// merged into a single entry with `f_qt > 1` here.
    pub fn from_terms<I, T>(terms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Vec<u8>>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|t| QueryTerm::new(t, 1))
                .collect(),
        }
    }
}
