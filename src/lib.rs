//! # impactcore
//!
//! The query-evaluation core of a disk-resident, single-node inverted-index
//! search engine: given a parsed bag-of-words query and a built index, it
//! traverses per-term posting lists in **descending impact order**,
//! maintains a bounded accumulator table of per-document partial scores,
//! and produces an approximate top-k ranked result set.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                           evaluator (C5)                          │
//! │                                                                   │
//! │  Step 1: term weighting           Step 3: heap-driven traversal   │
//! │  ┌──────────────┐                 ┌───────────────────────────┐  │
//! │  │  vocabulary  │──VocabEntry──►  │   BinaryHeap<CursorHeap-  │  │
//! │  │  lookup (E1) │                 │   Entry> over TermCursor  │  │
//! │  └──────────────┘                 │   (C4), keyed by          │  │
//! │                                   │   current_impact desc     │  │
//! │  Step 2: open sources             └─────────────┬─────────────┘  │
//! │  ┌──────────────┐   pin/unpin           decode via vbyte (C1)    │
//! │  │  fileset     │◄──────────────┐               │                │
//! │  │  (E2)        │               │               ▼                │
//! │  └──────┬───────┘               │      ┌──────────────────┐     │
//! │         │                        └──────│  accumulator     │     │
//! │         ▼                               │  table (C3)      │     │
//! │  ┌──────────────┐                        └────────┬─────────┘     │
//! │  │ ListSource   │ Disk/Inline (C2)                 │               │
//! │  └──────────────┘                                  ▼               │
//! │                                              results::top_k        │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`encoding`] | Fixed-width `Encode`/`Decode` traits plus the variable-byte (vbyte) posting codec (C1) |
//! | [`postings`] | Streaming posting-list source (C2): disk-backed and inline cursors over impact blocks |
//! | [`accumulator`] | Bounded-capacity `docno -> partial score` table (C3) |
//! | [`cursor`] | Per-term traversal state and heap ordering (C4) |
//! | [`evaluator`] | Orchestrates C1-C4 into the main query-evaluation algorithm (C5) |
//! | [`vocabulary`] | Term -> posting-list descriptor lookup (E1), consumed by the evaluator |
//! | [`fileset`] | Pin/read/unpin over posting files (E2), consumed by [`postings`] |
//! | [`stats`] | On-disk, CRC32-checked index-wide impact normalisation parameters |
//! | [`query`] | Parsed query types consumed by the evaluator |
//! | [`docmap`] | Document metadata lookup, consumed by the (out-of-scope) surrounding ranker |
//! | [`results`] | Thin `top_k` layer over the accumulator table's final state |
//!
//! ## Key properties
//!
//! - **Impact-ordered traversal** — posting lists are stored as blocks of
//!   strictly descending impact; the evaluator's heap always processes the
//!   highest-impact remaining block across all query terms next.
//! - **Bounded accumulator memory** — the accumulator table enforces a soft
//!   entry cap, switching to update-only decoding once reached, trading
//!   exact top-k for predictable memory.
//! - **Block-fine termination** — a monotonically increasing penalty bounds
//!   the number of blocks read once more blocks have been seen than there
//!   are surviving query terms, giving a hard upper bound on work done.
//! - **RAII resource cleanup** — every file pin and posting-list source is
//!   released via `Drop` on every exit path, including `?`-propagated
//!   errors.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use impactcore::accumulator::AccumulatorTable;
//! use impactcore::evaluator::{evaluate, EvaluatorConfig};
//! use impactcore::fileset::DirFileSet;
//! use impactcore::query::Query;
//! use impactcore::stats::IndexImpactStats;
//! use impactcore::vocabulary::MapVocabulary;
//!
//! let vocabulary = MapVocabulary::new();
//! let fileset = DirFileSet::open("/tmp/my-index/postings");
//! let stats = IndexImpactStats {
//!     w_qt_min: 1.0,
//!     w_qt_max: 32.0,
//!     slope: 0.0,
//!     avg_f_t: 8.0,
//!     quant_bits: 5,
//!     version: impactcore::stats::STATS_VERSION,
//!     reserved: 0,
//! };
//!
//! let query = Query::from_terms(["hello", "world"]);
//! let config = EvaluatorConfig {
//!     acc_limit: 10_000,
//!     scratch_budget_bytes: 64 * 1024,
//! };
//!
//! let mut accumulators = AccumulatorTable::with_limit(config.acc_limit);
//! evaluate(&vocabulary, &fileset, &stats, &query, &mut accumulators, &config).unwrap();
//!
//! let ranked = impactcore::results::top_k(&accumulators, 10);
//! ```

pub mod accumulator;
pub mod cursor;
pub mod docmap;
pub mod encoding;
pub mod evaluator;
pub mod fileset;
pub mod postings;
pub mod query;
pub mod results;
pub mod stats;
pub mod vocabulary;
