//! Benchmarks for the impact-ordered query-evaluation core.
//!
//! Measures `evaluate` over a synthetically generated multi-term,
//! multi-block index at varying `acc_limit` and `scratch_budget_bytes`.
//!
//! # Running
//!
//! ```bash
//! cargo bench --bench evaluate              # all benchmarks
//! cargo bench --bench evaluate -- acc_limit # filter by name
//! ```
//!
//! Reports are generated in `target/criterion/report/index.html`.

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};

use impactcore::accumulator::AccumulatorTable;
use impactcore::evaluator::{evaluate, EvaluatorConfig};
use impactcore::fileset::DirFileSet;
use impactcore::postings::build_list;
use impactcore::query::Query;
use impactcore::stats::IndexImpactStats;
use impactcore::vocabulary::{MapVocabulary, TermStats};

/// Number of distinct terms in the synthetic vocabulary.
const TERM_COUNT: usize = 16;

/// Number of impact blocks per term's posting list.
const BLOCKS_PER_TERM: u64 = 32;

/// Documents per block.
const DOCS_PER_BLOCK: u64 = 64;

fn term_name(i: usize) -> String {
    format!("term{i:04}")
}

/// Builds a synthetic impact-ordered list: `BLOCKS_PER_TERM` blocks of
/// strictly descending impact, `DOCS_PER_BLOCK` strictly ascending docnos
/// each, docnos advancing across blocks so the whole list stays valid.
fn synthetic_list(seed: u64) -> Vec<u8> {
    let mut blocks = Vec::with_capacity(BLOCKS_PER_TERM as usize);
    let mut next_docno = seed;
    for b in (1..=BLOCKS_PER_TERM).rev() {
        let docnos: Vec<u64> = (0..DOCS_PER_BLOCK).map(|i| next_docno + i * 3).collect();
        next_docno = docnos.last().unwrap() + 3;
        blocks.push((b, docnos));
    }
    build_list(&blocks)
}

fn build_index(dir: &std::path::Path) -> (MapVocabulary, DirFileSet, IndexImpactStats) {
    let mut vocab = MapVocabulary::new();
    for (file_id, i) in (0..TERM_COUNT as u32).enumerate() {
        let bytes = synthetic_list(i as u64);
        std::fs::write(dir.join(format!("{file_id}.postings")), &bytes).unwrap();
        vocab.insert_disk(
            term_name(i as usize),
            file_id,
            0,
            bytes.len() as u64,
            TermStats {
                f_t: BLOCKS_PER_TERM * DOCS_PER_BLOCK,
                docs: BLOCKS_PER_TERM * DOCS_PER_BLOCK,
                occurs: BLOCKS_PER_TERM * DOCS_PER_BLOCK,
                last_docno: None,
            },
        );
    }

    let stats = IndexImpactStats {
        w_qt_min: 1.0,
        w_qt_max: 32.0,
        slope: 0.0,
        avg_f_t: (BLOCKS_PER_TERM * DOCS_PER_BLOCK) as f64,
        quant_bits: 5,
        version: impactcore::stats::STATS_VERSION,
        reserved: 0,
    };

    (vocab, DirFileSet::open(dir), stats)
}

fn bench_acc_limit(c: &mut Criterion) {
    let tmp = tempfile::tempdir().unwrap();
    let (vocab, fileset, stats) = build_index(tmp.path());
    let query = Query::from_terms((0..TERM_COUNT).map(term_name));

    let mut group = c.benchmark_group("evaluate_acc_limit");
    for &acc_limit in &[64usize, 512, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(acc_limit), &acc_limit, |b, &acc_limit| {
            let config = EvaluatorConfig {
                acc_limit,
                scratch_budget_bytes: 64 * 1024,
            };
            b.iter_batched(
                || AccumulatorTable::with_limit(config.acc_limit),
                |mut accumulators| {
                    evaluate(&vocab, &fileset, &stats, &query, &mut accumulators, &config).unwrap();
                    accumulators
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_scratch_budget(c: &mut Criterion) {
    let tmp = tempfile::tempdir().unwrap();
    let (vocab, fileset, stats) = build_index(tmp.path());
    let query = Query::from_terms((0..TERM_COUNT).map(term_name));

    let mut group = c.benchmark_group("evaluate_scratch_budget");
    for &budget in &[1024usize, 16 * 1024, 256 * 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(budget), &budget, |b, &budget| {
            let config = EvaluatorConfig {
                acc_limit: 4096,
                scratch_budget_bytes: budget,
            };
            b.iter_batched(
                || AccumulatorTable::with_limit(config.acc_limit),
                |mut accumulators| {
                    evaluate(&vocab, &fileset, &stats, &query, &mut accumulators, &config).unwrap();
                    accumulators
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_acc_limit, bench_scratch_budget);
criterion_main!(benches);
