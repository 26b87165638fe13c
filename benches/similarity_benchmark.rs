//! Benchmarks for the aggregator fuzzy-matching scorer.

use criterion::{criterion_group, criterion_main, Criterion};
use eol_sentry::matching::score_candidate;
use std::hint::black_box;

const CATALOG: &[&str] = &[
    "red hat enterprise linux",
    "ubuntu",
    "debian",
    "windows server",
    "postgresql",
    "mysql server",
    "mssqlserver",
    "apache httpd",
    "nodejs",
    "vmware esxi",
    "php",
    "python",
    "oracle linux",
    "mac os",
    "alpine linux",
];

fn benchmark_score_exact(c: &mut Criterion) {
    c.bench_function("score_candidate_exact_match", |b| {
        b.iter(|| {
            let score = score_candidate(black_box("ubuntu"), black_box("ubuntu"));
            black_box(score);
        });
    });
}

fn benchmark_score_fuzzy_against_catalog(c: &mut Criterion) {
    c.bench_function("score_candidate_fuzzy_scan_15_entries", |b| {
        b.iter(|| {
            for candidate in CATALOG {
                let score = score_candidate(black_box("red hat enterprise"), black_box(candidate));
                black_box(score);
            }
        });
    });
}

criterion_group!(benches, benchmark_score_exact, benchmark_score_fuzzy_against_catalog);
criterion_main!(benches);
