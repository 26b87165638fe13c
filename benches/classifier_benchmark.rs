//! Benchmarks for the message classifier.

use criterion::{criterion_group, criterion_main, Criterion};
use eol_sentry::classify;
use std::hint::black_box;

const MESSAGES: &[&str] = &[
    "What is the EOL of Windows Server 2019?",
    "What OS do we have deployed across our environment?",
    "Can you search the web for when PHP 7.4 reaches end of life?",
    "We're planning to migrate off Ubuntu 18.04, what's the upgrade timeline?",
    "Is our PostgreSQL install still supported?",
    "List of software running in our estate that is approaching end of support",
];

fn benchmark_classify_single(c: &mut Criterion) {
    c.bench_function("classify_direct_eol_question", |b| {
        b.iter(|| {
            let classification = classify(black_box(MESSAGES[0]));
            black_box(classification);
        });
    });
}

fn benchmark_classify_mixed_corpus(c: &mut Criterion) {
    c.bench_function("classify_mixed_corpus", |b| {
        b.iter(|| {
            for message in MESSAGES {
                let classification = classify(black_box(message));
                black_box(classification);
            }
        });
    });
}

criterion_group!(benches, benchmark_classify_single, benchmark_classify_mixed_corpus);
criterion_main!(benches);
