//! # Glow-Pay Pipeline Benchmarks
//!
//! | Area | Operation | Target |
//! |------|-----------|--------|
//! | gp-01 Error Taxonomy | classify one failure | < 10µs |
//! | gp-02 Purchase Ledger | append with dedup over 100 records | < 1ms |
//! | gp-02 Purchase Ledger | read_all over 100 records | < 1ms |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gp_01_error_taxonomy::{classify, RawFailure};
use gp_02_purchase_ledger::{InMemoryKVStore, PurchaseLedger, PurchaseLedgerApi};
use gp_tests::fixtures::record;
use std::sync::Arc;

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("gp-01-error-taxonomy");

    let failures = [
        ("coded", RawFailure::coded("NETWORK_ERROR", "Failed to get balance")),
        ("named", RawFailure::named("WalletNotConnectedError", "no wallet")),
        ("keywords", RawFailure::from_message("User rejected the request")),
        ("fallthrough", RawFailure::from_message("Signature not found")),
    ];

    for (label, failure) in &failures {
        group.bench_with_input(BenchmarkId::new("classify", label), failure, |b, f| {
            b.iter(|| black_box(classify(f)))
        });
    }

    group.finish();
}

fn bench_ledger(c: &mut Criterion) {
    let mut group = c.benchmark_group("gp-02-purchase-ledger");

    for size in [10u32, 100] {
        let ledger = PurchaseLedger::with_store(Arc::new(InMemoryKVStore::new()));
        for n in 1..=size {
            let _ = ledger.append(record(n));
        }

        group.bench_with_input(BenchmarkId::new("read_all", size), &size, |b, _| {
            b.iter(|| black_box(ledger.read_all()))
        });

        // Duplicate signature: full read and dedup check, no write
        group.bench_with_input(BenchmarkId::new("append_duplicate", size), &size, |b, _| {
            b.iter(|| black_box(ledger.append(record(1))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_ledger);
criterion_main!(benches);
