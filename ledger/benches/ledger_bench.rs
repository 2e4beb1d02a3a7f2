use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use token_ledger::{GenesisConfig, LedgerState};
use token_nullables::NullStore;
use token_types::{AccountId, TokenAmount};

/// A ledger with `n` funded holders besides the issuer.
fn populated_ledger(n: usize) -> (LedgerState<NullStore>, Vec<AccountId>) {
    let issuer = AccountId::new("issuer");
    let genesis = GenesisConfig::default().with_issuer(issuer.clone());
    let mut ledger = LedgerState::new(NullStore::new(), genesis);
    ledger.initialize().unwrap();

    let holders: Vec<AccountId> = (0..n)
        .map(|i| AccountId::new(format!("holder_{i:06}")))
        .collect();
    for holder in &holders {
        ledger.approve(holder, &issuer, TokenAmount::ZERO).unwrap();
        ledger
            .transfer(&issuer, holder, TokenAmount::new(1_000_000))
            .unwrap();
    }
    (ledger, holders)
}

fn bench_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer");

    for holder_count in [10, 1_000, 10_000] {
        let (mut ledger, holders) = populated_ledger(holder_count);
        let a = holders[0].clone();
        let b = holders[holder_count - 1].clone();

        group.bench_with_input(
            BenchmarkId::new("typed_round_trip", holder_count),
            &holder_count,
            |bench, _| {
                bench.iter(|| {
                    ledger.transfer(&a, &b, black_box(TokenAmount::new(1))).unwrap();
                    ledger.transfer(&b, &a, black_box(TokenAmount::new(1))).unwrap();
                });
            },
        );
    }

    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let (mut ledger, _) = populated_ledger(100);
    let forward = ["holder_000000", "holder_000099", "1"];
    let back = ["holder_000099", "holder_000000", "1"];

    c.bench_function("invoke_transfer_round_trip", |bench| {
        bench.iter(|| {
            ledger.invoke("transfer", black_box(&forward)).unwrap();
            ledger.invoke("transfer", black_box(&back)).unwrap();
        });
    });

    c.bench_function("invoke_balance_of", |bench| {
        bench.iter(|| ledger.invoke("balanceOf", black_box(&["holder_000042"])).unwrap());
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    for holder_count in [10, 1_000] {
        let (ledger, _) = populated_ledger(holder_count);
        group.bench_with_input(
            BenchmarkId::new("capture", holder_count),
            &holder_count,
            |bench, _| {
                bench.iter(|| black_box(ledger.snapshot().unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_transfer, bench_dispatch, bench_snapshot);
criterion_main!(benches);
