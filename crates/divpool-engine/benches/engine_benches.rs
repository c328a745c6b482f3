//! Criterion benchmarks for divpool-engine hot paths.
//!
//! Covers: dividend posting, staking into a populated pool, and pending
//! dividend queries.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use divpool_core::constants::UNIT;
use divpool_core::ledger::MemoryLedger;
use divpool_core::traits::Ledger;
use divpool_core::types::{Address, CallContext};

use divpool_engine::{Deployment, StakingConfig, StakingPool};

const T0: u64 = 1_700_000_000;

fn addr(n: u32) -> Address {
    let mut bytes = [0u8; 20];
    bytes[..4].copy_from_slice(&n.to_be_bytes());
    bytes[19] = 0x5A;
    Address(bytes)
}

fn owner() -> Address {
    Address([0xAA; 20])
}

/// Pool with `stakers` participants of one token each, admin fully funded.
fn populated(stakers: u32) -> (MemoryLedger, StakingPool) {
    let dep = Deployment::deploy(owner(), &StakingConfig::default(), 0).unwrap();
    let mut pool = dep.pool;
    let mut ledger = MemoryLedger::new();
    ledger.mint(&owner(), 1_000_000_000 * UNIT).unwrap();
    ledger.approve(&owner(), &pool.address(), u128::MAX).unwrap();
    for n in 0..stakers {
        let who = addr(n);
        ledger.mint(&who, 10 * UNIT).unwrap();
        ledger.approve(&who, &pool.address(), UNIT).unwrap();
        pool.stake(&mut ledger, &CallContext::new(who, T0), UNIT).unwrap();
    }
    (ledger, pool)
}

fn bench_post_dividend(c: &mut Criterion) {
    let mut group = c.benchmark_group("post_dividend");
    for stakers in [10u32, 1_000] {
        group.bench_function(format!("{stakers}_stakers"), |b| {
            b.iter_batched(
                || populated(stakers),
                |(mut ledger, mut pool)| {
                    pool.post_dividend(&mut ledger, &CallContext::new(owner(), T0), black_box(UNIT))
                        .unwrap();
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_stake(c: &mut Criterion) {
    c.bench_function("stake_repeat_with_pending", |b| {
        b.iter_batched(
            || {
                let (mut ledger, mut pool) = populated(100);
                pool.post_dividend(&mut ledger, &CallContext::new(owner(), T0), UNIT)
                    .unwrap();
                ledger.approve(&addr(0), &pool.address(), UNIT).unwrap();
                (ledger, pool)
            },
            |(mut ledger, mut pool)| {
                pool.stake(&mut ledger, &CallContext::new(addr(0), T0), black_box(UNIT))
                    .unwrap();
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_pending(c: &mut Criterion) {
    let (mut ledger, mut pool) = populated(100);
    for _ in 0..50 {
        pool.post_dividend(&mut ledger, &CallContext::new(owner(), T0), 3 * UNIT)
            .unwrap();
    }
    let who = addr(7);
    c.bench_function("unrealized_gains", |b| {
        b.iter(|| pool.unrealized_gains(black_box(&who)).unwrap())
    });
}

criterion_group!(benches, bench_post_dividend, bench_stake, bench_pending);
criterion_main!(benches);
