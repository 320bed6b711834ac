use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use bankbook_banking::Account;
use bankbook_core::{AccountId, Money};

fn bench_deposit_withdraw(c: &mut Criterion) {
    let mut group = c.benchmark_group("deposit_withdraw");

    for &ops in &[100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(ops as u64 * 2));
        group.bench_with_input(BenchmarkId::from_parameter(ops), &ops, |b, &ops| {
            b.iter(|| {
                let mut account = Account::new("bench");
                for _ in 0..ops {
                    account.deposit(black_box(Money::from(10))).unwrap();
                    account.withdraw(black_box(Money::from(5))).unwrap();
                }
                black_box(account.check_balance())
            });
        });
    }

    group.finish();
}

fn bench_transfer(c: &mut Criterion) {
    c.bench_function("transfer_round_trip", |b| {
        let mut alice = Account::open("Alice", Money::from(1_000_000)).unwrap();
        let mut bob = Account::open("Bob", Money::from(1_000_000)).unwrap();
        b.iter(|| {
            alice.transfer(&mut bob, black_box(Money::from(1))).unwrap();
            bob.transfer(&mut alice, black_box(Money::from(1))).unwrap();
        });
    });
}

fn bench_rehydrate(c: &mut Criterion) {
    let mut group = c.benchmark_group("rehydrate");

    for &len in &[100usize, 1_000, 10_000] {
        let mut account = Account::new("bench");
        for _ in 0..len {
            account.deposit(Money::from(1)).unwrap();
        }
        let history = account.transaction_history().to_vec();
        let id = AccountId::new();

        group.throughput(Throughput::Elements(history.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &history, |b, history| {
            b.iter(|| Account::rehydrate(id, "bench", history.iter().cloned()).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_deposit_withdraw, bench_transfer, bench_rehydrate);
criterion_main!(benches);
