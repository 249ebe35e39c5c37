/*!
 * Synchronization Primitives Benchmarks
 *
 * Uncontended fast paths and contended hand-off latency
 */

use ai_os_sync::{
    with_guard, AutoResetSignal, CountingGate, MutualExclusionLock, OwnedLock, SyncConfig,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use std::thread;

fn bench_uncontended(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncontended");

    let mutex = MutualExclusionLock::with_config(SyncConfig::relaxed());
    group.bench_function("mutex_acquire_release", |b| {
        b.iter(|| {
            mutex.acquire(None).unwrap();
            mutex.release();
        });
    });

    let owned = OwnedLock::with_config(SyncConfig::relaxed());
    group.bench_function("owned_acquire_release", |b| {
        b.iter(|| {
            owned.acquire(None).unwrap();
            owned.release().unwrap();
        });
    });

    let gate = CountingGate::with_config(4, 4, SyncConfig::relaxed()).unwrap();
    group.bench_function("gate_with_guard", |b| {
        b.iter(|| with_guard(&gate, None, || black_box(1u64)).unwrap());
    });

    group.finish();
}

fn bench_signal_ping_pong(c: &mut Criterion) {
    let mut group = c.benchmark_group("signal_ping_pong");

    for rounds in [10usize, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(rounds), &rounds, |b, &rounds| {
            b.iter(|| {
                let ping = Arc::new(AutoResetSignal::with_config(false, SyncConfig::relaxed()));
                let pong = Arc::new(AutoResetSignal::with_config(false, SyncConfig::relaxed()));

                let (ping_clone, pong_clone) = (ping.clone(), pong.clone());
                let handle = thread::spawn(move || {
                    for _ in 0..rounds {
                        ping_clone.wait(None).unwrap();
                        pong_clone.signal();
                    }
                });

                for _ in 0..rounds {
                    ping.signal();
                    pong.wait(None).unwrap();
                }

                handle.join().unwrap();
            });
        });
    }

    group.finish();
}

fn bench_contended_mutex(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_mutex");

    for threads in [2usize, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            let lock = Arc::new(MutualExclusionLock::with_config(SyncConfig::relaxed()));

            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let lock = lock.clone();
                        thread::spawn(move || {
                            for _ in 0..100 {
                                lock.acquire(None).unwrap();
                                black_box(());
                                lock.release();
                            }
                        })
                    })
                    .collect();

                for handle in handles {
                    handle.join().unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_uncontended,
    bench_signal_ping_pong,
    bench_contended_mutex
);
criterion_main!(benches);
