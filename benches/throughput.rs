use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use diode_rs::Poller;
use std::sync::Arc;
use std::time::Duration;

fn bench_spsc(c: &mut Criterion) {
    let mut group = c.benchmark_group("spsc");
    group.throughput(Throughput::Elements(1));

    group.bench_function("publish", |b| {
        let (mut tx, _rx) = diode_rs::spsc::<u64>(4096);
        let mut i = 0u64;
        b.iter(|| {
            tx.publish(Arc::new(i));
            i += 1;
        });
    });

    group.bench_function("publish_consume", |b| {
        let (mut tx, mut rx) = diode_rs::spsc::<u64>(4096);
        let mut i = 0u64;
        b.iter(|| {
            tx.publish(Arc::new(i));
            i += 1;
            rx.try_next()
        });
    });

    group.bench_function("consume_empty", |b| {
        let (_tx, mut rx) = diode_rs::spsc::<u64>(4096);
        b.iter(|| rx.try_next());
    });

    group.finish();
}

fn bench_mpsc(c: &mut Criterion) {
    let mut group = c.benchmark_group("mpsc");
    group.throughput(Throughput::Elements(1));

    group.bench_function("publish_consume", |b| {
        let (tx, mut rx) = diode_rs::mpsc::<u64>(4096);
        let mut i = 0u64;
        b.iter(|| {
            tx.publish(Arc::new(i));
            i += 1;
            rx.try_next()
        });
    });

    group.finish();
}

fn bench_poller(c: &mut Criterion) {
    let mut group = c.benchmark_group("poller");
    group.throughput(Throughput::Elements(1));

    // Values are always ready, so this measures the adapter overhead on
    // the hot path rather than the sleep.
    group.bench_function("next_ready", |b| {
        let (mut tx, rx) = diode_rs::spsc::<u64>(4096);
        let mut poller = Poller::new(rx).with_interval(Duration::from_millis(1));
        let mut i = 0u64;
        b.iter(|| {
            tx.publish(Arc::new(i));
            i += 1;
            poller.next()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_spsc, bench_mpsc, bench_poller);
criterion_main!(benches);
