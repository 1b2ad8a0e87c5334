//! Benchmarks for dirgrep
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn benchmark_queue_operations(c: &mut Criterion) {
    use dirgrep::walker::FrontierQueue;

    c.bench_function("queue_enqueue_dequeue", |b| {
        let queue = FrontierQueue::new();

        b.iter(|| {
            queue.enqueue("/some/fairly/deep/test/path".into());
            let id = queue.dequeue().unwrap();
            black_box(id);
        })
    });

    c.bench_function("queue_is_empty_snapshot", |b| {
        let queue = FrontierQueue::new();
        queue.enqueue("/a".into());

        b.iter(|| black_box(queue.is_empty()))
    });
}

fn benchmark_path_joining(c: &mut Criterion) {
    use dirgrep::fs::join_child;

    c.bench_function("join_child", |b| {
        b.iter(|| {
            let child = join_child(black_box("/data/projects/main"), black_box("src"));
            black_box(child);
        })
    });
}

fn benchmark_cycle_report(c: &mut Criterion) {
    use dirgrep::walker::{CycleCoordinator, FrontierQueue};

    c.bench_function("cycle_report_did_work", |b| {
        // One worker reporting work: each report opens the next cycle, so
        // the following park never blocks and done is never declared
        let coordinator = CycleCoordinator::new(1);
        let queue = FrontierQueue::new();
        queue.enqueue("/pending".into());

        b.iter(|| {
            coordinator.park(0);
            coordinator.report(0, black_box(true), &queue);
        })
    });
}

criterion_group!(
    benches,
    benchmark_queue_operations,
    benchmark_path_joining,
    benchmark_cycle_report
);
criterion_main!(benches);
