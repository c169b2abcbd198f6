//! Workload benchmarks.
//!
//! Runs every workload at small sizes against the in-memory and redb back
//! ends, so changes to the runner loop or a back end show up as throughput
//! regressions.

#![allow(missing_docs)]

use std::io;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use graphbench::progress::ProgressTracker;
use graphbench::{BenchConfig, Workload, WorkloadRunner, WorkloadSpec};
use graphbench_storage::backends::{MemoryFactory, RedbFactory};
use graphbench_storage::StorageFactory;

fn run_once<F: StorageFactory>(
    runner: &mut WorkloadRunner<io::Sink>,
    spec: &WorkloadSpec,
    factory: &F,
) {
    let report = runner.run(spec, factory).expect("run failed");
    black_box(report);
}

// ============================================================================
// Workload Benchmarks
// ============================================================================

fn workload_benchmarks(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let mut runner = WorkloadRunner::with_output(BenchConfig::new(dir.path()), io::sink());

    let mut group = c.benchmark_group("memory");
    for workload in Workload::ALL {
        for total in [1_000u64, 10_000] {
            let spec = WorkloadSpec::new(workload).total(total).batch_size(1_000).seed(Some(42));
            group.throughput(Throughput::Elements(total));
            group.bench_with_input(BenchmarkId::new(workload.name(), total), &spec, |b, spec| {
                b.iter(|| run_once(&mut runner, spec, &MemoryFactory));
            });
        }
    }
    group.finish();

    let mut group = c.benchmark_group("redb");
    group.sample_size(10);
    for workload in Workload::ALL {
        let total = 5_000;
        let spec = WorkloadSpec::new(workload).total(total).batch_size(1_000).seed(Some(42));
        group.throughput(Throughput::Elements(total));
        group.bench_with_input(BenchmarkId::new(workload.name(), total), &spec, |b, spec| {
            b.iter(|| run_once(&mut runner, spec, &RedbFactory::default()));
        });
    }
    group.finish();
}

// ============================================================================
// Progress Benchmarks
// ============================================================================

fn progress_benchmarks(c: &mut Criterion) {
    c.bench_function("progress_report", |b| {
        b.iter(|| {
            let mut progress = ProgressTracker::new(1_000_000, "vertices");
            for i in (0..1_000_000).step_by(10_000) {
                black_box(progress.report(i));
            }
        });
    });
}

criterion_group!(benches, workload_benchmarks, progress_benchmarks);
criterion_main!(benches);
