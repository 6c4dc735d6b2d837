use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fleet_core::ErrorCode;
use probe_engine::{aggregate_probe_state, AgentProbeStatus, LifecycleState, Status};
use std::hint::black_box;
use uuid::Uuid;

fn reports(size: usize, state_for: impl Fn(usize) -> LifecycleState) -> Vec<AgentProbeStatus> {
    let probe_id = Uuid::new_v4();
    (0..size)
        .map(|i| {
            let state = state_for(i);
            let report = AgentProbeStatus::new(Uuid::new_v4(), probe_id, state);
            if state == LifecycleState::Failed {
                report.with_status(Status::new(ErrorCode::Internal, format!("agent {i} failed")))
            } else {
                report
            }
        })
        .collect()
}

/// Worst case is a fleet where nothing runs and every rule has to be checked.
fn benchmark_probe_state_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("probe_state_aggregation");

    for size in [1usize, 100, 1_000, 10_000].iter() {
        let all_failed = reports(*size, |_| LifecycleState::Failed);
        let mixed = reports(*size, |i| match i % 4 {
            0 => LifecycleState::Running,
            1 => LifecycleState::Pending,
            2 => LifecycleState::Failed,
            _ => LifecycleState::Unknown,
        });

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("all_failed", size), &all_failed, |b, r| {
            b.iter(|| black_box(aggregate_probe_state(r)));
        });
        group.bench_with_input(BenchmarkId::new("mixed", size), &mixed, |b, r| {
            b.iter(|| black_box(aggregate_probe_state(r)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_probe_state_aggregation);
criterion_main!(benches);
