use batch_stepper::config::BatchConfig;
use batch_stepper::models::Record;
use batch_stepper::orchestration::{BatchDriver, StepPlanner};
use batch_stepper::store::{InMemoryRecordStore, MarkerTransformer};
use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

fn benchmark_plan_step(c: &mut Criterion) {
    let planner = StepPlanner::default();
    c.bench_function("plan_step", |b| {
        b.iter(|| planner.plan(black_box(47), black_box(1000), black_box(10)))
    });
}

fn benchmark_plan_whole_job(c: &mut Criterion) {
    let planner = StepPlanner::default();
    c.bench_function("plan_whole_job", |b| {
        b.iter(|| {
            (1..=StepPlanner::max_invocations(100_000, 10))
                .filter_map(|step| planner.plan(step, black_box(100_000), 10).ok())
                .count()
        })
    });
}

fn benchmark_run_step(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let store = Arc::new(InMemoryRecordStore::with_records(
        (0..1_000).map(|id| Record::new(id, format!("Post {id}"), Utc::now())),
    ));
    let driver = BatchDriver::new(
        &BatchConfig::default(),
        store.clone(),
        Arc::new(MarkerTransformer::new(store)),
    )
    .unwrap();

    // Records stay marked after the first pass, so this measures the skip path
    c.bench_function("run_step_marked_page", |b| {
        b.iter(|| runtime.block_on(driver.advance(black_box(50), 1_000)))
    });
}

criterion_group!(
    benches,
    benchmark_plan_step,
    benchmark_plan_whole_job,
    benchmark_run_step
);
criterion_main!(benches);
