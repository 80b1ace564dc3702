//! Progress client integration tests
//!
//! Drives the trigger protocol end to end: start, advance, fail, retry and
//! cancel, checking the state machine and the snapshot after each move.

mod common;

use batch_stepper::config::BatchConfig;
use batch_stepper::error::BatchError;
use batch_stepper::orchestration::{BatchDriver, StepResult};
use batch_stepper::state_machine::{ProgressClient, ProgressState, StateMachineError};
use batch_stepper::store::MarkerTransformer;
use common::*;
use std::sync::Arc;

#[tokio::test]
async fn test_full_protocol_walk() {
    let store = seeded_store(100);
    let mut client = ProgressClient::new(marker_driver(&store, &BatchConfig::default()));
    assert_eq!(client.state(), ProgressState::Idle);

    let job = client.start(25).unwrap();
    assert_eq!(job.current_step, 1);
    assert_eq!(job.estimated_steps(), 3);
    assert_eq!(client.state(), ProgressState::Running);

    assert_eq!(client.advance().await.unwrap(), StepResult::Continue);
    assert_eq!(client.state(), ProgressState::Continuing);
    assert_eq!(client.current_step(), Some(2));

    assert_eq!(client.advance().await.unwrap(), StepResult::Continue);
    assert_eq!(client.current_step(), Some(3));

    assert_eq!(client.advance().await.unwrap(), StepResult::Done);
    assert_eq!(client.state(), ProgressState::Completed);
    assert_eq!(client.current_step(), Some(3));

    let snapshot = client.snapshot();
    assert_eq!(snapshot.step, 3);
    assert_eq!(snapshot.total_limit, 25);
    assert_eq!(snapshot.records_applied, 25);
    assert_eq!(snapshot.last_result, Some(StepResult::Done));
    assert!(snapshot.last_error.is_none());
}

#[tokio::test]
async fn test_advance_without_job_is_rejected() {
    let store = seeded_store(10);
    let mut client = ProgressClient::new(marker_driver(&store, &BatchConfig::default()));

    let error = client.advance().await.unwrap_err();
    assert!(matches!(
        error,
        BatchError::StateMachine(StateMachineError::NoActiveJob)
    ));
}

#[tokio::test]
async fn test_advance_after_completion_is_rejected() {
    let store = seeded_store(10);
    let mut client = ProgressClient::new(marker_driver(&store, &BatchConfig::default()));
    client.run_to_completion(5).await.unwrap();

    let error = client.advance().await.unwrap_err();
    assert!(matches!(
        error,
        BatchError::StateMachine(StateMachineError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn test_failed_step_is_retried_at_the_same_step() {
    let store = seeded_store(40);
    let driver = BatchDriver::new(
        &BatchConfig::default(),
        Arc::new(FlakySource::new(store.clone(), 1)),
        Arc::new(MarkerTransformer::new(store.clone())),
    )
    .unwrap();
    let mut client = ProgressClient::new(driver);
    client.start(30).unwrap();

    let error = client.advance().await.unwrap_err();
    assert!(matches!(error, BatchError::FetchFailure { .. }));
    assert_eq!(client.state(), ProgressState::Failed);
    assert_eq!(client.current_step(), Some(1));
    assert!(client.snapshot().last_error.is_some());

    // Advancing a failed job is not allowed; the caller must retry or cancel
    assert!(client.advance().await.is_err());

    assert_eq!(client.retry().await.unwrap(), StepResult::Continue);
    assert_eq!(client.state(), ProgressState::Continuing);
    assert_eq!(client.current_step(), Some(2));
    assert!(client.snapshot().last_error.is_none());
}

#[tokio::test]
async fn test_retry_after_apply_failure_skips_marked_records() {
    let store = seeded_store(40);
    let driver = BatchDriver::new(
        &BatchConfig::default(),
        store.clone(),
        Arc::new(FailOnceTransformer::new(store.clone(), [7])),
    )
    .unwrap();
    let mut client = ProgressClient::new(driver);
    client.start(30).unwrap();

    assert!(client.advance().await.is_err());
    client.retry().await.unwrap();

    let snapshot = client.snapshot();
    assert_eq!(store.marked_ids(), (0..10).collect::<Vec<_>>());
    assert_eq!(snapshot.records_applied, 10);
    assert_eq!(snapshot.records_skipped, 0);
}

#[tokio::test]
async fn test_counts_stay_exact_across_repeated_failures() {
    let store = seeded_store(40);
    let driver = BatchDriver::new(
        &BatchConfig::default(),
        store.clone(),
        Arc::new(FailOnceTransformer::new(store.clone(), [3, 7])),
    )
    .unwrap();
    let mut client = ProgressClient::new(driver);
    client.start(30).unwrap();

    assert!(client.advance().await.is_err());
    assert_eq!(client.snapshot().records_applied, 3);
    assert!(client.retry().await.is_err());
    assert_eq!(client.snapshot().records_applied, 7);
    assert_eq!(client.retry().await.unwrap(), StepResult::Continue);

    let snapshot = client.snapshot();
    assert_eq!(snapshot.records_applied, store.marked_ids().len() as u64);
    assert_eq!(snapshot.records_skipped, 0);
}

#[tokio::test]
async fn test_records_marked_before_the_job_count_as_skipped() {
    let store = seeded_store(40);
    store.set_marker_if_absent(2, "earlier run");
    let driver = BatchDriver::new(
        &BatchConfig::default(),
        store.clone(),
        Arc::new(FailOnceTransformer::new(store.clone(), [5])),
    )
    .unwrap();
    let mut client = ProgressClient::new(driver);
    client.start(30).unwrap();

    assert!(client.advance().await.is_err());
    client.retry().await.unwrap();

    let snapshot = client.snapshot();
    assert_eq!(snapshot.records_applied, 9);
    assert_eq!(snapshot.records_skipped, 1);
}

#[tokio::test]
async fn test_cancel_drops_the_job() {
    let store = seeded_store(100);
    let mut client = ProgressClient::new(marker_driver(&store, &BatchConfig::default()));
    client.start(50).unwrap();
    client.advance().await.unwrap();

    client.cancel().unwrap();
    assert_eq!(client.state(), ProgressState::Idle);
    assert!(client.job().is_none());
    assert_eq!(store.marked_ids().len(), 10);

    // Cancelling twice has nothing to cancel
    assert!(client.cancel().is_err());
}

#[tokio::test]
async fn test_restart_after_completion_begins_at_step_one() {
    let store = seeded_store(100);
    let mut client = ProgressClient::new(marker_driver(&store, &BatchConfig::default()));
    let first = client.run_to_completion(15).await.unwrap();

    let job_id = client.start(40).unwrap().job_id;
    assert_ne!(Some(job_id), first.job_id);
    assert_eq!(client.current_step(), Some(1));
    assert_eq!(client.snapshot().records_applied, 0);
}

#[tokio::test]
async fn test_snapshot_serializes_for_display() {
    let store = seeded_store(10);
    let mut client = ProgressClient::new(marker_driver(&store, &BatchConfig::default()));
    let snapshot = client.run_to_completion(0).await.unwrap();

    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value["state"], "completed");
    assert_eq!(value["estimated_steps"], 0);
    assert_eq!(value["last_result"], "done_empty");
}
