//! # Progress Client
//!
//! The calling side of the trigger protocol. It owns the step counter, issues
//! one step at a time through the [`BatchDriver`], and walks
//! `Idle -> Running -> (Continuing | Completed | Failed)`.
//!
//! The client is transport-agnostic: `advance` can be called once per HTTP
//! round trip, once per queue message, or in a local loop via
//! [`ProgressClient::run_to_completion`]. Taking `&mut self` keeps steps
//! strictly sequential.

use super::errors::{invalid_transition, StateMachineError, StateMachineResult};
use super::events::ProgressEvent;
use super::states::ProgressState;
use crate::constants::operations;
use crate::error::{BatchError, Result};
use crate::logging::{log_error, log_job_operation};
use crate::models::BatchJob;
use crate::orchestration::{BatchDriver, StepResult};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Point-in-time view of a job for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub job_id: Option<Uuid>,
    pub state: ProgressState,
    /// Next step to run, or the step that finished or failed last
    pub step: u64,
    /// `round(total_limit / page_size)`; fewer steps run if data runs out
    pub estimated_steps: u64,
    pub total_limit: u64,
    pub records_applied: u64,
    pub records_skipped: u64,
    pub last_result: Option<StepResult>,
    pub last_error: Option<String>,
}

#[derive(Debug)]
pub struct ProgressClient {
    driver: BatchDriver,
    state: ProgressState,
    job: Option<BatchJob>,
    records_applied: u64,
    records_skipped: u64,
    /// Records this job applied at the current step in attempts that failed;
    /// the retry finds them marked and they are not counted as skipped
    applied_before_retry: u64,
    last_result: Option<StepResult>,
    last_error: Option<String>,
}

impl ProgressClient {
    pub fn new(driver: BatchDriver) -> Self {
        Self {
            driver,
            state: ProgressState::default(),
            job: None,
            records_applied: 0,
            records_skipped: 0,
            applied_before_retry: 0,
            last_result: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }

    pub fn job(&self) -> Option<&BatchJob> {
        self.job.as_ref()
    }

    pub fn current_step(&self) -> Option<u64> {
        self.job.as_ref().map(|job| job.current_step)
    }

    /// Determine the target state for `event` from `current`
    pub fn determine_target_state(
        current: ProgressState,
        event: &ProgressEvent,
    ) -> StateMachineResult<ProgressState> {
        let target = match (current, event) {
            // A fresh start is allowed whenever no job is mid-walk
            (from, ProgressEvent::Start { .. }) if from.accepts_start() => ProgressState::Running,

            (ProgressState::Continuing, ProgressEvent::Invoke) => ProgressState::Running,

            (ProgressState::Running, ProgressEvent::StepContinued) => ProgressState::Continuing,
            (ProgressState::Running, ProgressEvent::StepCompleted(_)) => ProgressState::Completed,
            (ProgressState::Running, ProgressEvent::Fail(_)) => ProgressState::Failed,

            (ProgressState::Failed, ProgressEvent::Retry) => ProgressState::Running,

            (
                ProgressState::Running | ProgressState::Continuing | ProgressState::Failed,
                ProgressEvent::Cancel,
            ) => ProgressState::Idle,

            (from, event) => return Err(invalid_transition(from, event.event_type())),
        };

        Ok(target)
    }

    fn transition(&mut self, event: ProgressEvent) -> StateMachineResult<ProgressState> {
        let target = Self::determine_target_state(self.state, &event)?;
        debug!(
            from = %self.state,
            to = %target,
            event = event.event_type(),
            "Progress state transition"
        );
        self.state = target;
        Ok(target)
    }

    /// Begin a new job at step 1
    pub fn start(&mut self, total_limit: u64) -> Result<&BatchJob> {
        self.transition(ProgressEvent::Start { total_limit })?;

        let job = BatchJob::new(self.driver.page_size(), total_limit);
        log_job_operation(
            operations::JOB_STARTED,
            job.job_id,
            job.current_step,
            total_limit,
            &self.state.to_string(),
            None,
        );

        self.records_applied = 0;
        self.records_skipped = 0;
        self.applied_before_retry = 0;
        self.last_result = None;
        self.last_error = None;
        Ok(self.job.insert(job))
    }

    /// Run the current step and move the counter forward on `Continue`
    pub async fn advance(&mut self) -> Result<StepResult> {
        match self.state {
            ProgressState::Idle => return Err(StateMachineError::NoActiveJob.into()),
            ProgressState::Continuing => {
                self.transition(ProgressEvent::Invoke)?;
            }
            state if state.is_active() => {}
            other => return Err(invalid_transition(other, "invoke").into()),
        }
        self.run_current_step().await
    }

    /// Re-run the step that failed; its step number is unchanged
    pub async fn retry(&mut self) -> Result<StepResult> {
        self.transition(ProgressEvent::Retry)?;
        if let Some(job) = &self.job {
            log_job_operation(
                operations::STEP_RETRIED,
                job.job_id,
                job.current_step,
                job.total_limit,
                &self.state.to_string(),
                self.last_error.as_deref(),
            );
        }
        self.run_current_step().await
    }

    /// Stop issuing steps and drop the job
    pub fn cancel(&mut self) -> Result<()> {
        self.transition(ProgressEvent::Cancel)?;
        if let Some(job) = self.job.take() {
            log_job_operation(
                operations::JOB_CANCELLED,
                job.job_id,
                job.current_step,
                job.total_limit,
                &self.state.to_string(),
                None,
            );
        }
        Ok(())
    }

    /// Start a job and drive it until it completes or a step fails
    pub async fn run_to_completion(&mut self, total_limit: u64) -> Result<ProgressSnapshot> {
        self.start(total_limit)?;
        loop {
            if self.advance().await?.is_done() {
                return Ok(self.snapshot());
            }
        }
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            job_id: self.job.as_ref().map(|job| job.job_id),
            state: self.state,
            step: self.current_step().unwrap_or(0),
            estimated_steps: self.job.as_ref().map_or(0, BatchJob::estimated_steps),
            total_limit: self.job.as_ref().map_or(0, |job| job.total_limit),
            records_applied: self.records_applied,
            records_skipped: self.records_skipped,
            last_result: self.last_result,
            last_error: self.last_error.clone(),
        }
    }

    async fn run_current_step(&mut self) -> Result<StepResult> {
        let (job_id, step, total_limit, page_size, max_steps) = match &self.job {
            Some(job) => (
                job.job_id,
                job.current_step,
                job.total_limit,
                job.page_size,
                job.max_invocations(),
            ),
            None => return Err(StateMachineError::NoActiveJob.into()),
        };

        let outcome = if step > max_steps {
            Err(BatchError::from(StateMachineError::StepBudgetExceeded {
                step,
                max_steps,
            }))
        } else {
            self.driver
                .run_step_detailed(step, total_limit, page_size)
                .await
        };

        match outcome {
            Ok(outcome) => {
                let skipped = (outcome.records_skipped as u64)
                    .saturating_sub(std::mem::take(&mut self.applied_before_retry));
                self.records_applied += outcome.records_applied as u64;
                self.records_skipped += skipped;
                self.last_result = Some(outcome.result);
                self.last_error = None;

                self.transition(ProgressEvent::from_step_result(outcome.result))?;
                if outcome.result.is_done() {
                    log_job_operation(
                        operations::JOB_COMPLETED,
                        job_id,
                        step,
                        total_limit,
                        &outcome.result.to_string(),
                        None,
                    );
                } else if let Some(job) = self.job.as_mut() {
                    job.advance_step();
                }
                Ok(outcome.result)
            }
            Err(error) => {
                if let BatchError::ApplyFailure { applied, .. } = &error {
                    self.records_applied += *applied as u64;
                    self.applied_before_retry += *applied as u64;
                }
                let message = error.to_string();
                self.transition(ProgressEvent::fail_with_error(message.clone()))?;
                log_error(
                    "progress_client",
                    operations::STEP_FAILED,
                    &message,
                    Some(error.kind()),
                );
                log_job_operation(
                    operations::JOB_FAILED,
                    job_id,
                    step,
                    total_limit,
                    &self.state.to_string(),
                    Some(if error.is_retryable() {
                        "retryable"
                    } else {
                        "not retryable"
                    }),
                );
                self.last_error = Some(message);
                Err(error)
            }
        }
    }
}
