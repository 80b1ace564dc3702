use crate::orchestration::types::StepResult;
use serde::{Deserialize, Serialize};

/// Events that drive progress state transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ProgressEvent {
    /// Begin a new job with the given total limit
    Start { total_limit: u64 },
    /// Schedule the next step after a `Continue`
    Invoke,
    /// The step finished and more pages remain
    StepContinued,
    /// The step finished and the job is over
    StepCompleted(StepResult),
    /// The step surfaced an error
    Fail(String),
    /// Re-run the failed step with the same step number
    Retry,
    /// Caller stops issuing steps
    Cancel,
}

impl ProgressEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Invoke => "invoke",
            Self::StepContinued => "step_continued",
            Self::StepCompleted(_) => "step_completed",
            Self::Fail(_) => "fail",
            Self::Retry => "retry",
            Self::Cancel => "cancel",
        }
    }

    /// Create a failure event with the given error message
    pub fn fail_with_error(error: impl Into<String>) -> Self {
        Self::Fail(error.into())
    }

    /// Map a step result onto the event it produces
    pub fn from_step_result(result: StepResult) -> Self {
        if result.is_done() {
            Self::StepCompleted(result)
        } else {
            Self::StepContinued
        }
    }
}
