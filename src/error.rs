//! Error types for the batch stepper.

use crate::state_machine::errors::StateMachineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    /// The page source was unavailable or returned a malformed page
    #[error("Fetch failure at offset {offset} (page size {page_size}): {reason}")]
    FetchFailure {
        offset: u64,
        page_size: u64,
        reason: String,
    },

    /// The transformer failed on a specific record; `applied` and `skipped`
    /// count the records of the page that finished before the step stopped
    #[error("Apply failure on record {record_id}: {reason}")]
    ApplyFailure {
        record_id: i64,
        applied: usize,
        skipped: usize,
        reason: String,
    },

    /// Planner invariants violated before any work was done
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    #[error("Step {step} exceeded its time budget of {timeout_ms}ms")]
    StepTimeout { step: u64, timeout_ms: u64 },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("State machine error: {0}")]
    StateMachine(#[from] StateMachineError),
}

impl BatchError {
    /// Whether re-invoking the same step may succeed.
    ///
    /// Records already transformed by a failed step are skipped on the retry
    /// because the transformer is idempotent.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::FetchFailure { .. } | Self::ApplyFailure { .. } | Self::StepTimeout { .. }
        )
    }

    /// Short machine-readable label used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FetchFailure { .. } => "fetch_failure",
            Self::ApplyFailure { .. } => "apply_failure",
            Self::InvalidPlan(_) => "invalid_plan",
            Self::StepTimeout { .. } => "step_timeout",
            Self::ValidationError(_) => "validation_error",
            Self::ConfigurationError(_) => "configuration_error",
            Self::StateMachine(_) => "state_machine",
        }
    }
}

impl From<serde_json::Error> for BatchError {
    fn from(error: serde_json::Error) -> Self {
        BatchError::ValidationError(format!("JSON serialization error: {error}"))
    }
}

impl From<config::ConfigError> for BatchError {
    fn from(error: config::ConfigError) -> Self {
        BatchError::ConfigurationError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BatchError>;
