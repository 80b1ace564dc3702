use thiserror::Error;

/// Error types for progress state machine operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateMachineError {
    #[error("Invalid state transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },

    #[error("No active batch job; start one first")]
    NoActiveJob,

    #[error("Step {step} exceeds the invocation budget of {max_steps} for this job")]
    StepBudgetExceeded { step: u64, max_steps: u64 },
}

/// Result type alias for state machine operations
pub type StateMachineResult<T> = Result<T, StateMachineError>;

/// Helper function to create invalid transition errors
pub fn invalid_transition(from: impl ToString, event: impl Into<String>) -> StateMachineError {
    StateMachineError::InvalidTransition {
        from: from.to_string(),
        event: event.into(),
    }
}
