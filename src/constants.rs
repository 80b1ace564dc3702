//! # System Constants
//!
//! Defaults and operation names that define the operational boundaries of the
//! batch stepper.

/// Records fetched per step unless configured otherwise
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Limit offered when a start request does not name one
pub const DEFAULT_TOTAL_LIMIT: u64 = 1000;

/// Upper bound accepted for a job's total limit
pub const DEFAULT_MAX_TOTAL_LIMIT: u64 = 1_000_000;

/// Time budget for one step
pub const DEFAULT_STEP_TIMEOUT_MS: u64 = 30_000;

/// Operation names used in structured log events
pub mod operations {
    pub const JOB_STARTED: &str = "job.started";
    pub const JOB_COMPLETED: &str = "job.completed";
    pub const JOB_FAILED: &str = "job.failed";
    pub const JOB_CANCELLED: &str = "job.cancelled";
    pub const STEP_PLANNED: &str = "step.planned";
    pub const STEP_COMPLETED: &str = "step.completed";
    pub const STEP_SHORT_CIRCUITED: &str = "step.short_circuited";
    pub const STEP_FAILED: &str = "step.failed";
    pub const STEP_RETRIED: &str = "step.retried";
}
