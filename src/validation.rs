//! Input validation for batch step requests
//!
//! Step and limit values come from the transport boundary (form fields, query
//! strings, message payloads). They are checked here before they reach the
//! step planner.

use crate::config::BatchConfig;
use crate::error::{BatchError, Result};

/// Validate a step number: steps are 1-based
pub fn validate_step(step: u64) -> Result<()> {
    if step == 0 {
        return Err(BatchError::ValidationError(
            "step must be 1 or greater".to_string(),
        ));
    }
    Ok(())
}

/// Validate a total limit against the deployment's bound
pub fn validate_total_limit(total_limit: u64, config: &BatchConfig) -> Result<()> {
    if total_limit > config.max_total_limit {
        return Err(BatchError::ValidationError(format!(
            "total limit {total_limit} exceeds the maximum of {}",
            config.max_total_limit
        )));
    }
    Ok(())
}

/// Validate that a step's offset `page_size * (step - 1)` fits the planner's
/// signed 64-bit arithmetic
pub fn validate_step_offset(step: u64, page_size: u64) -> Result<()> {
    let representable = page_size
        .checked_mul(step.saturating_sub(1))
        .is_some_and(|offset| i64::try_from(offset).is_ok());
    if !representable {
        return Err(BatchError::ValidationError(format!(
            "step {step} is out of range for page size {page_size}"
        )));
    }
    Ok(())
}

/// Run every check that applies to a `(step, total_limit)` pair
pub fn validate_step_request(step: u64, total_limit: u64, config: &BatchConfig) -> Result<()> {
    validate_step(step)?;
    validate_step_offset(step, config.page_size)?;
    validate_total_limit(total_limit, config)?;
    Ok(())
}
