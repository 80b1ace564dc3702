//! # Typed Requests
//!
//! Request bodies accepted at the transport boundary. Numeric fields accept
//! numbers or numeric strings; everything is validated before it reaches the
//! planner.

use crate::config::BatchConfig;
use crate::error::{BatchError, Result};
use crate::utils::serde::deserialize_flexible_u64;
use crate::validation::{validate_step_request, validate_total_limit};
use serde::{Deserialize, Serialize};

/// One invocation of the trigger protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRequest {
    #[serde(deserialize_with = "deserialize_flexible_u64")]
    pub step: u64,
    /// Also accepted as `steps`, the field name older clients send
    #[serde(alias = "steps", deserialize_with = "deserialize_flexible_u64")]
    pub total_limit: u64,
}

impl StepRequest {
    pub fn new(step: u64, total_limit: u64) -> Self {
        Self { step, total_limit }
    }

    /// Parse and validate a JSON body
    pub fn from_json(body: &str, config: &BatchConfig) -> Result<Self> {
        let request: Self = serde_json::from_str(body)?;
        request.validate(config)?;
        Ok(request)
    }

    pub fn validate(&self, config: &BatchConfig) -> Result<()> {
        validate_step_request(self.step, self.total_limit, config)
    }

    /// The request that follows this one after a `Continue`
    pub fn next(&self) -> Result<Self> {
        let step = self.step.checked_add(1).ok_or_else(|| {
            BatchError::ValidationError(format!("step {} has no successor", self.step))
        })?;
        Ok(Self {
            step,
            total_limit: self.total_limit,
        })
    }
}

/// Request to begin a new job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRequest {
    /// Falls back to the configured default when absent
    #[serde(default)]
    pub total_limit: Option<u64>,
}

impl StartRequest {
    /// The limit to use, validated against the deployment bound
    pub fn resolve_total_limit(&self, config: &BatchConfig) -> Result<u64> {
        let total_limit = self.total_limit.unwrap_or(config.default_total_limit);
        validate_total_limit(total_limit, config)?;
        Ok(total_limit)
    }

    /// The first step request of the job
    pub fn first_step(&self, config: &BatchConfig) -> Result<StepRequest> {
        Ok(StepRequest::new(1, self.resolve_total_limit(config)?))
    }
}
