//! # Response Types
//!
//! Wire shape of a step's answer. Clients keep stepping while `done` is false
//! and stop on `{"done": true}` or `{"success": true}`.

use crate::orchestration::types::{StepOutcome, StepResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepResponse {
    /// Prior steps had already covered the job
    Covered { success: bool },
    Progress { done: bool },
}

impl StepResponse {
    /// Whether the client should stop issuing steps
    pub fn is_done(&self) -> bool {
        match self {
            Self::Covered { success } => *success,
            Self::Progress { done } => *done,
        }
    }
}

impl From<StepResult> for StepResponse {
    fn from(result: StepResult) -> Self {
        Self::Progress {
            done: result.is_done(),
        }
    }
}

impl From<&StepOutcome> for StepResponse {
    fn from(outcome: &StepOutcome) -> Self {
        if outcome.was_short_circuited() {
            Self::Covered { success: true }
        } else {
            outcome.result.into()
        }
    }
}
