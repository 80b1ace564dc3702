//! # Batch Job Model
//!
//! Caller-held description of one walk over the collection. Nothing here is
//! persisted by the core; the step counter lives with the caller and is only
//! ever moved forward by the progress client.

use crate::orchestration::step_planner::StepPlanner;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchJob {
    pub job_id: Uuid,
    pub page_size: u64,
    pub total_limit: u64,
    /// 1-based, monotonically non-decreasing
    pub current_step: u64,
    pub started_at: DateTime<Utc>,
}

impl BatchJob {
    pub fn new(page_size: u64, total_limit: u64) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            page_size,
            total_limit,
            current_step: 1,
            started_at: Utc::now(),
        }
    }

    /// Advisory step count shown to operators: `round(total_limit / page_size)`.
    ///
    /// Fewer steps run when the collection holds fewer records than the limit,
    /// and a partial last page can add one more.
    pub fn estimated_steps(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        let doubled = u128::from(self.total_limit) * 2 + u128::from(self.page_size);
        (doubled / (u128::from(self.page_size) * 2)) as u64
    }

    /// Upper bound on invocations before the job must have finished
    pub fn max_invocations(&self) -> u64 {
        StepPlanner::max_invocations(self.total_limit, self.page_size)
    }

    pub(crate) fn advance_step(&mut self) {
        self.current_step += 1;
    }
}
