//! # Step Planner
//!
//! Maps `(step, total_limit, page_size)` onto the page a step should fetch.
//!
//! The planner is pure: it holds no state between invocations, so replaying a
//! step after a crash or a transport timeout yields the same window. Offsets
//! accumulate as `page_size * (step - 1)`; every non-final step is a full page,
//! so a step's offset always equals the sum of the page sizes before it.
//!
//! Two completion checks run before the page size is chosen:
//!
//! - **Already covered**: `offset > total_limit - 2 * page_size` and
//!   `page_size == offset - total_limit`. Only reachable for step numbers past
//!   the job's end (for example a hand-crafted request); kept so such requests
//!   finish without touching the source.
//! - **Final page**: the remaining budget `total_limit - offset` fits in a
//!   single page. The page shrinks to that budget (clamped at zero) and, under
//!   [`FinalPageOffset::LegacyShift`], is fetched one record further along.

use super::types::{FinalPageOffset, PagePlan, PlanOutcome};
use crate::error::{BatchError, Result};

/// Pure page planner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepPlanner {
    final_page_offset: FinalPageOffset,
}

impl StepPlanner {
    pub fn new(final_page_offset: FinalPageOffset) -> Self {
        Self { final_page_offset }
    }

    /// Compute the page for `step` of a job capped at `total_limit` records.
    pub fn plan(&self, step: u64, total_limit: u64, page_size: u64) -> Result<PlanOutcome> {
        if step == 0 {
            return Err(BatchError::InvalidPlan(
                "step numbers start at 1".to_string(),
            ));
        }
        if page_size == 0 {
            return Err(BatchError::InvalidPlan(
                "page size must be greater than zero".to_string(),
            ));
        }

        let offset = page_size
            .checked_mul(step - 1)
            .ok_or_else(|| BatchError::InvalidPlan(format!("offset overflow at step {step}")))?;

        let signed_offset = to_signed(offset)?;
        let signed_limit = to_signed(total_limit)?;
        let signed_page = to_signed(page_size)?;

        let near_end = signed_offset > signed_limit - signed_page.saturating_mul(2);
        if near_end && signed_page == signed_offset - signed_limit {
            return Ok(PlanOutcome::AlreadyCovered { step, offset });
        }

        let remaining = signed_limit - signed_offset;
        if remaining > signed_page {
            return Ok(PlanOutcome::Fetch(PagePlan {
                step,
                offset,
                fetch_offset: offset,
                effective_page_size: page_size,
                is_final_page: false,
            }));
        }

        // remaining <= page_size here, so the cast back cannot exceed page_size
        let effective_page_size = remaining.max(0) as u64;
        let fetch_offset = match self.final_page_offset {
            FinalPageOffset::LegacyShift => offset + 1,
            FinalPageOffset::Exact => offset,
        };

        Ok(PlanOutcome::Fetch(PagePlan {
            step,
            offset,
            fetch_offset,
            effective_page_size,
            is_final_page: true,
        }))
    }

    /// Number of invocations a job needs in the worst case: one per page plus
    /// the one that observes an empty page.
    pub fn max_invocations(total_limit: u64, page_size: u64) -> u64 {
        if page_size == 0 {
            return 1;
        }
        total_limit.div_ceil(page_size) + 1
    }
}

fn to_signed(value: u64) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| BatchError::InvalidPlan(format!("value {value} exceeds the planner range")))
}
