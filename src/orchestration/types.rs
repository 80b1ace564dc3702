//! # Orchestration Types
//!
//! Plans and results exchanged between the step planner, the batch driver and
//! the progress client.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Where the final page is fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalPageOffset {
    /// Fetch the final page one record past its accumulated offset.
    ///
    /// Long-standing behavior of deployed batch routines: the record at the
    /// final page's accumulated offset is not fetched and the window extends
    /// one record further.
    LegacyShift,
    /// Fetch the final page at its accumulated offset
    Exact,
}

impl Default for FinalPageOffset {
    fn default() -> Self {
        Self::LegacyShift
    }
}

impl fmt::Display for FinalPageOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LegacyShift => write!(f, "legacy_shift"),
            Self::Exact => write!(f, "exact"),
        }
    }
}

impl std::str::FromStr for FinalPageOffset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy_shift" => Ok(Self::LegacyShift),
            "exact" => Ok(Self::Exact),
            _ => Err(format!("Invalid final page offset policy: {s}")),
        }
    }
}

/// Page window for one step, computed fresh from (step, total limit, page size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagePlan {
    /// 1-based step this plan was computed for
    pub step: u64,
    /// Accumulated 0-based offset: the sum of all prior steps' page sizes
    pub offset: u64,
    /// Offset actually handed to the page source
    pub fetch_offset: u64,
    /// Number of records to request; below the page size only on the final page
    pub effective_page_size: u64,
    pub is_final_page: bool,
}

impl PagePlan {
    /// A plan that cannot touch any record
    pub fn is_empty(&self) -> bool {
        self.effective_page_size == 0
    }
}

/// What the planner decided for a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanOutcome {
    /// Prior steps already covered the whole job; do no work
    AlreadyCovered { step: u64, offset: u64 },
    /// Fetch and transform this page
    Fetch(PagePlan),
}

impl PlanOutcome {
    pub fn plan(&self) -> Option<&PagePlan> {
        match self {
            Self::Fetch(plan) => Some(plan),
            Self::AlreadyCovered { .. } => None,
        }
    }

    pub fn offset(&self) -> u64 {
        match self {
            Self::Fetch(plan) => plan.offset,
            Self::AlreadyCovered { offset, .. } => *offset,
        }
    }
}

/// Result of one step, reported back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepResult {
    /// More pages remain
    Continue,
    /// The final page was processed
    Done,
    /// The source had no records for this step
    DoneEmpty,
}

impl StepResult {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done | Self::DoneEmpty)
    }
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue => write!(f, "continue"),
            Self::Done => write!(f, "done"),
            Self::DoneEmpty => write!(f, "done_empty"),
        }
    }
}

/// Per-record result of a transformation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformOutcome {
    /// The record was changed by this call
    Applied,
    /// The record already carried the marker; nothing changed
    AlreadyApplied,
}

/// Detailed report of one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub result: StepResult,
    pub plan: PlanOutcome,
    /// Records returned by the page source
    pub records_fetched: usize,
    pub records_applied: usize,
    pub records_skipped: usize,
    pub duration: Duration,
}

impl StepOutcome {
    /// The step ended because prior steps had covered the job
    pub fn was_short_circuited(&self) -> bool {
        matches!(self.plan, PlanOutcome::AlreadyCovered { .. })
    }
}
