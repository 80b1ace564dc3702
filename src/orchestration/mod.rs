//! # Orchestration Engine
//!
//! Planning and execution of single batch steps.
//!
//! ## Core Components
//!
//! - **StepPlanner**: pure mapping from `(step, total_limit, page_size)` to the page window
//! - **BatchDriver**: fetches the planned page, transforms each record and reports a [`StepResult`]
//!
//! Neither component keeps state between invocations. The step counter belongs
//! to the caller, see [`crate::state_machine::ProgressClient`].

pub mod batch_driver;
pub mod step_planner;
pub mod types;

// Re-export core types and components for easy access
pub use batch_driver::BatchDriver;
pub use step_planner::StepPlanner;
pub use types::{
    FinalPageOffset, PagePlan, PlanOutcome, StepOutcome, StepResult, TransformOutcome,
};
