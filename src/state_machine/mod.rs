// State machine module for the calling side of a batch job
//
// The progress client owns the step counter and walks
// Idle -> Running -> (Continuing | Completed | Failed), one step at a time.

pub mod errors;
pub mod events;
pub mod progress_client;
pub mod states;

// Re-export main types for convenient access
pub use errors::{StateMachineError, StateMachineResult};
pub use events::ProgressEvent;
pub use progress_client::{ProgressClient, ProgressSnapshot};
pub use states::ProgressState;
