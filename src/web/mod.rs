//! # Transport Boundary
//!
//! Typed requests and responses for the trigger protocol, and the service
//! object transports call into. No server is bundled; HTTP handlers, queue
//! consumers or CLIs wrap [`BatchAppState`].

pub mod request;
pub mod response_types;
pub mod state;

pub use request::{StartRequest, StepRequest};
pub use response_types::StepResponse;
pub use state::BatchAppState;
