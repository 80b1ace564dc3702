#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Batch Stepper
//!
//! Resumable page-by-page batch processing.
//!
//! ## Overview
//!
//! A batch job walks a large, ordered collection of records in fixed-size
//! pages and applies an idempotent transformation to every record. Each page is
//! one short invocation (one HTTP round trip, one queue message, one loop
//! iteration), so a job can pause and resume across many invocations without
//! reprocessing or skipping records.
//!
//! ## Module Organization
//!
//! - [`orchestration`] - Step planning and single-step execution
//! - [`state_machine`] - The progress client that owns the step counter
//! - [`client`] - Traits for the page source and record transformer
//! - [`store`] - In-memory reference implementations of those traits
//! - [`web`] - Typed request/response types and the injectable service object
//! - [`config`] - Layered configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use batch_stepper::config::BatchConfig;
//! use batch_stepper::models::Record;
//! use batch_stepper::orchestration::BatchDriver;
//! use batch_stepper::state_machine::{ProgressClient, ProgressState};
//! use batch_stepper::store::{InMemoryRecordStore, MarkerTransformer};
//! use chrono::Utc;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> batch_stepper::Result<()> {
//! let store = Arc::new(InMemoryRecordStore::with_records(
//!     (0..25).map(|id| Record::new(id, format!("Post {id}"), Utc::now())),
//! ));
//! let driver = BatchDriver::new(
//!     &BatchConfig::default(),
//!     store.clone(),
//!     Arc::new(MarkerTransformer::new(store.clone())),
//! )?;
//!
//! let mut client = ProgressClient::new(driver);
//! let snapshot = client.run_to_completion(25).await?;
//! assert_eq!(snapshot.state, ProgressState::Completed);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod state_machine;
pub mod store;
pub mod utils;
pub mod validation;
pub mod web;

pub use client::{PageSource, RecordTransformer};
pub use config::BatchConfig;
pub use error::{BatchError, Result};
pub use models::{BatchJob, Record};
pub use orchestration::{
    BatchDriver, FinalPageOffset, PagePlan, PlanOutcome, StepOutcome, StepPlanner, StepResult,
    TransformOutcome,
};
pub use state_machine::{ProgressClient, ProgressEvent, ProgressSnapshot, ProgressState};
pub use web::{BatchAppState, StartRequest, StepRequest, StepResponse};
