//! # Client Foundation
//!
//! Traits that connect the batch core to a concrete data store.

pub mod traits;

pub use traits::{PageSource, RecordTransformer};
