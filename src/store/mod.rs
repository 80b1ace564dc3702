//! # Record Stores
//!
//! Reference adapters for the [`crate::client`] traits, backed by memory.

pub mod marker;
pub mod memory;

pub use marker::MarkerTransformer;
pub use memory::InMemoryRecordStore;
