//! # Client Traits
//!
//! The two capabilities the batch core borrows from the outside world: reading
//! a page of records and applying the transformation to one record. Adapters
//! for a real data store implement these; [`crate::store`] ships in-memory
//! versions.

use crate::models::Record;
use crate::orchestration::types::TransformOutcome;
use async_trait::async_trait;

/// Source of ordered pages of records
///
/// Pages must be ordered oldest-first on a stable creation timestamp so that
/// offset pagination neither skips nor repeats records between invocations,
/// assuming no concurrent writes to the collection.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch up to `page_size` records starting at the 0-based `offset`.
    ///
    /// Returns an empty page once the collection is exhausted.
    async fn fetch(&self, page_size: u64, offset: u64) -> anyhow::Result<Vec<Record>>;

    /// Name used in logs
    fn source_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Idempotent per-record side effect
///
/// Implementations must check the record-level marker before mutating, so that
/// re-running a step (after a timeout, a crash or a failed sibling record) is a
/// no-op for records already handled.
#[async_trait]
pub trait RecordTransformer: Send + Sync {
    async fn apply(&self, record: &Record) -> anyhow::Result<TransformOutcome>;

    /// Name used in logs
    fn transformer_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
