//! # Marker Transformer
//!
//! Stamps each record with its own title, once. A record whose marker is
//! already set is left untouched, which makes re-running a step harmless.

use super::memory::InMemoryRecordStore;
use crate::client::RecordTransformer;
use crate::models::Record;
use crate::orchestration::types::TransformOutcome;
use anyhow::anyhow;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct MarkerTransformer {
    store: Arc<InMemoryRecordStore>,
}

impl MarkerTransformer {
    pub fn new(store: Arc<InMemoryRecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RecordTransformer for MarkerTransformer {
    async fn apply(&self, record: &Record) -> anyhow::Result<TransformOutcome> {
        // The page copy may be stale; the store holds the authoritative marker
        match self.store.set_marker_if_absent(record.id, &record.title) {
            Some(true) => Ok(TransformOutcome::Applied),
            Some(false) => Ok(TransformOutcome::AlreadyApplied),
            None => Err(anyhow!("record {} no longer exists", record.id)),
        }
    }

    fn transformer_name(&self) -> &'static str {
        "marker"
    }
}
