//! # In-Memory Record Store
//!
//! Ordered collection of records kept oldest-first on `(created_at, id)`.
//! Implements [`PageSource`] and owns the marker check-and-set, so the marker
//! is protected by the store's own lock rather than by the batch core.

use crate::client::PageSource;
use crate::models::Record;
use async_trait::async_trait;
use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Vec<Record>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let store = Self::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Insert keeping oldest-first order; a record with an existing id replaces it
    pub fn insert(&self, record: Record) {
        let mut records = self.records.write();
        records.retain(|existing| existing.id != record.id);
        let position = records.partition_point(|existing| existing.sort_key() <= record.sort_key());
        records.insert(position, record);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn get(&self, id: i64) -> Option<Record> {
        self.records.read().iter().find(|record| record.id == id).cloned()
    }

    /// All records in page order
    pub fn snapshot(&self) -> Vec<Record> {
        self.records.read().clone()
    }

    /// Ids of records carrying a non-empty marker, in page order
    pub fn marked_ids(&self) -> Vec<i64> {
        self.records
            .read()
            .iter()
            .filter(|record| record.is_marked())
            .map(|record| record.id)
            .collect()
    }

    /// Atomically write `marker` if the record has none yet.
    ///
    /// Returns `Some(true)` when written, `Some(false)` when already marked and
    /// `None` when the record does not exist.
    pub fn set_marker_if_absent(&self, id: i64, marker: &str) -> Option<bool> {
        let mut records = self.records.write();
        let record = records.iter_mut().find(|record| record.id == id)?;
        if record.is_marked() {
            return Some(false);
        }
        record.marker = Some(marker.to_string());
        Some(true)
    }

    pub fn page(&self, page_size: u64, offset: u64) -> Vec<Record> {
        let records = self.records.read();
        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(page_size).unwrap_or(usize::MAX);
        records.iter().skip(start).take(take).cloned().collect()
    }
}

#[async_trait]
impl PageSource for InMemoryRecordStore {
    async fn fetch(&self, page_size: u64, offset: u64) -> anyhow::Result<Vec<Record>> {
        Ok(self.page(page_size, offset))
    }

    fn source_name(&self) -> &'static str {
        "in_memory"
    }
}
