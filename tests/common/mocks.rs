use anyhow::bail;
use async_trait::async_trait;
use batch_stepper::client::{PageSource, RecordTransformer};
use batch_stepper::models::Record;
use batch_stepper::orchestration::TransformOutcome;
use batch_stepper::store::{InMemoryRecordStore, MarkerTransformer};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Page source that fails its first `failures` fetches, then delegates
pub struct FlakySource {
    inner: Arc<InMemoryRecordStore>,
    remaining_failures: AtomicUsize,
    pub calls: Mutex<Vec<(u64, u64)>>,
}

impl FlakySource {
    pub fn new(inner: Arc<InMemoryRecordStore>, failures: usize) -> Self {
        Self {
            inner,
            remaining_failures: AtomicUsize::new(failures),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl PageSource for FlakySource {
    async fn fetch(&self, page_size: u64, offset: u64) -> anyhow::Result<Vec<Record>> {
        self.calls.lock().push((page_size, offset));
        let left = self.remaining_failures.load(Ordering::SeqCst);
        if left > 0 {
            self.remaining_failures.store(left - 1, Ordering::SeqCst);
            bail!("source unavailable");
        }
        self.inner.fetch(page_size, offset).await
    }
}

/// Page source that never answers within a short budget
pub struct SlowSource {
    pub delay: Duration,
}

#[async_trait]
impl PageSource for SlowSource {
    async fn fetch(&self, _page_size: u64, _offset: u64) -> anyhow::Result<Vec<Record>> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }
}

/// Marker transformer that fails once for each id in `fail_once`
pub struct FailOnceTransformer {
    inner: MarkerTransformer,
    fail_once: Mutex<HashSet<i64>>,
}

impl FailOnceTransformer {
    pub fn new(store: Arc<InMemoryRecordStore>, ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            inner: MarkerTransformer::new(store),
            fail_once: Mutex::new(ids.into_iter().collect()),
        }
    }
}

#[async_trait]
impl RecordTransformer for FailOnceTransformer {
    async fn apply(&self, record: &Record) -> anyhow::Result<TransformOutcome> {
        if self.fail_once.lock().remove(&record.id) {
            bail!("write conflict on record {}", record.id);
        }
        self.inner.apply(record).await
    }
}
