use batch_stepper::config::BatchConfig;
use batch_stepper::models::Record;
use batch_stepper::orchestration::{BatchDriver, FinalPageOffset};
use batch_stepper::store::{InMemoryRecordStore, MarkerTransformer};
use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

/// Store holding `count` records with ids `0..count`, created one minute apart
pub fn seeded_store(count: u64) -> Arc<InMemoryRecordStore> {
    let base = Utc.with_ymd_and_hms(2015, 6, 1, 12, 0, 0).unwrap();
    let count = i64::try_from(count).unwrap();
    Arc::new(InMemoryRecordStore::with_records((0..count).map(|id| {
        Record::new(id, format!("Post {id}"), base + Duration::minutes(id))
    })))
}

pub fn config_with(final_page_offset: FinalPageOffset) -> BatchConfig {
    BatchConfig {
        final_page_offset,
        ..Default::default()
    }
}

/// Driver over `store` using the marker transformer
pub fn marker_driver(store: &Arc<InMemoryRecordStore>, config: &BatchConfig) -> BatchDriver {
    BatchDriver::new(
        config,
        store.clone(),
        Arc::new(MarkerTransformer::new(store.clone())),
    )
    .unwrap()
}
