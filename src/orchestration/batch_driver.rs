//! # Batch Driver
//!
//! Runs one step of a batch job: plan the page, fetch it, transform every
//! record in it and report whether the caller should continue.
//!
//! The driver is stateless between invocations. It never retries; a failed
//! step surfaces as [`BatchError::FetchFailure`], [`BatchError::ApplyFailure`]
//! or [`BatchError::StepTimeout`] and the caller may re-invoke the same step.
//! Records transformed before the failure are skipped on the retry by the
//! transformer's own marker check.

use super::step_planner::StepPlanner;
use super::types::{PagePlan, PlanOutcome, StepOutcome, StepResult, TransformOutcome};
use crate::client::{PageSource, RecordTransformer};
use crate::config::BatchConfig;
use crate::constants::operations;
use crate::error::{BatchError, Result};
use crate::logging::log_step_operation;
use crate::models::Record;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

/// Executes single steps against a page source and a record transformer
#[derive(Clone)]
pub struct BatchDriver {
    planner: StepPlanner,
    source: Arc<dyn PageSource>,
    transformer: Arc<dyn RecordTransformer>,
    page_size: u64,
    record_concurrency: usize,
    step_timeout: Option<Duration>,
}

impl std::fmt::Debug for BatchDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchDriver")
            .field("planner", &self.planner)
            .field("source", &self.source.source_name())
            .field("transformer", &self.transformer.transformer_name())
            .field("page_size", &self.page_size)
            .field("record_concurrency", &self.record_concurrency)
            .field("step_timeout", &self.step_timeout)
            .finish()
    }
}

/// Counts for one fetched page
#[derive(Debug, Default)]
struct PageTally {
    fetched: usize,
    applied: usize,
    skipped: usize,
}

impl BatchDriver {
    pub fn new(
        config: &BatchConfig,
        source: Arc<dyn PageSource>,
        transformer: Arc<dyn RecordTransformer>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            planner: StepPlanner::new(config.final_page_offset),
            source,
            transformer,
            page_size: config.page_size,
            record_concurrency: config.record_concurrency,
            step_timeout: config.step_timeout(),
        })
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Trigger protocol entry point: run `step` with the configured page size.
    ///
    /// Safe to repeat with identical arguments; steps must be issued one at a
    /// time in increasing order starting at 1.
    pub async fn advance(&self, step: u64, total_limit: u64) -> Result<StepResult> {
        self.run_step(step, total_limit, self.page_size).await
    }

    pub async fn run_step(&self, step: u64, total_limit: u64, page_size: u64) -> Result<StepResult> {
        Ok(self
            .run_step_detailed(step, total_limit, page_size)
            .await?
            .result)
    }

    /// Run one step and report what it did
    #[instrument(skip(self), fields(source = self.source.source_name()))]
    pub async fn run_step_detailed(
        &self,
        step: u64,
        total_limit: u64,
        page_size: u64,
    ) -> Result<StepOutcome> {
        let started = Instant::now();
        let outcome = self.planner.plan(step, total_limit, page_size)?;

        let plan = match outcome {
            PlanOutcome::AlreadyCovered { offset, .. } => {
                log_step_operation(
                    operations::STEP_SHORT_CIRCUITED,
                    step,
                    offset,
                    offset,
                    0,
                    0,
                    &StepResult::Done.to_string(),
                    None,
                );
                return Ok(StepOutcome {
                    result: StepResult::Done,
                    plan: outcome,
                    records_fetched: 0,
                    records_applied: 0,
                    records_skipped: 0,
                    duration: started.elapsed(),
                });
            }
            PlanOutcome::Fetch(plan) => plan,
        };

        self.check_plan(&plan, page_size)?;

        debug!(
            operation = operations::STEP_PLANNED,
            offset = plan.offset,
            fetch_offset = plan.fetch_offset,
            effective_page_size = plan.effective_page_size,
            is_final_page = plan.is_final_page,
            "Planned step"
        );

        let work = self.execute_page(&plan);
        let tally = match self.step_timeout {
            Some(budget) => match timeout(budget, work).await {
                Ok(result) => result?,
                Err(_) => {
                    warn!(step, timeout = ?budget, "Step exceeded its time budget");
                    return Err(BatchError::StepTimeout {
                        step,
                        timeout_ms: u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
                    });
                }
            },
            None => work.await?,
        };

        let result = if tally.fetched == 0 {
            StepResult::DoneEmpty
        } else if plan.is_final_page {
            StepResult::Done
        } else {
            StepResult::Continue
        };

        let duration = started.elapsed();

        log_step_operation(
            operations::STEP_COMPLETED,
            step,
            plan.offset,
            plan.fetch_offset,
            plan.effective_page_size,
            tally.fetched,
            &result.to_string(),
            Some(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)),
        );

        Ok(StepOutcome {
            result,
            plan: outcome,
            records_fetched: tally.fetched,
            records_applied: tally.applied,
            records_skipped: tally.skipped,
            duration,
        })
    }

    /// Reject plans that would break the page-size invariants
    fn check_plan(&self, plan: &PagePlan, page_size: u64) -> Result<()> {
        if plan.effective_page_size > page_size {
            return Err(BatchError::InvalidPlan(format!(
                "effective page size {} exceeds page size {page_size} at step {}",
                plan.effective_page_size, plan.step
            )));
        }
        if plan.is_empty() && !plan.is_final_page {
            return Err(BatchError::InvalidPlan(format!(
                "empty page planned for non-final step {}",
                plan.step
            )));
        }
        Ok(())
    }

    /// Fetch the planned page and transform every record in it
    async fn execute_page(&self, plan: &PagePlan) -> Result<PageTally> {
        // A zero-sized page holds no records; the source is not consulted
        if plan.is_empty() {
            return Ok(PageTally::default());
        }

        let records = self
            .source
            .fetch(plan.effective_page_size, plan.fetch_offset)
            .await
            .map_err(|e| BatchError::FetchFailure {
                offset: plan.fetch_offset,
                page_size: plan.effective_page_size,
                reason: format!("{e:#}"),
            })?;

        self.apply_all(&records).await
    }

    /// Transform every record of a page, at most `record_concurrency` at a time.
    ///
    /// After the first failure no further records are started; transforms
    /// already in flight are drained so the failure reports every record the
    /// page actually touched.
    async fn apply_all(&self, records: &[Record]) -> Result<PageTally> {
        let mut tally = PageTally {
            fetched: records.len(),
            ..Default::default()
        };
        let limit = self.record_concurrency.max(1);
        let mut pending = records.iter();
        let mut in_flight = FuturesUnordered::new();
        let mut failure: Option<(i64, String)> = None;

        loop {
            while failure.is_none() && in_flight.len() < limit {
                match pending.next() {
                    Some(record) => in_flight.push(self.apply_one(record)),
                    None => break,
                }
            }

            let Some((record_id, outcome)) = in_flight.next().await else {
                break;
            };
            match outcome {
                Ok(TransformOutcome::Applied) => tally.applied += 1,
                Ok(TransformOutcome::AlreadyApplied) => tally.skipped += 1,
                Err(e) => {
                    failure.get_or_insert_with(|| (record_id, format!("{e:#}")));
                }
            }
        }

        match failure {
            Some((record_id, reason)) => Err(BatchError::ApplyFailure {
                record_id,
                applied: tally.applied,
                skipped: tally.skipped,
                reason,
            }),
            None => Ok(tally),
        }
    }

    async fn apply_one(&self, record: &Record) -> (i64, anyhow::Result<TransformOutcome>) {
        (record.id, self.transformer.apply(record).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestration::types::FinalPageOffset;
    use crate::store::{InMemoryRecordStore, MarkerTransformer};
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};

    fn seeded_store(count: i64) -> Arc<InMemoryRecordStore> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Arc::new(InMemoryRecordStore::with_records((0..count).map(|i| {
            Record::new(i, format!("Post {i}"), base + ChronoDuration::seconds(i))
        })))
    }

    fn driver_for(store: &Arc<InMemoryRecordStore>, config: &BatchConfig) -> BatchDriver {
        BatchDriver::new(
            config,
            store.clone(),
            Arc::new(MarkerTransformer::new(store.clone())),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_full_page_continues() {
        let store = seeded_store(100);
        let driver = driver_for(&store, &BatchConfig::default());

        let outcome = driver.run_step_detailed(1, 25, 10).await.unwrap();
        assert_eq!(outcome.result, StepResult::Continue);
        assert_eq!(outcome.records_fetched, 10);
        assert_eq!(outcome.records_applied, 10);
        assert_eq!(store.marked_ids(), (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_final_page_reports_done() {
        let store = seeded_store(100);
        let config = BatchConfig {
            final_page_offset: FinalPageOffset::Exact,
            ..Default::default()
        };
        let driver = driver_for(&store, &config);

        for step in 1..=2 {
            assert_eq!(driver.advance(step, 25).await.unwrap(), StepResult::Continue);
        }
        assert_eq!(driver.advance(3, 25).await.unwrap(), StepResult::Done);
        assert_eq!(store.marked_ids(), (0..25).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_zero_limit_touches_nothing() {
        let store = seeded_store(5);
        let driver = driver_for(&store, &BatchConfig::default());

        let outcome = driver.run_step_detailed(1, 0, 10).await.unwrap();
        assert_eq!(outcome.result, StepResult::DoneEmpty);
        assert_eq!(outcome.records_fetched, 0);
        assert!(store.marked_ids().is_empty());
    }

    #[tokio::test]
    async fn test_already_covered_short_circuits() {
        let store = seeded_store(50);
        let driver = driver_for(&store, &BatchConfig::default());

        let outcome = driver.run_step_detailed(4, 20, 10).await.unwrap();
        assert_eq!(outcome.result, StepResult::Done);
        assert!(outcome.was_short_circuited());
        assert!(store.marked_ids().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_records_within_page() {
        let store = seeded_store(30);
        let config = BatchConfig {
            record_concurrency: 4,
            ..Default::default()
        };
        let driver = driver_for(&store, &config);

        let outcome = driver.run_step_detailed(1, 30, 10).await.unwrap();
        assert_eq!(outcome.records_applied, 10);
        assert_eq!(store.marked_ids().len(), 10);
    }

    #[tokio::test]
    async fn test_invalid_step_rejected_before_fetch() {
        let store = seeded_store(5);
        let driver = driver_for(&store, &BatchConfig::default());
        assert!(matches!(
            driver.advance(0, 10).await,
            Err(BatchError::InvalidPlan(_))
        ));
    }
}
