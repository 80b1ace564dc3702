//! # Batch Runner
//!
//! Drives a batch job to completion over a seeded in-memory store, one step
//! at a time, and prints the final progress snapshot as JSON.

use batch_stepper::config::BatchConfig;
use batch_stepper::error::BatchError;
use batch_stepper::logging::init_structured_logging;
use batch_stepper::models::Record;
use batch_stepper::store::{InMemoryRecordStore, MarkerTransformer};
use batch_stepper::web::{BatchAppState, StartRequest};
use chrono::{Duration, Utc};
use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "batch-runner")]
#[command(about = "Run a resumable batch job over a seeded in-memory collection")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Number of records to seed
    #[arg(short, long, default_value_t = 250)]
    records: i64,

    /// Maximum number of records the job may touch (configured default when omitted)
    #[arg(short, long)]
    limit: Option<u64>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    init_structured_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(error = %e, "Batch run failed");
        eprintln!("batch run failed: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> batch_stepper::Result<()> {
    let config = match cli.config.as_deref() {
        Some(path) => BatchConfig::load(Some(path))?,
        None => BatchConfig::from_env()?,
    };

    let store = Arc::new(seed_store(cli.records)?);
    let state = BatchAppState::new(
        config,
        store.clone(),
        Arc::new(MarkerTransformer::new(store.clone())),
    )?;

    let total_limit = StartRequest {
        total_limit: cli.limit,
    }
    .resolve_total_limit(state.config())?;

    let mut client = state.progress_client();
    let snapshot = client.run_to_completion(total_limit).await?;
    info!(
        steps = snapshot.step,
        applied = snapshot.records_applied,
        marked = store.marked_ids().len(),
        "Batch run finished"
    );

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Seed `count` records, one minute apart, ending now
fn seed_store(count: i64) -> batch_stepper::Result<InMemoryRecordStore> {
    let count = count.max(0);
    let first = Duration::try_minutes(count)
        .and_then(|span| Utc::now().checked_sub_signed(span))
        .ok_or_else(|| {
            BatchError::ValidationError(format!("cannot seed {count} records: time span out of range"))
        })?;

    Ok(InMemoryRecordStore::with_records((0..count).map(|id| {
        let created_at = first + Duration::minutes(id);
        Record::new(id, format!("Record {id}"), created_at)
    })))
}
