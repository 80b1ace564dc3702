//! # Configuration
//!
//! Deployment settings for the batch stepper. Sources, lowest precedence first:
//! built-in defaults, an optional TOML file, then `BATCH_*` environment
//! variables (`BATCH_PAGE_SIZE`, `BATCH_STEP_TIMEOUT_MS`, ...).

use crate::constants::{
    DEFAULT_MAX_TOTAL_LIMIT, DEFAULT_PAGE_SIZE, DEFAULT_STEP_TIMEOUT_MS, DEFAULT_TOTAL_LIMIT,
};
use crate::error::{BatchError, Result};
use crate::orchestration::types::FinalPageOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "BATCH";

/// Environment variable naming a TOML file to load
pub const CONFIG_PATH_ENV: &str = "BATCH_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Records per step; fixed for the lifetime of a deployment
    pub page_size: u64,
    /// Limit offered when a start request names none
    pub default_total_limit: u64,
    /// Largest total limit a request may ask for
    pub max_total_limit: u64,
    /// Time budget for one step; 0 disables the budget
    pub step_timeout_ms: u64,
    /// Records transformed concurrently within a page
    pub record_concurrency: usize,
    pub final_page_offset: FinalPageOffset,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_total_limit: DEFAULT_TOTAL_LIMIT,
            max_total_limit: DEFAULT_MAX_TOTAL_LIMIT,
            step_timeout_ms: DEFAULT_STEP_TIMEOUT_MS,
            record_concurrency: 1,
            final_page_offset: FinalPageOffset::default(),
        }
    }
}

impl BatchConfig {
    /// Load defaults overlaid with `BATCH_*` environment variables, plus the
    /// file named by `BATCH_CONFIG_PATH` when set.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        Self::load(path.as_deref())
    }

    /// Load defaults, then `path` (if given and present), then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_environment(
            path,
            config::Environment::with_prefix(ENV_PREFIX).try_parsing(true),
        )
    }

    fn load_with_environment(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading batch configuration file");
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }

        let config: BatchConfig = builder
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the planner and driver cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(BatchError::ConfigurationError(
                "page_size must be greater than zero".to_string(),
            ));
        }
        if self.record_concurrency == 0 {
            return Err(BatchError::ConfigurationError(
                "record_concurrency must be at least 1".to_string(),
            ));
        }
        if self.default_total_limit > self.max_total_limit {
            return Err(BatchError::ConfigurationError(format!(
                "default_total_limit {} exceeds max_total_limit {}",
                self.default_total_limit, self.max_total_limit
            )));
        }
        Ok(())
    }

    /// Step time budget, `None` when disabled
    pub fn step_timeout(&self) -> Option<Duration> {
        (self.step_timeout_ms > 0).then(|| Duration::from_millis(self.step_timeout_ms))
    }
}
