//! # Batch Application State
//!
//! The single service object a transport hands requests to. It is built once
//! at startup and shared (it is cheap to clone); it keeps no per-job state, so
//! any number of callers can drive independent jobs through it.

use super::request::{StartRequest, StepRequest};
use super::response_types::StepResponse;
use crate::client::{PageSource, RecordTransformer};
use crate::config::BatchConfig;
use crate::error::Result;
use crate::orchestration::BatchDriver;
use crate::state_machine::ProgressClient;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct BatchAppState {
    config: Arc<BatchConfig>,
    driver: BatchDriver,
}

impl BatchAppState {
    pub fn new(
        config: BatchConfig,
        source: Arc<dyn PageSource>,
        transformer: Arc<dyn RecordTransformer>,
    ) -> Result<Self> {
        let driver = BatchDriver::new(&config, source, transformer)?;
        Ok(Self {
            config: Arc::new(config),
            driver,
        })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// A progress client for a caller that drives its own loop
    pub fn progress_client(&self) -> ProgressClient {
        ProgressClient::new(self.driver.clone())
    }

    /// Resolve the first step of a new job
    pub fn start(&self, request: StartRequest) -> Result<StepRequest> {
        request.first_step(&self.config)
    }

    /// Validate and run one step
    pub async fn handle_step(&self, request: StepRequest) -> Result<StepResponse> {
        request.validate(&self.config)?;
        let outcome = self
            .driver
            .run_step_detailed(request.step, request.total_limit, self.config.page_size)
            .await?;
        debug!(
            step = request.step,
            result = %outcome.result,
            applied = outcome.records_applied,
            "Handled step request"
        );
        Ok(StepResponse::from(&outcome))
    }

    /// JSON in, JSON out
    pub async fn handle_json(&self, body: &str) -> Result<String> {
        let request = StepRequest::from_json(body, &self.config)?;
        let response = self.handle_step(request).await?;
        Ok(serde_json::to_string(&response)?)
    }
}
