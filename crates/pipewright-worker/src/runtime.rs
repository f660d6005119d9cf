// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The durable runtime contract for activity execution.
//!
//! The workflow orchestrator never calls an activity body directly; it hands
//! the request to an [`ActivityRunner`], which owns timeouts, the retry
//! policy, and cancellation. In production that seam is the durable-workflow
//! runtime; [`RetryingRunner`] is the in-process implementation with the
//! same execution parameters.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::activity::{ConnectorActivity, ExecuteConnectorRequest, ExecuteConnectorResponse};
use crate::config::Config;
use crate::error::{ActivityError, WorkerError};

/// Execution parameters applied to every connector activity.
#[derive(Debug, Clone)]
pub struct ActivityOptions {
    /// Per-attempt start-to-close timeout.
    pub start_to_close: Duration,
    /// Maximum attempts before the failure surfaces (minimum 1).
    pub max_attempts: u32,
    /// Base delay for exponential backoff: `delay * 2^(attempt-1)`.
    pub retry_base_delay: Duration,
}

impl ActivityOptions {
    /// Derive activity options from the engine configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            start_to_close: config.max_workflow_timeout,
            max_attempts: config.max_activity_retry,
            retry_base_delay: config.retry_base_delay,
        }
    }
}

/// Executes connector activities on behalf of the workflow.
#[async_trait]
pub trait ActivityRunner: Send + Sync {
    /// Execute the connector activity, applying the runner's timeout and
    /// retry policy. Returns the final error once retries are exhausted.
    async fn execute_connector(
        &self,
        request: ExecuteConnectorRequest,
    ) -> Result<ExecuteConnectorResponse, WorkerError>;
}

/// In-process activity runner with timeout, retry, and cooperative
/// cancellation.
pub struct RetryingRunner {
    activity: ConnectorActivity,
    options: ActivityOptions,
    cancel: CancellationToken,
}

impl RetryingRunner {
    /// Create a runner that is never cancelled externally.
    pub fn new(activity: ConnectorActivity, options: ActivityOptions) -> Self {
        Self::with_cancellation(activity, options, CancellationToken::new())
    }

    /// Create a runner that halts in-flight retries when `cancel` fires.
    pub fn with_cancellation(
        activity: ConnectorActivity,
        options: ActivityOptions,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            activity,
            options,
            cancel,
        }
    }
}

#[async_trait]
impl ActivityRunner for RetryingRunner {
    async fn execute_connector(
        &self,
        request: ExecuteConnectorRequest,
    ) -> Result<ExecuteConnectorResponse, WorkerError> {
        let max_attempts = self.options.max_attempts.max(1);
        let mut delay = self.options.retry_base_delay;
        let mut attempt = 1u32;

        loop {
            if self.cancel.is_cancelled() {
                return Err(WorkerError::Activity(ActivityError::Cancelled));
            }

            let outcome = tokio::select! {
                _ = self.cancel.cancelled() => {
                    return Err(WorkerError::Activity(ActivityError::Cancelled));
                }
                outcome = tokio::time::timeout(
                    self.options.start_to_close,
                    self.activity.execute(&request),
                ) => outcome,
            };

            let err = match outcome {
                Ok(Ok(response)) => return Ok(response),
                Ok(Err(err)) => err,
                Err(_) => WorkerError::Activity(ActivityError::Timeout(
                    self.options.start_to_close,
                )),
            };

            if attempt >= max_attempts {
                warn!(
                    name = %request.name,
                    attempt,
                    error = %err,
                    "activity retries exhausted"
                );
                return Err(err);
            }
            warn!(
                name = %request.name,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "activity attempt failed, backing off"
            );

            tokio::select! {
                _ = self.cancel.cancelled() => {
                    return Err(WorkerError::Activity(ActivityError::Cancelled));
                }
                _ = tokio::time::sleep(delay) => {}
            }
            delay = delay.saturating_mul(2);
            attempt += 1;
        }
    }
}
