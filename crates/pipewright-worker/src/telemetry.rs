// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Usage telemetry and subscriber initialization.
//!
//! Exactly one [`UsageDataPoint`] is emitted per trigger, on every exit path.
//! A failed emission on the happy path is logged and does not fail the
//! trigger.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use pipewright_connector::TriggerMode;

use crate::error::WorkerError;

/// Final status of a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerStatus {
    /// The trigger completed and its outputs were written.
    Completed,
    /// The trigger failed; the error was returned to the durable runtime.
    Errored,
}

/// One usage record per workflow execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageDataPoint {
    /// Owner uid extracted from the owner permalink.
    pub owner_uid: String,
    /// Pipeline id.
    pub pipeline_id: String,
    /// Pipeline uid.
    pub pipeline_uid: Uuid,
    /// Durable workflow execution id for the trigger.
    pub trigger_id: String,
    /// When the trigger was submitted.
    pub trigger_time: DateTime<Utc>,
    /// Submission mode.
    pub trigger_mode: TriggerMode,
    /// Wall time spent on the trigger, in seconds.
    pub compute_seconds: f64,
    /// Final status.
    pub status: TriggerStatus,
}

/// Accepts usage data points. No response.
#[async_trait]
pub trait UsageSink: Send + Sync {
    /// Record one data point.
    async fn write(&self, data_point: UsageDataPoint) -> Result<(), WorkerError>;
}

/// Sink that emits data points as structured log events.
pub struct TracingUsageSink;

#[async_trait]
impl UsageSink for TracingUsageSink {
    async fn write(&self, data_point: UsageDataPoint) -> Result<(), WorkerError> {
        info!(
            owner_uid = %data_point.owner_uid,
            pipeline_id = %data_point.pipeline_id,
            pipeline_uid = %data_point.pipeline_uid,
            trigger_id = %data_point.trigger_id,
            compute_seconds = data_point.compute_seconds,
            status = ?data_point.status,
            "usage data point"
        );
        Ok(())
    }
}

/// Sink that records data points in memory, for embedded use and tests.
#[derive(Default)]
pub struct MemoryUsageSink {
    points: Mutex<Vec<UsageDataPoint>>,
}

impl MemoryUsageSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All data points recorded so far.
    pub fn recorded(&self) -> Vec<UsageDataPoint> {
        self.points.lock().expect("usage sink lock").clone()
    }
}

#[async_trait]
impl UsageSink for MemoryUsageSink {
    async fn write(&self, data_point: UsageDataPoint) -> Result<(), WorkerError> {
        self.points.lock().expect("usage sink lock").push(data_point);
        Ok(())
    }
}

/// Initialize the tracing subscriber.
///
/// Sets up a fmt layer writing to stderr with an `EnvFilter` that respects
/// `RUST_LOG` (default: info). Safe to call more than once; later calls are
/// no-ops.
pub fn init_subscriber() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);

    let _ = tracing_subscriber::registry().with(fmt).with(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_point(status: TriggerStatus) -> UsageDataPoint {
        UsageDataPoint {
            owner_uid: "uid-1".to_string(),
            pipeline_id: "pipe".to_string(),
            pipeline_uid: Uuid::new_v4(),
            trigger_id: "trigger-1".to_string(),
            trigger_time: Utc::now(),
            trigger_mode: TriggerMode::Async,
            compute_seconds: 0.25,
            status,
        }
    }

    #[tokio::test]
    async fn test_memory_sink_records_points() {
        let sink = MemoryUsageSink::new();
        sink.write(data_point(TriggerStatus::Completed)).await.unwrap();
        sink.write(data_point(TriggerStatus::Errored)).await.unwrap();

        let recorded = sink.recorded();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].status, TriggerStatus::Completed);
        assert_eq!(recorded[1].status, TriggerStatus::Errored);
    }

    #[test]
    fn test_status_serializes_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&TriggerStatus::Completed).unwrap(),
            r#""COMPLETED""#
        );
        assert_eq!(
            serde_json::to_string(&TriggerStatus::Errored).unwrap(),
            r#""ERRORED""#
        );
    }
}
