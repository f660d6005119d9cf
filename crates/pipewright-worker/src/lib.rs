// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Durable pipeline workflow engine.
//!
//! A trigger submits a batch of input records against a pipeline recipe. The
//! engine builds the recipe's DAG, walks it in deterministic topological
//! order, renders each component's configuration per batch item against the
//! trigger's result caches, dispatches connector steps through the durable
//! activity protocol, and finally writes the batch of pipeline outputs under
//! `async_pipeline_response:<trigger-id>:<index>` keys for the caller.
//!
//! # Durable workflow boundary
//!
//! The orchestrator in [`workflow`] is a single logical thread of durable
//! execution: between activity suspension points it is pure and
//! deterministic. Everything non-deterministic — blob I/O, UUID minting,
//! wall-clock reads, RPC, telemetry — happens inside the activity body
//! ([`activity`]) or in side-effect sinks, so the durable runtime can replay
//! workflow history after a crash and land in the same state.
//!
//! # Retries and idempotency
//!
//! Activities are retried by the runtime up to `MaxActivityRetry` attempts
//! with exponential backoff; the activity body is idempotent under retry
//! because blob keys are reused. Connector-side idempotency is NOT enforced
//! by this layer: a retried activity may re-execute the connector, and
//! deduplicating those side effects is the connector's own contract.

pub mod activity;
pub mod config;
pub mod error;
pub mod proxy;
pub mod runtime;
pub mod telemetry;
pub mod workflow;

pub use activity::{ConnectorActivity, ExecuteConnectorRequest, ExecuteConnectorResponse};
pub use config::{Config, ConfigError};
pub use error::{ActivityError, WorkerError};
pub use proxy::ActivityProxy;
pub use runtime::{ActivityOptions, ActivityRunner, RetryingRunner};
pub use telemetry::{
    MemoryUsageSink, TracingUsageSink, TriggerStatus, UsageDataPoint, UsageSink,
};
pub use workflow::{Pipeline, PipelineWorker, TriggerRequest, TriggerState};
