// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Common test infrastructure for pipewright-worker integration tests.
//!
//! Provides an in-process harness: memory blob store, scripted connector
//! service, retrying runner, and a recording usage sink.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use pipewright_blobstore::{BlobKey, BlobStore, MemoryBlobStore};
use pipewright_connector::{ConnectorError, ConnectorService, TriggerMetadata, TriggerMode};
use pipewright_operators::OperatorRegistry;
use pipewright_recipe::{Component, END_OPERATOR, Recipe, START_OPERATOR};
use pipewright_worker::{
    ActivityOptions, Config, ConnectorActivity, MemoryUsageSink, Pipeline, PipelineWorker,
    RetryingRunner, TriggerRequest,
};

/// One recorded connector dispatch.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub name: String,
    pub inputs: Vec<Value>,
    pub trigger_id: String,
}

enum StubBehavior {
    /// Return the inputs unchanged.
    Echo,
    /// Fail every call with a 500.
    Fail,
    /// Sleep longer than any test timeout.
    Hang,
}

/// Scripted connector service that records every call.
pub struct StubConnectorService {
    behavior: StubBehavior,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubConnectorService {
    pub fn echo() -> Arc<Self> {
        Arc::new(Self {
            behavior: StubBehavior::Echo,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            behavior: StubBehavior::Fail,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn hanging() -> Arc<Self> {
        Arc::new(Self {
            behavior: StubBehavior::Hang,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConnectorService for StubConnectorService {
    async fn execute(
        &self,
        name: &str,
        inputs: Vec<Value>,
        metadata: &TriggerMetadata,
    ) -> Result<Vec<Value>, ConnectorError> {
        self.calls.lock().unwrap().push(RecordedCall {
            name: name.to_string(),
            inputs: inputs.clone(),
            trigger_id: metadata.trigger_id.clone(),
        });
        match self.behavior {
            StubBehavior::Echo => Ok(inputs),
            StubBehavior::Fail => Err(ConnectorError::Service {
                name: name.to_string(),
                status: 500,
                message: "stub failure".to_string(),
            }),
            StubBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(inputs)
            }
        }
    }
}

/// Fully wired in-process engine.
pub struct TestHarness {
    pub blobs: Arc<MemoryBlobStore>,
    pub connector: Arc<StubConnectorService>,
    pub usage: Arc<MemoryUsageSink>,
    pub worker: PipelineWorker,
    pub config: Config,
}

/// Engine configuration tuned for fast tests.
pub fn test_config() -> Config {
    Config {
        retry_base_delay: Duration::from_millis(1),
        ..Config::default()
    }
}

pub fn harness(connector: Arc<StubConnectorService>) -> TestHarness {
    let config = test_config();
    let options = ActivityOptions::from_config(&config);
    harness_full(connector, config, options, CancellationToken::new())
}

pub fn harness_with_cancel(
    connector: Arc<StubConnectorService>,
    cancel: CancellationToken,
) -> TestHarness {
    let config = test_config();
    let options = ActivityOptions::from_config(&config);
    harness_full(connector, config, options, cancel)
}

pub fn harness_with_options(
    connector: Arc<StubConnectorService>,
    options: ActivityOptions,
) -> TestHarness {
    harness_full(connector, test_config(), options, CancellationToken::new())
}

pub fn harness_full(
    connector: Arc<StubConnectorService>,
    config: Config,
    options: ActivityOptions,
    cancel: CancellationToken,
) -> TestHarness {
    let blobs = Arc::new(MemoryBlobStore::new(
        config.max_workflow_timeout,
        config.max_payload_size,
    ));
    let activity = ConnectorActivity::new(
        blobs.clone() as Arc<dyn BlobStore>,
        connector.clone() as Arc<dyn ConnectorService>,
    );
    let runner = Arc::new(RetryingRunner::with_cancellation(activity, options, cancel));
    let usage = Arc::new(MemoryUsageSink::new());
    let worker = PipelineWorker::new(
        blobs.clone() as Arc<dyn BlobStore>,
        runner,
        OperatorRegistry::with_builtins(),
        usage.clone(),
        config.clone(),
    );
    TestHarness {
        blobs,
        connector,
        usage,
        worker,
        config,
    }
}

// ============================================================================
// Recipe builders
// ============================================================================

pub fn component(id: &str, definition_name: &str, configuration: Value) -> Component {
    Component {
        id: id.to_string(),
        definition_name: definition_name.to_string(),
        resource_name: String::new(),
        configuration,
    }
}

pub fn connector(id: &str, resource_name: &str, configuration: Value) -> Component {
    Component {
        id: id.to_string(),
        definition_name: "connector".to_string(),
        resource_name: resource_name.to_string(),
        configuration,
    }
}

pub fn start_component() -> Component {
    component("start", START_OPERATOR, Value::Null)
}

pub fn end_component(configuration: Value) -> Component {
    component("end", END_OPERATOR, configuration)
}

pub fn recipe(components: Vec<Component>) -> Recipe {
    Recipe { components }
}

pub fn pipeline(recipe: Recipe) -> Pipeline {
    Pipeline {
        id: "test-pipeline".to_string(),
        uid: Uuid::new_v4(),
        owner: "users/owner-uid".to_string(),
        recipe,
    }
}

pub fn trigger_request(
    pipeline: Pipeline,
    input_blob_keys: Vec<BlobKey>,
    trigger_id: &str,
) -> TriggerRequest {
    TriggerRequest {
        pipeline,
        input_blob_keys,
        trigger_id: trigger_id.to_string(),
        trigger_time: Utc::now(),
        mode: TriggerMode::Async,
    }
}

// ============================================================================
// Blob helpers
// ============================================================================

/// Write batch inputs under caller-style keys, returning the keys.
pub async fn seed_inputs(blobs: &MemoryBlobStore, inputs: &[Value]) -> Vec<BlobKey> {
    let entries: Vec<(BlobKey, Value)> = inputs
        .iter()
        .enumerate()
        .map(|(index, input)| {
            (
                BlobKey::from(format!("pipeline_input:{}", index)),
                input.clone(),
            )
        })
        .collect();
    let keys = entries.iter().map(|(key, _)| key.clone()).collect();
    blobs.put(entries).await.expect("seed inputs");
    keys
}

/// Read the trigger's pipeline outputs back from response blobs.
pub async fn read_outputs(blobs: &MemoryBlobStore, trigger_id: &str, batch_size: usize) -> Vec<Value> {
    let keys: Vec<BlobKey> = (0..batch_size)
        .map(|index| BlobKey::pipeline_response(trigger_id, index))
        .collect();
    blobs.get(&keys).await.expect("read outputs")
}
