// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The top-level durable pipeline workflow.
//!
//! One trigger, one batch: load inputs, walk the DAG in topological order,
//! render and dispatch each node per item, write the batch of pipeline
//! outputs, emit exactly one usage data point. The walk is strictly
//! sequential by topological order; within a node, the batch is the unit of
//! dispatch (one activity per connector node, never one per item).

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use pipewright_blobstore::{BlobKey, BlobStore};
use pipewright_connector::{TriggerMetadata, TriggerMode};
use pipewright_operators::OperatorRegistry;
use pipewright_recipe::{Dag, DagNode, Recipe};
use pipewright_render::{ItemCache, render};

use crate::config::Config;
use crate::error::WorkerError;
use crate::proxy::ActivityProxy;
use crate::runtime::ActivityRunner;
use crate::telemetry::{TriggerStatus, UsageDataPoint, UsageSink};

/// A pipeline as resolved by the caller: identity plus recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    /// Pipeline id, unique per owner.
    pub id: String,
    /// Pipeline uid, globally unique.
    pub uid: Uuid,
    /// Owner permalink, e.g. `users/<uid>`.
    pub owner: String,
    /// The pipeline's recipe.
    pub recipe: Recipe,
}

/// One trigger of a pipeline over a batch of inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerRequest {
    /// The pipeline to execute.
    pub pipeline: Pipeline,
    /// Caller-provided keys holding the batch inputs.
    pub input_blob_keys: Vec<BlobKey>,
    /// Durable workflow execution id; also keys the response blobs.
    pub trigger_id: String,
    /// When the trigger was submitted.
    pub trigger_time: DateTime<Utc>,
    /// Submission mode.
    pub mode: TriggerMode,
}

/// Per-trigger execution state. Transitions advance monotonically; `Errored`
/// is terminal and the failing node is logged at the failure site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerState {
    /// Trigger accepted, nothing started.
    Pending,
    /// Building and ordering the DAG.
    Building,
    /// Executing a node.
    Running {
        /// The node being executed.
        component_id: String,
    },
    /// Writing pipeline response blobs.
    Writing,
    /// All outputs written.
    Completed,
    /// Failed; the error was surfaced to the durable runtime.
    Errored,
}

impl fmt::Display for TriggerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerState::Pending => f.write_str("pending"),
            TriggerState::Building => f.write_str("building"),
            TriggerState::Running { component_id } => write!(f, "running({})", component_id),
            TriggerState::Writing => f.write_str("writing"),
            TriggerState::Completed => f.write_str("completed"),
            TriggerState::Errored => f.write_str("errored"),
        }
    }
}

/// The durable pipeline workflow engine.
pub struct PipelineWorker {
    blobs: Arc<dyn BlobStore>,
    proxy: ActivityProxy,
    operators: OperatorRegistry,
    usage: Arc<dyn UsageSink>,
    config: Config,
}

impl PipelineWorker {
    /// Assemble a worker from its collaborators.
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        runner: Arc<dyn ActivityRunner>,
        operators: OperatorRegistry,
        usage: Arc<dyn UsageSink>,
        config: Config,
    ) -> Self {
        Self {
            proxy: ActivityProxy::new(blobs.clone(), runner),
            blobs,
            operators,
            usage,
            config,
        }
    }

    /// Execute one pipeline trigger.
    ///
    /// Outputs are returned by writing one
    /// `async_pipeline_response:<trigger-id>:<index>` blob per batch item.
    /// Exactly one usage data point is emitted, on success and on every
    /// error path alike.
    #[instrument(
        skip_all,
        fields(trigger_id = %request.trigger_id, pipeline_id = %request.pipeline.id)
    )]
    pub async fn trigger(&self, request: TriggerRequest) -> Result<(), WorkerError> {
        let started = Instant::now();
        let metadata = TriggerMetadata {
            pipeline_id: request.pipeline.id.clone(),
            pipeline_uid: request.pipeline.uid,
            owner: request.pipeline.owner.clone(),
            trigger_id: request.trigger_id.clone(),
            trigger_time: request.trigger_time,
            mode: request.mode,
        };
        info!("pipeline trigger started");

        let result = self.run(&request, &metadata).await;

        let data_point = UsageDataPoint {
            owner_uid: metadata.owner_uid().to_string(),
            pipeline_id: metadata.pipeline_id.clone(),
            pipeline_uid: metadata.pipeline_uid,
            trigger_id: metadata.trigger_id.clone(),
            trigger_time: metadata.trigger_time,
            trigger_mode: metadata.mode,
            compute_seconds: started.elapsed().as_secs_f64(),
            status: match &result {
                Ok(()) => TriggerStatus::Completed,
                Err(_) => TriggerStatus::Errored,
            },
        };
        if let Err(err) = self.usage.write(data_point).await {
            warn!(error = %err, "failed to write usage data point");
        }

        match &result {
            Ok(()) => info!("pipeline trigger completed"),
            Err(err) => error!(
                code = err.error_code(),
                error = %err,
                "pipeline trigger errored"
            ),
        }
        result
    }

    async fn run(
        &self,
        request: &TriggerRequest,
        metadata: &TriggerMetadata,
    ) -> Result<(), WorkerError> {
        let mut state = TriggerState::Pending;

        advance(&mut state, TriggerState::Building);
        let dag = Dag::build(&request.pipeline.recipe)?;
        let ordered = dag.topological_order();

        let inputs = self.blobs.get(&request.input_blob_keys).await?;
        let batch_size = inputs.len();
        if batch_size > self.config.max_batch_size {
            return Err(WorkerError::BatchTooLarge {
                size: batch_size,
                max: self.config.max_batch_size,
            });
        }

        // The start operator holds each item's original input as its output.
        let start_id = dag.start_id();
        let mut caches: Vec<ItemCache> = inputs
            .into_iter()
            .map(|input| ItemCache::for_start_input(start_id, input))
            .collect();

        let mut response_component_id: Option<String> = None;
        for node in ordered.iter().skip(1) {
            let component = &node.component;
            advance(
                &mut state,
                TriggerState::Running {
                    component_id: component.id.clone(),
                },
            );

            let step = self
                .run_component(node, metadata, request, &mut caches, batch_size)
                .await;
            match step {
                Ok(is_response) => {
                    if is_response {
                        response_component_id = Some(component.id.clone());
                    }
                }
                Err(err) => {
                    advance(&mut state, TriggerState::Errored);
                    error!(component_id = %component.id, error = %err, "component failed");
                    return Err(err);
                }
            }
        }

        advance(&mut state, TriggerState::Writing);
        let mut entries = Vec::with_capacity(batch_size);
        for (index, cache) in caches.iter().enumerate() {
            let output = match &response_component_id {
                Some(id) => cache
                    .get(id)
                    .and_then(|record| record.get("body"))
                    .cloned()
                    .unwrap_or_else(|| json!({})),
                None => json!({}),
            };
            entries.push((
                BlobKey::pipeline_response(&request.trigger_id, index),
                output,
            ));
        }
        self.blobs.put(entries).await?;

        advance(&mut state, TriggerState::Completed);
        Ok(())
    }

    /// Execute one non-start node over the full batch. Returns whether this
    /// node is the pipeline's response component.
    async fn run_component(
        &self,
        node: &DagNode,
        metadata: &TriggerMetadata,
        request: &TriggerRequest,
        caches: &mut [ItemCache],
        batch_size: usize,
    ) -> Result<bool, WorkerError> {
        let component = &node.component;

        let mut rendered = Vec::with_capacity(batch_size);
        for cache in caches.iter() {
            rendered.push(render(&node.template, cache)?);
        }

        if component.is_connector() {
            let outputs = self
                .proxy
                .invoke(component, &request.pipeline.owner, metadata, rendered)
                .await?;
            store_outputs(caches, &component.id, outputs);
            return Ok(false);
        }

        if component.is_end() {
            // The end operator's rendered inputs become the pipeline output.
            store_outputs(caches, &component.id, rendered);
            return Ok(true);
        }

        let operator = self.operators.get(&component.definition_name).ok_or_else(|| {
            WorkerError::UnknownOperator {
                definition_name: component.definition_name.clone(),
            }
        })?;
        let outputs = operator.execute(rendered)?;
        if outputs.len() != batch_size {
            return Err(WorkerError::Internal(format!(
                "operator '{}' returned {} outputs for {} inputs",
                component.definition_name,
                outputs.len(),
                batch_size
            )));
        }
        store_outputs(caches, &component.id, outputs);
        Ok(false)
    }
}

fn store_outputs(caches: &mut [ItemCache], component_id: &str, outputs: Vec<Value>) {
    for (cache, output) in caches.iter_mut().zip(outputs) {
        cache.insert(component_id, output);
    }
}

fn advance(state: &mut TriggerState, next: TriggerState) {
    debug!(from = %state, to = %next, "trigger state advanced");
    *state = next;
}
