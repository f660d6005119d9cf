// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The activity proxy: uniform call interface for a connector step.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use pipewright_blobstore::{BlobKey, BlobStore, put_connector_records};
use pipewright_connector::TriggerMetadata;
use pipewright_recipe::Component;

use crate::activity::ExecuteConnectorRequest;
use crate::error::WorkerError;
use crate::runtime::ActivityRunner;

/// Marshals a connector step's batch through the blob-indirection protocol.
///
/// Protocol per dispatch: store the rendered inputs under freshly minted
/// keys, invoke the durable activity with those keys, read the outputs from
/// the returned keys, then delete both key sets. Deletion always runs after
/// the output read and on every exit path once the activity was invoked;
/// failures there are logged and left to the TTL backstop.
pub struct ActivityProxy {
    blobs: Arc<dyn BlobStore>,
    runner: Arc<dyn ActivityRunner>,
}

impl ActivityProxy {
    /// Create a proxy over the given blob store and runner.
    pub fn new(blobs: Arc<dyn BlobStore>, runner: Arc<dyn ActivityRunner>) -> Self {
        Self { blobs, runner }
    }

    /// Orchestrate one connector dispatch for a full batch.
    pub async fn invoke(
        &self,
        component: &Component,
        owner: &str,
        metadata: &TriggerMetadata,
        inputs: Vec<Value>,
    ) -> Result<Vec<Value>, WorkerError> {
        let batch_size = inputs.len();
        let input_blob_keys = put_connector_records(self.blobs.as_ref(), inputs).await?;

        let request = ExecuteConnectorRequest {
            input_blob_keys: input_blob_keys.clone(),
            name: component.resource_name.clone(),
            owner_permalink: owner.to_string(),
            metadata: metadata.clone(),
        };
        let response = match self.runner.execute_connector(request).await {
            Ok(response) => response,
            Err(err) => {
                // The activity owns the output keys; the inputs are ours to
                // reclaim.
                self.delete_best_effort(&input_blob_keys).await;
                return Err(err);
            }
        };

        let outputs = self.blobs.get(&response.output_blob_keys).await;
        self.delete_best_effort(&input_blob_keys).await;
        self.delete_best_effort(&response.output_blob_keys).await;
        let outputs = outputs?;

        if outputs.len() != batch_size {
            return Err(WorkerError::Internal(format!(
                "connector '{}' returned {} outputs for {} inputs",
                component.resource_name,
                outputs.len(),
                batch_size
            )));
        }
        Ok(outputs)
    }

    async fn delete_best_effort(&self, keys: &[BlobKey]) {
        for key in keys {
            if let Err(err) = self.blobs.delete(key).await {
                warn!(key = %key, error = %err, "blob delete failed, TTL will reclaim it");
            }
        }
    }
}
