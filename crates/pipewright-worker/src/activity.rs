// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The connector activity body.
//!
//! This is the side-effecting half of the durable split: blob reads and
//! writes, UUID minting, and the connector RPC all happen here, behind a
//! single history event per DAG node. Parameters and results carry only blob
//! keys, never payload bytes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use pipewright_blobstore::{BlobKey, BlobStore, put_connector_records};
use pipewright_connector::{ConnectorService, TriggerMetadata};

use crate::error::{ActivityError, WorkerError};

/// Parameters for one connector activity execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteConnectorRequest {
    /// Keys holding the rendered input batch.
    pub input_blob_keys: Vec<BlobKey>,
    /// Connector resource name to dispatch to.
    pub name: String,
    /// Owner permalink, for the outgoing authentication context.
    pub owner_permalink: String,
    /// Trigger metadata propagated to the connector service.
    pub metadata: TriggerMetadata,
}

/// Result of one connector activity execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteConnectorResponse {
    /// Keys holding the output batch, in input order.
    pub output_blob_keys: Vec<BlobKey>,
}

/// Executes one connector dispatch: load inputs, call the service, store
/// outputs.
pub struct ConnectorActivity {
    blobs: Arc<dyn BlobStore>,
    connector: Arc<dyn ConnectorService>,
}

impl ConnectorActivity {
    /// Create an activity over the given blob store and connector service.
    pub fn new(blobs: Arc<dyn BlobStore>, connector: Arc<dyn ConnectorService>) -> Self {
        Self { blobs, connector }
    }

    /// Run the activity body once.
    ///
    /// Reusing the request's blob keys keeps this idempotent under the
    /// durable runtime's retries; whether the connector deduplicates its own
    /// side effects is the connector's contract.
    pub async fn execute(
        &self,
        request: &ExecuteConnectorRequest,
    ) -> Result<ExecuteConnectorResponse, WorkerError> {
        debug!(name = %request.name, "connector activity started");

        let inputs = self.blobs.get(&request.input_blob_keys).await?;
        let outputs = self
            .connector
            .execute(&request.name, inputs, &request.metadata)
            .await
            .map_err(|err| {
                error!(name = %request.name, error = %err, "connector execution failed");
                WorkerError::Activity(ActivityError::Connector(err))
            })?;
        let output_blob_keys = put_connector_records(self.blobs.as_ref(), outputs).await?;

        debug!(name = %request.name, "connector activity completed");
        Ok(ExecuteConnectorResponse { output_blob_keys })
    }
}
