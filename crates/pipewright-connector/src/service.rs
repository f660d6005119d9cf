// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The connector service contract.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ConnectorError;
use crate::metadata::TriggerMetadata;

/// Executes a named connector resource over a batch of records.
///
/// One call per DAG node per trigger: the batch is the unit of dispatch, and
/// the service is expected to return exactly one output record per input
/// record, in input order.
#[async_trait]
pub trait ConnectorService: Send + Sync {
    /// Execute `name` over `inputs`, propagating the trigger metadata.
    async fn execute(
        &self,
        name: &str,
        inputs: Vec<Value>,
        metadata: &TriggerMetadata,
    ) -> Result<Vec<Value>, ConnectorError>;
}
