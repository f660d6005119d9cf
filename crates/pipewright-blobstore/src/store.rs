// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The blob store contract.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::BlobError;
use crate::key::BlobKey;

/// Out-of-band record cache shared by the workflow engine and its callers.
///
/// Every write carries the store's TTL; no ordering or consistency across
/// keys is required beyond per-key write-then-read monotonicity. Keys are
/// never overwritten by the engine on the happy path (fresh UUID plus index),
/// but a `put` to an existing key refreshes it so activity retries stay
/// idempotent.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store each record as canonical JSON under its key, with TTL.
    async fn put(&self, entries: Vec<(BlobKey, Value)>) -> Result<(), BlobError>;

    /// Fetch records in key order. Fails with [`BlobError::Missing`] if any
    /// key is absent or expired.
    async fn get(&self, keys: &[BlobKey]) -> Result<Vec<Value>, BlobError>;

    /// Delete a key. Idempotent; silent on absent keys.
    async fn delete(&self, key: &BlobKey) -> Result<(), BlobError>;
}

/// Store a connector activity's records under freshly minted keys.
///
/// One batch id per call, one key per record, returned in input order. This
/// is the only place connector-blob keys are minted, and it runs inside
/// side-effect scopes only — never in replayed workflow logic.
pub async fn put_connector_records(
    store: &dyn BlobStore,
    records: Vec<Value>,
) -> Result<Vec<BlobKey>, BlobError> {
    let batch_id = Uuid::new_v4();
    let entries: Vec<(BlobKey, Value)> = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| (BlobKey::connector_blob(batch_id, index), record))
        .collect();
    let keys = entries.iter().map(|(key, _)| key.clone()).collect();
    store.put(entries).await?;
    Ok(keys)
}
