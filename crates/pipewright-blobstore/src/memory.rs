// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! In-memory blob store backend.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BlobError;
use crate::key::BlobKey;
use crate::store::BlobStore;

struct StoredBlob {
    payload: String,
    expires_at: Instant,
}

/// Process-local blob store for tests and embedded deployments.
///
/// Semantics match the Postgres backend: canonical JSON payloads, per-key
/// TTL, payload size limit, idempotent delete.
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, StoredBlob>>,
    ttl: Duration,
    max_payload_size: usize,
}

impl MemoryBlobStore {
    /// Create a store with the given TTL and payload limit.
    pub fn new(ttl: Duration, max_payload_size: usize) -> Self {
        Self {
            blobs: Mutex::new(HashMap::new()),
            ttl,
            max_payload_size,
        }
    }

    /// Number of live (unexpired) blobs currently held.
    pub fn live_count(&self) -> usize {
        let now = Instant::now();
        self.blobs
            .lock()
            .expect("blob map lock")
            .values()
            .filter(|blob| blob.expires_at > now)
            .count()
    }

    /// Keys of live blobs, for test assertions.
    pub fn live_keys(&self) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .blobs
            .lock()
            .expect("blob map lock")
            .iter()
            .filter(|(_, blob)| blob.expires_at > now)
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, entries: Vec<(BlobKey, Value)>) -> Result<(), BlobError> {
        let mut blobs = self.blobs.lock().expect("blob map lock");
        for (key, record) in entries {
            let payload = serde_json::to_string(&record)?;
            if payload.len() > self.max_payload_size {
                return Err(BlobError::PayloadTooLarge {
                    key: key.to_string(),
                    size: payload.len(),
                    max: self.max_payload_size,
                });
            }
            blobs.insert(
                key.to_string(),
                StoredBlob {
                    payload,
                    expires_at: Instant::now() + self.ttl,
                },
            );
        }
        Ok(())
    }

    async fn get(&self, keys: &[BlobKey]) -> Result<Vec<Value>, BlobError> {
        let blobs = self.blobs.lock().expect("blob map lock");
        let now = Instant::now();
        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            let blob = blobs
                .get(key.as_str())
                .filter(|blob| blob.expires_at > now)
                .ok_or_else(|| BlobError::Missing {
                    key: key.to_string(),
                })?;
            records.push(serde_json::from_str(&blob.payload)?);
        }
        Ok(records)
    }

    async fn delete(&self, key: &BlobKey) -> Result<(), BlobError> {
        self.blobs
            .lock()
            .expect("blob map lock")
            .remove(key.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::put_connector_records;
    use serde_json::json;

    fn store() -> MemoryBlobStore {
        MemoryBlobStore::new(Duration::from_secs(60), 1024)
    }

    #[tokio::test]
    async fn test_put_get_round_trip_preserves_order() {
        let store = store();
        let keys = vec![BlobKey::from("a"), BlobKey::from("b")];
        store
            .put(vec![
                (keys[0].clone(), json!({"x": 1})),
                (keys[1].clone(), json!({"x": 2})),
            ])
            .await
            .unwrap();

        let records = store.get(&keys).await.unwrap();
        assert_eq!(records, vec![json!({"x": 1}), json!({"x": 2})]);
    }

    #[tokio::test]
    async fn test_get_missing_key_fails() {
        let store = store();
        let err = store.get(&[BlobKey::from("ghost")]).await.unwrap_err();
        assert!(matches!(err, BlobError::Missing { key } if key == "ghost"));
    }

    #[tokio::test]
    async fn test_expired_key_is_missing() {
        let store = MemoryBlobStore::new(Duration::ZERO, 1024);
        let key = BlobKey::from("k");
        store
            .put(vec![(key.clone(), json!(1))])
            .await
            .unwrap();

        let err = store.get(std::slice::from_ref(&key)).await.unwrap_err();
        assert!(matches!(err, BlobError::Missing { .. }));
        assert_eq!(store.live_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = store();
        let key = BlobKey::from("k");
        store
            .put(vec![(key.clone(), json!(1))])
            .await
            .unwrap();

        store.delete(&key).await.unwrap();
        store.delete(&key).await.unwrap();
        assert_eq!(store.live_count(), 0);
    }

    #[tokio::test]
    async fn test_payload_limit_is_enforced() {
        let store = MemoryBlobStore::new(Duration::from_secs(60), 8);
        let err = store
            .put(vec![(BlobKey::from("big"), json!("0123456789"))])
            .await
            .unwrap_err();
        assert!(matches!(err, BlobError::PayloadTooLarge { .. }));
    }

    #[tokio::test]
    async fn test_minted_connector_keys_are_ordered_and_fresh() {
        let store = store();
        let records = vec![json!({"i": 0}), json!({"i": 1}), json!({"i": 2})];

        let first = put_connector_records(&store, records.clone()).await.unwrap();
        let second = put_connector_records(&store, records).await.unwrap();

        assert_eq!(first.len(), 3);
        for (index, key) in first.iter().enumerate() {
            assert!(key.as_str().starts_with("async_connector_blob:"));
            assert!(key.as_str().ends_with(&format!(":{}", index)));
        }
        // A new batch id is minted per call.
        assert_ne!(first[0], second[0]);
        assert_eq!(store.get(&first).await.unwrap()[1], json!({"i": 1}));
    }
}
