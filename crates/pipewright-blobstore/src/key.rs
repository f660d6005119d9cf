// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Blob key layout.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque key identifying a single record in the blob store.
///
/// Two key families exist:
/// - `async_connector_blob:<uuid>:<index>` for per-activity transient I/O
/// - `async_pipeline_response:<trigger-id>:<index>` for trigger results,
///   consumed by the caller
///
/// Input blobs arrive with caller-provided keys and may use any layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobKey(String);

impl BlobKey {
    /// Key for one record of a connector activity's transient batch.
    pub fn connector_blob(batch_id: Uuid, index: usize) -> Self {
        Self(format!("async_connector_blob:{}:{}", batch_id, index))
    }

    /// Key for one item of a trigger's pipeline output.
    pub fn pipeline_response(trigger_id: &str, index: usize) -> Self {
        Self(format!("async_pipeline_response:{}:{}", trigger_id, index))
    }

    /// The raw key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BlobKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for BlobKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_blob_key_layout() {
        let batch_id = Uuid::new_v4();
        let key = BlobKey::connector_blob(batch_id, 3);
        assert_eq!(
            key.as_str(),
            format!("async_connector_blob:{}:3", batch_id)
        );
    }

    #[test]
    fn test_pipeline_response_key_layout() {
        let key = BlobKey::pipeline_response("trigger-42", 0);
        assert_eq!(key.as_str(), "async_pipeline_response:trigger-42:0");
    }

    #[test]
    fn test_serde_is_transparent() {
        let key = BlobKey::from("caller-key");
        assert_eq!(serde_json::to_string(&key).unwrap(), r#""caller-key""#);
    }
}
