// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Blob store errors.

use thiserror::Error;

/// Errors raised by a blob store backend.
///
/// The workflow engine treats every variant as fatal for the trigger;
/// transient backend failures are only retried where the durable runtime's
/// activity retry policy applies.
#[derive(Debug, Error)]
pub enum BlobError {
    /// The key is absent or its TTL has elapsed.
    #[error("blob '{key}' is missing or expired")]
    Missing {
        /// The key that failed to resolve.
        key: String,
    },

    /// The encoded record exceeds the configured payload limit.
    #[error("blob '{key}' payload is {size} bytes, exceeding the {max} byte limit")]
    PayloadTooLarge {
        /// The key being written.
        key: String,
        /// Encoded payload size in bytes.
        size: usize,
        /// Configured maximum payload size in bytes.
        max: usize,
    },

    /// The backend could not be reached or rejected the operation.
    #[error("blob backend unavailable: {0}")]
    Backend(String),

    /// A record failed to encode to or decode from canonical JSON.
    #[error("blob encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl From<sqlx::Error> for BlobError {
    fn from(err: sqlx::Error) -> Self {
        BlobError::Backend(err.to_string())
    }
}
