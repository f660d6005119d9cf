// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Operator execution errors.

use thiserror::Error;

/// Errors raised by a local operator.
#[derive(Debug, Error)]
pub enum OperatorError {
    /// The input's `task` field names a task the operator does not support.
    #[error("unsupported task '{task}'")]
    UnsupportedTask {
        /// The requested task name.
        task: String,
    },

    /// The input record does not match the task's expected shape.
    #[error("invalid operator input: {0}")]
    InvalidInput(String),

    /// A rename target already exists under the `error` conflict policy.
    #[error("field conflict: '{field}' already exists")]
    FieldConflict {
        /// The conflicting target field name.
        field: String,
    },

    /// Encoding or decoding an operator payload failed.
    #[error("operator payload encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}
