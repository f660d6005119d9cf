// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error taxonomy for the workflow engine.
//!
//! Errors are never swallowed: every fatal error surfaces to the durable
//! runtime after the usage data point is recorded. Only the activity retry
//! policy retries; the orchestrator has no retry loop of its own.

use std::time::Duration;

use thiserror::Error;

use pipewright_blobstore::BlobError;
use pipewright_connector::ConnectorError;
use pipewright_operators::OperatorError;
use pipewright_recipe::RecipeError;
use pipewright_render::RenderError;

/// A connector activity failure, surfaced after retries are exhausted.
#[derive(Debug, Error)]
pub enum ActivityError {
    /// The connector service rejected or failed the dispatch.
    #[error(transparent)]
    Connector(#[from] ConnectorError),

    /// The activity exceeded its start-to-close timeout.
    #[error("activity timed out after {0:?}")]
    Timeout(Duration),

    /// The trigger was cancelled while the activity was pending.
    #[error("activity cancelled")]
    Cancelled,
}

/// Top-level error for a pipeline trigger.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The recipe failed validation before any blob or activity call.
    #[error("invalid recipe: {0}")]
    Recipe(#[from] RecipeError),

    /// A configuration template failed to render.
    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    /// The blob store failed.
    #[error(transparent)]
    Blob(#[from] BlobError),

    /// A connector activity failed after exhausting its retry policy.
    #[error("connector activity failed: {0}")]
    Activity(#[from] ActivityError),

    /// The trigger batch exceeds the engine's limit.
    #[error("batch size {size} exceeds the {max} item limit")]
    BatchTooLarge {
        /// Submitted batch size.
        size: usize,
        /// Configured maximum.
        max: usize,
    },

    /// A component names a local operator nothing is registered for.
    #[error("no operator registered for definition '{definition_name}'")]
    UnknownOperator {
        /// The unregistered definition name.
        definition_name: String,
    },

    /// A local operator failed.
    #[error("operator failed: {0}")]
    Operator(#[from] OperatorError),

    /// An invariant was violated; indicates a bug.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WorkerError {
    /// Machine-readable error code for callers and logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Recipe(_) => "INVALID_RECIPE",
            Self::Render(_) => "RENDER_ERROR",
            Self::Blob(_) => "BLOB_ERROR",
            Self::Activity(_) => "ACTIVITY_ERROR",
            Self::BatchTooLarge { .. } => "BATCH_TOO_LARGE",
            Self::UnknownOperator { .. } => "UNKNOWN_OPERATOR",
            Self::Operator(_) => "OPERATOR_ERROR",
            Self::Internal(_) => "INTERNAL",
        }
    }
}
