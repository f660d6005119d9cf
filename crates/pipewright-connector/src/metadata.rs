// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Trigger metadata carried through activities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a trigger was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Caller blocks on the result.
    Sync,
    /// Caller polls for the result via response blob keys.
    Async,
}

/// Audit and telemetry context for a single pipeline trigger.
///
/// Propagated on every connector call so the downstream service can attribute
/// the request to a pipeline, owner, and trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerMetadata {
    /// Pipeline id, unique per owner.
    pub pipeline_id: String,
    /// Pipeline uid, globally unique.
    pub pipeline_uid: Uuid,
    /// Owner permalink, e.g. `users/<uid>`.
    pub owner: String,
    /// Durable workflow execution id for this trigger.
    pub trigger_id: String,
    /// When the trigger was submitted.
    pub trigger_time: DateTime<Utc>,
    /// Submission mode.
    pub mode: TriggerMode,
}

impl TriggerMetadata {
    /// The uid part of the owner permalink.
    pub fn owner_uid(&self) -> &str {
        self.owner
            .split('/')
            .nth(1)
            .unwrap_or(self.owner.as_str())
    }
}
