// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Connector RPC contract for pipewright.
//!
//! A connector is a remote, side-effecting component executed by an external
//! service. This crate defines the [`ConnectorService`] contract the workflow
//! engine dispatches through, the trigger metadata propagated on every call,
//! and an HTTP client implementation.
//!
//! Retries happen above this layer (the durable runtime's activity retry
//! policy); connector-side idempotency under those retries is the
//! connector's own contract, not enforced here.

mod error;
mod http;
mod metadata;
mod service;

pub use error::ConnectorError;
pub use http::HttpConnectorService;
pub use metadata::{TriggerMetadata, TriggerMode};
pub use service::ConnectorService;
