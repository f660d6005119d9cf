// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Connector dispatch errors.

use thiserror::Error;

/// Errors raised while executing a connector resource.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The named connector resource does not exist.
    #[error("connector resource '{name}' not found")]
    NotFound {
        /// The resource name that was dispatched.
        name: String,
    },

    /// The connector service answered with a non-success status.
    #[error("connector '{name}' failed with status {status}: {message}")]
    Service {
        /// The resource name that was dispatched.
        name: String,
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        message: String,
    },

    /// The connector service could not be reached.
    #[error("connector transport error: {0}")]
    Transport(String),

    /// The connector service answered with an unparseable body.
    #[error("invalid connector response: {0}")]
    InvalidResponse(String),
}
