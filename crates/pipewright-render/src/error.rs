// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Rendering errors.

use thiserror::Error;

/// Errors raised while rendering a template against an item cache.
///
/// Both variants identify the failing `(component_id, path)` so the caller
/// can point at the exact reference in the recipe. Fatal for the trigger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The referenced component output or path does not exist in the cache.
    #[error("unresolved reference '${{{path}}}' (component '{component_id}')")]
    UnresolvedReference {
        /// The referenced component id.
        component_id: String,
        /// The full reference, e.g. `start.body.x`.
        path: String,
    },

    /// A path segment walked into a value of the wrong shape.
    #[error("type mismatch at '${{{path}}}': expected {expected}, found {found}")]
    TypeMismatch {
        /// The referenced component id.
        component_id: String,
        /// The full reference, e.g. `start.body.x`.
        path: String,
        /// The container kind the segment requires.
        expected: &'static str,
        /// The kind of value actually found.
        found: &'static str,
    },
}
