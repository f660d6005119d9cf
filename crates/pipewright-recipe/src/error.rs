// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Recipe validation errors.

use thiserror::Error;

/// Errors raised while building a DAG from a recipe.
///
/// All variants are detected before any blob or activity I/O happens and are
/// fatal for the trigger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    /// The recipe declares no components.
    #[error("recipe contains no components")]
    EmptyRecipe,

    /// Two components share the same id.
    #[error("duplicate component id '{id}'")]
    DuplicateId {
        /// The offending component id.
        id: String,
    },

    /// No start operator was declared.
    #[error("recipe has no start operator")]
    MissingStart,

    /// More than one start operator was declared.
    #[error("recipe has multiple start operators ('{first}' and '{second}')")]
    MultipleStart {
        /// First start operator id, in declaration order.
        first: String,
        /// Second start operator id.
        second: String,
    },

    /// More than one end operator was declared.
    #[error("recipe has multiple end operators ('{first}' and '{second}')")]
    MultipleEnd {
        /// First end operator id, in declaration order.
        first: String,
        /// Second end operator id.
        second: String,
    },

    /// A configuration references a component id that does not exist.
    #[error("component '{component_id}' references unknown component '{referenced_id}'")]
    UnresolvedReference {
        /// The component whose configuration holds the reference.
        component_id: String,
        /// The id the reference points at.
        referenced_id: String,
    },

    /// A component cannot be reached from the start operator.
    #[error("component '{component_id}' is not reachable from the start operator")]
    Unreachable {
        /// The unreachable component id.
        component_id: String,
    },

    /// The end operator is referenced by another component.
    #[error("end operator is referenced by component '{component_id}'")]
    EndNotTerminal {
        /// The component referencing the end operator.
        component_id: String,
    },

    /// The reference graph contains a cycle.
    #[error("cycle detected: {}", path.join(" -> "))]
    CycleDetected {
        /// The components forming the cycle, first repeated at the end.
        path: Vec<String>,
    },
}
