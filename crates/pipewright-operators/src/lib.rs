// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Local operators for pipewright.
//!
//! An operator is a pure, in-process component: it receives a batch of
//! rendered input records and returns one output record per input,
//! synchronously, with no external side effects. The workflow engine
//! dispatches to operators through the same batch contract it uses for
//! connectors, looked up by definition name in an [`OperatorRegistry`].

mod error;
mod json;
mod registry;

pub use error::OperatorError;
pub use json::{JSON_OPERATOR, JsonOperator};
pub use registry::{Operator, OperatorRegistry};
