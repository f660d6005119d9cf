// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Operator contract and registry.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::error::OperatorError;
use crate::json::JsonOperator;

/// A local, pure pipeline component.
///
/// Operators execute synchronously between durable suspension points, so
/// implementations must not perform I/O or read ambient state: the output
/// batch must be a function of the input batch alone.
pub trait Operator: Send + Sync {
    /// The definition name this operator is registered under.
    fn definition_name(&self) -> &'static str;

    /// Execute the operator over a batch, one output record per input.
    fn execute(&self, inputs: Vec<Value>) -> Result<Vec<Value>, OperatorError>;
}

/// Lookup table from definition name to operator implementation.
#[derive(Clone, Default)]
pub struct OperatorRegistry {
    operators: HashMap<String, Arc<dyn Operator>>,
}

impl OperatorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in operators registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JsonOperator));
        registry
    }

    /// Register an operator under its definition name.
    pub fn register(&mut self, operator: Arc<dyn Operator>) {
        self.operators
            .insert(operator.definition_name().to_string(), operator);
    }

    /// Look up an operator by definition name.
    pub fn get(&self, definition_name: &str) -> Option<Arc<dyn Operator>> {
        self.operators.get(definition_name).cloned()
    }
}
