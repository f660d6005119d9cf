// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Per-item result cache.

use std::collections::HashMap;

use serde_json::{Value, json};

/// Component outputs for a single batch item.
///
/// Maps component id to that component's output record. The start operator's
/// entry wraps the item's original input as `{"body": <input>}`; every other
/// entry is written exactly once, after its component completes. Items share
/// the recipe but never a cache.
#[derive(Debug, Clone, Default)]
pub struct ItemCache {
    outputs: HashMap<String, Value>,
}

impl ItemCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache seeded with the start operator's entry for one input.
    pub fn for_start_input(start_id: &str, input: Value) -> Self {
        let mut cache = Self::new();
        cache.insert(start_id, json!({ "body": input }));
        cache
    }

    /// Record a component's output.
    pub fn insert(&mut self, component_id: impl Into<String>, output: Value) {
        self.outputs.insert(component_id.into(), output);
    }

    /// Look up a component's output.
    pub fn get(&self, component_id: &str) -> Option<&Value> {
        self.outputs.get(component_id)
    }
}
