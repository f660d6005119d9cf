// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Recipe and component declarations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Definition name of the start operator, the sole root of every pipeline.
pub const START_OPERATOR: &str = "start-operator";

/// Definition name of the end operator, the sole terminal of a pipeline.
pub const END_OPERATOR: &str = "end-operator";

/// The static description of a pipeline: an ordered set of components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Component declarations in authoring order.
    pub components: Vec<Component>,
}

/// A single pipeline component declaration.
///
/// A component is a connector step when `resource_name` is non-empty; the
/// distinguished definition names [`START_OPERATOR`] and [`END_OPERATOR`]
/// mark the pipeline's input entry and output exit. Any other definition
/// name with an empty `resource_name` denotes a local operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// Unique identifier within the recipe.
    pub id: String,
    /// Identifies the component kind.
    pub definition_name: String,
    /// Connector resource to dispatch to; empty for operators.
    #[serde(default)]
    pub resource_name: String,
    /// Nested configuration, possibly containing `${id.path}` references.
    #[serde(default)]
    pub configuration: Value,
}

impl Component {
    /// Returns true if this is the start operator.
    pub fn is_start(&self) -> bool {
        self.definition_name == START_OPERATOR
    }

    /// Returns true if this is the end operator.
    pub fn is_end(&self) -> bool {
        self.definition_name == END_OPERATOR
    }

    /// Returns true if this component is dispatched to a remote connector.
    pub fn is_connector(&self) -> bool {
        !self.resource_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_component_kind_predicates() {
        let start = Component {
            id: "start".to_string(),
            definition_name: START_OPERATOR.to_string(),
            resource_name: String::new(),
            configuration: Value::Null,
        };
        assert!(start.is_start());
        assert!(!start.is_end());
        assert!(!start.is_connector());

        let connector = Component {
            id: "k".to_string(),
            definition_name: "connector".to_string(),
            resource_name: "echo".to_string(),
            configuration: json!({}),
        };
        assert!(connector.is_connector());
        assert!(!connector.is_start());
    }

    #[test]
    fn test_recipe_deserializes_with_defaults() {
        let recipe: Recipe = serde_json::from_value(json!({
            "components": [
                {"id": "start", "definition_name": "start-operator"},
                {"id": "k", "definition_name": "connector", "resource_name": "echo",
                 "configuration": {"v": "${start.body.x}"}}
            ]
        }))
        .unwrap();

        assert_eq!(recipe.components.len(), 2);
        assert_eq!(recipe.components[0].resource_name, "");
        assert_eq!(recipe.components[0].configuration, Value::Null);
        assert_eq!(recipe.components[1].configuration["v"], "${start.body.x}");
    }
}
