// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Built-in JSON operator.
//!
//! Tasks:
//! - `TASK_MARSHAL`: serialize the `json` field to a string under `string`
//! - `TASK_UNMARSHAL`: parse the `string` field to a value under `json`
//! - `TASK_RENAME_FIELDS`: rename top-level fields of the `json` object
//!   according to `fields`, resolving collisions per `conflict-resolution`
//!   (`overwrite`, `skip`, or `error`)

use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::error::OperatorError;
use crate::registry::Operator;

/// Definition name of the built-in JSON operator.
pub const JSON_OPERATOR: &str = "json-operator";

const TASK_MARSHAL: &str = "TASK_MARSHAL";
const TASK_UNMARSHAL: &str = "TASK_UNMARSHAL";
const TASK_RENAME_FIELDS: &str = "TASK_RENAME_FIELDS";

#[derive(Deserialize)]
struct MarshalInput {
    json: Value,
}

#[derive(Deserialize)]
struct UnmarshalInput {
    string: String,
}

#[derive(Deserialize)]
struct RenameFieldsInput {
    json: Map<String, Value>,
    fields: Vec<FieldRename>,
    #[serde(rename = "conflict-resolution")]
    conflict_resolution: ConflictResolution,
}

#[derive(Deserialize)]
struct FieldRename {
    from: String,
    to: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ConflictResolution {
    Overwrite,
    Skip,
    Error,
}

/// Self-contained JSON data-transformation operator.
pub struct JsonOperator;

impl Operator for JsonOperator {
    fn definition_name(&self) -> &'static str {
        JSON_OPERATOR
    }

    fn execute(&self, inputs: Vec<Value>) -> Result<Vec<Value>, OperatorError> {
        inputs.into_iter().map(execute_one).collect()
    }
}

fn execute_one(input: Value) -> Result<Value, OperatorError> {
    let task = input
        .get("task")
        .and_then(Value::as_str)
        .ok_or_else(|| OperatorError::InvalidInput("missing 'task' field".to_string()))?
        .to_string();

    match task.as_str() {
        TASK_MARSHAL => marshal(input),
        TASK_UNMARSHAL => unmarshal(input),
        TASK_RENAME_FIELDS => rename_fields(input),
        _ => Err(OperatorError::UnsupportedTask { task }),
    }
}

fn marshal(input: Value) -> Result<Value, OperatorError> {
    let input: MarshalInput = parse(input)?;
    Ok(json!({ "string": serde_json::to_string(&input.json)? }))
}

fn unmarshal(input: Value) -> Result<Value, OperatorError> {
    let input: UnmarshalInput = parse(input)?;
    let parsed: Value = serde_json::from_str(&input.string)
        .map_err(|e| OperatorError::InvalidInput(format!("malformed JSON string: {}", e)))?;
    Ok(json!({ "json": parsed }))
}

fn rename_fields(input: Value) -> Result<Value, OperatorError> {
    let input: RenameFieldsInput = parse(input)?;
    let mut object = input.json;

    for rename in &input.fields {
        if !object.contains_key(&rename.from) {
            continue;
        }
        match input.conflict_resolution {
            ConflictResolution::Skip if object.contains_key(&rename.to) => {
                // Target taken: leave the source field in place.
                continue;
            }
            ConflictResolution::Error if object.contains_key(&rename.to) => {
                return Err(OperatorError::FieldConflict {
                    field: rename.to.clone(),
                });
            }
            _ => {}
        }
        if let Some(value) = object.remove(&rename.from) {
            object.insert(rename.to.clone(), value);
        }
    }

    Ok(json!({ "json": Value::Object(object) }))
}

fn parse<T: serde::de::DeserializeOwned>(input: Value) -> Result<T, OperatorError> {
    serde_json::from_value(input).map_err(|e| OperatorError::InvalidInput(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: Value) -> Result<Value, OperatorError> {
        let mut outputs = JsonOperator.execute(vec![input])?;
        Ok(outputs.remove(0))
    }

    #[test]
    fn test_marshal() {
        let output = run(json!({"task": "TASK_MARSHAL", "json": {"a": 1}})).unwrap();
        assert_eq!(output, json!({"string": r#"{"a":1}"#}));
    }

    #[test]
    fn test_unmarshal() {
        let output = run(json!({"task": "TASK_UNMARSHAL", "string": r#"{"a":1}"#})).unwrap();
        assert_eq!(output, json!({"json": {"a": 1}}));
    }

    #[test]
    fn test_unmarshal_rejects_malformed_json() {
        let err = run(json!({"task": "TASK_UNMARSHAL", "string": "{oops"})).unwrap_err();
        assert!(matches!(err, OperatorError::InvalidInput(_)));
    }

    #[test]
    fn test_rename_overwrite() {
        let output = run(json!({
            "task": "TASK_RENAME_FIELDS",
            "json": {"old": 1, "new": 2},
            "fields": [{"from": "old", "to": "new"}],
            "conflict-resolution": "overwrite"
        }))
        .unwrap();
        assert_eq!(output, json!({"json": {"new": 1}}));
    }

    #[test]
    fn test_rename_skip_keeps_existing_target() {
        let output = run(json!({
            "task": "TASK_RENAME_FIELDS",
            "json": {"old": 1, "new": 2},
            "fields": [{"from": "old", "to": "new"}],
            "conflict-resolution": "skip"
        }))
        .unwrap();
        // Target taken: the rename is skipped and the source stays.
        assert_eq!(output, json!({"json": {"old": 1, "new": 2}}));
    }

    #[test]
    fn test_rename_error_on_conflict() {
        let err = run(json!({
            "task": "TASK_RENAME_FIELDS",
            "json": {"old": 1, "new": 2},
            "fields": [{"from": "old", "to": "new"}],
            "conflict-resolution": "error"
        }))
        .unwrap_err();
        assert!(matches!(err, OperatorError::FieldConflict { field } if field == "new"));
    }

    #[test]
    fn test_rename_missing_source_is_noop() {
        let output = run(json!({
            "task": "TASK_RENAME_FIELDS",
            "json": {"keep": 1},
            "fields": [{"from": "absent", "to": "x"}],
            "conflict-resolution": "overwrite"
        }))
        .unwrap();
        assert_eq!(output, json!({"json": {"keep": 1}}));
    }

    #[test]
    fn test_unknown_task_is_rejected() {
        let err = run(json!({"task": "TASK_JQ", "json": {}})).unwrap_err();
        assert!(matches!(err, OperatorError::UnsupportedTask { task } if task == "TASK_JQ"));
    }

    #[test]
    fn test_missing_task_is_rejected() {
        let err = run(json!({"json": {}})).unwrap_err();
        assert!(matches!(err, OperatorError::InvalidInput(_)));
    }

    #[test]
    fn test_batch_maps_items_independently() {
        let outputs = JsonOperator
            .execute(vec![
                json!({"task": "TASK_MARSHAL", "json": 1}),
                json!({"task": "TASK_MARSHAL", "json": [true]}),
            ])
            .unwrap();
        assert_eq!(
            outputs,
            vec![json!({"string": "1"}), json!({"string": "[true]"})]
        );
    }
}
