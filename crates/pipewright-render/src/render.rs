// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The template renderer.

use serde_json::{Map, Value};

use pipewright_recipe::{CompiledTemplate, PathSegment, Reference, TemplatePart};

use crate::cache::ItemCache;
use crate::error::RenderError;

/// Render a compiled template against a single item's cache.
///
/// Structural copy: arrays and objects are rebuilt, constants are cloned.
/// A leaf string that consists of exactly one reference token takes the
/// resolved value with its type preserved; a string with surrounding text
/// splices each resolved value's textual form (strings raw, every other
/// value as canonical JSON).
pub fn render(template: &CompiledTemplate, cache: &ItemCache) -> Result<Value, RenderError> {
    match template {
        CompiledTemplate::Constant(value) => Ok(value.clone()),
        CompiledTemplate::Text(parts) => render_text(parts, cache),
        CompiledTemplate::Array(items) => {
            let mut rendered = Vec::with_capacity(items.len());
            for item in items {
                rendered.push(render(item, cache)?);
            }
            Ok(Value::Array(rendered))
        }
        CompiledTemplate::Object(fields) => {
            let mut rendered = Map::new();
            for (key, item) in fields {
                rendered.insert(key.clone(), render(item, cache)?);
            }
            Ok(Value::Object(rendered))
        }
    }
}

fn render_text(parts: &[TemplatePart], cache: &ItemCache) -> Result<Value, RenderError> {
    // A whole-string token preserves the resolved value's type.
    if let [TemplatePart::Reference(reference)] = parts {
        return resolve(reference, cache).cloned();
    }

    let mut spliced = String::new();
    for part in parts {
        match part {
            TemplatePart::Literal(text) => spliced.push_str(text),
            TemplatePart::Reference(reference) => {
                match resolve(reference, cache)? {
                    Value::String(text) => spliced.push_str(text),
                    other => spliced.push_str(&other.to_string()),
                }
            }
        }
    }
    Ok(Value::String(spliced))
}

fn resolve<'a>(reference: &Reference, cache: &'a ItemCache) -> Result<&'a Value, RenderError> {
    let mut current = cache
        .get(&reference.component_id)
        .ok_or_else(|| unresolved(reference))?;

    for segment in &reference.path {
        current = match (segment, current) {
            (PathSegment::Key(key), Value::Object(fields)) => {
                fields.get(key).ok_or_else(|| unresolved(reference))?
            }
            (PathSegment::Index(index), Value::Array(items)) => {
                items.get(*index).ok_or_else(|| unresolved(reference))?
            }
            (PathSegment::Key(_), found) => {
                return Err(mismatch(reference, "object", found));
            }
            (PathSegment::Index(_), found) => {
                return Err(mismatch(reference, "array", found));
            }
        };
    }
    Ok(current)
}

fn unresolved(reference: &Reference) -> RenderError {
    RenderError::UnresolvedReference {
        component_id: reference.component_id.clone(),
        path: reference.to_string(),
    }
}

fn mismatch(reference: &Reference, expected: &'static str, found: &Value) -> RenderError {
    RenderError::TypeMismatch {
        component_id: reference.component_id.clone(),
        path: reference.to_string(),
        expected,
        found: value_kind(found),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
