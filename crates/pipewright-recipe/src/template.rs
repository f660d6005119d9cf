// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Compiled configuration templates.
//!
//! A component's configuration is compiled once at DAG-build time: every
//! leaf string is split into literal runs and parsed reference tokens. The
//! compiled form drives both edge extraction and per-item rendering, so raw
//! configuration JSON is never rescanned during a trigger.

use serde_json::Value;

use crate::reference::{Reference, TemplatePart, parse_template_string};

/// A configuration value with its reference tokens pre-parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledTemplate {
    /// A leaf with no references, cloned verbatim into the rendered output.
    Constant(Value),
    /// A string leaf containing at least one reference token.
    Text(Vec<TemplatePart>),
    /// An ordered sequence of templates.
    Array(Vec<CompiledTemplate>),
    /// A string-keyed mapping of templates, in source order.
    Object(Vec<(String, CompiledTemplate)>),
}

impl CompiledTemplate {
    /// Compile a configuration value.
    pub fn compile(value: &Value) -> Self {
        match value {
            Value::String(text) => {
                let parts = parse_template_string(text);
                let has_reference = parts
                    .iter()
                    .any(|part| matches!(part, TemplatePart::Reference(_)));
                if has_reference {
                    CompiledTemplate::Text(parts)
                } else {
                    CompiledTemplate::Constant(value.clone())
                }
            }
            Value::Array(items) => {
                CompiledTemplate::Array(items.iter().map(Self::compile).collect())
            }
            Value::Object(fields) => CompiledTemplate::Object(
                fields
                    .iter()
                    .map(|(key, item)| (key.clone(), Self::compile(item)))
                    .collect(),
            ),
            _ => CompiledTemplate::Constant(value.clone()),
        }
    }

    /// All references contained in this template, in source order.
    pub fn references(&self) -> Vec<&Reference> {
        let mut found = Vec::new();
        self.collect_references(&mut found);
        found
    }

    fn collect_references<'a>(&'a self, found: &mut Vec<&'a Reference>) {
        match self {
            CompiledTemplate::Constant(_) => {}
            CompiledTemplate::Text(parts) => {
                for part in parts {
                    if let TemplatePart::Reference(reference) = part {
                        found.push(reference);
                    }
                }
            }
            CompiledTemplate::Array(items) => {
                for item in items {
                    item.collect_references(found);
                }
            }
            CompiledTemplate::Object(fields) => {
                for (_, item) in fields {
                    item.collect_references(found);
                }
            }
        }
    }
}
