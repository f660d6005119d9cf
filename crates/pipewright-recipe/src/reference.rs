// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Reference-token grammar.
//!
//! Configuration leaf strings may embed tokens of the form
//! `${<id>(.<key-or-index>)*}` where `<id>` and `<key>` match
//! `[A-Za-z0-9_-]+` and `<index>` matches `[0-9]+`. Text that merely looks
//! like a token but does not match the grammar is left as literal text.

use std::fmt;

/// One step of a reference path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object key lookup.
    Key(String),
    /// Array index lookup.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// A parsed reference to an upstream component's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// The upstream component id.
    pub component_id: String,
    /// Dotted path walked into the upstream output record.
    pub path: Vec<PathSegment>,
}

impl Reference {
    /// Parse the inside of a `${...}` token.
    ///
    /// Returns `None` when the text does not match the reference grammar.
    pub fn parse(inner: &str) -> Option<Self> {
        let mut segments = inner.split('.');
        let component_id = segments.next()?;
        if !is_identifier(component_id) {
            return None;
        }

        let mut path = Vec::new();
        for segment in segments {
            if segment.chars().all(|c| c.is_ascii_digit()) && !segment.is_empty() {
                path.push(PathSegment::Index(segment.parse().ok()?));
            } else if is_identifier(segment) {
                path.push(PathSegment::Key(segment.to_string()));
            } else {
                return None;
            }
        }

        Some(Reference {
            component_id: component_id.to_string(),
            path,
        })
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.component_id)?;
        for segment in &self.path {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}

/// A piece of a template string: literal text or a reference token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    /// Literal text copied through unchanged.
    Literal(String),
    /// A `${...}` reference token.
    Reference(Reference),
}

/// Split a leaf string into literal runs and reference tokens.
pub fn parse_template_string(input: &str) -> Vec<TemplatePart> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let bytes = input.as_bytes();
    let mut pos = 0;

    while pos < input.len() {
        if bytes[pos] == b'$' && pos + 1 < input.len() && bytes[pos + 1] == b'{' {
            if let Some(close) = input[pos + 2..].find('}') {
                let inner = &input[pos + 2..pos + 2 + close];
                if let Some(reference) = Reference::parse(inner) {
                    if !literal.is_empty() {
                        parts.push(TemplatePart::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(TemplatePart::Reference(reference));
                    pos += close + 3;
                    continue;
                }
            }
        }
        let ch = input[pos..].chars().next().expect("in-bounds char");
        literal.push(ch);
        pos += ch.len_utf8();
    }

    if !literal.is_empty() {
        parts.push(TemplatePart::Literal(literal));
    }
    parts
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(component_id: &str, path: Vec<PathSegment>) -> Reference {
        Reference {
            component_id: component_id.to_string(),
            path,
        }
    }

    #[test]
    fn test_parse_bare_component_reference() {
        assert_eq!(Reference::parse("start"), Some(reference("start", vec![])));
    }

    #[test]
    fn test_parse_reference_with_keys_and_indices() {
        assert_eq!(
            Reference::parse("op-1.body.items.0.name"),
            Some(reference(
                "op-1",
                vec![
                    PathSegment::Key("body".to_string()),
                    PathSegment::Key("items".to_string()),
                    PathSegment::Index(0),
                    PathSegment::Key("name".to_string()),
                ]
            ))
        );
    }

    #[test]
    fn test_parse_rejects_invalid_characters() {
        assert_eq!(Reference::parse("foo bar"), None);
        assert_eq!(Reference::parse("foo..bar"), None);
        assert_eq!(Reference::parse(""), None);
        assert_eq!(Reference::parse(".leading"), None);
    }

    #[test]
    fn test_whole_string_token() {
        let parts = parse_template_string("${start.body}");
        assert_eq!(
            parts,
            vec![TemplatePart::Reference(reference(
                "start",
                vec![PathSegment::Key("body".to_string())]
            ))]
        );
    }

    #[test]
    fn test_embedded_tokens_with_literals() {
        let parts = parse_template_string("name: ${a.name}, age: ${a.age}!");
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0], TemplatePart::Literal("name: ".to_string()));
        assert!(matches!(&parts[1], TemplatePart::Reference(r) if r.component_id == "a"));
        assert_eq!(parts[2], TemplatePart::Literal(", age: ".to_string()));
        assert_eq!(parts[4], TemplatePart::Literal("!".to_string()));
    }

    #[test]
    fn test_malformed_token_is_literal() {
        let parts = parse_template_string("${not a token} and ${unclosed");
        assert_eq!(
            parts,
            vec![TemplatePart::Literal(
                "${not a token} and ${unclosed".to_string()
            )]
        );
    }

    #[test]
    fn test_plain_string_is_single_literal() {
        let parts = parse_template_string("no tokens here");
        assert_eq!(
            parts,
            vec![TemplatePart::Literal("no tokens here".to_string())]
        );
    }

    #[test]
    fn test_display_round_trip() {
        let reference = Reference::parse("op.items.2.id").unwrap();
        assert_eq!(reference.to_string(), "op.items.2.id");
    }
}
