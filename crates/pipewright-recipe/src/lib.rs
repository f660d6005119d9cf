// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Recipe data model and DAG construction for pipewright.
//!
//! A recipe is the static description of a pipeline: an ordered set of
//! component declarations whose configurations may reference the outputs of
//! other components with `${component-id.path}` tokens. This crate parses
//! those tokens once, builds the dependency DAG, validates it, and produces
//! the deterministic execution order the workflow engine replays against.

mod component;
mod dag;
mod error;
mod reference;
mod template;

pub use component::{Component, END_OPERATOR, Recipe, START_OPERATOR};
pub use dag::{Dag, DagNode};
pub use error::RecipeError;
pub use reference::{PathSegment, Reference, TemplatePart, parse_template_string};
pub use template::CompiledTemplate;
