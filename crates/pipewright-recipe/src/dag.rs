// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! DAG construction and deterministic topological ordering.
//!
//! Vertices are components; an edge `u -> v` exists iff `v`'s configuration
//! references `u`'s id. The builder validates single-start / at-most-one-end,
//! resolves every reference, rejects cycles, and requires every component to
//! be reachable from the start operator. The resulting order is a pure
//! function of the recipe, so a replayed workflow always walks the same
//! sequence.

use std::collections::{BTreeMap, BTreeSet};

use crate::component::{Component, Recipe};
use crate::error::RecipeError;
use crate::template::CompiledTemplate;

/// A component together with its compiled template and dependencies.
#[derive(Debug, Clone)]
pub struct DagNode {
    /// The component declaration.
    pub component: Component,
    /// The component's configuration with reference tokens pre-parsed.
    pub template: CompiledTemplate,
    /// Ids of components this node's configuration references.
    pub dependencies: BTreeSet<String>,
}

/// A validated pipeline DAG.
#[derive(Debug, Clone)]
pub struct Dag {
    nodes: BTreeMap<String, DagNode>,
    /// Reverse adjacency: id -> ids whose configuration references it.
    dependents: BTreeMap<String, BTreeSet<String>>,
    start_id: String,
    end_id: Option<String>,
}

impl Dag {
    /// Build and validate a DAG from a recipe.
    pub fn build(recipe: &Recipe) -> Result<Self, RecipeError> {
        if recipe.components.is_empty() {
            return Err(RecipeError::EmptyRecipe);
        }

        let mut start_id: Option<String> = None;
        let mut end_id: Option<String> = None;
        let mut nodes: BTreeMap<String, DagNode> = BTreeMap::new();

        for component in &recipe.components {
            if nodes.contains_key(&component.id) {
                return Err(RecipeError::DuplicateId {
                    id: component.id.clone(),
                });
            }
            if component.is_start() {
                if let Some(first) = &start_id {
                    return Err(RecipeError::MultipleStart {
                        first: first.clone(),
                        second: component.id.clone(),
                    });
                }
                start_id = Some(component.id.clone());
            }
            if component.is_end() {
                if let Some(first) = &end_id {
                    return Err(RecipeError::MultipleEnd {
                        first: first.clone(),
                        second: component.id.clone(),
                    });
                }
                end_id = Some(component.id.clone());
            }

            let template = CompiledTemplate::compile(&component.configuration);
            let dependencies = template
                .references()
                .iter()
                .map(|reference| reference.component_id.clone())
                .collect();
            nodes.insert(
                component.id.clone(),
                DagNode {
                    component: component.clone(),
                    template,
                    dependencies,
                },
            );
        }

        let start_id = start_id.ok_or(RecipeError::MissingStart)?;

        for (id, node) in &nodes {
            for dependency in &node.dependencies {
                if !nodes.contains_key(dependency) {
                    return Err(RecipeError::UnresolvedReference {
                        component_id: id.clone(),
                        referenced_id: dependency.clone(),
                    });
                }
                if Some(dependency) == end_id.as_ref() {
                    return Err(RecipeError::EndNotTerminal {
                        component_id: id.clone(),
                    });
                }
            }
        }

        let mut dependents: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (id, node) in &nodes {
            for dependency in &node.dependencies {
                dependents
                    .entry(dependency.clone())
                    .or_default()
                    .insert(id.clone());
            }
        }

        let dag = Dag {
            nodes,
            dependents,
            start_id,
            end_id,
        };
        dag.check_acyclic()?;
        dag.check_reachable()?;
        Ok(dag)
    }

    /// The start operator's component id.
    pub fn start_id(&self) -> &str {
        &self.start_id
    }

    /// The end operator's component id, if the recipe declares one.
    pub fn end_id(&self) -> Option<&str> {
        self.end_id.as_deref()
    }

    /// Number of components in the DAG.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the DAG holds no components.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by component id.
    pub fn get(&self, id: &str) -> Option<&DagNode> {
        self.nodes.get(id)
    }

    /// Deterministic topological order: for every edge `u -> v`, `u` precedes
    /// `v`; ties break by lexicographic component id. The start operator is
    /// always first and the end operator (if present) is always last.
    pub fn topological_order(&self) -> Vec<&DagNode> {
        let mut remaining: BTreeMap<&str, usize> = self
            .nodes
            .iter()
            .map(|(id, node)| (id.as_str(), node.dependencies.len()))
            .collect();
        let mut ready: BTreeSet<&str> = remaining
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(id, _)| *id)
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while !ready.is_empty() {
            // The end operator is a sink; keep it last by only emitting it
            // once no other component is ready.
            let next = ready
                .iter()
                .find(|&&id| Some(id) != self.end_id.as_deref())
                .or_else(|| ready.iter().next())
                .copied()
                .expect("ready set is non-empty");
            ready.remove(next);
            order.push(&self.nodes[next]);

            if let Some(dependents) = self.dependents.get(next) {
                for dependent in dependents {
                    let count = remaining
                        .get_mut(dependent.as_str())
                        .expect("dependent is a known node");
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(dependent.as_str());
                    }
                }
            }
        }

        debug_assert_eq!(order.len(), self.nodes.len());
        order
    }

    /// Reject cycles with a depth-first search, reporting the cycle path.
    fn check_acyclic(&self) -> Result<(), RecipeError> {
        let mut visited: BTreeSet<&str> = BTreeSet::new();
        let mut path: Vec<&str> = Vec::new();

        for id in self.nodes.keys() {
            if !visited.contains(id.as_str()) {
                self.cycle_dfs(id, &mut visited, &mut path)?;
            }
        }
        Ok(())
    }

    fn cycle_dfs<'a>(
        &'a self,
        id: &'a str,
        visited: &mut BTreeSet<&'a str>,
        path: &mut Vec<&'a str>,
    ) -> Result<(), RecipeError> {
        if let Some(start) = path.iter().position(|seen| *seen == id) {
            let mut cycle: Vec<String> = path[start..].iter().map(|s| s.to_string()).collect();
            cycle.push(id.to_string());
            return Err(RecipeError::CycleDetected { path: cycle });
        }
        if visited.contains(id) {
            return Ok(());
        }

        path.push(id);
        if let Some(dependents) = self.dependents.get(id) {
            for dependent in dependents {
                self.cycle_dfs(dependent, visited, path)?;
            }
        }
        path.pop();
        visited.insert(id);
        Ok(())
    }

    /// Every component must be reachable from the start operator, which is
    /// the sole root of the graph.
    fn check_reachable(&self) -> Result<(), RecipeError> {
        let mut reached: BTreeSet<&str> = BTreeSet::new();
        let mut frontier = vec![self.start_id.as_str()];
        while let Some(id) = frontier.pop() {
            if !reached.insert(id) {
                continue;
            }
            if let Some(dependents) = self.dependents.get(id) {
                frontier.extend(dependents.iter().map(|s| s.as_str()));
            }
        }

        for id in self.nodes.keys() {
            if !reached.contains(id.as_str()) {
                return Err(RecipeError::Unreachable {
                    component_id: id.clone(),
                });
            }
        }
        Ok(())
    }
}
