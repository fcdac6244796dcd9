// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dependency edges between workflow nodes and their topological ordering.
//!
//! # Accepted shapes
//!
//! ```text
//! "connections": { "Load": { "main": { "0": [{ "node": "Validate" }] } } }   // branch object
//! "connections": { "Load": { "main": [[{ "node": "Validate" }]] } }          // branch arrays
//! ```
//!
//! Both normalize to the edge `Load -> Validate`. Connections may address nodes by their
//! declared `name`; the parser supplies a name-to-id table so edges resolve to step ids.
//!
//! # Ordering
//!
//! Kahn's algorithm with the ready set ordered by original declaration index. When no edge
//! forces an order, nodes run top to bottom as written, and the output is deterministic.
//! **Time Complexity**: O((V + E) log V). **Space Complexity**: O(V + E).

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;
use tracing::trace;

use crate::errors::{WorkflowError, WorkflowResult};
use crate::observability::messages::parser::{ConnectionCycleDetected, ConnectionsResolved};
use crate::observability::messages::StructuredLog;

/// A directed dependency: `from` must run before `to`. Endpoints are names as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConnectionResolver;

impl ConnectionResolver {
    pub fn new() -> Self {
        Self
    }

    /// Reads the document's `connections` member into a flat edge list.
    ///
    /// A document without `connections` yields no edges. From-entries lacking `main` are
    /// ignored.
    pub fn read_connections(&self, document: &Value) -> WorkflowResult<Vec<Edge>> {
        let Some(connections) = document.get("connections") else {
            return Ok(Vec::new());
        };
        let Value::Object(sources) = connections else {
            return Err(WorkflowError::shape("workflow 'connections' must be an object"));
        };

        let mut edges = Vec::new();
        for (from, outputs) in sources {
            let Value::Object(outputs) = outputs else {
                return Err(WorkflowError::shape(format!(
                    "workflow connections for '{}' must be an object",
                    from
                )));
            };
            let Some(main) = outputs.get("main") else {
                continue;
            };
            match main {
                Value::Object(branches) => {
                    for (branch, targets) in branches {
                        let Value::Array(targets) = targets else {
                            return Err(WorkflowError::shape(format!(
                                "workflow connections.main[{}] for '{}' must be an array",
                                branch, from
                            )));
                        };
                        read_targets(from, targets, &mut edges)?;
                    }
                }
                Value::Array(branches) => {
                    for branch in branches {
                        let Value::Array(targets) = branch else {
                            return Err(WorkflowError::shape(format!(
                                "workflow connections.main entries for '{}' must be arrays",
                                from
                            )));
                        };
                        read_targets(from, targets, &mut edges)?;
                    }
                }
                _ => {
                    return Err(WorkflowError::shape(format!(
                        "workflow connections.main for '{}' must be an object or array",
                        from
                    )))
                }
            }
        }
        trace!(edge_count = edges.len(), "read workflow connections");
        Ok(edges)
    }

    /// Orders `node_ids` so every edge's source precedes its target.
    ///
    /// Edge endpoints are looked up in `name_to_id` first and otherwise taken as ids. With no
    /// edges the declaration order is returned unchanged.
    pub fn sort_nodes_by_connections(
        &self,
        node_ids: &[String],
        name_to_id: &HashMap<String, String>,
        edges: &[Edge],
    ) -> WorkflowResult<Vec<String>> {
        let index_by_id: HashMap<&str, usize> = node_ids
            .iter()
            .enumerate()
            .map(|(index, id)| (id.as_str(), index))
            .collect();
        let mut in_degree = vec![0usize; node_ids.len()];
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); node_ids.len()];

        let resolve = |name: &str| -> WorkflowResult<usize> {
            let id = name_to_id.get(name).map(String::as_str).unwrap_or(name);
            index_by_id
                .get(id)
                .copied()
                .ok_or_else(|| WorkflowError::UnknownConnectionTarget {
                    name: name.to_string(),
                    id: id.to_string(),
                })
        };

        for edge in edges {
            let from = resolve(&edge.from)?;
            let to = resolve(&edge.to)?;
            adjacency[from].push(to);
            in_degree[to] += 1;
        }

        let mut ready: BTreeSet<usize> = (0..node_ids.len())
            .filter(|index| in_degree[*index] == 0)
            .collect();
        let mut ordered = Vec::with_capacity(node_ids.len());

        while let Some(index) = ready.pop_first() {
            ordered.push(node_ids[index].clone());
            for &next in &adjacency[index] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.insert(next);
                }
            }
        }

        if ordered.len() != node_ids.len() {
            let unresolved: Vec<String> = node_ids
                .iter()
                .enumerate()
                .filter(|(index, _)| in_degree[*index] > 0)
                .map(|(_, id)| id.clone())
                .collect();
            let names: Vec<&str> = unresolved.iter().map(String::as_str).collect();
            ConnectionCycleDetected { unresolved: &names }.log();
            return Err(WorkflowError::GraphCycle { unresolved });
        }

        ConnectionsResolved {
            node_count: node_ids.len(),
            edge_count: edges.len(),
        }
        .log();
        Ok(ordered)
    }
}

fn read_targets(from: &str, targets: &[Value], edges: &mut Vec<Edge>) -> WorkflowResult<()> {
    for target in targets {
        match target.get("node") {
            Some(Value::String(node)) if target.is_object() => edges.push(Edge::new(from, node.as_str())),
            _ => {
                return Err(WorkflowError::shape(format!(
                    "workflow connection entries for '{}' require a node string",
                    from
                )))
            }
        }
    }
    Ok(())
}
