// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for workflow document parsing.
//!
//! This module contains message types for logging events related to:
//! * Reading workflow documents from disk
//! * Parsed definition summaries
//! * Connection graph ordering and cycle detection

use crate::definition::DocumentFormat;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::Span;

/// A workflow document is about to be read.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct DocumentLoading<'a> {
    pub path: &'a Path,
}

impl Display for DocumentLoading<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Loading workflow document from {}", self.path.display())
    }
}

impl StructuredLog for DocumentLoading<'_> {
    fn log(&self) {
        tracing::debug!(path = %self.path.display(), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("document_loading", span_name = name, path = %self.path.display())
    }
}

/// A workflow document was parsed into an ordered definition.
///
/// # Log Level
/// `debug!` - Diagnostic detail
///
/// # Example
/// ```
/// use stepgraph::definition::DocumentFormat;
/// use stepgraph::observability::messages::parser::DefinitionParsed;
///
/// let msg = DefinitionParsed {
///     format: DocumentFormat::Nodes,
///     step_count: 4,
///     variable_count: 2,
/// };
///
/// assert!(msg.to_string().contains("4 steps"));
/// ```
pub struct DefinitionParsed {
    pub format: DocumentFormat,
    pub step_count: usize,
    pub variable_count: usize,
}

impl Display for DefinitionParsed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Parsed workflow ({:?} format): {} steps, {} variables",
            self.format, self.step_count, self.variable_count
        )
    }
}

impl StructuredLog for DefinitionParsed {
    fn log(&self) {
        tracing::debug!(
            format = ?self.format,
            step_count = self.step_count,
            variable_count = self.variable_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "definition_parsed",
            span_name = name,
            format = ?self.format,
            step_count = self.step_count,
        )
    }
}

/// Connection edges produced a complete execution order.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ConnectionsResolved {
    pub node_count: usize,
    pub edge_count: usize,
}

impl Display for ConnectionsResolved {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resolved execution order for {} nodes across {} connections",
            self.node_count, self.edge_count
        )
    }
}

impl StructuredLog for ConnectionsResolved {
    fn log(&self) {
        tracing::debug!(
            node_count = self.node_count,
            edge_count = self.edge_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "connections_resolved",
            span_name = name,
            node_count = self.node_count,
            edge_count = self.edge_count,
        )
    }
}

/// Topological ordering stopped short because the connections contain a cycle.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use stepgraph::observability::messages::parser::ConnectionCycleDetected;
///
/// let unresolved = vec!["render", "present"];
/// let msg = ConnectionCycleDetected {
///     unresolved: &unresolved,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ConnectionCycleDetected<'a> {
    pub unresolved: &'a [&'a str],
}

impl Display for ConnectionCycleDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Workflow connections contain a cycle; unresolved nodes: {}",
            self.unresolved.join(", ")
        )
    }
}

impl StructuredLog for ConnectionCycleDetected<'_> {
    fn log(&self) {
        tracing::error!(
            unresolved = self.unresolved.join(", "),
            unresolved_count = self.unresolved.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "connection_cycle",
            span_name = name,
            unresolved = self.unresolved.join(", "),
        )
    }
}
