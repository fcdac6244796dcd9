// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for workflow run lifecycle and per-step events.
//!
//! This module contains message types for logging events related to:
//! * Run start and completion
//! * Step entry and completion, with position in the run for traceability
//! * Steps skipped because their plugin is not registered
//! * Step failures that abort the run
//!
//! Step indices are zero-based in the structs and rendered one-based (`[1/3]`).

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A workflow run is starting.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ExecutionStarted {
    pub step_count: usize,
}

impl Display for ExecutionStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Starting workflow execution: {} steps", self.step_count)
    }
}

impl StructuredLog for ExecutionStarted {
    fn log(&self) {
        tracing::info!(step_count = self.step_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("workflow_execution", span_name = name, step_count = self.step_count)
    }
}

/// A step is about to execute.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use stepgraph::observability::messages::executor::StepStarted;
///
/// let msg = StepStarted {
///     index: 1,
///     total: 4,
///     plugin: "config.validate",
///     step_id: "validate_config",
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "[2/4] Executing step 'validate_config' (plugin: config.validate)"
/// );
/// ```
pub struct StepStarted<'a> {
    pub index: usize,
    pub total: usize,
    pub plugin: &'a str,
    pub step_id: &'a str,
}

impl Display for StepStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "[{}/{}] Executing step '{}' (plugin: {})",
            self.index + 1,
            self.total,
            self.step_id,
            self.plugin
        )
    }
}

impl StructuredLog for StepStarted<'_> {
    fn log(&self) {
        tracing::info!(
            index = self.index,
            total = self.total,
            plugin = self.plugin,
            step_id = self.step_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "workflow_step",
            span_name = name,
            index = self.index,
            plugin = self.plugin,
            step_id = self.step_id,
        )
    }
}

/// A step returned successfully.
///
/// # Log Level
/// `info!` - Important operational event
pub struct StepCompleted<'a> {
    pub index: usize,
    pub total: usize,
    pub plugin: &'a str,
    pub step_id: &'a str,
}

impl Display for StepCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "[{}/{}] Completed step '{}' (plugin: {})",
            self.index + 1,
            self.total,
            self.step_id,
            self.plugin
        )
    }
}

impl StructuredLog for StepCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            index = self.index,
            total = self.total,
            plugin = self.plugin,
            step_id = self.step_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "workflow_step_completed",
            span_name = name,
            plugin = self.plugin,
            step_id = self.step_id,
        )
    }
}

/// No step is registered for a plugin; the step is skipped and the run continues.
///
/// # Log Level
/// `warn!` - Recoverable, but the workflow is missing a capability
pub struct PluginNotRegistered<'a> {
    pub index: usize,
    pub total: usize,
    pub plugin: &'a str,
    pub step_id: &'a str,
}

impl Display for PluginNotRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "[{}/{}] Skipping step '{}': no step registered for plugin '{}'",
            self.index + 1,
            self.total,
            self.step_id,
            self.plugin
        )
    }
}

impl StructuredLog for PluginNotRegistered<'_> {
    fn log(&self) {
        tracing::warn!(
            index = self.index,
            total = self.total,
            plugin = self.plugin,
            step_id = self.step_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::WARN,
            "plugin_not_registered",
            span_name = name,
            plugin = self.plugin,
            step_id = self.step_id,
        )
    }
}

/// A step failed and the run is aborting.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct StepExecutionFailed<'a> {
    pub index: usize,
    pub total: usize,
    pub plugin: &'a str,
    pub step_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for StepExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "[{}/{}] Step '{}' (plugin: {}) failed: {}",
            self.index + 1,
            self.total,
            self.step_id,
            self.plugin,
            self.error
        )
    }
}

impl StructuredLog for StepExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            index = self.index,
            total = self.total,
            plugin = self.plugin,
            step_id = self.step_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "workflow_step_failed",
            span_name = name,
            plugin = self.plugin,
            step_id = self.step_id,
            error = %self.error,
        )
    }
}

/// Every step ran or was skipped.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ExecutionCompleted {
    pub executed: usize,
    pub skipped: usize,
    pub duration: std::time::Duration,
}

impl Display for ExecutionCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Workflow execution completed: {} executed, {} skipped in {:?}",
            self.executed, self.skipped, self.duration
        )
    }
}

impl StructuredLog for ExecutionCompleted {
    fn log(&self) {
        tracing::info!(
            executed = self.executed,
            skipped = self.skipped,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "workflow_execution_completed",
            span_name = name,
            executed = self.executed,
            skipped = self.skipped,
            duration = ?self.duration,
        )
    }
}
