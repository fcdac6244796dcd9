// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error taxonomy for parsing, migrating and executing workflow documents.
//!
//! Every variant aborts a workflow run when it propagates out of a step or out of the
//! parser. The single exception is [`WorkflowError::PluginNotFound`], which the
//! [`Executor`](crate::engine::Executor) matches explicitly and downgrades to a warning.
//! Messages embed the offending step id, plugin, parameter or context key so a failure can be
//! located from the log line alone.

use std::path::PathBuf;
use thiserror::Error;

use crate::definition::ParameterKind;

/// Convenience alias used throughout the crate.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[derive(Error, Debug)]
pub enum WorkflowError {
    /// The document does not have the expected shape (steps/nodes, member types, ids).
    #[error("Invalid workflow document: {0}")]
    DocumentShape(String),

    #[error("Workflow document is not valid JSON: {source}")]
    InvalidJson {
        #[from]
        source: serde_json::Error,
    },

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither a `steps` nor a `nodes` array was found and no `version` was declared.
    #[error("Cannot detect workflow version: {0}")]
    VersionDetection(String),

    /// Version 1.0.0 is recognized but has no migration path.
    #[error("Workflow version {version} is no longer supported. Please update to v2.0.0 or later.")]
    RetiredVersion { version: String },

    #[error("Unsupported workflow version '{version}' (supported: 2.0.0, 2.1.0, 2.2.0)")]
    UnsupportedVersion { version: String },

    #[error("Cannot migrate workflow from v{from} to v{to}: only forward migrations are supported")]
    UnsupportedMigration { from: String, to: String },

    #[error("Workflow connections contain a cycle (unresolved nodes: {})", .unresolved.join(", "))]
    GraphCycle { unresolved: Vec<String> },

    #[error("Workflow connection references unknown node '{name}' (id: {id})")]
    UnknownConnectionTarget { name: String, id: String },

    /// The resolved order names an id that no parsed node carries.
    #[error("Workflow nodes missing entry for '{0}'")]
    MissingNodeEntry(String),

    #[error("Duplicate workflow step id '{0}'")]
    DuplicateStepId(String),

    #[error("Step '{step_id}' ({plugin}) is missing required input '{input}'")]
    MissingInputKey {
        step_id: String,
        plugin: String,
        input: String,
    },

    #[error("Step '{step_id}' ({plugin}) is missing required output '{output}'")]
    MissingOutputKey {
        step_id: String,
        plugin: String,
        output: String,
    },

    #[error("Workflow step '{step_id}' missing parameter '{parameter}'")]
    MissingParameter { step_id: String, parameter: String },

    #[error("Workflow step '{step_id}' parameter '{parameter}' must be a {expected}, found {found}")]
    ParameterTypeMismatch {
        step_id: String,
        parameter: String,
        expected: ParameterKind,
        found: ParameterKind,
    },

    #[error("Workflow parameter '{parameter}' cannot mix string and number values")]
    MixedParameterList { parameter: String },

    #[error("Workflow parameter '{parameter}' {reason}")]
    InvalidParameter { parameter: String, reason: String },

    #[error("Workflow step plugin '{0}' is already registered")]
    DuplicatePluginRegistration(String),

    /// Recoverable: the executor logs and skips the step.
    #[error("No step registered for plugin '{plugin}' (step '{step_id}')")]
    PluginNotFound { step_id: String, plugin: String },

    #[error("Context value '{key}' not found or not a {expected}")]
    ContextValueMissing { key: String, expected: &'static str },

    #[error("Workflow template '{name}' not found in package '{package}'")]
    TemplateNotFound { package: String, name: String },

    /// The boot workflow completed without producing its designated output.
    #[error("Boot workflow completed without producing context key '{key}'")]
    MissingBootOutput { key: String },

    #[error("Step '{step_id}' ({plugin}) failed: {message}")]
    StepFailed {
        step_id: String,
        plugin: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl WorkflowError {
    /// Step failure with a plain message and no underlying cause.
    pub fn step_failed(step_id: &str, plugin: &str, message: impl Into<String>) -> Self {
        WorkflowError::StepFailed {
            step_id: step_id.to_string(),
            plugin: plugin.to_string(),
            message: message.into(),
            source: None,
        }
    }

    /// Step failure wrapping the error that caused it.
    pub fn step_failed_with<E>(step_id: &str, plugin: &str, message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        WorkflowError::StepFailed {
            step_id: step_id.to_string(),
            plugin: plugin.to_string(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub(crate) fn shape(message: impl Into<String>) -> Self {
        WorkflowError::DocumentShape(message.into())
    }
}
