// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the boot pipeline and its collaborators.
//!
//! This module contains message types for logging events related to:
//! * Engine settings loading
//! * Package template resolution
//! * Scoped step registration
//! * Boot and child workflow runs
//! * Configuration documents loaded by steps

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::Span;

/// Engine settings were read from a file.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SettingsLoaded<'a> {
    pub path: &'a Path,
}

impl Display for SettingsLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Loaded engine settings from {}", self.path.display())
    }
}

impl StructuredLog for SettingsLoaded<'_> {
    fn log(&self) {
        tracing::info!(path = %self.path.display(), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("settings_loaded", span_name = name, path = %self.path.display())
    }
}

/// A package template was found on disk.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct TemplateResolved<'a> {
    pub package: &'a str,
    pub name: &'a str,
    pub path: &'a Path,
}

impl Display for TemplateResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resolved workflow template {}/{} to {}",
            self.package,
            self.name,
            self.path.display()
        )
    }
}

impl StructuredLog for TemplateResolved<'_> {
    fn log(&self) {
        tracing::debug!(
            package = self.package,
            name = self.name,
            path = %self.path.display(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "template_resolved",
            span_name = name,
            package = self.package,
            template = self.name,
        )
    }
}

/// No search root contained the requested template.
///
/// # Log Level
/// `debug!` - The caller decides whether absence is fatal
pub struct TemplateUnresolved<'a> {
    pub package: &'a str,
    pub name: &'a str,
    pub roots_searched: usize,
}

impl Display for TemplateUnresolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Workflow template {}/{} not found in {} search roots",
            self.package, self.name, self.roots_searched
        )
    }
}

impl StructuredLog for TemplateUnresolved<'_> {
    fn log(&self) {
        tracing::debug!(
            package = self.package,
            name = self.name,
            roots_searched = self.roots_searched,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "template_unresolved",
            span_name = name,
            package = self.package,
            template = self.name,
        )
    }
}

/// The catalog registered the steps a definition references.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct StepsRegistered {
    pub registered: usize,
    pub referenced: usize,
}

impl Display for StepsRegistered {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registered {} of {} referenced workflow plugins",
            self.registered, self.referenced
        )
    }
}

impl StructuredLog for StepsRegistered {
    fn log(&self) {
        tracing::debug!(
            registered = self.registered,
            referenced = self.referenced,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "steps_registered",
            span_name = name,
            registered = self.registered,
            referenced = self.referenced,
        )
    }
}

/// A definition references a plugin the built-in catalog does not provide.
///
/// # Log Level
/// `debug!` - The executor warns when the step is reached
pub struct PluginUnavailable<'a> {
    pub plugin: &'a str,
}

impl Display for PluginUnavailable<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "No built-in step provides plugin '{}'", self.plugin)
    }
}

impl StructuredLog for PluginUnavailable<'_> {
    fn log(&self) {
        tracing::debug!(plugin = self.plugin, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("plugin_unavailable", span_name = name, plugin = self.plugin)
    }
}

/// The boot pipeline is starting.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use stepgraph::observability::messages::boot::BootStarted;
/// use std::path::Path;
///
/// let msg = BootStarted {
///     config_path: Path::new("config/app.json"),
///     template: Path::new("packages/bootstrap/workflows/boot.json"),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct BootStarted<'a> {
    pub config_path: &'a Path,
    pub template: &'a Path,
}

impl Display for BootStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Booting configuration {} with workflow {}",
            self.config_path.display(),
            self.template.display()
        )
    }
}

impl StructuredLog for BootStarted<'_> {
    fn log(&self) {
        tracing::info!(
            config_path = %self.config_path.display(),
            template = %self.template.display(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "boot",
            span_name = name,
            config_path = %self.config_path.display(),
        )
    }
}

/// The boot pipeline produced its configuration document.
///
/// # Log Level
/// `info!` - Important operational event
pub struct BootCompleted<'a> {
    pub output_key: &'a str,
    pub duration: std::time::Duration,
}

impl Display for BootCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Boot workflow produced '{}' in {:?}",
            self.output_key, self.duration
        )
    }
}

impl StructuredLog for BootCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            output_key = self.output_key,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("boot_completed", span_name = name, output_key = self.output_key)
    }
}

/// A step is running a child workflow against the shared context.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ChildWorkflowStarted<'a> {
    pub step_id: &'a str,
    pub package: &'a str,
    pub workflow: &'a str,
    pub step_count: usize,
}

impl Display for ChildWorkflowStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Step '{}' executing child workflow {}/{} ({} steps)",
            self.step_id, self.package, self.workflow, self.step_count
        )
    }
}

impl StructuredLog for ChildWorkflowStarted<'_> {
    fn log(&self) {
        tracing::info!(
            step_id = self.step_id,
            package = self.package,
            workflow = self.workflow,
            step_count = self.step_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "child_workflow",
            span_name = name,
            step_id = self.step_id,
            package = self.package,
            workflow = self.workflow,
        )
    }
}

/// A configuration document was read and parsed by a step.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ConfigDocumentLoaded<'a> {
    pub path: &'a Path,
    pub format: &'a str,
}

impl Display for ConfigDocumentLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded {} configuration document {}",
            self.format,
            self.path.display()
        )
    }
}

impl StructuredLog for ConfigDocumentLoaded<'_> {
    fn log(&self) {
        tracing::debug!(path = %self.path.display(), format = self.format, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("config_loaded", span_name = name, path = %self.path.display())
    }
}
