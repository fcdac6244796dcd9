// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for schema version detection and migration.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A document's schema version was determined.
///
/// # Log Level
/// `trace!` - Fine-grained detail
pub struct VersionDetected<'a> {
    pub version: &'a str,
    /// `true` when read from the `version` member, `false` when inferred from the shape.
    pub declared: bool,
}

impl Display for VersionDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let source = if self.declared { "declared" } else { "inferred" };
        write!(f, "Workflow schema version {} ({})", self.version, source)
    }
}

impl StructuredLog for VersionDetected<'_> {
    fn log(&self) {
        tracing::trace!(version = self.version, declared = self.declared, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("version_detected", span_name = name, version = self.version)
    }
}

/// Migration between two generations is starting.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use stepgraph::observability::messages::migration::MigrationStarted;
///
/// let msg = MigrationStarted { from: "2.0.0", to: "2.2.0" };
/// assert_eq!(msg.to_string(), "Migrating workflow from v2.0.0 to v2.2.0");
/// ```
pub struct MigrationStarted<'a> {
    pub from: &'a str,
    pub to: &'a str,
}

impl Display for MigrationStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Migrating workflow from v{} to v{}", self.from, self.to)
    }
}

impl StructuredLog for MigrationStarted<'_> {
    fn log(&self) {
        tracing::info!(from = self.from, to = self.to, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("migration", span_name = name, from = self.from, to = self.to)
    }
}

/// One adjacent transition of the migration chain was applied.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct MigrationTransitionApplied<'a> {
    pub from: &'a str,
    pub to: &'a str,
}

impl Display for MigrationTransitionApplied<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Applied migration v{} -> v{}", self.from, self.to)
    }
}

impl StructuredLog for MigrationTransitionApplied<'_> {
    fn log(&self) {
        tracing::debug!(from = self.from, to = self.to, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("migration_transition", span_name = name, from = self.from, to = self.to)
    }
}

/// The document is already at the requested generation.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct MigrationNotRequired<'a> {
    pub version: &'a str,
}

impl Display for MigrationNotRequired<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Workflow already at v{}; no migration required", self.version)
    }
}

impl StructuredLog for MigrationNotRequired<'_> {
    fn log(&self) {
        tracing::debug!(version = self.version, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("migration_skipped", span_name = name, version = self.version)
    }
}

/// Author-facing notice that a document was migrated while loading.
///
/// # Log Level
/// `warn!` - The document on disk is out of date
pub struct MigrationWarning<'a> {
    pub warning: &'a str,
}

impl Display for MigrationWarning<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(self.warning)
    }
}

impl StructuredLog for MigrationWarning<'_> {
    fn log(&self) {
        tracing::warn!("{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(tracing::Level::WARN, "migration_warning", span_name = name, warning = self.warning)
    }
}
