// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type is a small struct implementing `Display` for the human-readable line and
//! [`StructuredLog`] for emitting it with typed fields at its designated level.
//!
//! # Organization
//!
//! * `parser` - Document loading, parsing and connection ordering
//! * `migration` - Schema version detection and migration
//! * `executor` - Workflow run lifecycle and per-step events
//! * `boot` - Template resolution, step registration and the boot pipeline
//!
//! # Usage Pattern
//!
//! ```rust
//! use stepgraph::observability::messages::executor::StepStarted;
//! use stepgraph::observability::messages::StructuredLog;
//!
//! let msg = StepStarted {
//!     index: 0,
//!     total: 3,
//!     plugin: "config.load",
//!     step_id: "load_config",
//! };
//!
//! msg.log();
//! tracing::info!("{}", msg);
//! ```

use tracing::Span;

pub mod boot;
pub mod executor;
pub mod migration;
pub mod parser;

/// A message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Open a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
