// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging in the workflow engine. Message types follow a struct-based pattern with
//! `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep level and field choices next to the message text
//! * Provide consistent, structured logging output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::parser` - Document loading, parsing and connection ordering
//! * `messages::migration` - Schema detection and migration
//! * `messages::executor` - Workflow run lifecycle and per-step events
//! * `messages::boot` - Settings, templates, registration and the boot pipeline
//!
//! # Usage
//!
//! ```rust
//! use stepgraph::observability::messages::executor::PluginNotRegistered;
//!
//! let msg = PluginNotRegistered {
//!     index: 2,
//!     total: 5,
//!     plugin: "graphics.init",
//!     step_id: "init_graphics",
//! };
//!
//! tracing::warn!("{}", msg);
//! ```

pub mod messages;
