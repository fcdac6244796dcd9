// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod boot;          // package templates + boot pipeline
pub mod config;        // engine settings
pub mod definition;    // workflow documents, ordering, migration
pub mod engine;        // context, registry, executor
pub mod errors;        // error handling
pub mod observability; // structured log messages
pub mod steps;         // built-in steps
pub mod traits;        // step contract
