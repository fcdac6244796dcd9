// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Workflow documents: parsing, connection ordering and schema migration.
//!
//! A workflow document arrives in one of two shapes. The legacy flat shape (schema 2.0.0)
//! lists `steps` in execution order; the graph shape (2.1.0 and 2.2.0) lists `nodes` plus a
//! `connections` object describing dependency edges. [`DefinitionParser`] normalizes both into
//! a [`Definition`] whose steps are already in execution order, so the executor never has to
//! reason about the graph.

mod connections;
mod migrator;
mod parameter;
mod parser;
mod reader;
mod step;

#[cfg(test)]
mod integration_tests;

pub use connections::{ConnectionResolver, Edge};
pub use migrator::{Migration, SchemaVersion, VersionMigrator};
pub(crate) use parameter::format_number;
pub use parameter::{ParameterKind, ParameterValue, Variable};
pub use parser::DefinitionParser;
pub use reader::ParameterReader;
pub use step::{Definition, DocumentFormat, StepDefinition};
