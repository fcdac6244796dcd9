// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Turns a workflow document into an ordered [`Definition`].
//!
//! Parsing runs in a fixed sequence:
//!
//! 1. **Shape check**: exactly one of `steps` or `nodes` must be present. This happens before
//!    any node-level work so a document with both is rejected without partial parsing.
//! 2. **Version**: the declared or inferred schema version must be a supported one. When the
//!    parser was built with a target generation the document is also migrated forward and every
//!    migration warning is logged.
//! 3. **Header**: the optional `template` name and the `variables` declarations.
//! 4. **Steps**: flat entries in declaration order, or graph nodes ordered by `connections`.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::definition::{
    ConnectionResolver, Definition, DocumentFormat, ParameterReader, SchemaVersion, StepDefinition,
    VersionMigrator,
};
use crate::errors::{WorkflowError, WorkflowResult};
use crate::observability::messages::migration::MigrationWarning;
use crate::observability::messages::parser::{DefinitionParsed, DocumentLoading};
use crate::observability::messages::StructuredLog;

/// Members of a flat step that are never treated as parameters.
const FLAT_RESERVED_MEMBERS: &[&str] = &["id", "plugin", "name", "inputs", "outputs", "parameters"];

#[derive(Debug, Clone, Default)]
pub struct DefinitionParser {
    reader: ParameterReader,
    resolver: ConnectionResolver,
    migrator: VersionMigrator,
    migration_target: Option<SchemaVersion>,
}

impl DefinitionParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Migrate every parsed document to `target` before reading it.
    pub fn with_migration(mut self, target: SchemaVersion) -> Self {
        self.migration_target = Some(target);
        self
    }

    pub fn migration_target(&self) -> Option<SchemaVersion> {
        self.migration_target
    }

    pub fn parse_file(&self, path: &Path) -> WorkflowResult<Definition> {
        DocumentLoading { path }.log();
        let text = fs::read_to_string(path).map_err(|source| WorkflowError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_str(&text)
    }

    pub fn parse_str(&self, text: &str) -> WorkflowResult<Definition> {
        let document: Value = serde_json::from_str(text)?;
        self.parse_value(&document)
    }

    pub fn parse_value(&self, document: &Value) -> WorkflowResult<Definition> {
        let Value::Object(members) = document else {
            return Err(WorkflowError::shape("workflow must be a JSON object"));
        };

        let has_steps = members.contains_key("steps");
        let has_nodes = members.contains_key("nodes");
        if has_steps && has_nodes {
            return Err(WorkflowError::shape(
                "workflow cannot define both 'steps' and 'nodes'",
            ));
        }
        if !has_steps && !has_nodes {
            return Err(WorkflowError::shape("workflow must define 'steps' or 'nodes'"));
        }

        let document = match self.migration_target {
            Some(target) => {
                let migration = self.migrator.migrate(document, target)?;
                for warning in &migration.warnings {
                    MigrationWarning { warning }.log();
                }
                Cow::Owned(migration.document)
            }
            None => {
                let version = self.migrator.detect_version(document)?;
                self.migrator.parse_version(&version)?;
                Cow::Borrowed(document)
            }
        };
        let Value::Object(members) = document.as_ref() else {
            return Err(WorkflowError::shape("workflow must be a JSON object"));
        };

        let format = if members.contains_key("steps") {
            DocumentFormat::Steps
        } else {
            DocumentFormat::Nodes
        };
        let mut definition = Definition::new(format);
        definition.template_name = match members.get("template") {
            None => None,
            Some(Value::String(name)) => Some(name.clone()),
            Some(_) => return Err(WorkflowError::shape("workflow 'template' must be a string")),
        };
        definition.variables = self.reader.read_variables(members)?;
        definition.steps = match format {
            DocumentFormat::Steps => self.parse_steps(members)?,
            DocumentFormat::Nodes => self.parse_nodes(document.as_ref(), members)?,
        };

        DefinitionParsed {
            format,
            step_count: definition.steps.len(),
            variable_count: definition.variables.len(),
        }
        .log();
        Ok(definition)
    }

    fn parse_steps(&self, members: &Map<String, Value>) -> WorkflowResult<Vec<StepDefinition>> {
        let Some(Value::Array(entries)) = members.get("steps") else {
            return Err(WorkflowError::shape("workflow 'steps' must be an array"));
        };

        let mut seen = HashSet::new();
        let mut steps = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let Value::Object(fields) = entry else {
                return Err(WorkflowError::shape(format!(
                    "workflow step[{}] must be an object",
                    index
                )));
            };
            let id = required_member(fields, index, "id")?;
            let plugin = required_member(fields, index, "plugin")?;
            if !seen.insert(id.clone()) {
                return Err(WorkflowError::DuplicateStepId(id));
            }

            let nested = nested_parameters(fields);
            let mut parameters = self.reader.read_parameter_map(fields, "parameters")?;
            parameters.extend(self.reader.read_parameters(fields, FLAT_RESERVED_MEMBERS)?);

            trace!(step_id = %id, plugin = %plugin, "parsed flat workflow step");
            steps.push(StepDefinition {
                inputs: self.read_io_map(fields, nested, "inputs")?,
                outputs: self.read_io_map(fields, nested, "outputs")?,
                parameters,
                id,
                plugin,
            });
        }
        Ok(steps)
    }

    fn parse_nodes(&self, document: &Value, members: &Map<String, Value>) -> WorkflowResult<Vec<StepDefinition>> {
        let Some(Value::Array(entries)) = members.get("nodes") else {
            return Err(WorkflowError::shape("workflow 'nodes' must be an array"));
        };

        let mut node_ids = Vec::with_capacity(entries.len());
        let mut name_to_id = HashMap::new();
        let mut node_map: HashMap<String, StepDefinition> = HashMap::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            let Value::Object(node) = entry else {
                return Err(WorkflowError::shape(format!(
                    "workflow node[{}] must be an object",
                    index
                )));
            };
            let id = self.reader.read_node_id(node, index)?;
            let plugin = self.reader.read_node_plugin(node, &id)?;
            if node_map.contains_key(&id) {
                return Err(WorkflowError::DuplicateStepId(id));
            }
            if let Some(Value::String(name)) = node.get("name") {
                name_to_id.insert(name.clone(), id.clone());
            }

            let nested = nested_parameters(node);
            let inputs = self.read_io_map(node, nested, "inputs")?;
            let outputs = self.read_io_map(node, nested, "outputs")?;
            let parameters = self.reader.read_parameter_map(node, "parameters")?;

            node_ids.push(id.clone());
            node_map.insert(
                id.clone(),
                StepDefinition {
                    id,
                    plugin,
                    inputs,
                    outputs,
                    parameters,
                },
            );
        }

        let order = if members.contains_key("connections") {
            let edges = self.resolver.read_connections(document)?;
            self.resolver
                .sort_nodes_by_connections(&node_ids, &name_to_id, &edges)?
        } else {
            debug!("workflow declares no connections; using declaration order");
            node_ids
        };

        order
            .into_iter()
            .map(|id| node_map.remove(&id).ok_or(WorkflowError::MissingNodeEntry(id)))
            .collect()
    }

    /// A non-empty top-level `inputs`/`outputs` map wins; otherwise the copy nested under
    /// `parameters` is used.
    fn read_io_map(
        &self,
        node: &Map<String, Value>,
        nested: Option<&Map<String, Value>>,
        name: &str,
    ) -> WorkflowResult<HashMap<String, String>> {
        let top_level = self.reader.read_string_map(node, name)?;
        if !top_level.is_empty() {
            return Ok(top_level);
        }
        match nested {
            Some(parameters) if parameters.get(name).is_some_and(Value::is_object) => {
                self.reader.read_string_map(parameters, name)
            }
            _ => Ok(top_level),
        }
    }
}

fn nested_parameters(entry: &Map<String, Value>) -> Option<&Map<String, Value>> {
    match entry.get("parameters") {
        Some(Value::Object(nested)) => Some(nested),
        _ => None,
    }
}

fn required_member(fields: &Map<String, Value>, index: usize, name: &str) -> WorkflowResult<String> {
    match fields.get(name) {
        Some(Value::String(value)) => Ok(value.clone()),
        _ => Err(WorkflowError::shape(format!(
            "workflow step[{}] requires string {}",
            index, name
        ))),
    }
}
