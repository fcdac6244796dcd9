// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Schema generations of the workflow document and the forward migration chain between them.
//!
//! ```text
//! 2.0.0 (flat steps) --> 2.1.0 (nodes + connections) --> 2.2.0 (nodes carry typeVersion)
//! ```
//!
//! Migration is strictly forward and sequential. Each adjacent transition is a separate
//! function, and migrating is a walk over the ordered [`SchemaVersion`] range from the detected
//! source up to the requested target. Every applied transition contributes one warning so
//! callers can tell authors their document is out of date.
//!
//! Version 1.0.0 is recognized only to be refused with an upgrade instruction.

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Map, Value};

use crate::config::consts::{NODE_POSITION_SPACING, RETIRED_SCHEMA_VERSION};
use crate::errors::{WorkflowError, WorkflowResult};
use crate::observability::messages::migration::{
    MigrationNotRequired, MigrationStarted, MigrationTransitionApplied, VersionDetected,
};
use crate::observability::messages::StructuredLog;

/// Supported schema generations, ordered oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaVersion {
    V2_0,
    V2_1,
    V2_2,
}

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 3] = [SchemaVersion::V2_0, SchemaVersion::V2_1, SchemaVersion::V2_2];

    pub fn latest() -> Self {
        SchemaVersion::V2_2
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V2_0 => "2.0.0",
            SchemaVersion::V2_1 => "2.1.0",
            SchemaVersion::V2_2 => "2.2.0",
        }
    }

    fn next(self) -> Option<SchemaVersion> {
        match self {
            SchemaVersion::V2_0 => Some(SchemaVersion::V2_1),
            SchemaVersion::V2_1 => Some(SchemaVersion::V2_2),
            SchemaVersion::V2_2 => None,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = WorkflowError;

    fn from_str(version: &str) -> Result<Self, Self::Err> {
        match normalize(version).as_str() {
            "2.0.0" => Ok(SchemaVersion::V2_0),
            "2.1.0" => Ok(SchemaVersion::V2_1),
            "2.2.0" => Ok(SchemaVersion::V2_2),
            RETIRED_SCHEMA_VERSION => Err(WorkflowError::RetiredVersion {
                version: RETIRED_SCHEMA_VERSION.to_string(),
            }),
            _ => Err(WorkflowError::UnsupportedVersion {
                version: version.to_string(),
            }),
        }
    }
}

fn normalize(version: &str) -> String {
    match version {
        "1.0" | "1.0.0" => "1.0.0",
        "2.0" | "2.0.0" => "2.0.0",
        "2.1" | "2.1.0" => "2.1.0",
        "2.2" | "2.2.0" => "2.2.0",
        other => other,
    }
    .to_string()
}

/// Result of [`VersionMigrator::migrate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    pub document: Value,
    /// One human-readable entry per applied transition.
    pub warnings: Vec<String>,
    pub source: SchemaVersion,
    pub target: SchemaVersion,
}

impl Migration {
    pub fn is_noop(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct VersionMigrator {
    position_spacing: i64,
}

impl Default for VersionMigrator {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionMigrator {
    pub fn new() -> Self {
        Self {
            position_spacing: NODE_POSITION_SPACING,
        }
    }

    /// Horizontal distance between nodes synthesized from flat steps.
    pub fn with_position_spacing(mut self, spacing: i64) -> Self {
        self.position_spacing = spacing;
        self
    }

    /// Declared `version` string verbatim, otherwise inferred from the document shape.
    pub fn detect_version(&self, document: &Value) -> WorkflowResult<String> {
        let Value::Object(members) = document else {
            return Err(WorkflowError::shape("workflow must be a JSON object"));
        };

        if let Some(version) = members.get("version") {
            let Value::String(version) = version else {
                return Err(WorkflowError::shape("workflow 'version' field must be a string"));
            };
            VersionDetected {
                version,
                declared: true,
            }
            .log();
            return Ok(version.clone());
        }

        let detected = if let Some(Value::Array(_)) = members.get("steps") {
            SchemaVersion::V2_0
        } else if let Some(Value::Array(nodes)) = members.get("nodes") {
            let has_type_versions = nodes
                .iter()
                .any(|node| node.as_object().is_some_and(|n| n.contains_key("typeVersion")));
            if has_type_versions {
                SchemaVersion::V2_2
            } else {
                SchemaVersion::V2_1
            }
        } else {
            return Err(WorkflowError::VersionDetection(
                "document has neither a 'steps' nor a 'nodes' array".to_string(),
            ));
        };

        VersionDetected {
            version: detected.as_str(),
            declared: false,
        }
        .log();
        Ok(detected.as_str().to_string())
    }

    /// Collapses short forms such as `2.1` to `2.1.0`. Unknown strings pass through unchanged.
    pub fn normalize_version(&self, version: &str) -> String {
        normalize(version)
    }

    pub fn is_supported_version(&self, version: &str) -> bool {
        version.parse::<SchemaVersion>().is_ok()
    }

    pub fn parse_version(&self, version: &str) -> WorkflowResult<SchemaVersion> {
        version.parse()
    }

    /// Versions a document at `version` can have been migrated from.
    pub fn supported_older_versions(&self, version: SchemaVersion) -> Vec<SchemaVersion> {
        SchemaVersion::ALL
            .into_iter()
            .filter(|candidate| *candidate < version)
            .collect()
    }

    /// Structural check for one generation, independent of the migration chain.
    pub fn validate_structure(&self, document: &Value, version: SchemaVersion) -> bool {
        match version {
            SchemaVersion::V2_0 => match document.get("steps") {
                Some(Value::Array(steps)) => steps.iter().all(|step| {
                    step.as_object()
                        .is_some_and(|s| s.contains_key("id") && s.contains_key("plugin"))
                }),
                _ => false,
            },
            SchemaVersion::V2_1 => has_graph_members(document),
            SchemaVersion::V2_2 => {
                has_graph_members(document)
                    && document
                        .get("nodes")
                        .and_then(Value::as_array)
                        .is_some_and(|nodes| {
                            nodes.iter().all(|node| {
                                node.as_object().is_some_and(|n| {
                                    ["id", "type", "typeVersion", "position"]
                                        .iter()
                                        .all(|member| n.contains_key(*member))
                                })
                            })
                        })
            }
        }
    }

    /// Migrates `document` forward to `target`, applying only the transitions between the
    /// detected source generation and the target.
    ///
    /// A 1.0.0 source is always rejected. A target older than the source is rejected since no
    /// downgrade path exists.
    pub fn migrate(&self, document: &Value, target: SchemaVersion) -> WorkflowResult<Migration> {
        let detected = self.detect_version(document)?;
        let source = self.parse_version(&detected)?;

        if target < source {
            return Err(WorkflowError::UnsupportedMigration {
                from: source.to_string(),
                to: target.to_string(),
            });
        }
        if target == source {
            MigrationNotRequired {
                version: source.as_str(),
            }
            .log();
            return Ok(Migration {
                document: document.clone(),
                warnings: Vec::new(),
                source,
                target,
            });
        }

        MigrationStarted {
            from: source.as_str(),
            to: target.as_str(),
        }
        .log();

        let mut current = document.clone();
        let mut warnings = Vec::new();
        let mut version = source;
        while version < target {
            let Some(next) = version.next() else {
                break;
            };
            let (migrated, summary) = match version {
                SchemaVersion::V2_0 => (self.steps_to_nodes(&current)?, "converted steps array to nodes format"),
                SchemaVersion::V2_1 => (self.add_type_versions(current), "added typeVersion and type fields"),
                SchemaVersion::V2_2 => break,
            };
            current = migrated;
            MigrationTransitionApplied {
                from: version.as_str(),
                to: next.as_str(),
            }
            .log();
            warnings.push(format!("Migrated from v{} to v{}: {}", version, next, summary));
            version = next;
        }

        Ok(Migration {
            document: current,
            warnings,
            source,
            target,
        })
    }

    /// 2.0.0 -> 2.1.0: every flat step becomes a node laid out left to right.
    fn steps_to_nodes(&self, document: &Value) -> WorkflowResult<Value> {
        let Value::Object(members) = document else {
            return Err(WorkflowError::shape("workflow must be a JSON object"));
        };
        let Some(Value::Array(steps)) = members.get("steps") else {
            return Err(WorkflowError::shape("workflow 'steps' must be an array"));
        };

        let mut migrated: Map<String, Value> = members
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "steps" | "version" | "connections"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let nodes = steps
            .iter()
            .enumerate()
            .map(|(index, step)| self.step_to_node(index, step))
            .collect::<WorkflowResult<Vec<Value>>>()?;

        migrated.insert("nodes".to_string(), Value::Array(nodes));
        migrated.insert("connections".to_string(), Value::Object(Map::new()));
        migrated.insert("version".to_string(), json!(SchemaVersion::V2_1.as_str()));
        Ok(Value::Object(migrated))
    }

    fn step_to_node(&self, index: usize, step: &Value) -> WorkflowResult<Value> {
        let Value::Object(fields) = step else {
            return Err(WorkflowError::shape(format!("workflow step[{}] must be an object", index)));
        };
        let (Some(id), Some(plugin)) = (fields.get("id"), fields.get("plugin")) else {
            return Err(WorkflowError::shape(format!(
                "workflow step[{}] requires id and plugin",
                index
            )));
        };

        let mut parameters = match fields.get("parameters") {
            Some(Value::Object(nested)) => nested.clone(),
            _ => Map::new(),
        };
        for (key, value) in fields {
            if !matches!(
                key.as_str(),
                "id" | "name" | "plugin" | "inputs" | "outputs" | "parameters"
            ) {
                parameters.insert(key.clone(), value.clone());
            }
        }
        for member in ["inputs", "outputs"] {
            if let Some(value @ Value::Object(_)) = fields.get(member) {
                parameters.insert(member.to_string(), value.clone());
            }
        }

        let mut node = Map::new();
        node.insert("id".to_string(), id.clone());
        node.insert("name".to_string(), fields.get("name").unwrap_or(id).clone());
        node.insert("type".to_string(), plugin.clone());
        node.insert(
            "position".to_string(),
            json!([index as i64 * self.position_spacing, 0]),
        );
        if !parameters.is_empty() {
            node.insert("parameters".to_string(), Value::Object(parameters));
        }
        Ok(Value::Object(node))
    }

    /// 2.1.0 -> 2.2.0: nodes gain `typeVersion = 1`, and `type` is backfilled from `plugin`.
    fn add_type_versions(&self, mut document: Value) -> Value {
        if let Some(Value::Array(nodes)) = document.get_mut("nodes") {
            for node in nodes.iter_mut() {
                let Value::Object(node) = node else {
                    continue;
                };
                if !node.contains_key("typeVersion") {
                    node.insert("typeVersion".to_string(), json!(1));
                }
                if !node.contains_key("type") {
                    if let Some(plugin) = node.get("plugin").cloned() {
                        node.insert("type".to_string(), plugin);
                    }
                }
            }
        }
        if let Value::Object(members) = &mut document {
            members.insert("version".to_string(), json!(SchemaVersion::V2_2.as_str()));
        }
        document
    }
}

fn has_graph_members(document: &Value) -> bool {
    matches!(document.get("nodes"), Some(Value::Array(_)))
        && matches!(document.get("connections"), Some(Value::Object(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_document() -> Value {
        json!({
            "template": "boot",
            "variables": {"width": {"type": "number", "defaultValue": 800}},
            "steps": [
                {"id": "load", "plugin": "config.load",
                 "inputs": {"path": "config.path"}, "outputs": {"document": "config.document"}},
                {"id": "check", "name": "Check Config", "plugin": "config.validate",
                 "inputs": {"document": "config.document"},
                 "required_fields": ["window"]},
                {"id": "flag", "plugin": "var.set", "outputs": {"value": "boot.ready"}, "value": true}
            ]
        })
    }

    #[test]
    fn test_detect_version_precedence() {
        let migrator = VersionMigrator::new();
        assert_eq!(migrator.detect_version(&json!({"steps": []})).unwrap(), "2.0.0");
        assert_eq!(
            migrator
                .detect_version(&json!({"nodes": [{"id": "a", "type": "t"}]}))
                .unwrap(),
            "2.1.0"
        );
        assert_eq!(
            migrator
                .detect_version(&json!({"nodes": [{"id": "a", "type": "t", "typeVersion": 1, "position": [0, 0]}]}))
                .unwrap(),
            "2.2.0"
        );
        assert_eq!(
            migrator
                .detect_version(&json!({"version": "2.1", "steps": []}))
                .unwrap(),
            "2.1"
        );
    }

    #[test]
    fn test_detect_version_failures() {
        let migrator = VersionMigrator::new();
        assert!(matches!(
            migrator.detect_version(&json!({"name": "empty"})),
            Err(WorkflowError::VersionDetection(_))
        ));
        assert!(matches!(
            migrator.detect_version(&json!({"version": 2, "steps": []})),
            Err(WorkflowError::DocumentShape(_))
        ));
        assert!(migrator.detect_version(&json!([])).is_err());
    }

    #[test]
    fn test_normalize_and_parse() {
        let migrator = VersionMigrator::new();
        assert_eq!(migrator.normalize_version("2.0"), "2.0.0");
        assert_eq!(migrator.normalize_version("2.2"), "2.2.0");
        assert_eq!(migrator.normalize_version("3.1"), "3.1");
        assert!(migrator.is_supported_version("2.1"));
        assert!(!migrator.is_supported_version("1.0.0"));
        assert!(!migrator.is_supported_version("3.0.0"));

        assert_eq!(migrator.parse_version("2.1").unwrap(), SchemaVersion::V2_1);
        let err = migrator.parse_version("1.0").unwrap_err();
        assert!(matches!(err, WorkflowError::RetiredVersion { .. }));
        assert!(err.to_string().contains("update to v2.0.0"));
        assert!(matches!(
            migrator.parse_version("9.9.9"),
            Err(WorkflowError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_versions_are_ordered() {
        assert!(SchemaVersion::V2_0 < SchemaVersion::V2_1);
        assert!(SchemaVersion::V2_1 < SchemaVersion::V2_2);
        assert_eq!(SchemaVersion::latest(), SchemaVersion::V2_2);

        let migrator = VersionMigrator::new();
        assert_eq!(
            migrator.supported_older_versions(SchemaVersion::V2_2),
            vec![SchemaVersion::V2_0, SchemaVersion::V2_1]
        );
        assert!(migrator.supported_older_versions(SchemaVersion::V2_0).is_empty());
    }

    #[test]
    fn test_migrate_flat_to_latest_applies_both_transitions() {
        let migrator = VersionMigrator::new();
        let migration = migrator.migrate(&flat_document(), SchemaVersion::V2_2).unwrap();

        assert_eq!(migration.source, SchemaVersion::V2_0);
        assert_eq!(migration.warnings.len(), 2);
        assert!(migration.warnings[0].contains("v2.0.0 to v2.1.0"));
        assert!(migration.warnings[1].contains("v2.1.0 to v2.2.0"));

        let document = &migration.document;
        assert_eq!(document["version"], "2.2.0");
        assert!(migrator.validate_structure(document, SchemaVersion::V2_2));
        assert_eq!(document["template"], "boot");
        assert!(document["variables"].is_object());
        assert!(document.get("steps").is_none());

        let nodes = document["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 3);
        for (index, node) in nodes.iter().enumerate() {
            assert!(!node["id"].as_str().unwrap().is_empty());
            assert!(!node["type"].as_str().unwrap().is_empty());
            assert_eq!(node["typeVersion"], 1);
            assert_eq!(node["position"], json!([index as i64 * 130, 0]));
        }
        assert_eq!(nodes[0]["name"], "load");
        assert_eq!(nodes[1]["name"], "Check Config");
        assert_eq!(nodes[0]["parameters"]["inputs"]["path"], "config.path");
        assert_eq!(nodes[0]["parameters"]["outputs"]["document"], "config.document");
        assert_eq!(nodes[1]["parameters"]["required_fields"], json!(["window"]));
        assert_eq!(nodes[2]["parameters"]["outputs"]["value"], "boot.ready");
        assert_eq!(nodes[2]["parameters"]["value"], true);
    }

    #[test]
    fn test_migrate_applies_only_the_needed_segment() {
        let migrator = VersionMigrator::new();
        let migration = migrator.migrate(&flat_document(), SchemaVersion::V2_1).unwrap();

        assert_eq!(migration.warnings.len(), 1);
        assert_eq!(migration.document["version"], "2.1.0");
        assert!(migrator.validate_structure(&migration.document, SchemaVersion::V2_1));
        for node in migration.document["nodes"].as_array().unwrap() {
            assert!(node.get("typeVersion").is_none());
        }
    }

    #[test]
    fn test_migrate_to_same_version_is_noop() {
        let migrator = VersionMigrator::new();
        let document = json!({
            "nodes": [{"id": "a", "plugin": "var.set"}],
            "connections": {}
        });
        let migration = migrator.migrate(&document, SchemaVersion::V2_1).unwrap();
        assert!(migration.is_noop());
        assert_eq!(migration.document, document);
    }

    #[test]
    fn test_migrate_backfills_type_from_plugin() {
        let migrator = VersionMigrator::new();
        let document = json!({
            "version": "2.1.0",
            "nodes": [{"id": "a", "plugin": "var.set", "position": [0, 0]}],
            "connections": {}
        });
        let migration = migrator.migrate(&document, SchemaVersion::V2_2).unwrap();
        assert_eq!(migration.warnings.len(), 1);
        assert_eq!(migration.document["nodes"][0]["type"], "var.set");
        assert_eq!(migration.document["nodes"][0]["typeVersion"], 1);
    }

    #[test]
    fn test_retired_source_always_fails() {
        let migrator = VersionMigrator::new();
        let document = json!({"version": "1.0.0", "steps": []});
        for target in SchemaVersion::ALL {
            assert!(matches!(
                migrator.migrate(&document, target),
                Err(WorkflowError::RetiredVersion { .. })
            ));
        }
    }

    #[test]
    fn test_downgrade_is_rejected() {
        let migrator = VersionMigrator::new();
        let document = json!({"nodes": [{"id": "a", "type": "t", "typeVersion": 1, "position": [0, 0]}], "connections": {}});
        assert!(matches!(
            migrator.migrate(&document, SchemaVersion::V2_0),
            Err(WorkflowError::UnsupportedMigration { .. })
        ));
    }

    #[test]
    fn test_step_without_plugin_cannot_migrate() {
        let migrator = VersionMigrator::new();
        let document = json!({"steps": [{"id": "a"}]});
        assert!(!migrator.validate_structure(&document, SchemaVersion::V2_0));
        assert!(matches!(
            migrator.migrate(&document, SchemaVersion::V2_1),
            Err(WorkflowError::DocumentShape(_))
        ));
    }

    #[test]
    fn test_structure_validators() {
        let migrator = VersionMigrator::new();
        let graph = json!({"nodes": [{"id": "a", "type": "t"}], "connections": {}});
        assert!(migrator.validate_structure(&graph, SchemaVersion::V2_1));
        assert!(!migrator.validate_structure(&graph, SchemaVersion::V2_2));
        assert!(!migrator.validate_structure(&json!({"nodes": []}), SchemaVersion::V2_1));
        assert!(!migrator.validate_structure(&graph, SchemaVersion::V2_0));
    }

    #[test]
    fn test_custom_spacing() {
        let migrator = VersionMigrator::new().with_position_spacing(200);
        let migration = migrator.migrate(&flat_document(), SchemaVersion::V2_1).unwrap();
        assert_eq!(migration.document["nodes"][2]["position"], json!([400, 0]));
    }
}
