// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Parses the workflow documents shipped under `workflows/` and `packages/`.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::definition::{DefinitionParser, DocumentFormat, ParameterValue, SchemaVersion, VersionMigrator};
use crate::errors::WorkflowError;

fn load(path: &str) -> Value {
    let text = fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

/// Test the flat 2.0.0 document parses in declaration order with its header
#[test]
fn test_flat_workflow_file() {
    let definition = DefinitionParser::new()
        .parse_file(Path::new("workflows/flat_v2_0.json"))
        .unwrap();

    assert_eq!(definition.format, DocumentFormat::Steps);
    assert_eq!(definition.template_name.as_deref(), Some("load_and_check"));
    assert_eq!(definition.step_ids(), vec!["load", "check", "mark_ready"]);
    assert_eq!(definition.variables.len(), 2);
    assert_eq!(definition.variables["retries"].default_value, "3");

    let check = definition.step("check").unwrap();
    assert_eq!(check.input_key("document"), Some("config.document"));
    assert_eq!(
        check.required_string_list("required_fields").unwrap(),
        &["window".to_string(), "renderer".to_string()][..]
    );
    assert_eq!(check.required_number("schema_version").unwrap(), 2.0);
}

/// Test graph documents are reordered by their connections, whichever `main` shape they use
#[test]
fn test_graph_workflow_files_follow_connections() {
    let parser = DefinitionParser::new();

    let object_main = parser.parse_file(Path::new("workflows/graph_v2_1.json")).unwrap();
    assert_eq!(object_main.format, DocumentFormat::Nodes);
    assert_eq!(object_main.step_ids(), vec!["load", "check", "mark_ready"]);
    let load = object_main.step("load").unwrap();
    assert_eq!(load.input_key("path"), Some("config.path"));
    assert_eq!(load.output_key("document"), Some("config.document"));
    assert!(load.parameters.is_empty());

    let array_main = parser.parse_file(Path::new("workflows/graph_v2_2.json")).unwrap();
    assert_eq!(array_main.step_ids(), vec!["load", "defaults", "render"]);
    assert_eq!(
        array_main.step("defaults").unwrap().parameter("workflow"),
        Some(&ParameterValue::from("apply_defaults"))
    );
}

/// Test migrating the flat document keeps its steps, io maps and parameters
#[test]
fn test_migrated_flat_workflow_matches_original() {
    let original = DefinitionParser::new()
        .parse_file(Path::new("workflows/flat_v2_0.json"))
        .unwrap();
    let migrated = DefinitionParser::new()
        .with_migration(SchemaVersion::V2_2)
        .parse_file(Path::new("workflows/flat_v2_0.json"))
        .unwrap();

    assert_eq!(migrated.format, DocumentFormat::Nodes);
    assert_eq!(migrated.template_name, original.template_name);
    assert_eq!(migrated.variables, original.variables);
    assert_eq!(migrated.steps, original.steps);
}

/// Test the migrated document carries the 2.2.0 node fields
#[test]
fn test_migration_output_structure() {
    let migrator = VersionMigrator::new();
    let migration = migrator
        .migrate(&load("workflows/flat_v2_0.json"), SchemaVersion::V2_2)
        .unwrap();

    assert_eq!(migration.source, SchemaVersion::V2_0);
    assert_eq!(migration.warnings.len(), 2);
    assert!(migrator.validate_structure(&migration.document, SchemaVersion::V2_2));

    let nodes = migration.document["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[2]["type"], "var.set");
    assert_eq!(nodes[2]["typeVersion"], 1);
    assert_eq!(nodes[2]["position"][0], 260);
}

/// Test every shipped document declares a supported version
#[test]
fn test_shipped_documents_detect_their_versions() {
    let migrator = VersionMigrator::new();
    for (path, expected) in [
        ("workflows/flat_v2_0.json", "2.0.0"),
        ("workflows/graph_v2_1.json", "2.1.0"),
        ("workflows/graph_v2_2.json", "2.2.0"),
        ("packages/bootstrap/workflows/boot.json", "2.0.0"),
        ("packages/tools/workflows/apply_defaults.json", "2.0.0"),
    ] {
        let version = migrator.detect_version(&load(path)).unwrap();
        assert_eq!(version, expected, "{}", path);
        assert!(migrator.is_supported_version(&version));
    }
}

/// Test a cyclic graph fails with every unresolved node named
#[test]
fn test_cyclic_workflow_file() {
    let err = DefinitionParser::new()
        .parse_file(Path::new("workflows/cyclic.json"))
        .unwrap_err();
    match err {
        WorkflowError::GraphCycle { unresolved } => assert_eq!(unresolved, vec!["a", "b"]),
        other => panic!("expected GraphCycle, got {:?}", other),
    }
}

/// Test a missing file surfaces as an I/O error naming the path
#[test]
fn test_missing_workflow_file() {
    let err = DefinitionParser::new()
        .parse_file(Path::new("workflows/absent.json"))
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}
