// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::definition::StepDefinition;
use crate::engine::Context;
use crate::errors::{WorkflowError, WorkflowResult};
use crate::observability::messages::boot::ConfigDocumentLoaded;
use crate::observability::messages::StructuredLog;
use crate::steps::ConfigDocument;
use crate::traits::Step;

/// Reads the configuration file named by input `path` into output `document`.
///
/// The path may be stored in the context as a `PathBuf` or a `String`. Files ending in `.yaml`
/// or `.yml` are read as YAML, everything else as JSON. The top level must be an object.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigLoadStep;

impl ConfigLoadStep {
    pub const PLUGIN_ID: &'static str = "config.load";

    pub fn new() -> Self {
        Self
    }

    fn read_path(&self, step: &StepDefinition, context: &Context) -> WorkflowResult<PathBuf> {
        let key = step.required_input_key("path")?;
        if let Some(path) = context.try_get::<PathBuf>(key) {
            return Ok(path.clone());
        }
        if let Some(path) = context.try_get::<String>(key) {
            return Ok(PathBuf::from(path));
        }
        Err(WorkflowError::ContextValueMissing {
            key: key.to_string(),
            expected: "path",
        })
    }

    fn load(&self, step: &StepDefinition, path: &Path) -> WorkflowResult<ConfigDocument> {
        let content = fs::read_to_string(path).map_err(|err| {
            WorkflowError::step_failed_with(
                &step.id,
                &step.plugin,
                format!("cannot read configuration '{}'", path.display()),
                err,
            )
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        let value: Value = if is_yaml {
            serde_yaml::from_str(&content).map_err(|err| {
                WorkflowError::step_failed_with(
                    &step.id,
                    &step.plugin,
                    format!("invalid YAML in '{}'", path.display()),
                    err,
                )
            })?
        } else {
            serde_json::from_str(&content).map_err(|err| {
                WorkflowError::step_failed_with(
                    &step.id,
                    &step.plugin,
                    format!("invalid JSON in '{}'", path.display()),
                    err,
                )
            })?
        };

        if !value.is_object() {
            return Err(WorkflowError::step_failed(
                &step.id,
                &step.plugin,
                format!("configuration '{}' must be an object", path.display()),
            ));
        }

        ConfigDocumentLoaded {
            path,
            format: if is_yaml { "YAML" } else { "JSON" },
        }
        .log();
        Ok(ConfigDocument::new(path, value))
    }
}

impl Step for ConfigLoadStep {
    fn plugin_id(&self) -> &str {
        Self::PLUGIN_ID
    }

    fn execute(&self, step: &StepDefinition, context: &mut Context) -> WorkflowResult<()> {
        let output_key = step.required_output_key("document")?.to_string();
        let path = self.read_path(step, context)?;
        let document = self.load(step, &path)?;
        context.set(output_key, Arc::new(document));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn load_step() -> StepDefinition {
        StepDefinition::new("load", ConfigLoadStep::PLUGIN_ID)
            .with_input("path", "config.path")
            .with_output("document", "config.document")
    }

    fn write(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_loads_json_from_path_buf() {
        let file = write(".json", r#"{"window": {"width": 800}}"#);
        let mut context = Context::new();
        context.set("config.path", file.path().to_path_buf());

        ConfigLoadStep::new().execute(&load_step(), &mut context).unwrap();

        let document = context
            .get_required::<Arc<ConfigDocument>>("config.document")
            .unwrap();
        assert_eq!(document.source, file.path());
        assert_eq!(document.pointer("/window/width"), Some(&Value::from(800)));
    }

    #[test]
    fn test_loads_yaml_from_string_path() {
        let file = write(".yaml", "schema_version: 3\nwindow:\n  title: demo\n");
        let mut context = Context::new();
        context.set("config.path", file.path().display().to_string());

        ConfigLoadStep::new().execute(&load_step(), &mut context).unwrap();

        let document = context
            .try_get::<Arc<ConfigDocument>>("config.document")
            .unwrap();
        assert_eq!(document.schema_version(), Some(3.0));
        assert_eq!(document.pointer("/window/title"), Some(&Value::from("demo")));
    }

    #[test]
    fn test_missing_bindings_and_values() {
        let mut context = Context::new();
        let unbound = StepDefinition::new("load", ConfigLoadStep::PLUGIN_ID)
            .with_output("document", "config.document");
        assert!(matches!(
            ConfigLoadStep::new().execute(&unbound, &mut context),
            Err(WorkflowError::MissingInputKey { .. })
        ));

        let err = ConfigLoadStep::new()
            .execute(&load_step(), &mut context)
            .unwrap_err();
        assert!(matches!(err, WorkflowError::ContextValueMissing { ref key, .. } if key == "config.path"));
    }

    #[test]
    fn test_unreadable_or_invalid_files_fail_the_step() {
        let mut context = Context::new();
        context.set("config.path", PathBuf::from("definitely/missing.json"));
        let err = ConfigLoadStep::new()
            .execute(&load_step(), &mut context)
            .unwrap_err();
        assert!(err.to_string().contains("missing.json"));
        assert!(std::error::Error::source(&err).is_some());

        let file = write(".json", "[1, 2]");
        context.set("config.path", file.path().to_path_buf());
        let err = ConfigLoadStep::new()
            .execute(&load_step(), &mut context)
            .unwrap_err();
        assert!(err.to_string().contains("must be an object"));
        assert!(!context.contains("config.document"));
    }
}
