// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Composition root for turning a configuration file into a loaded document.
//!
//! ```text
//! resolve boot template -> parse (optionally migrating) -> register referenced steps
//!     -> seed context with the config path -> execute -> take the output document
//! ```
//!
//! The boot workflow exists to produce the configuration document. A run that succeeds without
//! writing the designated output key is therefore an error of its own.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::boot::{StepCatalog, TemplateResolver};
use crate::config::{BootSettings, EngineSettings};
use crate::definition::DefinitionParser;
use crate::engine::{Context, Executor, StepRegistry};
use crate::errors::{SettingsError, WorkflowError, WorkflowResult};
use crate::observability::messages::boot::{BootCompleted, BootStarted};
use crate::observability::messages::StructuredLog;
use crate::steps::ConfigDocument;

#[derive(Debug, Clone)]
pub struct ConfigPipeline {
    boot: BootSettings,
    resolver: TemplateResolver,
    parser: DefinitionParser,
}

impl ConfigPipeline {
    pub fn new(settings: &EngineSettings) -> Result<Self, SettingsError> {
        let mut parser = DefinitionParser::new();
        if let Some(target) = settings.migration.target()? {
            parser = parser.with_migration(target);
        }
        Ok(Self {
            boot: settings.boot.clone(),
            resolver: TemplateResolver::new(&settings.packages.roots),
            parser,
        })
    }

    /// Replace the template search roots.
    pub fn with_resolver(mut self, resolver: TemplateResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn run(&self, config_path: &Path) -> WorkflowResult<Arc<ConfigDocument>> {
        let started = Instant::now();
        let template = self.resolver.resolve(&self.boot.package, &self.boot.template);
        if template.as_os_str().is_empty() {
            return Err(WorkflowError::TemplateNotFound {
                package: self.boot.package.clone(),
                name: self.boot.template.clone(),
            });
        }
        let started_msg = BootStarted {
            config_path,
            template: &template,
        };
        let span = started_msg.span("boot");
        let _guard = span.enter();
        started_msg.log();

        let definition = self.parser.parse_file(&template)?;

        let registry = Arc::new(StepRegistry::new());
        StepCatalog::new(self.resolver.clone(), self.parser.clone()).register_used(&definition, &registry)?;

        let mut context = Context::new();
        context.set(self.boot.input_key.clone(), config_path.to_path_buf());
        context.seed_variables(&definition.variables);

        Executor::new(registry).execute(&definition, &mut context)?;

        let document = context
            .take::<Arc<ConfigDocument>>(&self.boot.output_key)
            .ok_or_else(|| WorkflowError::MissingBootOutput {
                key: self.boot.output_key.clone(),
            })?;

        BootCompleted {
            output_key: &self.boot.output_key,
            duration: started.elapsed(),
        }
        .log();
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn install_boot(root: &Path, body: &str) {
        let dir = root.join("packages").join("bootstrap").join("workflows");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("boot.json"), body).unwrap();
    }

    fn pipeline(root: &Path) -> ConfigPipeline {
        ConfigPipeline::new(&EngineSettings::default())
            .unwrap()
            .with_resolver(TemplateResolver::with_roots(vec![root.to_path_buf()]))
    }

    #[test]
    fn test_boot_produces_document() {
        let root = TempDir::new().unwrap();
        install_boot(
            root.path(),
            r#"{"steps": [
                {"id": "load", "plugin": "config.load",
                 "inputs": {"path": "config.path"}, "outputs": {"document": "config.document"}},
                {"id": "check", "plugin": "config.validate",
                 "inputs": {"document": "config.document"}, "required_fields": ["window"]}
            ]}"#,
        );
        let config = root.path().join("app.json");
        fs::write(&config, r#"{"window": {"width": 640}}"#).unwrap();

        let document = pipeline(root.path()).run(&config).unwrap();
        assert_eq!(document.source, config);
        assert_eq!(document.pointer("/window/width").and_then(|v| v.as_i64()), Some(640));
    }

    #[test]
    fn test_boot_delegating_to_child_workflow() {
        let root = TempDir::new().unwrap();
        install_boot(
            root.path(),
            r#"{"steps": [{"id": "delegate", "plugin": "workflow.execute",
                           "package": "bootstrap", "workflow": "load"}]}"#,
        );
        fs::write(
            root.path().join("packages/bootstrap/workflows/load.json"),
            r#"{"steps": [{"id": "load", "plugin": "config.load",
                           "inputs": {"path": "config.path"}, "outputs": {"document": "config.document"}}]}"#,
        )
        .unwrap();
        let config = root.path().join("app.json");
        fs::write(&config, r#"{"window": {"width": 320}}"#).unwrap();

        let document = pipeline(root.path()).run(&config).unwrap();
        assert_eq!(document.pointer("/window/width").and_then(|v| v.as_i64()), Some(320));
    }

    #[test]
    fn test_missing_output_is_an_error() {
        let root = TempDir::new().unwrap();
        install_boot(
            root.path(),
            r#"{"steps": [{"id": "noop", "plugin": "var.set", "outputs": {"value": "other"}, "value": 1}]}"#,
        );

        let err = pipeline(root.path())
            .run(Path::new("unused.json"))
            .unwrap_err();
        assert!(matches!(err, WorkflowError::MissingBootOutput { ref key } if key == "config.document"));
    }

    #[test]
    fn test_missing_template_is_an_error() {
        let root = TempDir::new().unwrap();
        let err = pipeline(root.path())
            .run(Path::new("unused.json"))
            .unwrap_err();
        assert!(matches!(err, WorkflowError::TemplateNotFound { .. }));
        assert!(err.to_string().contains("bootstrap"));
    }

    #[test]
    fn test_invalid_migration_target_is_rejected_up_front() {
        let mut settings = EngineSettings::default();
        settings.migration.target_version = Some("4.0.0".to_string());
        assert!(matches!(
            ConfigPipeline::new(&settings),
            Err(SettingsError::InvalidMigrationTarget { .. })
        ));
    }
}
