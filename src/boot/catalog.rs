// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::boot::TemplateResolver;
use crate::definition::{Definition, DefinitionParser};
use crate::engine::StepRegistry;
use crate::errors::WorkflowResult;
use crate::observability::messages::boot::{PluginUnavailable, StepsRegistered};
use crate::observability::messages::StructuredLog;
use crate::steps::{ConfigLoadStep, ConfigValidateStep, VarSetStep, WorkflowExecuteStep};
use crate::traits::Step;

/// Constructors for the engine's built-in steps, keyed by plugin id.
///
/// The catalog carries the resolver and parser handed to `workflow.execute` so child workflows
/// are located and parsed the same way as the workflow that calls them.
#[derive(Debug, Clone, Default)]
pub struct StepCatalog {
    resolver: TemplateResolver,
    parser: DefinitionParser,
}

impl StepCatalog {
    pub fn new(resolver: TemplateResolver, parser: DefinitionParser) -> Self {
        Self { resolver, parser }
    }

    /// Create the built-in step for `plugin_id`.
    ///
    /// `registry` is the registry the step will be registered in; `workflow.execute` keeps a
    /// weak handle to it for dispatching child steps.
    /// - "config.load" -> ConfigLoadStep
    /// - "config.validate" -> ConfigValidateStep
    /// - "var.set" -> VarSetStep
    /// - "workflow.execute" -> WorkflowExecuteStep
    pub fn create_step(&self, plugin_id: &str, registry: &Arc<StepRegistry>) -> Option<Arc<dyn Step>> {
        match plugin_id {
            ConfigLoadStep::PLUGIN_ID => Some(Arc::new(ConfigLoadStep::new())),
            ConfigValidateStep::PLUGIN_ID => Some(Arc::new(ConfigValidateStep::new())),
            VarSetStep::PLUGIN_ID => Some(Arc::new(VarSetStep::new())),
            WorkflowExecuteStep::PLUGIN_ID => Some(Arc::new(WorkflowExecuteStep::new(
                registry,
                self.resolver.clone(),
                self.parser.clone(),
            ))),
            _ => None,
        }
    }

    /// List all built-in plugin ids
    pub fn available_plugins() -> Vec<&'static str> {
        vec![
            ConfigLoadStep::PLUGIN_ID,
            ConfigValidateStep::PLUGIN_ID,
            VarSetStep::PLUGIN_ID,
            WorkflowExecuteStep::PLUGIN_ID,
        ]
    }

    pub fn is_plugin_available(plugin_id: &str) -> bool {
        Self::available_plugins().contains(&plugin_id)
    }

    /// Registers only the built-in steps `definition` references.
    ///
    /// Plugins the catalog does not know, and plugins the registry already holds, are left
    /// alone. Returns the number of steps registered.
    pub fn register_used(&self, definition: &Definition, registry: &Arc<StepRegistry>) -> WorkflowResult<usize> {
        let referenced = definition.plugin_ids();
        let mut registered = 0;
        for plugin_id in &referenced {
            if registry.contains(plugin_id) {
                continue;
            }
            match self.create_step(plugin_id, registry) {
                Some(step) => {
                    registry.register_step(step)?;
                    registered += 1;
                }
                None => PluginUnavailable { plugin: plugin_id }.log(),
            }
        }

        StepsRegistered {
            registered,
            referenced: referenced.len(),
        }
        .log();
        Ok(registered)
    }

    /// Registers every built-in step the registry does not already hold.
    pub fn register_all(&self, registry: &Arc<StepRegistry>) -> WorkflowResult<usize> {
        let mut registered = 0;
        for plugin_id in Self::available_plugins() {
            if registry.contains(plugin_id) {
                continue;
            }
            if let Some(step) = self.create_step(plugin_id, registry) {
                registry.register_step(step)?;
                registered += 1;
            }
        }
        Ok(registered)
    }
}
