// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::definition::StepDefinition;
use crate::errors::{WorkflowError, WorkflowResult};
use crate::traits::Step;

/// Directory of step handlers keyed by plugin id.
///
/// Registration goes through `&self` so a registry shared behind an `Arc` can still be
/// populated after steps holding a weak handle to it (such as `workflow.execute`) were created.
#[derive(Default)]
pub struct StepRegistry {
    steps: RwLock<HashMap<String, Arc<dyn Step>>>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `step` under its plugin id. A second registration for the same id fails.
    pub fn register_step(&self, step: Arc<dyn Step>) -> WorkflowResult<()> {
        let plugin_id = step.plugin_id().to_string();
        let mut steps = self.write();
        if steps.contains_key(&plugin_id) {
            return Err(WorkflowError::DuplicatePluginRegistration(plugin_id));
        }
        steps.insert(plugin_id, step);
        Ok(())
    }

    /// Handler for `plugin_id`. Absence is expected and not an error.
    pub fn get_step(&self, plugin_id: &str) -> Option<Arc<dyn Step>> {
        self.read().get(plugin_id).cloned()
    }

    /// Handler for the step's plugin, or `PluginNotFound` naming the step and plugin.
    pub fn resolve(&self, step: &StepDefinition) -> WorkflowResult<Arc<dyn Step>> {
        self.get_step(&step.plugin)
            .ok_or_else(|| WorkflowError::PluginNotFound {
                step_id: step.id.clone(),
                plugin: step.plugin.clone(),
            })
    }

    pub fn contains(&self, plugin_id: &str) -> bool {
        self.read().contains_key(plugin_id)
    }

    /// Registered plugin ids, sorted.
    pub fn plugin_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave the map half-updated, so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<dyn Step>>> {
        self.steps.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<dyn Step>>> {
        self.steps.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRegistry")
            .field("step_count", &self.len())
            .field("plugin_ids", &self.plugin_ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::stub::RecordingStep;

    #[test]
    fn test_duplicate_registration_fails() {
        let registry = StepRegistry::new();
        registry
            .register_step(Arc::new(RecordingStep::new("graphics.init")))
            .unwrap();

        let err = registry
            .register_step(Arc::new(RecordingStep::new("graphics.init")))
            .unwrap_err();
        assert!(matches!(err, WorkflowError::DuplicatePluginRegistration(ref id) if id == "graphics.init"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_absence_is_not_an_error() {
        let registry = StepRegistry::new();
        registry
            .register_step(Arc::new(RecordingStep::new("var.set")))
            .unwrap();

        assert!(registry.get_step("var.set").is_some());
        assert!(registry.get_step("audio.play").is_none());
        assert!(registry.contains("var.set"));

        let step = StepDefinition::new("play", "audio.play");
        match registry.resolve(&step) {
            Err(WorkflowError::PluginNotFound { step_id, plugin }) => {
                assert_eq!(step_id, "play");
                assert_eq!(plugin, "audio.play");
            }
            other => panic!("expected PluginNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_plugin_ids_are_sorted() {
        let registry = StepRegistry::new();
        assert!(registry.is_empty());
        for id in ["var.set", "config.load", "config.validate"] {
            registry.register_step(Arc::new(RecordingStep::new(id))).unwrap();
        }
        assert_eq!(
            registry.plugin_ids(),
            vec!["config.load", "config.validate", "var.set"]
        );
    }
}
