// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Sequential workflow executor.
//!
//! Steps run one at a time, in the order the parser already resolved, each to completion before
//! the next begins. There is no parallel branch execution, retry or rollback.
//!
//! ## Failure handling
//!
//! * **Unregistered plugin**: the step is logged at warn level and skipped, and the run goes on.
//!   This is the only recoverable condition.
//! * **Any step error**: propagated immediately, aborting the run. Values already written to the
//!   context stay there; resources a failing step acquired are its own to release.

use std::sync::Arc;
use std::time::Instant;

use crate::definition::Definition;
use crate::engine::{Context, StepRegistry};
use crate::errors::{WorkflowError, WorkflowResult};
use crate::observability::messages::executor::{
    ExecutionCompleted, ExecutionStarted, PluginNotRegistered, StepCompleted, StepExecutionFailed,
    StepStarted,
};
use crate::observability::messages::StructuredLog;

/// Step ids a run executed and skipped, each in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionSummary {
    pub executed: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Executor {
    registry: Arc<StepRegistry>,
}

impl Executor {
    pub fn new(registry: Arc<StepRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<StepRegistry> {
        &self.registry
    }

    pub fn execute(&self, definition: &Definition, context: &mut Context) -> WorkflowResult<ExecutionSummary> {
        let total = definition.steps.len();
        let started = Instant::now();
        let mut summary = ExecutionSummary::default();
        ExecutionStarted { step_count: total }.log();

        for (index, step) in definition.steps.iter().enumerate() {
            let handler = match self.registry.resolve(step) {
                Ok(handler) => handler,
                Err(WorkflowError::PluginNotFound { .. }) => {
                    PluginNotRegistered {
                        index,
                        total,
                        plugin: &step.plugin,
                        step_id: &step.id,
                    }
                    .log();
                    summary.skipped.push(step.id.clone());
                    continue;
                }
                Err(other) => return Err(other),
            };

            let started_msg = StepStarted {
                index,
                total,
                plugin: &step.plugin,
                step_id: &step.id,
            };
            let span = started_msg.span("step_execution");
            let _guard = span.enter();
            started_msg.log();

            if let Err(error) = handler.execute(step, context) {
                StepExecutionFailed {
                    index,
                    total,
                    plugin: &step.plugin,
                    step_id: &step.id,
                    error: &error,
                }
                .log();
                return Err(error);
            }

            StepCompleted {
                index,
                total,
                plugin: &step.plugin,
                step_id: &step.id,
            }
            .log();
            summary.executed.push(step.id.clone());
        }

        ExecutionCompleted {
            executed: summary.executed.len(),
            skipped: summary.skipped.len(),
            duration: started.elapsed(),
        }
        .log();
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{DocumentFormat, StepDefinition};
    use crate::steps::stub::{FailingStep, RecordingStep};

    fn definition(steps: &[(&str, &str)]) -> Definition {
        let mut definition = Definition::new(DocumentFormat::Steps);
        definition.steps = steps
            .iter()
            .map(|(id, plugin)| StepDefinition::new(*id, *plugin))
            .collect();
        definition
    }

    #[test]
    fn test_steps_run_in_definition_order() {
        let registry = Arc::new(StepRegistry::new());
        registry.register_step(Arc::new(RecordingStep::new("record"))).unwrap();
        let executor = Executor::new(registry);

        let mut context = Context::new();
        let summary = executor
            .execute(&definition(&[("c", "record"), ("a", "record"), ("b", "record")]), &mut context)
            .unwrap();

        assert_eq!(summary.executed, vec!["c", "a", "b"]);
        assert_eq!(
            context.try_get::<Vec<String>>(RecordingStep::TRACE_KEY).unwrap(),
            &vec!["c".to_string(), "a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_unregistered_plugin_is_skipped() {
        let registry = Arc::new(StepRegistry::new());
        registry.register_step(Arc::new(RecordingStep::new("record"))).unwrap();
        let executor = Executor::new(registry);

        let mut context = Context::new();
        let summary = executor
            .execute(
                &definition(&[("first", "record"), ("gfx", "graphics.init"), ("last", "record")]),
                &mut context,
            )
            .unwrap();

        assert_eq!(summary.executed, vec!["first", "last"]);
        assert_eq!(summary.skipped, vec!["gfx"]);
    }

    #[test]
    fn test_step_error_aborts_the_run() {
        let registry = Arc::new(StepRegistry::new());
        registry.register_step(Arc::new(RecordingStep::new("record"))).unwrap();
        registry.register_step(Arc::new(FailingStep::new("explode"))).unwrap();
        let executor = Executor::new(registry);

        let mut context = Context::new();
        let err = executor
            .execute(
                &definition(&[("before", "record"), ("boom", "explode"), ("after", "record")]),
                &mut context,
            )
            .unwrap_err();

        assert!(matches!(err, WorkflowError::StepFailed { ref step_id, .. } if step_id == "boom"));
        assert_eq!(
            context.try_get::<Vec<String>>(RecordingStep::TRACE_KEY).unwrap(),
            &vec!["before".to_string()]
        );
    }

    #[test]
    fn test_empty_definition() {
        let executor = Executor::new(Arc::new(StepRegistry::new()));
        let summary = executor
            .execute(&definition(&[]), &mut Context::new())
            .unwrap();
        assert_eq!(summary, ExecutionSummary::default());
    }
}
