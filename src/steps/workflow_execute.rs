// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use crate::boot::{StepCatalog, TemplateResolver};
use crate::config::consts::MAX_WORKFLOW_NESTING;
use crate::definition::{DefinitionParser, StepDefinition};
use crate::engine::{Context, Executor, StepRegistry};
use crate::errors::{WorkflowError, WorkflowResult};
use crate::observability::messages::boot::ChildWorkflowStarted;
use crate::observability::messages::StructuredLog;
use crate::traits::Step;

/// Runs another package workflow inside the current run.
///
/// The child shares the caller's [`Context`]: it sees every key the parent wrote and its
/// writes are visible to the parent's later steps. Child steps dispatch through the registry
/// this step is registered in, held weakly so the registry can own the step. Built-ins the
/// child references but the registry lacks are registered before the child runs.
///
/// Parameters: `package` and `workflow` (both strings). A template that cannot be found is an
/// error.
pub struct WorkflowExecuteStep {
    registry: Weak<StepRegistry>,
    resolver: TemplateResolver,
    parser: DefinitionParser,
    depth: AtomicUsize,
}

impl WorkflowExecuteStep {
    pub const PLUGIN_ID: &'static str = "workflow.execute";

    pub fn new(registry: &Arc<StepRegistry>, resolver: TemplateResolver, parser: DefinitionParser) -> Self {
        Self {
            registry: Arc::downgrade(registry),
            resolver,
            parser,
            depth: AtomicUsize::new(0),
        }
    }
}

/// Decrements the nesting counter however the child run ends.
struct DepthGuard<'a>(&'a AtomicUsize);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Step for WorkflowExecuteStep {
    fn plugin_id(&self) -> &str {
        Self::PLUGIN_ID
    }

    fn execute(&self, step: &StepDefinition, context: &mut Context) -> WorkflowResult<()> {
        let package = step.required_string("package")?;
        let workflow = step.required_string("workflow")?;

        let path = self.resolver.resolve(package, workflow);
        if path.as_os_str().is_empty() {
            return Err(WorkflowError::TemplateNotFound {
                package: package.to_string(),
                name: workflow.to_string(),
            });
        }
        let definition = self.parser.parse_file(&path)?;

        let registry = self.registry.upgrade().ok_or_else(|| {
            WorkflowError::step_failed(&step.id, &step.plugin, "step registry is no longer available")
        })?;

        let depth = self.depth.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = DepthGuard(&self.depth);
        if depth > MAX_WORKFLOW_NESTING {
            return Err(WorkflowError::step_failed(
                &step.id,
                &step.plugin,
                format!(
                    "child workflow {}/{} exceeds maximum nesting of {}",
                    package, workflow, MAX_WORKFLOW_NESTING
                ),
            ));
        }

        let started_msg = ChildWorkflowStarted {
            step_id: &step.id,
            package,
            workflow,
            step_count: definition.steps.len(),
        };
        let span = started_msg.span("child_workflow");
        let _span_guard = span.enter();
        started_msg.log();

        StepCatalog::new(self.resolver.clone(), self.parser.clone()).register_used(&definition, &registry)?;
        context.seed_variables(&definition.variables);
        Executor::new(registry).execute(&definition, context)?;
        Ok(())
    }
}
