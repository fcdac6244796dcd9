// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::definition::StepDefinition;
use crate::engine::Context;
use crate::errors::{WorkflowError, WorkflowResult};
use crate::traits::Step;

/// Appends each executed step id to a `Vec<String>` in the context
pub struct RecordingStep {
    pub plugin_id: String,
}

impl RecordingStep {
    pub const TRACE_KEY: &'static str = "test.trace";

    pub fn new(plugin_id: &str) -> Self {
        Self {
            plugin_id: plugin_id.to_string(),
        }
    }
}

impl Step for RecordingStep {
    fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    fn execute(&self, step: &StepDefinition, context: &mut Context) -> WorkflowResult<()> {
        match context.try_get_mut::<Vec<String>>(Self::TRACE_KEY) {
            Some(trace) => trace.push(step.id.clone()),
            None => context.set(Self::TRACE_KEY, vec![step.id.clone()]),
        }
        Ok(())
    }
}

/// A step that always fails for testing abort scenarios
pub struct FailingStep {
    pub plugin_id: String,
}

impl FailingStep {
    pub fn new(plugin_id: &str) -> Self {
        Self {
            plugin_id: plugin_id.to_string(),
        }
    }
}

impl Step for FailingStep {
    fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    fn execute(&self, step: &StepDefinition, _context: &mut Context) -> WorkflowResult<()> {
        Err(WorkflowError::step_failed(&step.id, &step.plugin, "intentional failure"))
    }
}
