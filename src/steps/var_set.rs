// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::definition::{ParameterValue, StepDefinition};
use crate::engine::Context;
use crate::errors::WorkflowResult;
use crate::traits::Step;

/// Writes the `value` parameter to output `value` using its natural type:
/// `String`, `f64`, `bool`, `Vec<String>` or `Vec<f64>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct VarSetStep;

impl VarSetStep {
    pub const PLUGIN_ID: &'static str = "var.set";

    pub fn new() -> Self {
        Self
    }
}

impl Step for VarSetStep {
    fn plugin_id(&self) -> &str {
        Self::PLUGIN_ID
    }

    fn execute(&self, step: &StepDefinition, context: &mut Context) -> WorkflowResult<()> {
        let key = step.required_output_key("value")?.to_string();
        match step.required_parameter("value")?.clone() {
            ParameterValue::String(value) => context.set(key, value),
            ParameterValue::Number(value) => context.set(key, value),
            ParameterValue::Bool(value) => context.set(key, value),
            ParameterValue::StringList(values) => context.set(key, values),
            ParameterValue::NumberList(values) => context.set(key, values),
        }
        Ok(())
    }
}
