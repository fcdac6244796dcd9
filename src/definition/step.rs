// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::{BTreeSet, HashMap};

use crate::definition::{ParameterKind, ParameterValue, Variable};
use crate::errors::{WorkflowError, WorkflowResult};

/// Source shape a [`Definition`] was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Flat `steps` array (schema 2.0.0), executed in declaration order.
    Steps,
    /// `nodes` array with optional `connections` (schema 2.1.0 / 2.2.0).
    Nodes,
}

/// One unit of work in a workflow.
///
/// `inputs` and `outputs` map a logical name the plugin understands to the context key the
/// author chose, so two instances of the same plugin can read and write different slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepDefinition {
    pub id: String,
    pub plugin: String,
    pub inputs: HashMap<String, String>,
    pub outputs: HashMap<String, String>,
    pub parameters: HashMap<String, ParameterValue>,
}

impl StepDefinition {
    pub fn new(id: impl Into<String>, plugin: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            plugin: plugin.into(),
            ..Default::default()
        }
    }

    pub fn with_input(mut self, name: impl Into<String>, key: impl Into<String>) -> Self {
        self.inputs.insert(name.into(), key.into());
        self
    }

    pub fn with_output(mut self, name: impl Into<String>, key: impl Into<String>) -> Self {
        self.outputs.insert(name.into(), key.into());
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn input_key(&self, name: &str) -> Option<&str> {
        self.inputs.get(name).map(String::as_str)
    }

    pub fn output_key(&self, name: &str) -> Option<&str> {
        self.outputs.get(name).map(String::as_str)
    }

    /// Context key bound to the logical input `name`, or `MissingInputKey`.
    pub fn required_input_key(&self, name: &str) -> WorkflowResult<&str> {
        self.input_key(name).ok_or_else(|| WorkflowError::MissingInputKey {
            step_id: self.id.clone(),
            plugin: self.plugin.clone(),
            input: name.to_string(),
        })
    }

    /// Context key bound to the logical output `name`, or `MissingOutputKey`.
    pub fn required_output_key(&self, name: &str) -> WorkflowResult<&str> {
        self.output_key(name).ok_or_else(|| WorkflowError::MissingOutputKey {
            step_id: self.id.clone(),
            plugin: self.plugin.clone(),
            output: name.to_string(),
        })
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters.get(name)
    }

    pub fn required_parameter(&self, name: &str) -> WorkflowResult<&ParameterValue> {
        self.parameter(name).ok_or_else(|| WorkflowError::MissingParameter {
            step_id: self.id.clone(),
            parameter: name.to_string(),
        })
    }

    fn mismatch(&self, name: &str, expected: ParameterKind, found: &ParameterValue) -> WorkflowError {
        WorkflowError::ParameterTypeMismatch {
            step_id: self.id.clone(),
            parameter: name.to_string(),
            expected,
            found: found.kind(),
        }
    }

    pub fn required_string(&self, name: &str) -> WorkflowResult<&str> {
        let value = self.required_parameter(name)?;
        value
            .as_str()
            .ok_or_else(|| self.mismatch(name, ParameterKind::String, value))
    }

    pub fn required_number(&self, name: &str) -> WorkflowResult<f64> {
        let value = self.required_parameter(name)?;
        value
            .as_number()
            .ok_or_else(|| self.mismatch(name, ParameterKind::Number, value))
    }

    pub fn required_bool(&self, name: &str) -> WorkflowResult<bool> {
        let value = self.required_parameter(name)?;
        value
            .as_bool()
            .ok_or_else(|| self.mismatch(name, ParameterKind::Bool, value))
    }

    pub fn required_string_list(&self, name: &str) -> WorkflowResult<&[String]> {
        let value = self.required_parameter(name)?;
        value
            .as_string_list()
            .ok_or_else(|| self.mismatch(name, ParameterKind::StringList, value))
    }

    pub fn required_number_list(&self, name: &str) -> WorkflowResult<&[f64]> {
        let value = self.required_parameter(name)?;
        value
            .as_number_list()
            .ok_or_else(|| self.mismatch(name, ParameterKind::NumberList, value))
    }

    /// Like [`required_string`](Self::required_string) but absence is `Ok(None)`.
    /// A present value of the wrong kind is still an error.
    pub fn optional_string(&self, name: &str) -> WorkflowResult<Option<&str>> {
        match self.parameter(name) {
            None => Ok(None),
            Some(_) => self.required_string(name).map(Some),
        }
    }

    pub fn optional_number(&self, name: &str) -> WorkflowResult<Option<f64>> {
        match self.parameter(name) {
            None => Ok(None),
            Some(_) => self.required_number(name).map(Some),
        }
    }

    pub fn optional_bool(&self, name: &str) -> WorkflowResult<Option<bool>> {
        match self.parameter(name) {
            None => Ok(None),
            Some(_) => self.required_bool(name).map(Some),
        }
    }
}

/// A parsed workflow: variables plus steps in execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub template_name: Option<String>,
    pub variables: HashMap<String, Variable>,
    pub steps: Vec<StepDefinition>,
    pub format: DocumentFormat,
}

impl Definition {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            template_name: None,
            variables: HashMap::new(),
            steps: Vec::new(),
            format,
        }
    }

    /// Distinct plugin identifiers referenced by the steps, sorted.
    pub fn plugin_ids(&self) -> BTreeSet<&str> {
        self.steps.iter().map(|step| step.plugin.as_str()).collect()
    }

    pub fn step(&self, id: &str) -> Option<&StepDefinition> {
        self.steps.iter().find(|step| step.id == id)
    }

    pub fn step_ids(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.id.as_str()).collect()
    }
}
