// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use tracing::debug;

use crate::definition::{format_number, StepDefinition};
use crate::engine::Context;
use crate::errors::{WorkflowError, WorkflowResult};
use crate::steps::ConfigDocument;
use crate::traits::Step;

/// Checks a loaded configuration document before the rest of the boot workflow uses it.
///
/// Parameters:
/// * `required_fields` (string list, optional): top-level members that must be present
/// * `schema_version` (number, optional): value the document's `schema_version` must equal
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigValidateStep;

impl ConfigValidateStep {
    pub const PLUGIN_ID: &'static str = "config.validate";

    pub fn new() -> Self {
        Self
    }
}

impl Step for ConfigValidateStep {
    fn plugin_id(&self) -> &str {
        Self::PLUGIN_ID
    }

    fn execute(&self, step: &StepDefinition, context: &mut Context) -> WorkflowResult<()> {
        let key = step.required_input_key("document")?;
        let document = Arc::clone(context.get_required::<Arc<ConfigDocument>>(key)?);

        let required_fields = match step.parameter("required_fields") {
            Some(_) => step.required_string_list("required_fields")?,
            None => &[][..],
        };
        if let Some(field) = required_fields
            .iter()
            .find(|field| document.value.get(field.as_str()).is_none())
        {
            return Err(WorkflowError::step_failed(
                &step.id,
                &step.plugin,
                format!(
                    "configuration '{}' is missing required field '{}'",
                    document.source.display(),
                    field
                ),
            ));
        }

        if let Some(expected) = step.optional_number("schema_version")? {
            match document.schema_version() {
                Some(found) if found == expected => {}
                Some(found) => {
                    return Err(WorkflowError::step_failed(
                        &step.id,
                        &step.plugin,
                        format!(
                            "configuration '{}' has schema_version {}, expected {}",
                            document.source.display(),
                            format_number(found),
                            format_number(expected)
                        ),
                    ))
                }
                None => {
                    return Err(WorkflowError::step_failed(
                        &step.id,
                        &step.plugin,
                        format!(
                            "configuration '{}' declares no schema_version, expected {}",
                            document.source.display(),
                            format_number(expected)
                        ),
                    ))
                }
            }
        }

        debug!(
            step_id = %step.id,
            source = %document.source.display(),
            checked_fields = required_fields.len(),
            "configuration document validated"
        );
        Ok(())
    }
}
