// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::definition::StepDefinition;
use crate::engine::Context;
use crate::errors::WorkflowResult;

/// A unit of behavior the executor can dispatch a workflow step to.
///
/// Implementations are looked up by [`plugin_id`](Step::plugin_id) and receive the parsed step
/// (its input/output bindings and parameters) together with the shared run context. Returning
/// an error aborts the whole run.
pub trait Step: Send + Sync {
    fn plugin_id(&self) -> &str;

    fn execute(&self, step: &StepDefinition, context: &mut Context) -> WorkflowResult<()>;
}
