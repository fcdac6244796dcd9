// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Engine-level built-in steps.
//!
//! These are the generic steps the boot workflow is assembled from. Application plugins live
//! outside the engine and plug in through the same [`Step`](crate::traits::Step) contract.
//!
//! | plugin              | inputs     | outputs    | parameters                         |
//! |---------------------|------------|------------|------------------------------------|
//! | `config.load`       | `path`     | `document` |                                    |
//! | `config.validate`   | `document` |            | `required_fields`, `schema_version` |
//! | `var.set`           |            | `value`    | `value`                            |
//! | `workflow.execute`  |            |            | `package`, `workflow`              |

pub mod config_load;
pub mod config_validate;
pub mod var_set;
pub mod workflow_execute;

#[cfg(test)]
pub mod stub;

use serde_json::Value;
use std::path::PathBuf;

pub use config_load::ConfigLoadStep;
pub use config_validate::ConfigValidateStep;
pub use var_set::VarSetStep;
pub use workflow_execute::WorkflowExecuteStep;

/// A parsed configuration file, shared through the context as `Arc<ConfigDocument>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    pub source: PathBuf,
    pub value: Value,
}

impl ConfigDocument {
    pub fn new(source: impl Into<PathBuf>, value: Value) -> Self {
        Self {
            source: source.into(),
            value,
        }
    }

    /// Value at a JSON pointer such as `/window/width`.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.value.pointer(pointer)
    }

    pub fn schema_version(&self) -> Option<f64> {
        self.value.get("schema_version").and_then(Value::as_f64)
    }
}
