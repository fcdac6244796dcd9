// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod settings;
mod workflow;

pub use settings::SettingsError;
pub use workflow::{WorkflowError, WorkflowResult};
