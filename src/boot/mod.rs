// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The boot use case: locate a package workflow, register the steps it needs and run it to
//! produce a configuration document.

mod catalog;
mod pipeline;
mod template;

pub use catalog::StepCatalog;
pub use pipeline::ConfigPipeline;
pub use template::TemplateResolver;
