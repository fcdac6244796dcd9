// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Runtime side of the engine: the shared [`Context`], the [`StepRegistry`] and the
//! [`Executor`] that drives a parsed definition step by step.

pub mod context;
pub mod executor;
pub mod registry;

pub use context::Context;
pub use executor::{ExecutionSummary, Executor};
pub use registry::StepRegistry;
