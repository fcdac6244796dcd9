// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod consts;
mod settings;

pub use settings::{
    load_settings, BootSettings, EngineSettings, LoggingSettings, MigrationSettings, PackageSettings,
};
