// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while loading engine settings files.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to read or deserialize an [`EngineSettings`](crate::config::EngineSettings) file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in settings file '{path}': {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid YAML in settings file '{path}': {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unsupported settings file extension for '{path}' (expected .toml, .yaml or .yml)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid migration target '{version}' in settings: {reason}")]
    InvalidMigrationTarget { version: String, reason: String },
}
