// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_BOOT_PACKAGE, DEFAULT_BOOT_TEMPLATE, DEFAULT_CONFIG_DOCUMENT_KEY, DEFAULT_CONFIG_PATH_KEY,
    DEFAULT_LOG_FILTER,
};
use crate::definition::SchemaVersion;
use crate::errors::SettingsError;
use crate::observability::messages::boot::SettingsLoaded;
use crate::observability::messages::StructuredLog;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Engine-level settings, independent of any workflow document.
///
/// Every section is optional; a missing section or field falls back to the defaults in
/// [`consts`](crate::config::consts).
///
/// # Example
/// ```toml
/// [boot]
/// package = "bootstrap"
/// template = "boot.json"
/// input_key = "config.path"
/// output_key = "config.document"
///
/// [migration]
/// target_version = "2.2.0"
///
/// [packages]
/// roots = ["/opt/app/share"]
///
/// [logging]
/// filter = "stepgraph=debug"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub boot: BootSettings,
    pub migration: MigrationSettings,
    pub packages: PackageSettings,
    pub logging: LoggingSettings,
}

/// Where the boot workflow lives and which context keys it reads and fills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootSettings {
    pub package: String,
    pub template: String,
    pub input_key: String,
    pub output_key: String,
}

impl Default for BootSettings {
    fn default() -> Self {
        Self {
            package: DEFAULT_BOOT_PACKAGE.to_string(),
            template: DEFAULT_BOOT_TEMPLATE.to_string(),
            input_key: DEFAULT_CONFIG_PATH_KEY.to_string(),
            output_key: DEFAULT_CONFIG_DOCUMENT_KEY.to_string(),
        }
    }
}

/// Schema generation documents are migrated to before parsing. `None` parses as written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationSettings {
    pub target_version: Option<String>,
}

impl MigrationSettings {
    pub fn target(&self) -> Result<Option<SchemaVersion>, SettingsError> {
        match &self.target_version {
            None => Ok(None),
            Some(version) => version.parse::<SchemaVersion>().map(Some).map_err(|err| {
                SettingsError::InvalidMigrationTarget {
                    version: version.clone(),
                    reason: err.to_string(),
                }
            }),
        }
    }
}

/// Additional roots searched for `packages/<package>/workflows/<name>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageSettings {
    pub roots: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Load settings from a TOML (`.toml`) or YAML (`.yaml`, `.yml`) file.
///
/// The migration target is checked here so a bad version is reported at startup rather than on
/// the first parse.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<EngineSettings, SettingsError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let settings: EngineSettings = match extension.as_deref() {
        Some("toml") => {
            let content = read(path)?;
            toml::from_str(&content).map_err(|source| SettingsError::Toml {
                path: path.to_path_buf(),
                source,
            })?
        }
        Some("yaml") | Some("yml") => {
            let content = read(path)?;
            serde_yaml::from_str(&content).map_err(|source| SettingsError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
        }
        _ => {
            return Err(SettingsError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    settings.migration.target()?;
    SettingsLoaded { path }.log();
    Ok(settings)
}

fn read(path: &Path) -> Result<String, SettingsError> {
    fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })
}
