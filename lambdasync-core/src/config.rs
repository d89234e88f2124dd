// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML project configuration with strict validation.
//!
//! `lambdasync.yaml` is optional. When present, any invalid field results in a
//! HardValidationError before a single provider call is made.

use std::path::Path;

use serde::Deserialize;

use crate::error::{HardValidationError, SyncError, SyncResult};
use crate::types::{MemorySize, Timeout};

/// Project config file name, relative to the project directory.
pub const CONFIG_FILE: &str = "lambdasync.yaml";

/// Default archive written next to the project sources.
pub const DEFAULT_ARCHIVE_NAME: &str = "deploy.zip";

/// Raw configuration as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProjectConfig {
    #[serde(default = "default_runtime")]
    runtime: String,
    #[serde(default = "default_handler")]
    handler: String,
    #[serde(default = "default_memory_size_mb")]
    memory_size_mb: u32,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u32,
    #[serde(default)]
    description: Option<String>,
    #[serde(default = "default_archive_name")]
    archive_name: String,
    #[serde(default)]
    exclude: Vec<String>,
}

fn default_runtime() -> String {
    "nodejs20.x".to_string()
}

fn default_handler() -> String {
    "index.handler".to_string()
}

fn default_memory_size_mb() -> u32 {
    128
}

fn default_timeout_secs() -> u32 {
    3
}

fn default_archive_name() -> String {
    DEFAULT_ARCHIVE_NAME.to_string()
}

/// Validated settings used when creating a function.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    pub runtime: String,
    pub handler: String,
    pub memory_size: MemorySize,
    pub timeout: Timeout,
    pub description: String,
    pub archive_name: String,
    pub exclude: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
            handler: default_handler(),
            memory_size: MemorySize::default(),
            timeout: Timeout::default(),
            description: String::new(),
            archive_name: default_archive_name(),
            exclude: Vec::new(),
        }
    }
}

/// Minimal view of a `package.json`, only for its description.
#[derive(Debug, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    description: Option<String>,
}

/// Project configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the project config for `project_dir`.
    ///
    /// `config_path` defaults to `lambdasync.yaml` in the project directory;
    /// a missing default file yields the built-in defaults, a missing
    /// explicit file is an error.
    pub fn load_project(
        project_dir: &Path,
        config_path: Option<&Path>,
    ) -> SyncResult<ProjectConfig> {
        let raw = match config_path {
            Some(path) => Self::read_raw(path)?,
            None => {
                let path = project_dir.join(CONFIG_FILE);
                if path.exists() {
                    Self::read_raw(&path)?
                } else {
                    tracing::debug!(path = %path.display(), "No project config, using defaults");
                    Self::parse_raw("{}")?
                }
            }
        };

        let mut config = Self::validate(raw)?;
        if config.description.is_empty() {
            config.description = Self::package_description(project_dir).unwrap_or_default();
        }
        Ok(config)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> SyncResult<ProjectConfig> {
        Self::validate(Self::parse_raw(content)?)
    }

    fn read_raw(path: &Path) -> SyncResult<RawProjectConfig> {
        if !path.exists() {
            return Err(SyncError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| SyncError::ConfigParse {
            message: format!("reading {}: {}", path.display(), e),
        })?;

        Self::parse_raw(&content)
    }

    fn parse_raw(content: &str) -> SyncResult<RawProjectConfig> {
        // An empty YAML document deserializes as unit, not as a mapping.
        let content = if content.trim().is_empty() { "{}" } else { content };
        serde_yaml::from_str(content).map_err(|e| SyncError::ConfigParse {
            message: format!("YAML parse error: {}", e),
        })
    }

    /// Validate raw configuration and convert to validated types.
    fn validate(raw: RawProjectConfig) -> SyncResult<ProjectConfig> {
        if raw.runtime.trim().is_empty() {
            return Err(HardValidationError::InvalidFieldValue {
                field: "runtime",
                value: raw.runtime,
                reason: "Runtime cannot be empty".to_string(),
            }
            .into());
        }

        if raw.handler.trim().is_empty() {
            return Err(HardValidationError::InvalidFieldValue {
                field: "handler",
                value: raw.handler,
                reason: "Handler cannot be empty".to_string(),
            }
            .into());
        }

        let archive_path = Path::new(&raw.archive_name);
        if raw.archive_name.is_empty() || archive_path.components().count() != 1 {
            return Err(HardValidationError::InvalidFieldValue {
                field: "archive_name",
                value: raw.archive_name,
                reason: "Archive name must be a plain file name".to_string(),
            }
            .into());
        }

        let memory_size = MemorySize::new(raw.memory_size_mb)?;
        let timeout = Timeout::new(raw.timeout_secs)?;

        Ok(ProjectConfig {
            runtime: raw.runtime,
            handler: raw.handler,
            memory_size,
            timeout,
            description: raw.description.unwrap_or_default(),
            archive_name: raw.archive_name,
            exclude: raw.exclude,
        })
    }

    /// `description` from `package.json` in the project directory, if any.
    fn package_description(project_dir: &Path) -> Option<String> {
        let content = std::fs::read_to_string(project_dir.join("package.json")).ok()?;
        match serde_json::from_str::<PackageManifest>(&content) {
            Ok(manifest) => manifest.description,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unparsable package.json");
                None
            }
        }
    }
}
