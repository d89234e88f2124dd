// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Custom error types for lambdasync.
//!
//! This module defines explicit enum error types as per coding guidelines.
//! No `Box<dyn Error>`, no `anyhow::Result` - all errors are strongly typed.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the lambdasync workflows.
/// All errors are explicit variants - no catch-all or generic handling.
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Local State Errors
    // =========================================================================
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Credentials error: {0}")]
    Credentials(#[from] CredentialsError),

    #[error("Missing setting '{key}' in settings file")]
    MissingSetting { key: &'static str },

    // =========================================================================
    // Project Configuration Errors - Fail-Fast on Invalid Config
    // =========================================================================
    #[error("Hard validation error: {0}")]
    HardValidation(#[from] HardValidationError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    // =========================================================================
    // Deploy Errors
    // =========================================================================
    #[error("Packaging error: {0}")]
    Packaging(#[from] PackagingError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // =========================================================================
    // Invocation Errors
    // =========================================================================
    #[error("Unsupported API call '{call}'")]
    UnsupportedCall { call: String },

    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument { argument: String, reason: String },

    #[error("Prompt failed: {message}")]
    Prompt { message: String },
}

/// Errors reading or writing the local settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Settings file {path} is not valid JSON: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },
}

/// Errors reading the shared AWS credentials/config INI files.
#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("Cannot locate home directory for AWS files")]
    NoHomeDirectory,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed INI in {path} at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

/// Errors building the deploy archive.
#[derive(Debug, Error)]
pub enum PackagingError {
    #[error("IO error: {context} - {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Zip error: {message}")]
    Zip { message: String },

    #[error("Nothing to package in {path}")]
    Empty { path: PathBuf },
}

/// Errors returned by the cloud provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{operation} failed: {message}")]
    Api {
        operation: &'static str,
        message: String,
    },

    #[error("{operation} response is missing {field}")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },
}

impl ProviderError {
    pub fn api(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Api {
            operation,
            message: message.into(),
        }
    }
}

/// Hard validation errors reject a project config before any provider call.
#[derive(Debug, Error)]
pub enum HardValidationError {
    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Memory size out of bounds: {megabytes}MB (min: {min}, max: {max})")]
    MemorySizeOutOfBounds { megabytes: u32, min: u32, max: u32 },

    #[error("Timeout out of bounds: {seconds}s (min: {min}, max: {max})")]
    TimeoutOutOfBounds { seconds: u32, min: u32, max: u32 },
}

/// Result type alias using SyncError.
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_validation_error_display() {
        let err = HardValidationError::InvalidFieldValue {
            field: "runtime",
            value: String::new(),
            reason: "Runtime cannot be empty".to_string(),
        };
        assert!(err.to_string().contains("runtime"));
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_error_chain() {
        let settings_err = SettingsError::NotFound {
            path: PathBuf::from("lambdasync.json"),
        };
        let err: SyncError = settings_err.into();
        assert!(matches!(err, SyncError::Settings(SettingsError::NotFound { .. })));
        assert!(err.to_string().contains("lambdasync.json"));
    }

    #[test]
    fn test_provider_error_names_operation() {
        let err = ProviderError::api("CreateFunction", "AccessDenied");
        assert_eq!(err.to_string(), "CreateFunction failed: AccessDenied");
    }
}
