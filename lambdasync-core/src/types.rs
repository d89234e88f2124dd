// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers for validated inputs.
//!
//! Following the "Newtype" pattern in Rust to ensure valid state by construction.
//! All types validate their invariants at creation time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HardValidationError;

/// Minimum memory a Lambda function can be given, in MB.
pub const MIN_MEMORY_MB: u32 = 128;
/// Maximum memory a Lambda function can be given, in MB.
pub const MAX_MEMORY_MB: u32 = 10_240;
/// Minimum function timeout in seconds.
pub const MIN_TIMEOUT_SECS: u32 = 1;
/// Maximum function timeout in seconds.
pub const MAX_TIMEOUT_SECS: u32 = 900;

/// Number of colon-separated segments in an unqualified function ARN:
/// `arn:aws:lambda:<region>:<account>:function:<name>`.
const UNQUALIFIED_ARN_SEGMENTS: usize = 7;

/// Validated Lambda function name.
/// Must be non-empty, alphanumeric with hyphens/underscores, max 64 chars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FunctionName(String);

impl FunctionName {
    /// Create a new FunctionName with validation.
    pub fn new(name: impl Into<String>) -> Result<Self, HardValidationError> {
        let name = name.into();

        if name.is_empty() {
            return Err(HardValidationError::InvalidFieldValue {
                field: "lambdaName",
                value: name,
                reason: "Function name cannot be empty".to_string(),
            });
        }

        if name.len() > 64 {
            return Err(HardValidationError::InvalidFieldValue {
                field: "lambdaName",
                value: name.clone(),
                reason: format!("Function name too long: {} chars (max 64)", name.len()),
            });
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(HardValidationError::InvalidFieldValue {
                field: "lambdaName",
                value: name,
                reason: "Function name must contain only letters, digits, hyphens, and underscores"
                    .to_string(),
            });
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for FunctionName {
    type Error = HardValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FunctionName> for String {
    fn from(name: FunctionName) -> Self {
        name.0
    }
}

/// Strip a version or alias qualifier from a function ARN.
///
/// `arn:aws:lambda:us-east-1:123456789012:function:app:7` becomes
/// `arn:aws:lambda:us-east-1:123456789012:function:app`. Unqualified ARNs and
/// plain names are returned unchanged.
pub fn strip_lambda_version(arn: &str) -> &str {
    if !arn.starts_with("arn:") {
        return arn;
    }
    match arn.match_indices(':').nth(UNQUALIFIED_ARN_SEGMENTS - 1) {
        Some((index, _)) => &arn[..index],
        None => arn,
    }
}

/// Validated memory size in megabytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct MemorySize(u32);

impl MemorySize {
    /// Create a new MemorySize with bounds validation.
    pub fn new(megabytes: u32) -> Result<Self, HardValidationError> {
        if !(MIN_MEMORY_MB..=MAX_MEMORY_MB).contains(&megabytes) {
            return Err(HardValidationError::MemorySizeOutOfBounds {
                megabytes,
                min: MIN_MEMORY_MB,
                max: MAX_MEMORY_MB,
            });
        }
        Ok(Self(megabytes))
    }

    pub fn megabytes(&self) -> u32 {
        self.0
    }
}

impl Default for MemorySize {
    fn default() -> Self {
        Self(MIN_MEMORY_MB)
    }
}

impl fmt::Display for MemorySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}MB", self.0)
    }
}

impl TryFrom<u32> for MemorySize {
    type Error = HardValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MemorySize> for u32 {
    fn from(size: MemorySize) -> Self {
        size.0
    }
}

/// Validated function timeout in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Timeout(u32);

impl Timeout {
    /// Create a new Timeout with bounds validation.
    pub fn new(seconds: u32) -> Result<Self, HardValidationError> {
        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&seconds) {
            return Err(HardValidationError::TimeoutOutOfBounds {
                seconds,
                min: MIN_TIMEOUT_SECS,
                max: MAX_TIMEOUT_SECS,
            });
        }
        Ok(Self(seconds))
    }

    pub fn seconds(&self) -> u32 {
        self.0
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Self(3)
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl TryFrom<u32> for Timeout {
    type Error = HardValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Timeout> for u32 {
    fn from(timeout: Timeout) -> Self {
        timeout.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_name_valid() {
        assert!(FunctionName::new("my-function").is_ok());
        assert!(FunctionName::new("my_function_123").is_ok());
        assert!(FunctionName::new("a").is_ok());
    }

    #[test]
    fn test_function_name_invalid() {
        assert!(FunctionName::new("").is_err());
        assert!(FunctionName::new("a".repeat(65)).is_err());
        assert!(FunctionName::new("my function").is_err());
        assert!(FunctionName::new("my.function").is_err());
    }

    #[test]
    fn test_strip_numeric_version() {
        assert_eq!(
            strip_lambda_version("arn:aws:lambda:us-east-1:123456789012:function:app:7"),
            "arn:aws:lambda:us-east-1:123456789012:function:app"
        );
    }

    #[test]
    fn test_strip_latest_qualifier() {
        assert_eq!(
            strip_lambda_version("arn:aws:lambda:eu-west-1:123456789012:function:app:$LATEST"),
            "arn:aws:lambda:eu-west-1:123456789012:function:app"
        );
    }

    #[test]
    fn test_strip_leaves_unqualified_arn() {
        let arn = "arn:aws:lambda:us-east-1:123456789012:function:app";
        assert_eq!(strip_lambda_version(arn), arn);
        assert_eq!(strip_lambda_version("app"), "app");
    }

    #[test]
    fn test_memory_size_bounds() {
        assert!(MemorySize::new(127).is_err());
        assert!(MemorySize::new(128).is_ok());
        assert!(MemorySize::new(10_240).is_ok());
        assert!(MemorySize::new(10_241).is_err());
        assert_eq!(MemorySize::default().megabytes(), 128);
    }

    #[test]
    fn test_timeout_bounds() {
        assert!(Timeout::new(0).is_err());
        assert!(Timeout::new(900).is_ok());
        assert!(Timeout::new(901).is_err());
        assert_eq!(Timeout::default().seconds(), 3);
    }
}
