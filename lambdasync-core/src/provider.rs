// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Cloud provider capability set.
//!
//! Only the five function operations the workflows need are exposed. The AWS
//! implementation lives in [`crate::aws`]; [`MemoryProvider`] is an in-memory
//! stand-in that records every call.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Remote record of a deployed function. Field names follow the provider's.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    #[serde(default)]
    pub code_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Parameters for creating a new function.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateFunctionRequest {
    pub function_name: String,
    pub role: Option<String>,
    pub runtime: String,
    pub handler: String,
    pub description: String,
    pub memory_size: i32,
    pub timeout: i32,
    pub publish: bool,
    pub zip_file: Vec<u8>,
}

/// Parameters for replacing the code of an existing function.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateFunctionCodeRequest {
    pub function_name: String,
    pub publish: bool,
    pub zip_file: Vec<u8>,
}

/// Partial configuration update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigurationUpdate {
    pub function_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_size: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i32>,
}

impl ConfigurationUpdate {
    /// Whether the update changes nothing besides naming the function.
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.memory_size.is_none() && self.timeout.is_none()
    }
}

/// Function lifecycle and configuration operations.
#[async_trait]
pub trait FunctionProvider: Send + Sync {
    /// Look up a function by name. A missing function is `Ok(None)`.
    async fn get_function(&self, name: &str) -> ProviderResult<Option<FunctionConfiguration>>;

    async fn function_exists(&self, name: &str) -> ProviderResult<bool> {
        Ok(self.get_function(name).await?.is_some())
    }

    async fn create_function(
        &self,
        request: CreateFunctionRequest,
    ) -> ProviderResult<FunctionConfiguration>;

    async fn update_function_code(
        &self,
        request: UpdateFunctionCodeRequest,
    ) -> ProviderResult<FunctionConfiguration>;

    async fn get_function_configuration(&self, name: &str)
        -> ProviderResult<FunctionConfiguration>;

    async fn update_function_configuration(
        &self,
        update: ConfigurationUpdate,
    ) -> ProviderResult<FunctionConfiguration>;
}

/// A call observed by [`MemoryProvider`], without archive bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    GetFunction { name: String },
    CreateFunction { name: String, archive_len: usize },
    UpdateFunctionCode { name: String, archive_len: usize },
    GetFunctionConfiguration { name: String },
    UpdateFunctionConfiguration(ConfigurationUpdate),
}

impl ProviderCall {
    /// Whether this call changes remote state.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CreateFunction { .. }
                | Self::UpdateFunctionCode { .. }
                | Self::UpdateFunctionConfiguration(_)
        )
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    functions: HashMap<String, FunctionConfiguration>,
    calls: Vec<ProviderCall>,
    failure: Option<(usize, String)>,
}

/// In-memory provider for tests and dry runs.
///
/// Functions are keyed by both name and unqualified ARN.
#[derive(Debug)]
pub struct MemoryProvider {
    account_id: String,
    region: String,
    state: Mutex<MemoryState>,
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new("123456789012", "us-east-1")
    }
}

impl MemoryProvider {
    pub fn new(account_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            region: region.into(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Seed a function that already exists remotely.
    pub fn with_function(self, name: &str, role: &str) -> Self {
        let configuration = FunctionConfiguration {
            function_name: Some(name.to_string()),
            function_arn: Some(self.arn(name)),
            runtime: Some("nodejs20.x".to_string()),
            role: Some(role.to_string()),
            handler: Some("index.handler".to_string()),
            memory_size: Some(128),
            timeout: Some(3),
            version: Some("1".to_string()),
            ..Default::default()
        };
        self.lock().functions.insert(name.to_string(), configuration);
        self
    }

    /// Make the next provider call fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.fail_after(0, message);
    }

    /// Let `successes` calls through, then fail the one after with `message`.
    pub fn fail_after(&self, successes: usize, message: impl Into<String>) {
        self.lock().failure = Some((successes, message.into()));
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.lock().calls.clone()
    }

    pub fn mutations(&self) -> Vec<ProviderCall> {
        self.calls().into_iter().filter(ProviderCall::is_mutation).collect()
    }

    pub fn function(&self, name: &str) -> Option<FunctionConfiguration> {
        self.lock().functions.get(name).cloned()
    }

    pub fn arn(&self, name: &str) -> String {
        format!(
            "arn:aws:lambda:{}:{}:function:{}",
            self.region, self.account_id, name
        )
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(
        &self,
        operation: &'static str,
        call: ProviderCall,
    ) -> ProviderResult<MutexGuard<'_, MemoryState>> {
        let mut state = self.lock();
        state.calls.push(call);
        match state.failure.take() {
            Some((0, message)) => Err(ProviderError::api(operation, message)),
            Some((remaining, message)) => {
                state.failure = Some((remaining - 1, message));
                Ok(state)
            }
            None => Ok(state),
        }
    }

    fn resolve_name(&self, state: &MemoryState, name_or_arn: &str) -> Option<String> {
        if state.functions.contains_key(name_or_arn) {
            return Some(name_or_arn.to_string());
        }
        state
            .functions
            .iter()
            .find(|(_, f)| f.function_arn.as_deref() == Some(name_or_arn))
            .map(|(name, _)| name.clone())
    }

    fn not_found(operation: &'static str, name: &str) -> ProviderError {
        ProviderError::api(
            operation,
            format!("ResourceNotFoundException: Function not found: {}", name),
        )
    }

    fn bump_version(configuration: &mut FunctionConfiguration) -> String {
        let next = configuration
            .version
            .as_deref()
            .and_then(|v| v.parse::<u64>().ok())
            .map_or(1, |v| v + 1)
            .to_string();
        configuration.version = Some(next.clone());
        next
    }
}

#[async_trait]
impl FunctionProvider for MemoryProvider {
    async fn get_function(&self, name: &str) -> ProviderResult<Option<FunctionConfiguration>> {
        let state = self.record(
            "GetFunction",
            ProviderCall::GetFunction {
                name: name.to_string(),
            },
        )?;
        Ok(self
            .resolve_name(&state, name)
            .and_then(|n| state.functions.get(&n).cloned()))
    }

    async fn create_function(
        &self,
        request: CreateFunctionRequest,
    ) -> ProviderResult<FunctionConfiguration> {
        let mut state = self.record(
            "CreateFunction",
            ProviderCall::CreateFunction {
                name: request.function_name.clone(),
                archive_len: request.zip_file.len(),
            },
        )?;

        if state.functions.contains_key(&request.function_name) {
            return Err(ProviderError::api(
                "CreateFunction",
                format!(
                    "ResourceConflictException: Function already exist: {}",
                    request.function_name
                ),
            ));
        }

        let mut configuration = FunctionConfiguration {
            function_name: Some(request.function_name.clone()),
            function_arn: Some(self.arn(&request.function_name)),
            runtime: Some(request.runtime),
            role: request.role,
            handler: Some(request.handler),
            code_size: request.zip_file.len() as i64,
            description: Some(request.description),
            timeout: Some(request.timeout),
            memory_size: Some(request.memory_size),
            version: Some("$LATEST".to_string()),
            ..Default::default()
        };

        let mut returned = configuration.clone();
        if request.publish {
            configuration.version = Some("1".to_string());
            returned.version = Some("1".to_string());
            returned.function_arn = Some(format!("{}:1", self.arn(&request.function_name)));
        }

        state
            .functions
            .insert(request.function_name, configuration);
        Ok(returned)
    }

    async fn update_function_code(
        &self,
        request: UpdateFunctionCodeRequest,
    ) -> ProviderResult<FunctionConfiguration> {
        let mut state = self.record(
            "UpdateFunctionCode",
            ProviderCall::UpdateFunctionCode {
                name: request.function_name.clone(),
                archive_len: request.zip_file.len(),
            },
        )?;

        let name = self
            .resolve_name(&state, &request.function_name)
            .ok_or_else(|| Self::not_found("UpdateFunctionCode", &request.function_name))?;
        let arn = self.arn(&name);
        let configuration = state
            .functions
            .get_mut(&name)
            .ok_or_else(|| Self::not_found("UpdateFunctionCode", &name))?;

        configuration.code_size = request.zip_file.len() as i64;
        let mut returned = configuration.clone();
        if request.publish {
            let version = Self::bump_version(configuration);
            returned.version = Some(version.clone());
            returned.function_arn = Some(format!("{}:{}", arn, version));
        }
        Ok(returned)
    }

    async fn get_function_configuration(
        &self,
        name: &str,
    ) -> ProviderResult<FunctionConfiguration> {
        let state = self.record(
            "GetFunctionConfiguration",
            ProviderCall::GetFunctionConfiguration {
                name: name.to_string(),
            },
        )?;
        self.resolve_name(&state, name)
            .and_then(|n| state.functions.get(&n).cloned())
            .ok_or_else(|| Self::not_found("GetFunctionConfiguration", name))
    }

    async fn update_function_configuration(
        &self,
        update: ConfigurationUpdate,
    ) -> ProviderResult<FunctionConfiguration> {
        let mut state = self.record(
            "UpdateFunctionConfiguration",
            ProviderCall::UpdateFunctionConfiguration(update.clone()),
        )?;

        let name = self
            .resolve_name(&state, &update.function_name)
            .ok_or_else(|| Self::not_found("UpdateFunctionConfiguration", &update.function_name))?;
        let configuration = state
            .functions
            .get_mut(&name)
            .ok_or_else(|| Self::not_found("UpdateFunctionConfiguration", &name))?;

        if let Some(description) = update.description {
            configuration.description = Some(description);
        }
        if let Some(memory_size) = update.memory_size {
            configuration.memory_size = Some(memory_size);
        }
        if let Some(timeout) = update.timeout {
            configuration.timeout = Some(timeout);
        }
        Ok(configuration.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_function_is_none() {
        let provider = MemoryProvider::default();
        assert!(provider.get_function("absent").await.unwrap().is_none());
        assert!(!provider.function_exists("absent").await.unwrap());
    }

    #[tokio::test]
    async fn test_publish_returns_qualified_arn() {
        let provider = MemoryProvider::default().with_function("app", "role");

        let result = provider
            .update_function_code(UpdateFunctionCodeRequest {
                function_name: "app".to_string(),
                publish: true,
                zip_file: vec![1, 2, 3],
            })
            .await
            .unwrap();

        assert_eq!(result.version.as_deref(), Some("2"));
        assert_eq!(
            result.function_arn.as_deref(),
            Some("arn:aws:lambda:us-east-1:123456789012:function:app:2")
        );
        assert_eq!(provider.function("app").unwrap().code_size, 3);
    }

    #[tokio::test]
    async fn test_lookup_by_arn() {
        let provider = MemoryProvider::default().with_function("app", "role");
        let arn = provider.arn("app");

        let config = provider.get_function_configuration(&arn).await.unwrap();
        assert_eq!(config.function_name.as_deref(), Some("app"));
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let provider = MemoryProvider::default();
        provider.fail_next("ThrottlingException");

        assert!(provider.get_function("app").await.is_err());
        assert!(provider.get_function("app").await.is_ok());
        assert_eq!(provider.calls().len(), 2);
    }

    #[test]
    fn test_configuration_serializes_provider_names() {
        let config = FunctionConfiguration {
            function_name: Some("app".to_string()),
            memory_size: Some(256),
            ..Default::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["FunctionName"], "app");
        assert_eq!(json["MemorySize"], 256);
        assert!(json.get("Role").is_none());
    }
}
