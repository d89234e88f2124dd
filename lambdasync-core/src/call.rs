// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Generic API caller.
//!
//! `service.method` plus `key=value` arguments, resolved against settings and
//! dispatched through a fixed table of provider operations. Parameters are
//! not checked beyond what the typed request needs; the provider's own error
//! is surfaced on failure.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::args::parse_command_args;
use crate::error::{ProviderError, SyncError, SyncResult};
use crate::provider::{ConfigurationUpdate, FunctionProvider};
use crate::settings::Settings;

/// Integer-typed request fields; numeric strings are accepted for them.
const INTEGER_FIELDS: [&str; 2] = ["MemorySize", "Timeout"];

/// Operations reachable through `lambdasync call`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCall {
    GetFunction,
    GetFunctionConfiguration,
    UpdateFunctionConfiguration,
}

impl ApiCall {
    pub const ALL: [ApiCall; 3] = [
        Self::GetFunction,
        Self::GetFunctionConfiguration,
        Self::UpdateFunctionConfiguration,
    ];

    /// Parse `service.method`. Both halves are matched case-insensitively.
    pub fn parse(call: &str) -> SyncResult<Self> {
        let unsupported = || SyncError::UnsupportedCall {
            call: call.to_string(),
        };

        let (service, method) = call.split_once('.').ok_or_else(unsupported)?;
        if !service.eq_ignore_ascii_case("lambda") {
            return Err(unsupported());
        }

        Self::ALL
            .into_iter()
            .find(|c| c.method().eq_ignore_ascii_case(method))
            .ok_or_else(unsupported)
    }

    pub const fn method(&self) -> &'static str {
        match self {
            Self::GetFunction => "getFunction",
            Self::GetFunctionConfiguration => "getFunctionConfiguration",
            Self::UpdateFunctionConfiguration => "updateFunctionConfiguration",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FunctionNameParams {
    function_name: String,
}

/// Invoke `call` with `arguments` and return the provider's answer as JSON.
pub async fn call_api<S: AsRef<str>>(
    provider: &dyn FunctionProvider,
    settings: &Settings,
    call: &str,
    arguments: &[S],
) -> SyncResult<Value> {
    let api_call = ApiCall::parse(call)?;
    let mut params = parse_command_args(arguments, settings);
    coerce_integers(&mut params);

    let shown = Value::Object(params.clone());
    tracing::debug!(call = %call, params = %shown, "Calling provider");

    let result = match api_call {
        ApiCall::GetFunction => {
            let FunctionNameParams { function_name } = decode(call, params)?;
            let configuration = provider
                .get_function(&function_name)
                .await?
                .ok_or_else(|| {
                    ProviderError::api(
                        "GetFunction",
                        format!("ResourceNotFoundException: Function not found: {}", function_name),
                    )
                })?;
            serde_json::json!({ "Configuration": configuration })
        }
        ApiCall::GetFunctionConfiguration => {
            let FunctionNameParams { function_name } = decode(call, params)?;
            to_json(&provider.get_function_configuration(&function_name).await?)
        }
        ApiCall::UpdateFunctionConfiguration => {
            let update: ConfigurationUpdate = decode(call, params)?;
            to_json(&provider.update_function_configuration(update).await?)
        }
    };

    Ok(result)
}

fn decode<T: for<'de> Deserialize<'de>>(call: &str, params: Map<String, Value>) -> SyncResult<T> {
    serde_json::from_value(Value::Object(params)).map_err(|e| SyncError::InvalidArgument {
        argument: call.to_string(),
        reason: e.to_string(),
    })
}

fn coerce_integers(params: &mut Map<String, Value>) {
    for field in INTEGER_FIELDS {
        if let Some(Value::String(s)) = params.get(field) {
            if let Ok(n) = s.trim().parse::<i64>() {
                params.insert(field.to_string(), Value::from(n));
            }
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryProvider;

    #[test]
    fn test_parse_known_calls() {
        assert_eq!(
            ApiCall::parse("Lambda.getFunctionConfiguration").unwrap(),
            ApiCall::GetFunctionConfiguration
        );
        assert_eq!(ApiCall::parse("lambda.GETFUNCTION").unwrap(), ApiCall::GetFunction);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(matches!(
            ApiCall::parse("S3.listBuckets"),
            Err(SyncError::UnsupportedCall { .. })
        ));
        assert!(ApiCall::parse("Lambda.deleteFunction").is_err());
        assert!(ApiCall::parse("getFunction").is_err());
    }

    #[tokio::test]
    async fn test_call_api_logs_and_decodes_params() {
        let provider = MemoryProvider::default().with_function("app", "role");
        let settings = Settings::new().with("lambdaName", "app");

        let result = call_api(
            &provider,
            &settings,
            "lambda.updateFunctionConfiguration",
            &["FunctionName=lambdaName", "MemorySize=512", "extra"],
        )
        .await
        .unwrap();

        assert_eq!(result["MemorySize"], Value::from(512));
        assert_eq!(provider.function("app").unwrap().memory_size, Some(512));
    }

    #[tokio::test]
    async fn test_call_api_missing_function_name() {
        let provider = MemoryProvider::default();
        let err = call_api(&provider, &Settings::new(), "lambda.getFunction", &["Qualifier=1"])
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::InvalidArgument { .. }));
        assert!(provider.calls().is_empty());
    }

    #[test]
    fn test_coerce_integers() {
        let mut params = Map::new();
        params.insert("MemorySize".to_string(), Value::from("512"));
        params.insert("Description".to_string(), Value::from("42"));
        coerce_integers(&mut params);

        assert_eq!(params["MemorySize"], Value::from(512));
        assert_eq!(params["Description"], Value::from("42"));
    }
}
