// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Config workflow: show or change the remote function configuration.
//!
//! The current configuration is always fetched first. With no arguments it is
//! only rendered. With `key=value` arguments, recognised keys are translated
//! to provider field names and sent as one update; other keys are dropped.

use serde_json::{Map, Value};

use crate::args::parse_command_args;
use crate::error::{SyncError, SyncResult};
use crate::provider::{ConfigurationUpdate, FunctionConfiguration, FunctionProvider};
use crate::render::{render_with_operation, CONFIG_TEMPLATE};
use crate::settings::{Settings, LAMBDA_NAME};

/// Friendly config keys accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Description,
    Memory,
    Timeout,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 3] = [Self::Description, Self::Memory, Self::Timeout];

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == key)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Memory => "memory",
            Self::Timeout => "timeout",
        }
    }

    /// Field name on the provider side.
    pub const fn provider_field(&self) -> &'static str {
        match self {
            Self::Description => "Description",
            Self::Memory => "MemorySize",
            Self::Timeout => "Timeout",
        }
    }
}

/// What the workflow did and what to print.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigReport {
    pub configuration: FunctionConfiguration,
    pub updated: bool,
    pub summary: String,
}

/// Function identifier used for configuration calls: the recorded ARN,
/// falling back to the configured name.
pub fn function_identifier(settings: &Settings) -> SyncResult<&str> {
    settings
        .lambda_arn()
        .or_else(|| settings.lambda_name())
        .ok_or(SyncError::MissingSetting { key: LAMBDA_NAME })
}

/// Run the config workflow for `arguments` (`key=value` strings).
pub async fn configure<S: AsRef<str>>(
    provider: &dyn FunctionProvider,
    settings: &Settings,
    arguments: &[S],
) -> SyncResult<ConfigReport> {
    let function = function_identifier(settings)?;
    let current = provider.get_function_configuration(function).await?;

    if arguments.is_empty() {
        let summary = render_with_operation(CONFIG_TEMPLATE, "config", &to_map(&current));
        return Ok(ConfigReport {
            configuration: current,
            updated: false,
            summary,
        });
    }

    let params = parse_command_args(arguments, settings);
    let update = build_update(function, &params)?;
    if update.is_empty() {
        tracing::warn!(
            function = %function,
            "No recognised config keys (description, memory, timeout); nothing will change"
        );
    }
    tracing::info!(function = %function, ?update, "Updating function configuration");

    let updated = provider.update_function_configuration(update).await?;
    let summary = render_with_operation(
        CONFIG_TEMPLATE,
        "successfully updated config",
        &to_map(&updated),
    );

    Ok(ConfigReport {
        configuration: updated,
        updated: true,
        summary,
    })
}

/// Translate friendly keys into a provider update. Unknown keys are dropped.
pub fn build_update(
    function: &str,
    params: &Map<String, Value>,
) -> SyncResult<ConfigurationUpdate> {
    let mut update = ConfigurationUpdate {
        function_name: function.to_string(),
        ..Default::default()
    };

    for (key, value) in params {
        match ConfigKey::parse(key) {
            Some(ConfigKey::Description) => update.description = Some(as_text(value)),
            Some(ConfigKey::Memory) => update.memory_size = Some(as_integer(key, value)?),
            Some(ConfigKey::Timeout) => update.timeout = Some(as_integer(key, value)?),
            None => tracing::debug!(key = %key, "Dropping unrecognised config key"),
        }
    }

    Ok(update)
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn as_integer(key: &str, value: &Value) -> SyncResult<i32> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| SyncError::InvalidArgument {
        argument: format!("{}={}", key, as_text(value)),
        reason: "expected a whole number".to_string(),
    })
}

fn to_map(configuration: &FunctionConfiguration) -> Map<String, Value> {
    match serde_json::to_value(configuration) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
