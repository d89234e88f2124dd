// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `key=value` command arguments.
//!
//! A value is resolved in order:
//! 1. a JSON array/object literal (leading `[` or `{`) that parses,
//! 2. the value of the settings entry whose key equals the raw value,
//! 3. the raw string itself.

use serde_json::{Map, Value};

use crate::settings::Settings;

/// One parsed `key=value` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

/// Split on the first `=`. Arguments without one yield `None`.
pub fn split_pair(argument: &str) -> Option<KeyValue<'_>> {
    argument
        .split_once('=')
        .map(|(key, value)| KeyValue { key, value })
}

/// Resolve a single raw value against `settings`.
pub fn resolve_value(raw: &str, settings: &Settings) -> Value {
    if raw.starts_with('[') || raw.starts_with('{') {
        if let Ok(parsed) = serde_json::from_str::<Value>(raw) {
            return parsed;
        }
    }

    match settings.get(raw) {
        Some(value) if !value.is_null() => value.clone(),
        _ => Value::String(raw.to_string()),
    }
}

/// Build a parameter object from `key=value` arguments, in order.
/// Later duplicates win; arguments without `=` are skipped.
pub fn parse_command_args<S: AsRef<str>>(
    arguments: &[S],
    settings: &Settings,
) -> Map<String, Value> {
    let mut params = Map::new();
    for argument in arguments {
        let argument = argument.as_ref();
        match split_pair(argument) {
            Some(pair) => {
                params.insert(pair.key.to_string(), resolve_value(pair.value, settings));
            }
            None => {
                tracing::warn!(argument = %argument, "Ignoring argument without '='");
            }
        }
    }
    params
}
