// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Markdown summaries printed to the console.

use serde_json::{Map, Value};

/// Current or updated function configuration.
pub const CONFIG_TEMPLATE: &str = include_str!("../templates/config.md");
/// Summary after a successful deploy.
pub const FUNCTION_SUCCESS_TEMPLATE: &str = include_str!("../templates/function-success.md");

/// Replace every `{{key}}` in `template` with the matching entry of `data`.
/// Unknown keys render as empty text; an unterminated `{{` is copied as is.
pub fn render(template: &str, data: &Map<String, Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                if let Some(value) = data.get(key) {
                    out.push_str(&display_value(value));
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Merge `operation` into `data` and render.
pub fn render_with_operation(template: &str, operation: &str, data: &Map<String, Value>) -> String {
    let mut data = data.clone();
    data.insert("operation".to_string(), Value::String(operation.to_string()));
    render(template, &data)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
