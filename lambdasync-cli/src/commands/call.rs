// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `lambdasync call` command - Invoke a provider operation directly.

use std::path::Path;

use lambdasync_core::{call_api, AwsLambdaProvider, SettingsStore};

pub async fn execute(
    dir: &Path,
    call: &str,
    args: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = SettingsStore::new(dir).get()?;
    let provider = AwsLambdaProvider::from_settings(&settings).await;

    match call_api(&provider, &settings, call, args).await {
        Ok(result) => {
            println!("RESULT:");
            println!();
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!(call = %call, error = %e, "Call failed");
            eprintln!("ERROR:");
            eprintln!();
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
