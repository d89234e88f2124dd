// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `lambdasync config` command - Show or change the function configuration.

use std::path::Path;

use lambdasync_core::{configure, AwsLambdaProvider, SettingsStore};

/// Failures are reported but do not fail the process.
pub async fn execute(dir: &Path, args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let settings = SettingsStore::new(dir).get()?;
    let provider = AwsLambdaProvider::from_settings(&settings).await;

    match configure(&provider, &settings, args).await {
        Ok(report) => {
            println!("{}", report.summary);
        }
        Err(e) => {
            tracing::error!(error = %e, "Config command failed");
            eprintln!("✗ {}", e);
        }
    }

    Ok(())
}
