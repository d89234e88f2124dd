// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `lambdasync init` command - Write the project settings file.

use std::path::Path;

use dialoguer::Input;
use lambdasync_core::settings::{LAMBDA_NAME, LAMBDA_ROLE, PROFILE_NAME, REGION};
use lambdasync_core::{
    get_aws_settings, AwsPaths, AwsSettings, FunctionName, Settings, SettingsStore,
};

const DEFAULT_PROFILE: &str = "default";
const DEFAULT_REGION: &str = "us-east-1";

pub async fn execute(
    dir: &Path,
    profile: Option<String>,
    name: Option<String>,
    region: Option<String>,
    role: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = SettingsStore::new(dir);
    tracing::info!(path = %store.path().display(), "Initializing project settings");

    let aws = load_aws_settings().await;

    let profile = match profile {
        Some(profile) => profile,
        None => Input::new()
            .with_prompt("AWS profile")
            .default(DEFAULT_PROFILE.to_string())
            .interact_text()?,
    };

    match &aws {
        Some(aws) if !aws.has_profile(&profile) => {
            tracing::warn!(profile = %profile, "Profile not found in AWS credentials file");
            eprintln!("⚠ Profile '{}' was not found in your AWS credentials", profile);
        }
        _ => {}
    }

    let name = match name {
        Some(name) => FunctionName::new(name)?,
        None => {
            let default_name = dir
                .canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .filter(|n| FunctionName::new(n.as_str()).is_ok())
                .unwrap_or_else(|| "my-function".to_string());
            let input: String = Input::new()
                .with_prompt("Lambda function name")
                .default(default_name)
                .validate_with(|input: &String| -> Result<(), String> {
                    FunctionName::new(input.as_str())
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()?;
            FunctionName::new(input)?
        }
    };

    let region = match region {
        Some(region) => region,
        None => {
            let default_region = aws
                .as_ref()
                .and_then(|aws| aws.region(&profile))
                .unwrap_or(DEFAULT_REGION)
                .to_string();
            Input::new()
                .with_prompt("AWS region")
                .default(default_region)
                .interact_text()?
        }
    };

    let settings = Settings::new()
        .with(PROFILE_NAME, profile)
        .with(LAMBDA_NAME, name.as_str())
        .with(REGION, region);
    let mut written = store.put(&settings)?;

    if let Some(role) = role.filter(|r| !r.is_empty()) {
        written = store.update(Settings::new().with(LAMBDA_ROLE, role))?;
    }

    println!("✓ Wrote {}", store.path().display());
    println!();
    println!("{}", serde_json::to_string_pretty(written.as_map())?);
    println!();
    println!("Next, run: lambdasync deploy");

    Ok(())
}

/// Local AWS profiles, when they can be read.
async fn load_aws_settings() -> Option<AwsSettings> {
    let paths = match AwsPaths::discover() {
        Ok(paths) => paths,
        Err(e) => {
            tracing::warn!(error = %e, "Could not locate AWS configuration");
            return None;
        }
    };

    match get_aws_settings(&paths).await {
        Ok(aws) => Some(aws),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read AWS configuration");
            None
        }
    }
}
