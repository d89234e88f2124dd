// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `lambdasync deploy` command - Package the project and push it.

use std::path::Path;

use dialoguer::Confirm;
use lambdasync_core::deploy::DEPLOY_FAILURE_HINT;
use lambdasync_core::{
    deploy, AwsLambdaProvider, ConfigLoader, ConfirmPrompt, DeployContext, DeployOutcome,
    SettingsStore, SyncError, SyncResult,
};

/// Asks on the terminal. Anything but an explicit yes declines.
struct TerminalPrompt;

impl ConfirmPrompt for TerminalPrompt {
    fn confirm(&self, question: &str) -> SyncResult<bool> {
        Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
            .map_err(|e| SyncError::Prompt {
                message: e.to_string(),
            })
    }
}

pub async fn execute(dir: &Path, config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(dir = %dir.display(), "Deploying function");

    let store = SettingsStore::new(dir);
    let settings = match store.get() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "{}", DEPLOY_FAILURE_HINT);
            return Err(e.into());
        }
    };
    let project = ConfigLoader::load_project(dir, config)?;
    let provider = AwsLambdaProvider::from_settings(&settings).await;

    let ctx = DeployContext {
        project_dir: dir,
        store: &store,
        project: &project,
        provider: &provider,
        prompt: &TerminalPrompt,
    };

    match deploy(&ctx, &settings).await {
        Ok(DeployOutcome::Deployed { summary, .. }) => {
            println!("{}", summary);
            Ok(())
        }
        Ok(DeployOutcome::Declined) => {
            println!("You answered no, aborting deploy");
            Ok(())
        }
        // Already logged with the hint by the workflow.
        Err(e) => Err(e.into()),
    }
}
