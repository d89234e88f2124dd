// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Deploy workflow.
//!
//! Check existence → decide path → package → create or update → persist the
//! returned identifiers → remove the archive → render a summary.
//! There is no retry and no rollback: the first failure ends the run.

use std::path::Path;

use crate::archive::Archive;
use crate::config::ProjectConfig;
use crate::error::{ProviderError, SyncResult};
use crate::plan::{DeployDecision, DeployMode};
use crate::prompt::{ConfirmPrompt, CONFIRM_OVERWRITE_FUNCTION};
use crate::provider::{
    CreateFunctionRequest, FunctionConfiguration, FunctionProvider, UpdateFunctionCodeRequest,
};
use crate::render::{render_with_operation, FUNCTION_SUCCESS_TEMPLATE};
use crate::settings::{Settings, SettingsStore, LAMBDA_ARN, LAMBDA_ROLE};
use crate::types::strip_lambda_version;

/// Printed alongside any failure after the path has been chosen.
pub const DEPLOY_FAILURE_HINT: &str = "No config found, first run: lambdasync init";

/// Everything one deploy needs, scoped to a single invocation.
pub struct DeployContext<'a> {
    pub project_dir: &'a Path,
    pub store: &'a SettingsStore,
    pub project: &'a ProjectConfig,
    pub provider: &'a dyn FunctionProvider,
    pub prompt: &'a dyn ConfirmPrompt,
}

/// Result of a deploy run.
#[derive(Debug, Clone, PartialEq)]
pub enum DeployOutcome {
    Deployed {
        mode: DeployMode,
        settings: Settings,
        summary: String,
    },
    /// Overwrite was declined; nothing changed locally or remotely.
    Declined,
}

/// Deploy the project directory as the function named in `settings`.
pub async fn deploy(ctx: &DeployContext<'_>, settings: &Settings) -> SyncResult<DeployOutcome> {
    let name = settings.require_lambda_name()?;

    let exists = ctx.provider.function_exists(name).await?;
    let decision = DeployDecision::decide(exists, settings.lambda_arn().is_some());
    tracing::debug!(function = %name, exists, ?decision, "Deploy path chosen");

    let confirmed = match decision {
        DeployDecision::ConfirmOverwrite => ctx.prompt.confirm(CONFIRM_OVERWRITE_FUNCTION)?,
        DeployDecision::Proceed(_) => true,
    };

    let Some(mode) = decision.confirm(confirmed) else {
        tracing::info!(function = %name, "You answered no, aborting deploy");
        return Ok(DeployOutcome::Declined);
    };

    match do_deploy(ctx, settings, name, mode).await {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            tracing::error!(function = %name, mode = %mode, error = %e, "{}", DEPLOY_FAILURE_HINT);
            Err(e)
        }
    }
}

async fn do_deploy(
    ctx: &DeployContext<'_>,
    settings: &Settings,
    name: &str,
    mode: DeployMode,
) -> SyncResult<DeployOutcome> {
    let archive = Archive::create(
        ctx.project_dir,
        &ctx.project.archive_name,
        &ctx.project.exclude,
    )?;
    let zip_file = archive.read()?;

    tracing::info!(
        function = %name,
        mode = %mode,
        files = archive.files(),
        uncompressed = archive.bytes(),
        bytes = zip_file.len(),
        "Uploading archive"
    );

    let result = match mode {
        DeployMode::New => create_function(ctx, settings, name, zip_file).await?,
        DeployMode::Update => {
            ctx.provider
                .update_function_code(UpdateFunctionCodeRequest {
                    function_name: name.to_string(),
                    publish: true,
                    zip_file,
                })
                .await?
        }
    };

    let settings = handle_success(ctx.store, archive, &result)?;
    let summary = render_with_operation(FUNCTION_SUCCESS_TEMPLATE, mode.verb(), settings.as_map());

    Ok(DeployOutcome::Deployed {
        mode,
        settings,
        summary,
    })
}

async fn create_function(
    ctx: &DeployContext<'_>,
    settings: &Settings,
    name: &str,
    zip_file: Vec<u8>,
) -> SyncResult<FunctionConfiguration> {
    let project = ctx.project;
    if settings.lambda_role().is_none() {
        tracing::warn!(
            function = %name,
            "No lambdaRole in settings; the provider may reject the create"
        );
    }

    let request = CreateFunctionRequest {
        function_name: name.to_string(),
        role: settings.lambda_role().map(str::to_string),
        runtime: project.runtime.clone(),
        handler: project.handler.clone(),
        description: project.description.clone(),
        memory_size: project.memory_size.megabytes() as i32,
        timeout: project.timeout.seconds() as i32,
        publish: true,
        zip_file,
    };
    Ok(ctx.provider.create_function(request).await?)
}

/// Persist the identifiers the provider returned and drop the archive.
fn handle_success(
    store: &SettingsStore,
    archive: Archive,
    result: &FunctionConfiguration,
) -> SyncResult<Settings> {
    let arn = result
        .function_arn
        .as_deref()
        .ok_or(ProviderError::MissingField {
            operation: "Deploy",
            field: "FunctionArn",
        })?;

    let mut partial = Settings::new().with(LAMBDA_ARN, strip_lambda_version(arn));
    if let Some(role) = result.role.as_deref() {
        partial.insert(LAMBDA_ROLE, role);
    }

    let archive_path = archive.path().to_path_buf();
    if let Err(e) = archive.remove() {
        tracing::warn!(archive = %archive_path.display(), error = %e, "Failed to remove archive");
    }

    Ok(store.update(partial)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompt;
    use crate::provider::{MemoryProvider, ProviderCall};
    use crate::settings::{LAMBDA_NAME, REGION};
    use tempfile::TempDir;

    fn project_dir(settings: &Settings) -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.js"), "exports.handler = () => 1;").unwrap();
        let store = SettingsStore::new(dir.path());
        store.put(settings).unwrap();
        store.update(settings.clone()).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_missing_name_fails_before_provider() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path());
        let provider = MemoryProvider::default();
        let prompt = ScriptedPrompt::default();
        let project = ProjectConfig::default();
        let ctx = DeployContext {
            project_dir: dir.path(),
            store: &store,
            project: &project,
            provider: &provider,
            prompt: &prompt,
        };

        assert!(deploy(&ctx, &Settings::new()).await.is_err());
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_strips_version_and_records_role() {
        let settings = Settings::new()
            .with(LAMBDA_NAME, "app")
            .with(REGION, "us-east-1")
            .with(LAMBDA_ROLE, "arn:aws:iam::123456789012:role/app");
        let dir = project_dir(&settings);
        let store = SettingsStore::new(dir.path());
        let provider = MemoryProvider::default();
        let prompt = ScriptedPrompt::default();
        let project = ProjectConfig::default();
        let ctx = DeployContext {
            project_dir: dir.path(),
            store: &store,
            project: &project,
            provider: &provider,
            prompt: &prompt,
        };

        let outcome = deploy(&ctx, &store.get().unwrap()).await.unwrap();
        let DeployOutcome::Deployed { mode, settings, summary } = outcome else {
            panic!("expected a deploy");
        };

        assert_eq!(mode, DeployMode::New);
        assert_eq!(
            settings.lambda_arn(),
            Some("arn:aws:lambda:us-east-1:123456789012:function:app")
        );
        assert_eq!(settings.lambda_role(), Some("arn:aws:iam::123456789012:role/app"));
        assert!(summary.contains("## Function created"));
        assert!(!dir.path().join("deploy.zip").exists());

        let created = provider.function("app").unwrap();
        assert_eq!(created.memory_size, Some(128));
        assert_eq!(created.timeout, Some(3));
        assert!(matches!(provider.calls()[1], ProviderCall::CreateFunction { .. }));
    }

    #[tokio::test]
    async fn test_provider_failure_keeps_settings() {
        let settings = Settings::new().with(LAMBDA_NAME, "app");
        let dir = project_dir(&settings);
        let store = SettingsStore::new(dir.path());
        let provider = MemoryProvider::default().with_function("app", "role");
        let prompt = ScriptedPrompt::new([true]);
        let project = ProjectConfig::default();
        let ctx = DeployContext {
            project_dir: dir.path(),
            store: &store,
            project: &project,
            provider: &provider,
            prompt: &prompt,
        };

        // Existence check succeeds, then the upload fails.
        provider.fail_after(1, "AccessDeniedException");
        let before = store.get().unwrap();
        let err = deploy(&ctx, &before).await.unwrap_err();

        assert!(err.to_string().contains("AccessDeniedException"));
        assert_eq!(store.get().unwrap(), before);
    }
}
