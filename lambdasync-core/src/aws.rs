// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! AWS Lambda implementation of [`FunctionProvider`].

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{FunctionCode, Runtime};
use aws_sdk_lambda::Client;
use aws_types::region::Region;

use crate::error::ProviderError;
use crate::provider::{
    ConfigurationUpdate, CreateFunctionRequest, FunctionConfiguration, FunctionProvider,
    ProviderResult, UpdateFunctionCodeRequest,
};
use crate::settings::Settings;

/// Copy the shared accessor set of the SDK's configuration-shaped outputs.
macro_rules! impl_from_sdk_configuration {
    ($($ty:ty),+ $(,)?) => {$(
        impl From<&$ty> for FunctionConfiguration {
            fn from(out: &$ty) -> Self {
                Self {
                    function_name: out.function_name().map(str::to_string),
                    function_arn: out.function_arn().map(str::to_string),
                    runtime: out.runtime().map(|r| r.as_str().to_string()),
                    role: out.role().map(str::to_string),
                    handler: out.handler().map(str::to_string),
                    code_size: out.code_size(),
                    description: out.description().map(str::to_string),
                    timeout: out.timeout(),
                    memory_size: out.memory_size(),
                    last_modified: out.last_modified().map(str::to_string),
                    version: out.version().map(str::to_string),
                }
            }
        }
    )+};
}

impl_from_sdk_configuration!(
    aws_sdk_lambda::types::FunctionConfiguration,
    aws_sdk_lambda::operation::create_function::CreateFunctionOutput,
    aws_sdk_lambda::operation::update_function_code::UpdateFunctionCodeOutput,
    aws_sdk_lambda::operation::get_function_configuration::GetFunctionConfigurationOutput,
    aws_sdk_lambda::operation::update_function_configuration::UpdateFunctionConfigurationOutput,
);

/// Lambda client scoped to one invocation.
#[derive(Debug, Clone)]
pub struct AwsLambdaProvider {
    client: Client,
}

impl AwsLambdaProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the project's `profileName` and `region` settings.
    /// Unset values fall back to the standard AWS credential chain.
    pub async fn from_settings(settings: &Settings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = settings.profile_name() {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = settings.region() {
            loader = loader.region(Region::new(region.to_string()));
        }
        let sdk_config = loader.load().await;

        tracing::debug!(
            profile = settings.profile_name().unwrap_or("<default>"),
            region = ?sdk_config.region(),
            "Lambda client configured"
        );

        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl FunctionProvider for AwsLambdaProvider {
    async fn get_function(&self, name: &str) -> ProviderResult<Option<FunctionConfiguration>> {
        match self.client.get_function().function_name(name).send().await {
            Ok(out) => Ok(Some(
                out.configuration()
                    .map(FunctionConfiguration::from)
                    .unwrap_or_default(),
            )),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_resource_not_found_exception() {
                    Ok(None)
                } else {
                    Err(ProviderError::api(
                        "GetFunction",
                        DisplayErrorContext(&service_err).to_string(),
                    ))
                }
            }
        }
    }

    async fn create_function(
        &self,
        request: CreateFunctionRequest,
    ) -> ProviderResult<FunctionConfiguration> {
        let code = FunctionCode::builder()
            .zip_file(Blob::new(request.zip_file))
            .build();

        let out = self
            .client
            .create_function()
            .function_name(request.function_name)
            .set_role(request.role)
            .runtime(Runtime::from(request.runtime.as_str()))
            .handler(request.handler)
            .description(request.description)
            .memory_size(request.memory_size)
            .timeout(request.timeout)
            .publish(request.publish)
            .code(code)
            .send()
            .await
            .map_err(|e| {
                ProviderError::api("CreateFunction", DisplayErrorContext(&e).to_string())
            })?;

        Ok(FunctionConfiguration::from(&out))
    }

    async fn update_function_code(
        &self,
        request: UpdateFunctionCodeRequest,
    ) -> ProviderResult<FunctionConfiguration> {
        let out = self
            .client
            .update_function_code()
            .function_name(request.function_name)
            .publish(request.publish)
            .zip_file(Blob::new(request.zip_file))
            .send()
            .await
            .map_err(|e| {
                ProviderError::api("UpdateFunctionCode", DisplayErrorContext(&e).to_string())
            })?;

        Ok(FunctionConfiguration::from(&out))
    }

    async fn get_function_configuration(
        &self,
        name: &str,
    ) -> ProviderResult<FunctionConfiguration> {
        let out = self
            .client
            .get_function_configuration()
            .function_name(name)
            .send()
            .await
            .map_err(|e| {
                ProviderError::api(
                    "GetFunctionConfiguration",
                    DisplayErrorContext(&e).to_string(),
                )
            })?;

        Ok(FunctionConfiguration::from(&out))
    }

    async fn update_function_configuration(
        &self,
        update: ConfigurationUpdate,
    ) -> ProviderResult<FunctionConfiguration> {
        let out = self
            .client
            .update_function_configuration()
            .function_name(update.function_name)
            .set_description(update.description)
            .set_memory_size(update.memory_size)
            .set_timeout(update.timeout)
            .send()
            .await
            .map_err(|e| {
                ProviderError::api(
                    "UpdateFunctionConfiguration",
                    DisplayErrorContext(&e).to_string(),
                )
            })?;

        Ok(FunctionConfiguration::from(&out))
    }
}
