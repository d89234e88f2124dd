//! lambdasync Core Library
//!
//! Packages a project directory and keeps one AWS Lambda function in sync
//! with it. Provides the local settings store, credentials reader, project
//! configuration, provider interface, and the deploy, config and call
//! workflows.

pub mod archive;
pub mod args;
pub mod aws;
pub mod call;
pub mod config;
pub mod configure;
pub mod credentials;
pub mod deploy;
pub mod error;
pub mod plan;
pub mod prompt;
pub mod provider;
pub mod render;
pub mod settings;
pub mod types;

// Re-export commonly used types
pub use aws::AwsLambdaProvider;
pub use call::{call_api, ApiCall};
pub use config::{ConfigLoader, ProjectConfig};
pub use configure::{configure, ConfigKey, ConfigReport};
pub use credentials::{get_aws_settings, AwsPaths, AwsSettings};
pub use deploy::{deploy, DeployContext, DeployOutcome};
pub use error::{
    CredentialsError, HardValidationError, PackagingError, ProviderError, SettingsError,
    SyncError, SyncResult,
};
pub use plan::{DeployDecision, DeployMode};
pub use prompt::{ConfirmPrompt, ScriptedPrompt};
pub use provider::{FunctionConfiguration, FunctionProvider, MemoryProvider, ProviderCall};
pub use settings::{Settings, SettingsStore};
pub use types::{FunctionName, MemorySize, Timeout};
