// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Shared AWS credentials and config files.
//!
//! Both files are INI: `[section]` headers followed by `key = value` lines.
//! They are only ever read here; `aws configure` owns them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::CredentialsError;

const CREDENTIALS_ENV: &str = "AWS_SHARED_CREDENTIALS_FILE";
const CONFIG_ENV: &str = "AWS_CONFIG_FILE";

/// Parsed INI document: section name to key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl IniDocument {
    /// Parse INI text. `path` is only used for error messages.
    ///
    /// Config-file headers of the form `[profile name]` are stored as `name`.
    /// Keys before the first header land in the unnamed section `""`.
    pub fn parse(content: &str, path: &Path) -> Result<Self, CredentialsError> {
        let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut current = String::new();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = header.strip_suffix(']').ok_or_else(|| CredentialsError::Parse {
                    path: path.to_path_buf(),
                    line: index + 1,
                    message: "unterminated section header".to_string(),
                })?;
                let name = name.trim();
                let name = name.strip_prefix("profile ").map(str::trim).unwrap_or(name);
                current = name.to_string();
                sections.entry(current.clone()).or_default();
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| CredentialsError::Parse {
                path: path.to_path_buf(),
                line: index + 1,
                message: format!("expected 'key = value', found '{}'", line),
            })?;

            sections
                .entry(current.clone())
                .or_default()
                .insert(key.trim().to_string(), value.trim().to_string());
        }

        Ok(Self { sections })
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|s| s.get(key))
            .map(String::as_str)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }
}

/// Contents of the shared credentials and config files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsSettings {
    pub credentials: IniDocument,
    pub config: IniDocument,
}

impl AwsSettings {
    /// Whether `profile` has an access key in the credentials file.
    pub fn has_profile(&self, profile: &str) -> bool {
        self.credentials
            .get(profile, "aws_access_key_id")
            .is_some_and(|key| !key.is_empty())
    }

    /// Region configured for `profile` in the config file.
    pub fn region(&self, profile: &str) -> Option<&str> {
        self.config.get(profile, "region")
    }
}

/// Locations of the shared AWS files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsPaths {
    pub credentials: PathBuf,
    pub config: PathBuf,
}

impl AwsPaths {
    /// Platform-standard paths under `~/.aws`, overridable through the
    /// `AWS_SHARED_CREDENTIALS_FILE` and `AWS_CONFIG_FILE` variables.
    pub fn discover() -> Result<Self, CredentialsError> {
        let from_env = |name: &str| std::env::var_os(name).map(PathBuf::from);

        let credentials = from_env(CREDENTIALS_ENV);
        let config = from_env(CONFIG_ENV);
        if let (Some(credentials), Some(config)) = (credentials.clone(), config.clone()) {
            return Ok(Self {
                credentials,
                config,
            });
        }

        let aws_dir = dirs::home_dir()
            .ok_or(CredentialsError::NoHomeDirectory)?
            .join(".aws");
        Ok(Self {
            credentials: credentials.unwrap_or_else(|| aws_dir.join("credentials")),
            config: config.unwrap_or_else(|| aws_dir.join("config")),
        })
    }
}

/// Read both shared files concurrently. Either failing fails the whole read.
pub async fn get_aws_settings(paths: &AwsPaths) -> Result<AwsSettings, CredentialsError> {
    let (credentials, config) = tokio::try_join!(
        read_ini(&paths.credentials),
        read_ini(&paths.config)
    )?;

    Ok(AwsSettings {
        credentials,
        config,
    })
}

async fn read_ini(path: &Path) -> Result<IniDocument, CredentialsError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CredentialsError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
    IniDocument::parse(&content, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CREDENTIALS: &str = "\
# managed by aws configure
[default]
aws_access_key_id = AKIADEFAULT
aws_secret_access_key = secret

[lambdasync]
aws_access_key_id=AKIALAMBDASYNC
aws_secret_access_key=other-secret
";

    const CONFIG: &str = "\
[default]
region = us-east-1

; named profiles carry a prefix in this file
[profile lambdasync]
region = eu-west-1
output = json
";

    #[test]
    fn test_parse_sections_and_keys() {
        let doc = IniDocument::parse(CREDENTIALS, Path::new("credentials")).unwrap();
        assert_eq!(doc.get("default", "aws_access_key_id"), Some("AKIADEFAULT"));
        assert_eq!(doc.get("lambdasync", "aws_secret_access_key"), Some("other-secret"));
        assert_eq!(doc.section_names().collect::<Vec<_>>(), vec!["default", "lambdasync"]);
    }

    #[test]
    fn test_parse_strips_profile_prefix() {
        let doc = IniDocument::parse(CONFIG, Path::new("config")).unwrap();
        assert!(doc.has_section("lambdasync"));
        assert_eq!(doc.get("lambdasync", "region"), Some("eu-west-1"));
    }

    #[test]
    fn test_parse_rejects_garbage_line() {
        let err = IniDocument::parse("[default]\nnot a pair\n", Path::new("credentials"))
            .unwrap_err();
        assert!(matches!(err, CredentialsError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_parse_rejects_unterminated_header() {
        let err = IniDocument::parse("[default\n", Path::new("config")).unwrap_err();
        assert!(matches!(err, CredentialsError::Parse { line: 1, .. }));
    }

    #[tokio::test]
    async fn test_get_aws_settings_reads_both_files() {
        let dir = TempDir::new().unwrap();
        let paths = AwsPaths {
            credentials: dir.path().join("credentials"),
            config: dir.path().join("config"),
        };
        std::fs::write(&paths.credentials, CREDENTIALS).unwrap();
        std::fs::write(&paths.config, CONFIG).unwrap();

        let settings = get_aws_settings(&paths).await.unwrap();
        assert!(settings.has_profile("lambdasync"));
        assert!(!settings.has_profile("missing"));
        assert_eq!(settings.region("lambdasync"), Some("eu-west-1"));
    }

    #[tokio::test]
    async fn test_get_aws_settings_fails_if_either_missing() {
        let dir = TempDir::new().unwrap();
        let paths = AwsPaths {
            credentials: dir.path().join("credentials"),
            config: dir.path().join("config"),
        };
        std::fs::write(&paths.credentials, CREDENTIALS).unwrap();

        let err = get_aws_settings(&paths).await.unwrap_err();
        assert!(matches!(err, CredentialsError::Read { .. }));
    }
}
