// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Deploy path selection.
//!
//! A deploy either creates the function or replaces its code. When the remote
//! function exists but this project never recorded its ARN, ownership is
//! ambiguous and a human must confirm before anything is overwritten.

use std::fmt;

/// How the archive is shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployMode {
    /// CreateFunction.
    New,
    /// UpdateFunctionCode.
    Update,
}

impl DeployMode {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Update => "update",
        }
    }

    /// Past-tense verb used in the success summary.
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::New => "created",
            Self::Update => "updated",
        }
    }
}

impl fmt::Display for DeployMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What to do after the existence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployDecision {
    Proceed(DeployMode),
    /// Remote function exists, no local ARN: ask before overwriting.
    ConfirmOverwrite,
}

impl DeployDecision {
    pub fn decide(function_exists: bool, has_local_arn: bool) -> Self {
        match (function_exists, has_local_arn) {
            (false, _) => Self::Proceed(DeployMode::New),
            (true, true) => Self::Proceed(DeployMode::Update),
            (true, false) => Self::ConfirmOverwrite,
        }
    }

    /// Resolve a pending confirmation. `None` means the deploy is abandoned.
    pub fn confirm(self, confirmed: bool) -> Option<DeployMode> {
        match self {
            Self::Proceed(mode) => Some(mode),
            Self::ConfirmOverwrite if confirmed => Some(DeployMode::Update),
            Self::ConfirmOverwrite => None,
        }
    }
}
