// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! CLI command modules.

pub mod call;
pub mod config;
pub mod deploy;
pub mod init;
