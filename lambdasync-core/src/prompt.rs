// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Yes/no confirmation seam.
//!
//! The CLI answers from the terminal; tests script the answers.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::SyncResult;

/// Question asked before overwriting a function this project does not own.
pub const CONFIRM_OVERWRITE_FUNCTION: &str = "A function with this name already exists and was \
     not deployed from this project. Overwrite it?";

pub trait ConfirmPrompt: Send + Sync {
    fn confirm(&self, question: &str) -> SyncResult<bool>;
}

/// Answers from a fixed script and remembers every question asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Questions asked so far.
    pub fn asked(&self) -> Vec<String> {
        self.asked
            .lock()
            .map(|asked| asked.clone())
            .unwrap_or_default()
    }
}

impl ConfirmPrompt for ScriptedPrompt {
    /// Unscripted questions are declined.
    fn confirm(&self, question: &str) -> SyncResult<bool> {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(question.to_string());
        }
        Ok(self
            .answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .unwrap_or(false))
    }
}
