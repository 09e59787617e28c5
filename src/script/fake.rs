// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! FAKE (F# Make) interpreter.
//!
//! ```text
//! fake <script> <target> Key1=Value1 Key2=Value2 ... <args...>
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::ScriptInterpreter;
use crate::config::tools::ToolsLayout;

/// Runs `.fsx` workflow scripts through FAKE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeInterpreter {
    interpreter: PathBuf,
    extensions: Vec<String>,
}

impl FakeInterpreter {
    pub fn new(interpreter: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
            extensions,
        }
    }

    /// Uses the interpreter and allow-list of an installation layout.
    #[must_use]
    pub fn from_layout(layout: &ToolsLayout) -> Self {
        Self::new(
            layout.interpreter_path(),
            layout.script_extensions().to_vec(),
        )
    }
}

impl ScriptInterpreter for FakeInterpreter {
    fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    fn valid_script_extensions(&self) -> &[String] {
        &self.extensions
    }

    fn compose_arguments(
        &self,
        script: &Path,
        target: &str,
        properties: &BTreeMap<String, String>,
        args: &[String],
    ) -> Vec<String> {
        let mut arguments = Vec::with_capacity(2 + properties.len() + args.len());
        arguments.push(script.display().to_string());
        arguments.push(target.to_string());
        arguments.extend(properties.iter().map(|(key, value)| format!("{key}={value}")));
        arguments.extend(args.iter().cloned());
        arguments
    }
}
