// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Installation layout of the build tools.
//!
//! ```text
//! <home>/              (tools.home, default: dir of current exe)
//!   FAKE/fake[.exe]    (tools.interpreter)
//!   bits/Workflow.fsx  (tools.workflow_script)
//! ```
//!
//! Never resolved against the working directory, so the client stays
//! relocatable.

use std::path::{Path, PathBuf};

use super::types::ToolsConfig;
use crate::error::{CiResult, ConfigError};

/// Resolved tool locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolsLayout {
    home: PathBuf,
    interpreter: PathBuf,
    workflow_script: PathBuf,
    script_extensions: Vec<String>,
}

impl ToolsLayout {
    /// Creates a layout rooted at `home` with the default tool locations.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self::with_config(home, &ToolsConfig::default())
    }

    /// Creates a layout rooted at `home` using the configured sub-paths.
    pub fn with_config(home: impl Into<PathBuf>, config: &ToolsConfig) -> Self {
        Self {
            home: home.into(),
            interpreter: config.interpreter.clone(),
            workflow_script: config.workflow_script.clone(),
            script_extensions: config.script_extensions.clone(),
        }
    }

    /// Resolves the layout from configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InstallDir` if `tools.home` is unset and the
    /// directory of the running executable cannot be determined.
    pub fn resolve(config: &ToolsConfig) -> CiResult<Self> {
        let home = match &config.home {
            Some(home) => home.clone(),
            None => install_dir()?,
        };
        Ok(Self::with_config(home, config))
    }

    /// Overrides the interpreter location.
    #[must_use]
    pub fn with_interpreter(mut self, interpreter: impl Into<PathBuf>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Absolute interpreter path. An absolute configured path is kept as is.
    #[must_use]
    pub fn interpreter_path(&self) -> PathBuf {
        self.home.join(&self.interpreter)
    }

    /// Absolute workflow script path.
    #[must_use]
    pub fn workflow_script_path(&self) -> PathBuf {
        self.home.join(&self.workflow_script)
    }

    #[must_use]
    pub fn script_extensions(&self) -> &[String] {
        &self.script_extensions
    }
}

/// Directory containing the running executable.
fn install_dir() -> CiResult<PathBuf> {
    let exe = std::env::current_exe().map_err(|e| ConfigError::InstallDir(e.to_string()))?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| ConfigError::InstallDir(exe.display().to_string()).into())
}
