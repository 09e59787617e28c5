// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              CiError (16 bytes)
//!                     |
//!   +--------+--------+--------+--------+------+
//!   |        |        |        |        |      |
//!   v        v        v        v        v      v
//! Config  Process  Script    Scm   Workflow   Io
//!  Box      Box     Box      Box     Box     Box
//!
//! Sub-errors (unboxed internally):
//!   Config   InvalidValue, InvalidRoot, InstallDir
//!   Process  ExecutableNotFound, SpawnFailed, NonZeroExit, OutputError
//!   Script   UnsupportedExtension, ScriptNotFound
//!   Scm      CommandFailed, EmptyPath, NoExtension, NoDirectory,
//!            NoSelection, NoDiffTool, MalformedStatus
//!   Workflow AlreadyRunning, TaskPanicked
//!
//! All variants boxed => CiError is a pointer plus discriminant.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`CiError`].
pub type CiResult<T> = std::result::Result<T, CiError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum small on the stack.
#[derive(Debug, Error)]
pub enum CiError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Build script rejected or missing.
    #[error("script error: {0}")]
    Script(#[from] Box<ScriptError>),

    /// Source control operation failed.
    #[error("source control error: {0}")]
    Scm(#[from] Box<ScmError>),

    /// Workflow orchestration error.
    #[error("workflow error: {0}")]
    Workflow(#[from] Box<WorkflowError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for CiError {
                fn from(err: $error) -> Self {
                    CiError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConfigError => Config,
    ProcessError => Process,
    ScriptError => Script,
    ScmError => Scm,
    WorkflowError => Workflow,
    std::io::Error => Io,
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Repository root is unset or not an existing directory.
    #[error("repository root is not a directory: {path}")]
    InvalidRoot { path: String },

    /// The installation directory could not be determined.
    #[error("cannot locate installation directory: {0}")]
    InstallDir(String),
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found.
    #[error("executable not found: '{name}'")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// Failed to read process output.
    #[error("failed to read output from process '{command}': {message}")]
    OutputError { command: String, message: String },
}

// --- Script Errors ---

/// Errors raised before a build script is handed to its interpreter.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Script extension is not in the interpreter's allow-list.
    #[error("unsupported script '{script}' (expected one of: {allowed})")]
    UnsupportedExtension { script: String, allowed: String },

    /// Script file does not exist.
    #[error("script not found: {0}")]
    ScriptNotFound(String),
}

// --- Source Control Errors ---

/// Source control operation errors.
#[derive(Debug, Error)]
pub enum ScmError {
    /// Source control command failed.
    #[error("command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// An operation was given an empty file path.
    #[error("{operation}: file path is empty")]
    EmptyPath { operation: &'static str },

    /// File has no extension to build an ignore pattern from.
    #[error("file has no extension: {0}")]
    NoExtension(String),

    /// File lives at the repository root, so there is no directory to ignore.
    #[error("file has no parent directory: {0}")]
    NoDirectory(String),

    /// Diff requested without a selected file.
    #[error("no file selected")]
    NoSelection,

    /// Diff requested without a configured diff tool.
    #[error("no diff tool configured")]
    NoDiffTool,

    /// Unparseable status output.
    #[error("unexpected status record: {0}")]
    MalformedStatus(String),
}

// --- Workflow Errors ---

/// Workflow orchestration errors.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A workflow run is already in flight.
    #[error("a workflow run is already in progress")]
    AlreadyRunning,

    /// The background task running an activity panicked.
    #[error("activity '{activity}' panicked: {message}")]
    TaskPanicked { activity: String, message: String },
}

#[cfg(test)]
mod tests;
