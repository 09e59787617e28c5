// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build script execution through an external interpreter.
//!
//! ```text
//! ScriptExecutor::execute(script, target, properties, args, progress)
//!   1. extension in allow-list?      no --> ScriptError::UnsupportedExtension
//!   2. script exists?                no --> ScriptError::ScriptNotFound
//!   3. interpreter exists?           no --> ProcessError::ExecutableNotFound
//!   4. ProcessBuilder(interpreter, compose_arguments(...))
//!        stdout/stderr reader tasks --> flume channel --> progress.report()
//!   5. Ok(exit_code == 0)
//! ```
//!
//! Nothing is spawned unless steps 1-3 pass.

mod fake;


pub use fake::FakeInterpreter;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::process::builder::{ProcessBuilder, ProcessFlags};
use crate::error::{ProcessError, Result, ScriptError};
use crate::progress::Progress;

/// An interpreter able to run build scripts.
pub trait ScriptInterpreter: Send + Sync {
    /// Interpreter binary. A bare name is looked up in PATH.
    fn interpreter(&self) -> &Path;

    /// Accepted script extensions, with leading dot.
    fn valid_script_extensions(&self) -> &[String];

    /// Builds the interpreter's argument vector.
    fn compose_arguments(
        &self,
        script: &Path,
        target: &str,
        properties: &BTreeMap<String, String>,
        args: &[String],
    ) -> Vec<String>;
}

/// Runs build scripts and streams their output to a [`Progress`] sink.
#[derive(Debug, Clone)]
pub struct ScriptExecutor<I> {
    interpreter: I,
    working_dir: Option<PathBuf>,
}

impl<I: ScriptInterpreter> ScriptExecutor<I> {
    pub const fn new(interpreter: I) -> Self {
        Self {
            interpreter,
            working_dir: None,
        }
    }

    /// Runs the interpreter in `dir` instead of the current directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub const fn interpreter(&self) -> &I {
        &self.interpreter
    }

    /// Runs `script` for `target` and reports every output line.
    ///
    /// Returns `Ok(true)` if the interpreter exits with code zero and
    /// `Ok(false)` for any other exit code.
    ///
    /// # Errors
    ///
    /// Returns an error without spawning anything if the script extension
    /// is not accepted, the script is missing, or the interpreter cannot be
    /// found. Spawn and read failures are returned as errors too.
    pub async fn execute(
        &self,
        script: &Path,
        target: &str,
        properties: &BTreeMap<String, String>,
        args: &[String],
        progress: &dyn Progress,
    ) -> Result<bool> {
        self.check_extension(script)?;
        if !script.is_file() {
            return Err(ScriptError::ScriptNotFound(script.display().to_string()).into());
        }
        let interpreter = self.resolve_interpreter()?;

        let arguments = self
            .interpreter
            .compose_arguments(script, target, properties, args);
        info!(script = %script.display(), target, "running build script");

        let (tx, rx) = flume::unbounded::<String>();
        let mut builder = ProcessBuilder::new(&interpreter)
            .args(&arguments)
            .flag(ProcessFlags::ALLOW_FAILURE)
            .line_sink(tx);
        if let Some(dir) = &self.working_dir {
            builder = builder.cwd(dir);
        }

        let forward = async {
            while let Ok(line) = rx.recv_async().await {
                progress.report(line);
            }
        };
        let (output, ()) = tokio::join!(builder.run(), forward);
        let output = output?;

        debug!(exit_code = output.exit_code(), "build script finished");
        Ok(output.success())
    }

    fn check_extension(&self, script: &Path) -> std::result::Result<(), ScriptError> {
        let allowed = self.interpreter.valid_script_extensions();
        let accepted = script.extension().is_some_and(|ext| {
            let ext = format!(".{}", ext.to_string_lossy());
            allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext))
        });
        if accepted {
            Ok(())
        } else {
            Err(ScriptError::UnsupportedExtension {
                script: script.display().to_string(),
                allowed: allowed.join(", "),
            })
        }
    }

    fn resolve_interpreter(&self) -> std::result::Result<PathBuf, ProcessError> {
        let interpreter = self.interpreter.interpreter();
        if interpreter.components().count() == 1 && !interpreter.is_absolute() {
            return ProcessBuilder::find(&interpreter.to_string_lossy()).ok_or_else(|| {
                ProcessError::ExecutableNotFound {
                    name: interpreter.display().to_string(),
                }
            });
        }
        if interpreter.is_file() {
            Ok(interpreter.to_path_buf())
        } else {
            Err(ProcessError::ExecutableNotFound {
                name: interpreter.display().to_string(),
            })
        }
    }
}
