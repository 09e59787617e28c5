// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git CLI implementation of [`SourceControl`].

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{Duration, SystemTime};

use tracing::{debug, info, warn};

use super::status::parse_porcelain;
use super::{Change, SourceControl};
use crate::core::process::builder::ProcessBuilder;
use crate::error::{CiResult, ProcessError, ScmError};

/// Diff copies older than this are removed before a new one is written.
const DIFF_FILE_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Git working tree backed by the `git` executable.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitSourceControl;

impl GitSourceControl {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Check if `path` is inside a git work tree.
    #[must_use]
    pub fn is_repository(path: &Path) -> bool {
        gix::discover(path).is_ok()
    }

    /// Builds a non-interactive git command.
    ///
    /// Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`.
    fn git_command(args: &[&str], cwd: &Path) -> CiResult<(String, Command)> {
        let git = ProcessBuilder::which("git")?;
        let cmd_display = format!("git {}", args.join(" "));
        debug!(cmd = %cmd_display, cwd = %cwd.display(), "exec");

        let mut command = Command::new(git.program());
        command
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0");
        Ok((cmd_display, command))
    }

    /// Returns raw stdout of a finished git command.
    fn check_output(command: String, output: std::io::Result<Output>) -> CiResult<Vec<u8>> {
        let output = output.map_err(|source| ProcessError::SpawnFailed {
            command: command.clone(),
            source,
        })?;
        if !output.status.success() {
            return Err(ScmError::CommandFailed {
                command,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(output.stdout)
    }

    /// Runs git synchronously and returns raw stdout.
    fn git_output(args: &[&str], cwd: &Path) -> CiResult<Vec<u8>> {
        let (display, mut command) = Self::git_command(args, cwd)?;
        Self::check_output(display, command.output())
    }
}

/// Directory holding the committed copies handed to the diff tool.
fn diff_dir() -> PathBuf {
    std::env::temp_dir().join("plainci-diff")
}

/// Removes files in `dir` last modified more than `max_age` ago.
///
/// Returns how many files were removed. Failures are logged and skipped.
pub(crate) fn prune_stale(dir: &Path, max_age: Duration) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    let now = SystemTime::now();
    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        let stale = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .is_ok_and(|modified| {
                now.duration_since(modified)
                    .is_ok_and(|age| age > max_age)
            });
        if !stale || !path.is_file() {
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove old diff file"),
        }
    }
    removed
}

impl SourceControl for GitSourceControl {
    async fn pending_changes(&self, root: &Path) -> CiResult<Vec<Change>> {
        let (display, command) = Self::git_command(
            &["status", "--porcelain", "-z", "--untracked-files=all"],
            root,
        )?;
        let output = tokio::process::Command::from(command)
            .kill_on_drop(true)
            .output()
            .await;
        let stdout = Self::check_output(display, output)?;

        let changes = parse_porcelain(&stdout)?;
        debug!(root = %root.display(), count = changes.len(), "pending changes");
        Ok(changes)
    }

    fn revert(&self, root: &Path, file: &str) -> CiResult<()> {
        Self::git_output(&["checkout", "HEAD", "--", file], root)?;
        info!(file, "reverted");
        Ok(())
    }

    fn ignore(&self, root: &Path, pattern: &str) -> CiResult<()> {
        let path = root.join(".gitignore");
        let existing = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        if existing.lines().any(|line| line.trim() == pattern) {
            debug!(pattern, "already ignored");
            return Ok(());
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if !existing.is_empty() && !existing.ends_with('\n') {
            writeln!(file)?;
        }
        writeln!(file, "{pattern}")?;
        info!(pattern, "added to .gitignore");
        Ok(())
    }

    fn diff_to_previous(&self, root: &Path, file: &str, diff_tool: &Path) -> CiResult<()> {
        let previous = Self::git_output(&["show", &format!("HEAD:./{file}")], root)?;

        let name = Path::new(file)
            .file_name()
            .map_or_else(|| "file".into(), |name| name.to_string_lossy());
        let dir = diff_dir();
        std::fs::create_dir_all(&dir)?;
        let pruned = prune_stale(&dir, DIFF_FILE_MAX_AGE);
        if pruned > 0 {
            debug!(pruned, dir = %dir.display(), "removed old diff files");
        }

        let mut temp = tempfile::Builder::new()
            .prefix("plainci-")
            .suffix(&format!("-{name}"))
            .tempfile_in(&dir)?;
        temp.write_all(&previous)?;
        // The diff tool outlives this process; later diffs prune the copy.
        let (_, previous_path) = temp.keep().map_err(|e| e.error)?;

        ProcessBuilder::new(diff_tool)
            .arg(&previous_path)
            .arg(root.join(file))
            .spawn_detached()?;
        info!(file, tool = %diff_tool.display(), "diff tool launched");
        Ok(())
    }
}
