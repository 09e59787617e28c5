// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pending-change commands: status, watch, revert, ignore, diff.
//!
//! ```text
//! config.definition --> CheckInViewModel<GitSourceControl>
//!   status  --> refresh_pending_changes, print
//!   watch   --> activate observer, print on change, until Ctrl+C
//!   revert / ignore / diff --> view model operation
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use tracing::info;

use crate::checkin::{CheckInViewModel, RepositoryEntry};
use crate::cli::changes::{FileArgs, IgnoreArgs, IgnoreKind};
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::scm::GitSourceControl;

/// Creates an inactive view model over the configured repository.
///
/// # Errors
///
/// Returns an error if the repository root is not an existing directory or
/// not a git work tree.
pub fn git_view_model(config: &Config) -> Result<CheckInViewModel<GitSourceControl>> {
    let definition = &config.definition;
    let Some(root) = definition.valid_repository_root() else {
        return Err(ConfigError::InvalidRoot {
            path: definition
                .repository_root
                .as_deref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
        }
        .into());
    };
    if !GitSourceControl::is_repository(root) {
        bail!("not a git repository: {}", root.display());
    }

    Ok(CheckInViewModel::new(
        Arc::new(GitSourceControl::new()),
        Duration::from_millis(config.watch.poll_interval_ms),
    )
    .with_definition(definition))
}

/// Formats entries as `[x] state     path` lines.
#[must_use]
pub fn format_entries(files: &[RepositoryEntry]) -> Vec<String> {
    files
        .iter()
        .map(|entry| {
            let mark = if entry.is_checked() { 'x' } else { ' ' };
            format!("[{mark}] {:<10} {}", entry.state().to_string(), entry.file())
        })
        .collect()
}

fn print_entries(files: &[RepositoryEntry]) {
    if files.is_empty() {
        println!("No pending changes");
        return;
    }
    for line in format_entries(files) {
        println!("{line}");
    }
}

/// Prints the pending changes once.
///
/// # Errors
///
/// Returns an error if the repository is invalid or git fails.
pub async fn run_status_command(config: &Config) -> Result<()> {
    let view_model = git_view_model(config)?;
    view_model
        .refresh_pending_changes()
        .await
        .context("failed to query pending changes")?;
    print_entries(&view_model.files());
    Ok(())
}

/// Prints pending changes whenever they change, until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the repository is invalid or the signal handler
/// cannot be installed.
pub async fn run_watch_command(config: &Config) -> Result<()> {
    let mut view_model = git_view_model(config)?;
    view_model.subscribe(|files| {
        println!("--- {} pending change(s) ---", files.len());
        print_entries(files);
    });
    if !view_model.activate() {
        bail!("repository root vanished");
    }
    info!(
        interval_ms = config.watch.poll_interval_ms,
        "watching pending changes, press Ctrl+C to stop"
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;
    view_model.deactivate();
    Ok(())
}

/// Reverts local modifications of a file.
///
/// # Errors
///
/// Returns an error if the repository is invalid or git fails.
pub fn run_revert_command(args: &FileArgs, config: &Config) -> Result<()> {
    git_view_model(config)?.revert(&args.file)?;
    println!("Reverted {}", args.file);
    Ok(())
}

/// Adds an ignore pattern derived from a file.
///
/// # Errors
///
/// Returns an error if no pattern can be derived or `.gitignore` cannot be
/// written.
pub fn run_ignore_command(args: &IgnoreArgs, config: &Config) -> Result<()> {
    let view_model = git_view_model(config)?;
    match args.kind {
        IgnoreKind::File => view_model.ignore_file(&args.file)?,
        IgnoreKind::Extension => view_model.ignore_extension(&args.file)?,
        IgnoreKind::Directory => view_model.ignore_directory(&args.file)?,
    }
    Ok(())
}

/// Opens the diff tool for a file against its previous revision.
///
/// # Errors
///
/// Returns an error if no diff tool is configured, the previous revision
/// cannot be read, or the tool cannot be started.
pub fn run_diff_command(args: &FileArgs, config: &Config) -> Result<()> {
    let mut view_model = git_view_model(config)?;
    if !view_model.can_diff_to_previous() {
        bail!("no diff tool configured, use --diff-tool or definition.diff_tool");
    }
    view_model.set_selected_file(Some(args.file.clone()));
    view_model.diff_to_previous()?;
    Ok(())
}
