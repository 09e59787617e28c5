// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Check-in view model.
//!
//! ```text
//! set_build_definition(def)
//!   root unchanged and observed --> keep observer
//!   otherwise stop observer; valid root --> PendingChangesObserver::start
//!
//! observer / refresh_pending_changes()
//!   --> reconcile(files, changes) --> files replaced --> listeners(&files)
//!
//! revert / ignore_file / ignore_extension / ignore_directory / diff_to_previous
//!   --> SourceControl (errors propagate to the caller)
//! ```

mod entry;
mod observer;

#[cfg(test)]
mod tests;

pub use entry::{RepositoryEntry, reconcile};
pub use observer::PendingChangesObserver;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::config::types::BuildDefinition;
use crate::error::{CiResult, ConfigError, ScmError};
use crate::scm::{
    Change, SourceControl, ignore_directory_pattern, ignore_extension_pattern,
    ignore_file_pattern,
};

type Listener = Box<dyn Fn(&[RepositoryEntry]) + Send + Sync>;

/// State shared with the observer task.
#[derive(Default)]
struct Shared {
    files: Mutex<Vec<RepositoryEntry>>,
    listeners: Mutex<Vec<Listener>>,
}

impl Shared {
    fn apply(&self, pending: Vec<Change>) {
        let snapshot = {
            let mut files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
            *files = reconcile(&files, pending);
            files.clone()
        };
        debug!(count = snapshot.len(), "pending changes updated");
        let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener(&snapshot);
        }
    }
}

/// Pending changes of one repository plus the user's check-in choices.
pub struct CheckInViewModel<S: SourceControl> {
    source_control: Arc<S>,
    definition: BuildDefinition,
    poll_interval: Duration,
    shared: Arc<Shared>,
    observer: Option<PendingChangesObserver>,
    selected_file: Option<String>,
    check_in_comment: String,
}

impl<S: SourceControl> std::fmt::Debug for CheckInViewModel<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckInViewModel")
            .field("definition", &self.definition)
            .field("observer", &self.observer)
            .field("selected_file", &self.selected_file)
            .finish_non_exhaustive()
    }
}

impl<S: SourceControl> CheckInViewModel<S> {
    /// Creates an inactive view model. Call
    /// [`set_build_definition`](Self::set_build_definition) to start observing.
    pub fn new(source_control: Arc<S>, poll_interval: Duration) -> Self {
        Self {
            source_control,
            definition: BuildDefinition::default(),
            poll_interval,
            shared: Arc::default(),
            observer: None,
            selected_file: None,
            check_in_comment: String::new(),
        }
    }

    #[must_use]
    pub const fn definition(&self) -> &BuildDefinition {
        &self.definition
    }

    /// Uses `definition` without starting the observer.
    #[must_use]
    pub fn with_definition(mut self, definition: &BuildDefinition) -> Self {
        self.definition = definition.clone();
        self
    }

    /// Adopts a new build definition.
    ///
    /// The observer is restarted only if the repository root changed or is
    /// no longer valid, and runs only for an existing root directory.
    /// Must be called within a tokio runtime.
    pub fn set_build_definition(&mut self, definition: &BuildDefinition) {
        let same_root = self.definition.repository_root == definition.repository_root;
        self.definition = definition.clone();

        if same_root
            && self.definition.valid_repository_root().is_some()
            && self.is_observing()
        {
            return;
        }
        self.deactivate();
        self.activate();
    }

    /// Starts observing if the root is valid and no observer is running.
    /// Returns whether an observer is running afterwards.
    pub fn activate(&mut self) -> bool {
        if self.is_observing() {
            return true;
        }
        let Some(root) = self.definition.valid_repository_root().map(Path::to_path_buf) else {
            return false;
        };
        let shared = Arc::clone(&self.shared);
        self.observer = Some(PendingChangesObserver::start(
            Arc::clone(&self.source_control),
            root,
            self.poll_interval,
            move |changes| shared.apply(changes),
        ));
        true
    }

    /// Stops observing the repository.
    pub fn deactivate(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.stop();
        }
    }

    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.observer
            .as_ref()
            .is_some_and(PendingChangesObserver::is_running)
    }

    /// Returns a copy of the displayed entries.
    #[must_use]
    pub fn files(&self) -> Vec<RepositoryEntry> {
        self.shared
            .files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Paths included in the next check-in.
    #[must_use]
    pub fn checked_files(&self) -> Vec<String> {
        self.shared
            .files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|entry| entry.is_checked())
            .map(|entry| entry.file().to_string())
            .collect()
    }

    /// Toggles inclusion of `file`. Returns false if no entry has that path.
    pub fn set_checked(&self, file: &str, checked: bool) -> bool {
        let mut files = self
            .shared
            .files
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        files
            .iter_mut()
            .find(|entry| entry.file() == file)
            .map(|entry| entry.set_checked(checked))
            .is_some()
    }

    /// Registers a callback invoked with the new list after every refresh.
    pub fn subscribe(&self, listener: impl Fn(&[RepositoryEntry]) + Send + Sync + 'static) {
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(listener));
    }

    /// Queries pending changes once. Does nothing without a valid root.
    ///
    /// # Errors
    ///
    /// Returns the source control error unchanged.
    pub async fn refresh_pending_changes(&self) -> CiResult<()> {
        let Some(root) = self.definition.valid_repository_root() else {
            debug!("no valid repository root, refresh skipped");
            return Ok(());
        };
        let changes = self.source_control.pending_changes(root).await?;
        self.apply_pending_changes(changes);
        Ok(())
    }

    /// Reconciles `changes` into the displayed list and notifies listeners.
    pub fn apply_pending_changes(&self, changes: Vec<Change>) {
        self.shared.apply(changes);
    }

    /// Reverts local modifications of `file`.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty path, an invalid root, or a failed
    /// source control operation.
    pub fn revert(&self, file: &str) -> CiResult<()> {
        if file.trim().is_empty() {
            return Err(ScmError::EmptyPath {
                operation: "revert",
            }
            .into());
        }
        self.source_control.revert(&self.root()?, file)
    }

    /// Ignores exactly `file` (`/path/to/file`).
    ///
    /// # Errors
    ///
    /// Returns an error for an empty path, an invalid root, or a failed
    /// source control operation.
    pub fn ignore_file(&self, file: &str) -> CiResult<()> {
        let pattern = ignore_file_pattern(file)?;
        self.source_control.ignore(&self.root()?, &pattern)
    }

    /// Ignores every file sharing the extension of `file` (`*.ext`).
    ///
    /// # Errors
    ///
    /// As [`ignore_file`](Self::ignore_file), and `ScmError::NoExtension`.
    pub fn ignore_extension(&self, file: &str) -> CiResult<()> {
        let pattern = ignore_extension_pattern(file)?;
        self.source_control.ignore(&self.root()?, &pattern)
    }

    /// Ignores the directory containing `file` (`/dir`).
    ///
    /// # Errors
    ///
    /// As [`ignore_file`](Self::ignore_file), and `ScmError::NoDirectory`.
    pub fn ignore_directory(&self, file: &str) -> CiResult<()> {
        let pattern = ignore_directory_pattern(file)?;
        self.source_control.ignore(&self.root()?, &pattern)
    }

    /// True when a diff tool is configured.
    #[must_use]
    pub fn can_diff_to_previous(&self) -> bool {
        self.diff_tool().is_some()
    }

    /// Diffs the selected file against its previous revision.
    ///
    /// # Errors
    ///
    /// Returns `ScmError::NoSelection` without a selected file,
    /// `ScmError::NoDiffTool` without a diff tool, or the source control
    /// error.
    pub fn diff_to_previous(&self) -> CiResult<()> {
        let file = self.selected_file.as_deref().ok_or(ScmError::NoSelection)?;
        let tool = self.diff_tool().ok_or(ScmError::NoDiffTool)?;
        self.source_control
            .diff_to_previous(&self.root()?, file, tool)
    }

    pub fn set_selected_file(&mut self, file: Option<String>) {
        self.selected_file = file.filter(|f| !f.trim().is_empty());
    }

    #[must_use]
    pub fn selected_file(&self) -> Option<&str> {
        self.selected_file.as_deref()
    }

    pub fn set_check_in_comment(&mut self, comment: impl Into<String>) {
        self.check_in_comment = comment.into();
    }

    #[must_use]
    pub fn check_in_comment(&self) -> &str {
        &self.check_in_comment
    }

    fn diff_tool(&self) -> Option<&Path> {
        self.definition
            .diff_tool
            .as_deref()
            .filter(|tool| !tool.as_os_str().is_empty())
    }

    fn root(&self) -> CiResult<PathBuf> {
        self.definition
            .valid_repository_root()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                ConfigError::InvalidRoot {
                    path: self
                        .definition
                        .repository_root
                        .as_deref()
                        .map_or_else(String::new, |p| p.display().to_string()),
                }
                .into()
            })
    }
}
