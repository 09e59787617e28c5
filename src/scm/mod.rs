// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Source control collaborator.
//!
//! ```text
//! SourceControl (trait)
//!   pending_changes(root)            async, Vec<Change>
//!   revert(root, file)
//!   ignore(root, pattern)            "/file" | "*.ext" | "/dir"
//!   diff_to_previous(root, file, tool)
//!
//! GitSourceControl
//!   status  --> git status --porcelain -z --untracked-files=all
//!   revert  --> git checkout HEAD -- <file>
//!   ignore  --> append to <root>/.gitignore
//!   diff    --> git show HEAD:<file> > temp, launch <tool> <temp> <file>
//! ```

mod git;
mod pattern;
mod status;


pub use git::GitSourceControl;
pub use pattern::{ignore_directory_pattern, ignore_extension_pattern, ignore_file_pattern};
pub use status::parse_porcelain;

use std::fmt;
use std::future::Future;
use std::path::Path;

use crate::error::CiResult;

/// Kind of a pending change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChangeType {
    Added,
    Modified,
    Deleted,
    Renamed,
    Untracked,
    Conflicted,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Renamed => "renamed",
            Self::Untracked => "untracked",
            Self::Conflicted => "conflicted",
        };
        f.write_str(name)
    }
}

/// One pending change: a repository-relative, `/`-separated path and its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Change {
    path: String,
    change_type: ChangeType,
}

impl Change {
    pub fn new(path: impl Into<String>, change_type: ChangeType) -> Self {
        Self {
            path: path.into(),
            change_type,
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn change_type(&self) -> ChangeType {
        self.change_type
    }
}

/// Source control operations the check-in view delegates to.
///
/// `root` is the working tree root; file arguments are relative to it.
pub trait SourceControl: Send + Sync + 'static {
    /// Lists pending changes under `root`.
    fn pending_changes(&self, root: &Path) -> impl Future<Output = CiResult<Vec<Change>>> + Send;

    /// Discards local modifications of `file`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying tool fails.
    fn revert(&self, root: &Path, file: &str) -> CiResult<()>;

    /// Adds an ignore `pattern` to the repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the ignore list cannot be updated.
    fn ignore(&self, root: &Path, pattern: &str) -> CiResult<()>;

    /// Opens `diff_tool` comparing the last committed revision of `file`
    /// with the working copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the previous revision cannot be read or the tool
    /// cannot be launched.
    fn diff_to_previous(&self, root: &Path, file: &str, diff_tool: &Path) -> CiResult<()>;
}
