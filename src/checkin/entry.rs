// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Displayed change entries and their reconciliation.
//!
//! ```text
//! current: a[x] b[ ]        pending: a b c
//!        unchecked = {b}
//!        --> a[x] b[ ] c[x]   sorted by path
//! ```

use std::collections::BTreeSet;

use crate::scm::{Change, ChangeType};

/// A pending change plus its inclusion in the next check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEntry {
    change: Change,
    is_checked: bool,
}

impl RepositoryEntry {
    #[must_use]
    pub const fn new(change: Change, is_checked: bool) -> Self {
        Self { change, is_checked }
    }

    #[must_use]
    pub fn file(&self) -> &str {
        self.change.path()
    }

    #[must_use]
    pub const fn state(&self) -> ChangeType {
        self.change.change_type()
    }

    #[must_use]
    pub const fn is_checked(&self) -> bool {
        self.is_checked
    }

    pub const fn set_checked(&mut self, checked: bool) {
        self.is_checked = checked;
    }
}

/// Replaces `current` with `pending`, keeping paths the user unchecked
/// unchecked. New paths start checked. The result is sorted by path.
#[must_use]
pub fn reconcile(current: &[RepositoryEntry], pending: Vec<Change>) -> Vec<RepositoryEntry> {
    let unchecked: BTreeSet<&str> = current
        .iter()
        .filter(|entry| !entry.is_checked)
        .map(RepositoryEntry::file)
        .collect();

    let mut entries: Vec<RepositoryEntry> = pending
        .into_iter()
        .map(|change| {
            let is_checked = !unchecked.contains(change.path());
            RepositoryEntry::new(change, is_checked)
        })
        .collect();
    entries.sort_by(|a, b| a.file().cmp(b.file()));
    entries
}
