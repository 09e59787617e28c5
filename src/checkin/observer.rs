// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Background polling of pending changes.
//!
//! ```text
//! start(sc, root, interval, on_change)
//!   tokio task:
//!     loop every interval (first poll immediately)
//!       select { cancelled --> exit, sc.pending_changes(root) }
//!         Ok(changes) != last --> on_change(changes)
//!         Err(e)              --> warn!, keep polling
//! stop() / drop --> CancellationToken::cancel
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::scm::{Change, SourceControl};

/// Polls a repository and reports change-set differences.
#[derive(Debug)]
pub struct PendingChangesObserver {
    root: PathBuf,
    pub(super) cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl PendingChangesObserver {
    /// Starts polling `root`. Must be called within a tokio runtime.
    pub fn start<S, F>(
        source_control: Arc<S>,
        root: PathBuf,
        interval: Duration,
        on_change: F,
    ) -> Self
    where
        S: SourceControl,
        F: Fn(Vec<Change>) + Send + Sync + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task_root = root.clone();

        debug!(root = %root.display(), ?interval, "observer started");
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last: Option<Vec<Change>> = None;

            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                let result = tokio::select! {
                    () = token.cancelled() => break,
                    result = source_control.pending_changes(&task_root) => result,
                };
                match result {
                    Ok(changes) if last.as_ref() != Some(&changes) => {
                        last = Some(changes.clone());
                        on_change(changes);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(root = %task_root.display(), error = %e, "polling pending changes failed");
                    }
                }
            }
            debug!(root = %task_root.display(), "observer stopped");
        });

        Self {
            root,
            cancel,
            handle,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Requests the polling task to stop. No further poll starts afterwards.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && !self.handle.is_finished()
    }
}

impl Drop for PendingChangesObserver {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
