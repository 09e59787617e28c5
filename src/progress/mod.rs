// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Ordered, fire-and-forget progress reporting.
//!
//! ```text
//! interpreter stdout/stderr ──┐
//! "ERROR: ..."                ├──> dyn Progress::report(line)
//! "WORKFLOW SUCCEEDED|FAILED" ┘        |
//!                      +---------------+---------------+
//!                      v               v               v
//!              flume::Sender    ConsoleProgress  RecordingProgress
//!              (channel)        (stdout + trace)  (in memory)
//! ```
//!
//! Lines arrive in the order they are reported. There is no buffering
//! contract beyond that.

#[cfg(test)]
mod tests;

use std::sync::Mutex;
use tracing::trace;

/// One-way sink for human-readable progress lines.
pub trait Progress: Send + Sync {
    /// Delivers one line. Never fails; a closed sink drops the line.
    fn report(&self, line: String);
}

impl Progress for flume::Sender<String> {
    fn report(&self, line: String) {
        let _ = self.send(line);
    }
}

/// Prints each line to stdout and mirrors it to the trace log.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn report(&self, line: String) {
        trace!(line = %line, "progress");
        println!("{line}");
    }
}

/// Keeps every reported line in memory.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    lines: Mutex<Vec<String>>,
}

impl RecordingProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the lines reported so far.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Returns the most recent line, if any.
    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.lines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Progress for RecordingProgress {
    fn report(&self, line: String) {
        self.lines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(line);
    }
}
