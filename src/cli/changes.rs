// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pending-change command arguments.
//!
//! ```text
//! revert FILE
//! ignore file      src/a.txt  --> /src/a.txt
//! ignore extension src/a.txt  --> *.txt
//! ignore directory src/a.txt  --> /src
//! diff FILE
//! ```

use clap::{Args, ValueEnum};

/// A single repository-relative file.
#[derive(Debug, Clone, Args)]
pub struct FileArgs {
    /// File path relative to the repository root.
    #[arg(value_name = "FILE")]
    pub file: String,
}

/// What to ignore, derived from a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IgnoreKind {
    /// Only this file.
    File,
    /// Every file with the same extension.
    Extension,
    /// The directory containing the file.
    Directory,
}

/// Arguments for the `ignore` command.
#[derive(Debug, Clone, Args)]
pub struct IgnoreArgs {
    /// Pattern kind.
    #[arg(value_enum)]
    pub kind: IgnoreKind,

    /// File path relative to the repository root.
    #[arg(value_name = "FILE")]
    pub file: String,
}
