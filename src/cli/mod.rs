// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for plainci-rs using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! plainci [global options] <command>
//! version | options | inis
//! build [--target T] [-c CONFIG] [-p K=V]... [-- ARGS...]
//! status | watch
//! revert FILE
//! ignore {file|extension|directory} FILE
//! diff FILE
//! ```

pub mod build;
pub mod changes;
pub mod global;

#[cfg(test)]
mod tests;

use crate::cli::build::BuildArgs;
use crate::cli::changes::{FileArgs, IgnoreArgs};
use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand};

/// Check-in and build workflow client.
#[derive(Debug, Parser)]
#[command(
    name = "plainci",
    author,
    version,
    about = "Check-in and build workflow client",
    long_about = "plainci-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Inspects pending changes of a repository, reverts or ignores\n\
                  files, diffs them against the previous revision and runs the\n\
                  build workflow script through its interpreter.\n\n\
                  See `plainci <command> --help` for more information about a command.",
    after_help = "INI FILES:\n\n\
                  plainci reads `plainci.toml` from the current directory if it\n\
                  exists. Additional files can be given with --ini and are loaded\n\
                  after it. PLAINCI_<SECTION>__<KEY> environment variables and\n\
                  --root/--diff-tool/--set override both."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files in use.
    Inis,

    /// Runs the build workflow.
    Build(BuildArgs),

    /// Lists pending changes of the repository.
    Status,

    /// Watches the repository and prints pending changes as they change.
    Watch,

    /// Reverts local modifications of a file.
    Revert(FileArgs),

    /// Adds an ignore pattern derived from a file.
    Ignore(IgnoreArgs),

    /// Diffs a file against its previous revision with the diff tool.
    Diff(FileArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
