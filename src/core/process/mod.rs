// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and management.
//!
//! ```text
//! ProcessBuilder::new("/opt/plainci/FAKE/fake")
//!   .args() .cwd() .env() .line_sink(tx)
//!   .run()
//!       --> tokio::process::Command
//!           stream stdout/stderr line by line
//!       --> ProcessOutput { exit_code }   (read failure --> OutputError)
//!
//! ProcessBuilder::new("meld").spawn_detached()
//!       --> std::process::Command, not awaited
//! ```

pub mod builder;
mod io;
mod runner;
