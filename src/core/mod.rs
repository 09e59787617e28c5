// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules for process management.
//!
//! ```text
//!      core
//!       |
//!       v
//!    process
//!       |
//!  ProcessBuilder --> ProcessOutput
//!  line_sink (flume) for live output
//! ```

pub mod process;
