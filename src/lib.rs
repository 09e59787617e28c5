// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |         build / changes / config
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  BuildDefinition, Request |
//!              '--+-------------------+----'
//!                 |                   |
//!                 v                   v
//!             workflow             checkin
//!        BuildService, run    view model, observer
//!                 |                   |
//!                 v                   v
//!              script                scm
//!        interpreter, args    git status/revert/
//!                 |            ignore/diff
//!                 v
//!   +-----------------------------------------+
//!   |  core      process runner, line sink    |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, progress  |
//!   +-----------------------------------------+
//! ```

pub mod checkin;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod progress;
pub mod scm;
pub mod script;
pub mod workflow;
