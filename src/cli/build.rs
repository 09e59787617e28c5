// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build command arguments.
//!
//! ```text
//! plainci build --target ci -c Release -p Nuget=off -- clean verbose
//!   request.target     = ci
//!   configuration      = Release
//!   properties.Nuget   = off
//!   request.arguments  = [clean, verbose]
//! ```

use clap::{ArgAction, Args};

use crate::config::types::BuildConfiguration;

/// Arguments for the `build` command.
#[derive(Debug, Clone, Default, Args)]
pub struct BuildArgs {
    /// Workflow target, passed as the second interpreter argument.
    #[arg(short = 't', long = "target", value_name = "TARGET")]
    pub target: Option<String>,

    /// Build configuration (Debug or Release).
    #[arg(short = 'c', long = "configuration", value_name = "CONFIG")]
    pub configuration: Option<BuildConfiguration>,

    /// Extra `KEY=VALUE` property for the workflow script.
    /// Can be specified multiple times.
    #[arg(short = 'p', long = "property", value_name = "KEY=VALUE", value_parser = parse_property, action = ArgAction::Append)]
    pub properties: Vec<(String, String)>,

    /// Trailing interpreter arguments. Replace `request.arguments` when given.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub arguments: Vec<String>,
}

/// Parses `KEY=VALUE`.
///
/// # Errors
///
/// Returns a message if there is no `=` or the key is empty.
pub fn parse_property(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("invalid property '{s}', expected KEY=VALUE")),
    }
}
