// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build command implementation for plainci-rs.

use std::sync::Arc;

use anyhow::bail;
use tracing::info;

use crate::cli::build::BuildArgs;
use crate::config::Config;
use crate::error::Result;
use crate::progress::{ConsoleProgress, Progress};
use crate::workflow::BuildService;

/// Applies command-line arguments to the service's live configuration.
pub fn apply_build_args(args: &BuildArgs, service: &BuildService) {
    service.update_request(|request| {
        if let Some(target) = &args.target {
            request.target.clone_from(target);
        }
        if !args.arguments.is_empty() {
            request.arguments.clone_from(&args.arguments);
        }
    });
    service.update_definition(|definition| {
        if let Some(configuration) = args.configuration {
            definition.configuration = configuration;
        }
        definition
            .properties
            .extend(args.properties.iter().cloned());
    });
}

/// Main handler for build command.
///
/// Progress lines go to stdout as they arrive.
///
/// # Errors
///
/// Returns an error if the tools layout cannot be resolved or the workflow
/// reports failure.
pub async fn run_build_command(args: &BuildArgs, config: &Config) -> Result<()> {
    run_build_with_progress(args, config, Arc::new(ConsoleProgress)).await
}

/// Runs the build reporting to `progress`.
///
/// # Errors
///
/// See [`run_build_command`].
pub async fn run_build_with_progress(
    args: &BuildArgs,
    config: &Config,
    progress: Arc<dyn Progress>,
) -> Result<()> {
    let service = BuildService::from_config(config)?;
    apply_build_args(args, &service);

    let request = service.request();
    info!(target = %request.target, "build requested");

    let run = service.execute(progress)?;
    if !run.wait().await {
        bail!("workflow '{}' failed", request.target);
    }
    Ok(())
}
