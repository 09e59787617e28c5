// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Build | Status | Watch | Revert | Ignore | Diff | Options | Inis
//! ```

use std::process::ExitCode;

use plainci_rs::cli::global::GlobalOptions;
use plainci_rs::cli::{self, Command};
use plainci_rs::cmd::build::run_build_command;
use plainci_rs::cmd::changes::{
    run_diff_command, run_ignore_command, run_revert_command, run_status_command,
    run_watch_command,
};
use plainci_rs::cmd::config::{run_inis_command, run_options_command};
use plainci_rs::config::Config;
use plainci_rs::config::loader::ConfigLoader;
use plainci_rs::error::Result;
use plainci_rs::logging::{LogConfig, LogGuard, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Inis) => {
            let loader = build_config_loader(&cli.global);
            run_inis_command(&loader.format_loaded_files());
            Ok(())
        }
        Some(command) => run_with_config(&cli.global, command).await,
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_with_config(global: &GlobalOptions, command: &Command) -> Result<()> {
    let config = load_config(global)?;
    let _log_guard = start_logging(&config)?;

    match command {
        Command::Options => {
            run_options_command(&config);
            Ok(())
        }
        Command::Build(args) => run_build_command(args, &config).await,
        Command::Status => run_status_command(&config).await,
        Command::Watch => run_watch_command(&config).await,
        Command::Revert(args) => run_revert_command(args, &config),
        Command::Ignore(args) => run_ignore_command(args, &config),
        Command::Diff(args) => run_diff_command(args, &config),
        Command::Version | Command::Inis => Ok(()),
    }
}

fn start_logging(config: &Config) -> Result<LogGuard> {
    init_logging(&LogConfig::from_global(&config.global))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new().add_toml_file_optional("plainci.toml");
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader.with_env_prefix("PLAINCI")
}

fn load_config(global: &GlobalOptions) -> Result<Config> {
    build_config_loader(global)
        .with_overrides(global.to_config_overrides())?
        .build()
        .map_err(|e| e.context("Failed to load config"))
}
