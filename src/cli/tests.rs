// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::cli::build::parse_property;
use crate::cli::changes::IgnoreKind;
use crate::cli::{Cli, Command};
use crate::config::types::BuildConfiguration;
use clap::Parser;

#[test]
fn test_parse_version() {
    let cli = Cli::try_parse_from(["plainci", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "plainci",
        "-l",
        "5",
        "--root",
        "/src/app",
        "--diff-tool",
        "/usr/bin/meld",
        "-s",
        "request.target=ci",
        "status",
    ])
    .unwrap();

    insta::assert_debug_snapshot!(cli.global.to_config_overrides(), @r#"
    [
        "request.target=ci",
        "global.output_log_level=5",
        "global.file_log_level=5",
        "definition.repository_root=/src/app",
        "definition.diff_tool=/usr/bin/meld",
    ]
    "#);
    assert!(matches!(cli.command, Some(Command::Status)));
}

#[test]
fn test_log_level_range() {
    assert!(Cli::try_parse_from(["plainci", "-l", "7", "status"]).is_err());
}

#[test]
fn test_parse_build() {
    let cli = Cli::try_parse_from([
        "plainci",
        "build",
        "--target",
        "ci",
        "-c",
        "release",
        "-p",
        "Nuget=off",
        "--",
        "clean",
        "--verbose",
    ])
    .unwrap();

    let Some(Command::Build(args)) = cli.command else {
        panic!("expected build command");
    };
    assert_eq!(args.target.as_deref(), Some("ci"));
    assert_eq!(args.configuration, Some(BuildConfiguration::Release));
    assert_eq!(
        args.properties,
        [("Nuget".to_string(), "off".to_string())]
    );
    assert_eq!(args.arguments, ["clean", "--verbose"]);
}

#[test]
fn test_parse_build_defaults() {
    let cli = Cli::try_parse_from(["plainci", "build"]).unwrap();
    let Some(Command::Build(args)) = cli.command else {
        panic!("expected build command");
    };
    assert!(args.target.is_none());
    assert!(args.arguments.is_empty());
}

#[test]
fn test_parse_property() {
    assert_eq!(
        parse_property("Key=a=b"),
        Ok(("Key".to_string(), "a=b".to_string()))
    );
    assert!(parse_property("novalue").is_err());
    assert!(parse_property("=x").is_err());
}

#[test]
fn test_parse_ignore() {
    let cli = Cli::try_parse_from(["plainci", "ignore", "extension", "src/a.txt"]).unwrap();
    let Some(Command::Ignore(args)) = cli.command else {
        panic!("expected ignore command");
    };
    assert_eq!(args.kind, IgnoreKind::Extension);
    assert_eq!(args.file, "src/a.txt");

    assert!(Cli::try_parse_from(["plainci", "ignore", "branch", "a"]).is_err());
}

#[test]
fn test_parse_revert_and_diff() {
    let cli = Cli::try_parse_from(["plainci", "revert", "src/a.txt"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Revert(ref a)) if a.file == "src/a.txt"));

    let cli = Cli::try_parse_from(["plainci", "diff", "src/a.txt"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Diff(ref a)) if a.file == "src/a.txt"));

    assert!(Cli::try_parse_from(["plainci", "revert"]).is_err());
}

#[test]
fn test_no_command() {
    let cli = Cli::try_parse_from(["plainci"]).unwrap();
    assert!(cli.command.is_none());
}
