// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io::Write;
use std::path::Path;

use super::{LogConfig, LogLevel, open_log_file};
use crate::config::types::GlobalConfig;

#[test]
fn test_log_level_bounds() {
    assert_eq!(LogLevel::new(0).unwrap(), LogLevel::SILENT);
    assert_eq!(LogLevel::new(6).unwrap(), LogLevel::DUMP);
    insta::assert_snapshot!(
        LogLevel::new(7).unwrap_err().to_string(),
        @"invalid value for 'log_level' in section '[global]': log level must be 0-6, got 7"
    );
}

#[test]
fn test_filter_keeps_dependencies_quiet() {
    let filters: Vec<_> = (0..=6)
        .map(|level| LogLevel::new(level).unwrap().to_filter_string())
        .collect();
    insta::assert_debug_snapshot!(filters, @r#"
    [
        "off",
        "error",
        "warn",
        "warn,plainci_rs=info,plainci=info",
        "warn,plainci_rs=debug,plainci=debug",
        "warn,plainci_rs=trace,plainci=trace",
        "trace",
    ]
    "#);
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert!(config.log_file().is_none());
}

#[test]
fn test_log_config_from_global() {
    let global = GlobalConfig {
        output_log_level: LogLevel::WARN,
        file_log_level: LogLevel::DEBUG,
        log_file: Some("logs/plainci.log".into()),
    };

    let config = LogConfig::from_global(&global);

    assert_eq!(config.console_level(), LogLevel::WARN);
    assert_eq!(config.file_level(), LogLevel::DEBUG);
    assert_eq!(config.log_file(), Some(Path::new("logs/plainci.log")));
    assert!(LogConfig::from_global(&GlobalConfig::default()).log_file().is_none());
}

#[test]
fn test_log_file_appends_across_sessions() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("logs").join("plainci.log");

    writeln!(open_log_file(&path).unwrap(), "first build").unwrap();
    writeln!(open_log_file(&path).unwrap(), "second build").unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "first build\nsecond build\n"
    );
}
