// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::tools::ToolsLayout;
use super::types::{BuildConfiguration, BuildDefinition, BuildRequest, ToolsConfig};
use super::{Config, ConfigLoader};
use crate::logging::LogLevel;
use std::path::{Path, PathBuf};

#[test]
fn test_default_config() {
    let config = Config::default();
    insta::assert_yaml_snapshot!(
        serde_json::json!({
            "global.output_log_level": config.global.output_log_level.as_u8(),
            "definition.configuration": config.definition.configuration.to_string(),
            "definition.platform": config.definition.platform,
            "request.target": config.request.target,
            "watch.poll_interval_ms": config.watch.poll_interval_ms,
        }),
        @r#"
    definition.configuration: Debug
    definition.platform: Any CPU
    global.output_log_level: 3
    request.target: default
    watch.poll_interval_ms: 2000
    "#
    );
    assert_eq!(config.tools.script_extensions, vec![".fsx".to_string()]);
}

#[test]
fn test_build_configuration_parse() {
    assert_eq!(
        "debug".parse::<BuildConfiguration>().ok(),
        Some(BuildConfiguration::Debug)
    );
    assert_eq!(
        "Release".parse::<BuildConfiguration>().ok(),
        Some(BuildConfiguration::Release)
    );
    assert!("RelWithDebInfo".parse::<BuildConfiguration>().is_err());
}

#[test]
fn test_log_level_bounds() {
    assert!(LogLevel::new(0).is_ok());
    assert!(LogLevel::new(6).is_ok());
    assert!(LogLevel::new(7).is_err());
}

#[test]
fn test_common_properties_order_and_override() {
    let mut definition = BuildDefinition {
        repository_root: Some(PathBuf::from("/src/app")),
        configuration: BuildConfiguration::Release,
        ..Default::default()
    };
    definition
        .properties
        .insert("Platform".to_string(), "x64".to_string());
    definition
        .properties
        .insert("Nuget".to_string(), "off".to_string());

    let properties: Vec<_> = definition.common_properties().into_iter().collect();
    insta::assert_debug_snapshot!(properties, @r#"
    [
        (
            "Configuration",
            "Release",
        ),
        (
            "Nuget",
            "off",
        ),
        (
            "Platform",
            "x64",
        ),
        (
            "RepositoryRoot",
            "/src/app",
        ),
    ]
    "#);
}

#[test]
fn test_valid_repository_root() {
    let temp = tempfile::tempdir().unwrap();

    let mut definition = BuildDefinition::default();
    assert!(definition.valid_repository_root().is_none());

    definition.repository_root = Some(PathBuf::new());
    assert!(definition.valid_repository_root().is_none());

    definition.repository_root = Some(temp.path().join("missing"));
    assert!(definition.valid_repository_root().is_none());

    definition.repository_root = Some(temp.path().to_path_buf());
    assert_eq!(definition.valid_repository_root(), Some(temp.path()));
}

#[test]
fn test_parse_sections() {
    let config = Config::parse(
        r#"
[definition]
repository_root = "/work/repo"
diff_tool = "/usr/bin/meld"
configuration = "Release"

[request]
target = "ci"
arguments = ["clean", "verbose"]

[watch]
poll_interval_ms = 250
"#,
    )
    .unwrap();

    assert_eq!(
        config.definition.repository_root.as_deref(),
        Some(Path::new("/work/repo"))
    );
    assert_eq!(
        config.definition.diff_tool.as_deref(),
        Some(Path::new("/usr/bin/meld"))
    );
    assert_eq!(config.definition.configuration, BuildConfiguration::Release);
    assert_eq!(
        config.request,
        BuildRequest {
            target: "ci".to_string(),
            arguments: vec!["clean".to_string(), "verbose".to_string()],
        }
    );
    assert_eq!(config.watch.poll_interval_ms, 250);
}

#[test]
fn test_unknown_key_rejected() {
    let result = Config::parse(
        r#"
[definition]
repo = "/work/repo"
"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_validation_failures() {
    let cases = [
        "[request]\ntarget = \"  \"\n",
        "[tools]\nscript_extensions = [\"fsx\"]\n",
        "[watch]\npoll_interval_ms = 0\n",
    ];
    for toml in cases {
        assert!(Config::parse(toml).is_err(), "expected rejection of {toml:?}");
    }
}

#[test]
fn test_loader_overrides() {
    let config = ConfigLoader::new()
        .add_toml_str("[request]\ntarget = \"default\"\n")
        .set_option("request.target=package")
        .unwrap()
        .set("definition.repository_root", "/override".to_string())
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.request.target, "package");
    assert_eq!(
        config.definition.repository_root.as_deref(),
        Some(Path::new("/override"))
    );
}

#[test]
fn test_loader_rejects_malformed_option() {
    assert!(ConfigLoader::new().set_option("no-equals-sign").is_err());
    assert!(ConfigLoader::new().set_option("=value").is_err());
}

#[test]
fn test_format_options() {
    let config = Config::parse(
        r#"
[definition]
repository_root = "/work/repo"
"#,
    )
    .unwrap();
    let lines = config.format_options();
    assert!(
        lines
            .iter()
            .any(|line| line.starts_with("definition.repository_root") && line.ends_with("= /work/repo"))
    );
    assert!(lines.iter().any(|line| line.starts_with("request.target")));
}

#[test]
fn test_tools_layout_resolution() {
    let config = ToolsConfig {
        home: Some(PathBuf::from("/opt/plainci")),
        interpreter: PathBuf::from("FAKE/fake"),
        ..Default::default()
    };
    let home = Path::new("/opt/plainci");
    let layout = ToolsLayout::resolve(&config).unwrap();
    assert_eq!(layout.home(), home);
    assert_eq!(layout.interpreter_path(), home.join("FAKE/fake"));
    assert_eq!(
        layout.workflow_script_path(),
        home.join("bits/Workflow.fsx")
    );
}

#[cfg(unix)]
#[test]
fn test_tools_layout_keeps_absolute_interpreter() {
    let layout = ToolsLayout::new("/opt/plainci").with_interpreter("/bin/sh");
    assert_eq!(layout.interpreter_path(), PathBuf::from("/bin/sh"));
}

#[test]
fn test_tools_layout_defaults_to_exe_dir() {
    let layout = ToolsLayout::resolve(&ToolsConfig::default()).unwrap();
    let exe_dir = std::env::current_exe().unwrap();
    assert_eq!(Some(layout.home()), exe_dir.parent());
}
