// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for plainci-rs.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, BuildDefinition, BuildRequest, ToolsConfig, WatchConfig
//! ```
//!
//! # Build Configuration
//!
//! ```text
//! BuildConfiguration: Debug (default) | Release
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Build configuration type (Debug, Release).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum BuildConfiguration {
    #[default]
    Debug,
    Release,
}

impl std::fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debug => write!(f, "Debug"),
            Self::Release => write!(f, "Release"),
        }
    }
}

impl std::str::FromStr for BuildConfiguration {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "release" => Ok(Self::Release),
            _ => Err(ConfigError::InvalidValue {
                section: "definition".to_string(),
                key: "configuration".to_string(),
                message: format!("expected 'Debug' or 'Release', got '{s}'"),
            }),
        }
    }
}

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file. No file log when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// Describes the repository under check-in and how to build it.
///
/// The live instance is shared with the rest of the application and may be
/// edited at any time; a workflow run works on its own clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildDefinition {
    /// Working tree root of the repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_root: Option<PathBuf>,
    /// External tool used to diff a file against its previous revision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_tool: Option<PathBuf>,
    /// Build configuration handed to the workflow script.
    pub configuration: BuildConfiguration,
    /// Target platform handed to the workflow script.
    pub platform: String,
    /// Extra `key=value` properties for the workflow script.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl Default for BuildDefinition {
    fn default() -> Self {
        Self {
            repository_root: None,
            diff_tool: None,
            configuration: BuildConfiguration::default(),
            platform: "Any CPU".to_string(),
            properties: BTreeMap::new(),
        }
    }
}

impl BuildDefinition {
    /// Returns the repository root only if it names an existing directory.
    #[must_use]
    pub fn valid_repository_root(&self) -> Option<&Path> {
        self.repository_root
            .as_deref()
            .filter(|root| !root.as_os_str().is_empty() && root.is_dir())
    }

    /// Properties passed to the interpreter as `key=value` arguments.
    ///
    /// Derived keys come first; a user property with the same key wins.
    #[must_use]
    pub fn common_properties(&self) -> BTreeMap<String, String> {
        let mut properties = BTreeMap::new();
        properties.insert("Configuration".to_string(), self.configuration.to_string());
        properties.insert("Platform".to_string(), self.platform.clone());
        if let Some(root) = &self.repository_root {
            properties.insert("RepositoryRoot".to_string(), root.display().to_string());
        }
        properties.extend(
            self.properties
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        properties
    }
}

/// Parameters of a single workflow invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildRequest {
    /// Workflow stage passed as the second positional argument.
    pub target: String,
    /// Trailing interpreter arguments.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
}

impl Default for BuildRequest {
    fn default() -> Self {
        Self {
            target: "default".to_string(),
            arguments: Vec::new(),
        }
    }
}

/// Location of the script interpreter and workflow script.
///
/// Relative paths are resolved against `home`, which defaults to the
/// directory containing the running executable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Installation directory override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<PathBuf>,
    /// Interpreter binary, relative to `home`.
    pub interpreter: PathBuf,
    /// Workflow script, relative to `home`.
    pub workflow_script: PathBuf,
    /// Script extensions the interpreter accepts (with leading dot).
    pub script_extensions: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        let interpreter = if cfg!(windows) {
            "FAKE/fake.exe"
        } else {
            "FAKE/fake"
        };
        Self {
            home: None,
            interpreter: PathBuf::from(interpreter),
            workflow_script: PathBuf::from("bits/Workflow.fsx"),
            script_extensions: vec![".fsx".to_string()],
        }
    }
}

/// Pending-changes observer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchConfig {
    /// Interval between source control polls, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2000,
        }
    }
}
