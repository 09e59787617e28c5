// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for plainci-rs.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. local plainci.toml (cwd)
//! 3. --ini files
//! 4. PLAINCI_* env vars
//! 5. CLI overrides (--root, --diff-tool, --set)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! PLAINCI_DEFINITION__REPOSITORY_ROOT=/src → definition.repository_root
//! PLAINCI_REQUEST__TARGET=ci               → request.target
//! PLAINCI_WATCH__POLL_INTERVAL_MS=500      → watch.poll_interval_ms
//! ```

pub mod loader;
pub mod tools;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{BuildDefinition, BuildRequest, GlobalConfig, ToolsConfig, WatchConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Initial build definition.
    pub definition: BuildDefinition,
    /// Initial build request.
    pub request: BuildRequest,
    /// Interpreter and workflow script locations.
    pub tools: ToolsConfig,
    /// Pending-changes observer.
    pub watch: WatchConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use plainci_rs::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file("config/default.toml")
    ///     .add_toml_file_optional("plainci.toml")
    ///     .with_env_prefix("PLAINCI")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Validate values serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` for an empty request target, an
    /// empty or malformed extension allow-list, or a zero poll interval.
    pub fn validate(&self) -> Result<()> {
        if self.request.target.trim().is_empty() {
            return Err(invalid("request", "target", "must not be empty").into());
        }
        if self.tools.interpreter.as_os_str().is_empty() {
            return Err(invalid("tools", "interpreter", "must not be empty").into());
        }
        if self.tools.script_extensions.is_empty() {
            return Err(invalid("tools", "script_extensions", "must not be empty").into());
        }
        if let Some(ext) = self
            .tools
            .script_extensions
            .iter()
            .find(|ext| !ext.starts_with('.') || ext.len() < 2)
        {
            return Err(invalid(
                "tools",
                "script_extensions",
                &format!("'{ext}' must start with a dot"),
            )
            .into());
        }
        if self.watch.poll_interval_ms == 0 {
            return Err(invalid("watch", "poll_interval_ms", "must be positive").into());
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_definition_options(&mut options);
        self.format_request_options(&mut options);
        self.format_tools_options(&mut options);
        options.insert(
            "watch.poll_interval_ms".into(),
            self.watch.poll_interval_ms.to_string(),
        );

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            display_opt(self.global.log_file.as_deref()),
        );
    }

    fn format_definition_options(&self, options: &mut BTreeMap<String, String>) {
        let definition = &self.definition;
        options.insert(
            "definition.repository_root".into(),
            display_opt(definition.repository_root.as_deref()),
        );
        options.insert(
            "definition.diff_tool".into(),
            display_opt(definition.diff_tool.as_deref()),
        );
        options.insert(
            "definition.configuration".into(),
            definition.configuration.to_string(),
        );
        options.insert("definition.platform".into(), definition.platform.clone());
        for (key, value) in &definition.properties {
            options.insert(format!("definition.properties.{key}"), value.clone());
        }
    }

    fn format_request_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("request.target".into(), self.request.target.clone());
        options.insert(
            "request.arguments".into(),
            self.request.arguments.join(" "),
        );
    }

    fn format_tools_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "tools.home".into(),
            display_opt(self.tools.home.as_deref()),
        );
        options.insert(
            "tools.interpreter".into(),
            self.tools.interpreter.display().to_string(),
        );
        options.insert(
            "tools.workflow_script".into(),
            self.tools.workflow_script.display().to_string(),
        );
        options.insert(
            "tools.script_extensions".into(),
            self.tools.script_extensions.join(", "),
        );
    }
}

fn display_opt(path: Option<&Path>) -> String {
    path.map_or_else(String::new, |p| p.display().to_string())
}

fn invalid(section: &str, key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    }
}
