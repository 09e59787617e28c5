// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Layered configuration loading.
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file_optional("plainci.toml")   [optional]
//!   .add_toml_file(--ini)                     [file]
//!   .with_env_prefix("PLAINCI")               PLAINCI_SECTION__KEY
//!   .with_overrides(["k=v", ..])              --root/--diff-tool/--set
//!        |
//!        v
//!    build() --> Config::validate() --> Config
//! ```
//!
//! Later sources win; overrides always win over files and environment.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};

use super::Config;
use crate::error::Result;

/// Builder for loading configuration from multiple sources.
pub struct ConfigLoader {
    builder: ConfigBuilder<DefaultState>,
    env_prefix: Option<String>,
    /// `(label, path)` of every TOML source that contributes, in load order.
    sources: Vec<(String, PathBuf)>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            sources: Vec::new(),
        }
    }

    fn add_file(mut self, path: &Path, required: bool) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(required));
        if required || path.is_file() {
            let label = if required { "file" } else { "optional" };
            self.sources.push((label.to_string(), path.to_path_buf()));
        }
        self
    }

    /// Adds a TOML file that must exist; `build()` fails otherwise.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_file(path.as_ref(), true)
    }

    /// Adds a TOML file that is skipped when absent.
    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_file(path.as_ref(), false)
    }

    /// Adds inline TOML content.
    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.sources
            .push(("string".to_string(), PathBuf::from("<string>")));
        self
    }

    /// Reads `PREFIX_SECTION__KEY` environment variables on `build()`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Sets a configuration override.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid config path.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
        Ok(self)
    }

    /// Sets an override given as `section.key=value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the option has no `=` or an empty key.
    pub fn set_option(self, option: &str) -> Result<Self> {
        let (key, value) = option
            .split_once('=')
            .filter(|(key, _)| !key.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("invalid option '{option}', expected KEY=VALUE"))?;
        self.set(key.trim(), value.to_string())
    }

    /// Applies every `section.key=value` override in order.
    ///
    /// # Errors
    ///
    /// Returns the first malformed option.
    pub fn with_overrides<I, S>(self, options: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        options
            .into_iter()
            .try_fold(self, |loader, option| loader.set_option(option.as_ref()))
    }

    /// Merges all sources into a validated [`Config`].
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing, TOML is malformed,
    /// an environment value cannot be parsed, a key is unknown, or a value
    /// fails validation.
    pub fn build(self) -> Result<Config> {
        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ),
            None => self.builder,
        };
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn loaded_files(&self) -> Vec<(String, PathBuf)> {
        self.sources.clone()
    }

    /// Numbered `N. [label] path` lines for `plainci inis`.
    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        self.sources
            .iter()
            .enumerate()
            .map(|(i, (label, path))| format!("{}. [{label}] {}", i + 1, path.display()))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
