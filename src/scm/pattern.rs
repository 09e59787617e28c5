// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Ignore patterns built from a repository-relative file path.
//!
//! ```text
//! src/a.txt --> file:      /src/a.txt
//!           --> extension: *.txt
//!           --> directory: /src
//! ```
//!
//! Backslashes are accepted and normalised to `/`.

use std::path::Path;

use crate::error::{CiResult, ScmError};

/// `/<file>`
///
/// # Errors
///
/// Returns `ScmError::EmptyPath` for an empty path.
pub fn ignore_file_pattern(file: &str) -> CiResult<String> {
    let file = normalize(file, "ignore file")?;
    Ok(format!("/{file}"))
}

/// `*.<ext>`
///
/// # Errors
///
/// Returns `ScmError::EmptyPath` for an empty path and
/// `ScmError::NoExtension` if the file name has no extension.
pub fn ignore_extension_pattern(file: &str) -> CiResult<String> {
    let file = normalize(file, "ignore extension")?;
    let name = file.rsplit('/').next().unwrap_or(&file);
    let ext = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .ok_or_else(|| ScmError::NoExtension(file.clone()))?;
    Ok(format!("*.{ext}"))
}

/// `/<parent directory>`
///
/// # Errors
///
/// Returns `ScmError::EmptyPath` for an empty path and
/// `ScmError::NoDirectory` for a file at the repository root.
pub fn ignore_directory_pattern(file: &str) -> CiResult<String> {
    let file = normalize(file, "ignore directory")?;
    let dir = file
        .rsplit_once('/')
        .map(|(dir, _)| dir)
        .filter(|dir| !dir.is_empty())
        .ok_or_else(|| ScmError::NoDirectory(file.clone()))?;
    Ok(format!("/{dir}"))
}

/// Rejects empty paths, converts separators and drops a leading slash.
pub(crate) fn normalize(file: &str, operation: &'static str) -> CiResult<String> {
    let file = file.trim().replace('\\', "/");
    let file = file.trim_start_matches('/');
    if file.is_empty() {
        return Err(ScmError::EmptyPath { operation }.into());
    }
    Ok(file.to_string())
}
