// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Parser for `git status --porcelain -z`.
//!
//! ```text
//! record   := XY SP path NUL
//! rename   := XY SP path NUL orig NUL     (X or Y is R or C)
//!
//! ??              --> Untracked
//! DD AU UD UA DU AA UU --> Conflicted
//! R (either side) --> Renamed
//! A / C           --> Added
//! D               --> Deleted
//! M / T           --> Modified
//! !!              --> skipped (ignored file)
//! ```

use super::{Change, ChangeType};
use crate::error::{CiResult, ScmError};

/// Parses NUL-separated porcelain v1 output.
///
/// Paths are taken verbatim between the separators, so newlines and other
/// special characters survive. Non-UTF-8 bytes are decoded lossily.
///
/// # Errors
///
/// Returns `ScmError::MalformedStatus` for a record without a two-letter
/// status code and a path.
pub fn parse_porcelain(output: &[u8]) -> CiResult<Vec<Change>> {
    let mut changes = Vec::new();
    let mut records = output.split(|&b| b == 0).filter(|record| !record.is_empty());

    while let Some(record) = records.next() {
        let malformed = || ScmError::MalformedStatus(String::from_utf8_lossy(record).into_owned());
        let code = record.get(..2).and_then(|code| std::str::from_utf8(code).ok());
        let (Some(code), Some(b' '), Some(path)) = (code, record.get(2), record.get(3..)) else {
            return Err(malformed().into());
        };
        if path.is_empty() {
            return Err(malformed().into());
        }

        if code.contains(['R', 'C']) {
            // Original path of a rename or copy.
            records.next();
        }
        if code == "!!" {
            continue;
        }
        let change_type = classify(code).ok_or_else(malformed)?;
        changes.push(Change::new(String::from_utf8_lossy(path), change_type));
    }
    Ok(changes)
}

fn classify(code: &str) -> Option<ChangeType> {
    let change_type = match code {
        "??" => ChangeType::Untracked,
        "DD" | "AU" | "UD" | "UA" | "DU" | "AA" | "UU" => ChangeType::Conflicted,
        _ if code.contains('R') => ChangeType::Renamed,
        _ if code.contains(['A', 'C']) => ChangeType::Added,
        _ if code.contains('D') => ChangeType::Deleted,
        _ if code.contains(['M', 'T']) => ChangeType::Modified,
        _ => return None,
    };
    Some(change_type)
}
