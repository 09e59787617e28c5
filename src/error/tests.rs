// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{CiError, CiResult, ConfigError, ScmError, ScriptError, WorkflowError};

#[test]
fn test_config_error_display() {
    let err = ConfigError::InvalidRoot {
        path: "/work/missing".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"repository root is not a directory: /work/missing"
    );
}

#[test]
fn test_wrapped_error_display() {
    let err: CiError = ScriptError::UnsupportedExtension {
        script: "build.ps1".to_string(),
        allowed: ".fsx".to_string(),
    }
    .into();
    insta::assert_snapshot!(
        err.to_string(),
        @"script error: unsupported script 'build.ps1' (expected one of: .fsx)"
    );

    let err: CiError = WorkflowError::AlreadyRunning.into();
    insta::assert_snapshot!(err.to_string(), @"workflow error: a workflow run is already in progress");

    let err: CiError = ScmError::EmptyPath { operation: "revert" }.into();
    insta::assert_snapshot!(err.to_string(), @"source control error: revert: file path is empty");
}

#[test]
fn test_ci_error_size() {
    let size = std::mem::size_of::<CiError>();
    assert!(size <= 24, "CiError is {size} bytes, expected <= 24");
}

#[test]
fn test_ci_result_size() {
    let size = std::mem::size_of::<CiResult<()>>();
    assert!(size <= 24, "CiResult<()> is {size} bytes, expected <= 24");
}
