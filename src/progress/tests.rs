// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{Progress, RecordingProgress};

#[test]
fn test_recording_keeps_order() {
    let progress = RecordingProgress::new();
    progress.report("first".to_string());
    progress.report("second".to_string());

    assert_eq!(progress.lines(), ["first", "second"]);
    assert_eq!(progress.last().as_deref(), Some("second"));
}

#[test]
fn test_channel_sink() {
    let (tx, rx) = flume::unbounded::<String>();
    let sink: &dyn Progress = &tx;
    sink.report("line".to_string());
    assert_eq!(rx.try_recv().ok().as_deref(), Some("line"));
}

#[test]
fn test_closed_channel_drops_line() {
    let (tx, rx) = flume::unbounded::<String>();
    drop(rx);
    tx.report("lost".to_string());
}
