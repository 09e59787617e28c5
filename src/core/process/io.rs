// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Output streaming for processes.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks
//!     each line --> trace log
//!               --> line sink   (if set)
//!   wait for exit, then for both readers
//!     read error / reader panic --> ProcessError::OutputError
//!   --> ProcessOutput { exit_code }
//! ```
//!
//! Lines are decoded lossily, so a stray non-UTF-8 byte never ends a stream
//! early.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tracing::trace;

use super::builder::{ProcessBuilder, ProcessOutput};
use crate::error::ProcessError;

pub(super) type Reader = JoinHandle<Result<(), ProcessError>>;

/// Where a reader task delivers each line.
pub(super) struct LineTargets {
    process_name: String,
    stream_name: &'static str,
    sink: Option<flume::Sender<String>>,
}

impl LineTargets {
    pub(super) fn new(
        process_name: impl Into<String>,
        stream_name: &'static str,
        sink: Option<flume::Sender<String>>,
    ) -> Self {
        Self {
            process_name: process_name.into(),
            stream_name,
            sink,
        }
    }

    fn deliver(&self, line: String) {
        trace!(process = %self.process_name, stream = %self.stream_name, line = %line, "output");
        if let Some(sink) = &self.sink {
            let _ = sink.send(line);
        }
    }

    fn read_error(&self, e: &std::io::Error) -> ProcessError {
        ProcessError::OutputError {
            command: self.process_name.clone(),
            message: format!("{}: {e}", self.stream_name),
        }
    }
}

fn spawn_reader<R>(stream: Option<R>, targets: LineTargets) -> Option<Reader>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    stream.map(|stream| tokio::spawn(read_lines(stream, targets)))
}

/// Waits for every reader and returns the first failure.
pub(super) async fn await_readers(name: &str, readers: [Option<Reader>; 2]) -> Result<(), ProcessError> {
    let mut first_error = None;
    for reader in readers.into_iter().flatten() {
        let result = reader.await.unwrap_or_else(|e| {
            Err(ProcessError::OutputError {
                command: name.to_string(),
                message: format!("reader task failed: {e}"),
            })
        });
        if let Err(e) = result {
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}

impl ProcessBuilder {
    /// Streams the child's output and waits for it to exit.
    pub(super) async fn run_child(
        &self,
        name: &str,
        child: &mut Child,
    ) -> Result<ProcessOutput, ProcessError> {
        let stdout = spawn_reader(
            child.stdout.take(),
            LineTargets::new(name, "stdout", self.sink().cloned()),
        );
        let stderr = spawn_reader(
            child.stderr.take(),
            LineTargets::new(name, "stderr", self.sink().cloned()),
        );

        let exit_status = child
            .wait()
            .await
            .map_err(|e| ProcessError::OutputError {
                command: name.to_string(),
                message: e.to_string(),
            })?;

        await_readers(name, [stdout, stderr]).await?;

        Ok(ProcessOutput::new(exit_status.code().unwrap_or(-1)))
    }
}

/// Reads a stream line by line until EOF.
///
/// # Errors
///
/// Returns `ProcessError::OutputError` if reading fails; lines read before
/// the failure have already been delivered.
pub(super) async fn read_lines<R>(reader: R, targets: LineTargets) -> Result<(), ProcessError>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .map_err(|e| targets.read_error(&e))?;
        if read == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        targets.deliver(line.trim_end_matches(['\n', '\r']).to_string());
    }
}
