// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::ErrorKind,
          process::Stdio};

use fsh_tui::ShellError;
use tokio::{io::{AsyncRead, AsyncReadExt},
            process::{ChildStderr, ChildStdout, Command}};

pub const READ_BUFFER_SIZE: usize = 4096;

/// What a finished program printed, and whether it exited successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Stdout followed by stderr, with trailing whitespace removed. Programs like `git
    /// checkout` report success on stderr.
    #[must_use]
    pub fn combined_text(&self) -> String {
        let mut acc = self.stdout.trim_end().to_string();
        let stderr = self.stderr.trim_end();
        if !acc.is_empty() && !stderr.is_empty() {
            acc.push('\n');
        }
        acc.push_str(stderr);
        acc
    }

    /// The message to surface for a failed run.
    #[must_use]
    pub fn failure_message(&self, program: &str) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("{program} exited with an error")
        } else {
            stderr.to_string()
        }
    }
}

/// Name of the program a [`Command`] runs, for messages.
#[must_use]
pub fn program_name(command: &Command) -> String {
    command.as_std().get_program().to_string_lossy().into_owned()
}

/// Map a failure to start a program into the error taxonomy.
#[must_use]
pub fn spawn_error(program: &str, error: &std::io::Error) -> ShellError {
    match error.kind() {
        ErrorKind::NotFound => ShellError::external(format!("{program}: program not found")),
        _ => ShellError::external(format!("{program}: {error}")),
    }
}

/// Run a program without user interaction and collect its output. A non zero exit is
/// not an error here, callers decide from [`ProcessOutput::success`].
///
/// # Errors
///
/// Returns an error if the program can't be started.
pub async fn run_to_completion(command: &mut Command) -> Result<ProcessOutput, ShellError> {
    let program = program_name(command);
    let output = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|error| spawn_error(&program, &error))?;

    // % is Display, ? is Debug.
    tracing::debug!(message = "process finished", %program, status = ?output.status);

    Ok(ProcessOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Like [`run_to_completion`], but a non zero exit becomes
/// [`ShellError::ExternalService`] carrying the program's stderr verbatim.
///
/// # Errors
///
/// Returns an error if the program can't be started or exits with failure.
pub async fn run_expecting_success(command: &mut Command) -> Result<ProcessOutput, ShellError> {
    let program = program_name(command);
    let output = run_to_completion(command).await?;
    if output.success {
        Ok(output)
    } else {
        Err(ShellError::external(output.failure_message(&program)))
    }
}

/// Read from `reader` into `buf`. Resolves to `None` at end of stream or on error, and
/// never resolves when there is no reader.
pub async fn read_chunk<R: AsyncRead + Unpin>(
    reader: &mut Option<R>,
    buf: &mut [u8],
) -> Option<usize> {
    match reader {
        Some(reader) => reader.read(buf).await.ok().filter(|it| *it > 0),
        None => std::future::pending().await,
    }
}

/// Forward chunks from a child's stdout and stderr as they arrive, until both close.
/// Returns everything read from stderr, so callers can classify failures.
pub async fn pump_output(
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
    mut on_chunk: impl FnMut(Vec<u8>),
) -> String {
    let mut stdout = stdout;
    let mut stderr = stderr;
    let mut stdout_buf = [0_u8; READ_BUFFER_SIZE];
    let mut stderr_buf = [0_u8; READ_BUFFER_SIZE];
    let mut stderr_acc = Vec::new();

    while stdout.is_some() || stderr.is_some() {
        tokio::select! {
            // This branch is cancel safe because `read` is cancel safe.
            maybe_len = read_chunk(&mut stdout, &mut stdout_buf), if stdout.is_some() => {
                match maybe_len {
                    Some(len) => on_chunk(stdout_buf[..len].to_vec()),
                    None => stdout = None,
                }
            }

            // This branch is cancel safe because `read` is cancel safe.
            maybe_len = read_chunk(&mut stderr, &mut stderr_buf), if stderr.is_some() => {
                match maybe_len {
                    Some(len) => {
                        stderr_acc.extend_from_slice(&stderr_buf[..len]);
                        on_chunk(stderr_buf[..len].to_vec());
                    }
                    None => stderr = None,
                }
            }
        }
    }

    String::from_utf8_lossy(&stderr_acc).into_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_combined_text() {
        let output = ProcessOutput {
            success: true,
            stdout: "out\n".into(),
            stderr: "Switched to branch 'main'\n".into(),
        };
        assert_eq!(output.combined_text(), "out\nSwitched to branch 'main'");

        let output = ProcessOutput {
            stderr: "only err\n".into(),
            ..Default::default()
        };
        assert_eq!(output.combined_text(), "only err");
    }

    #[test]
    fn test_failure_message() {
        let output = ProcessOutput::default();
        assert_eq!(output.failure_message("git"), "git exited with an error");

        let output = ProcessOutput {
            stderr: "fatal: not a git repository\n".into(),
            ..Default::default()
        };
        assert_eq!(output.failure_message("git"), "fatal: not a git repository");
    }

    #[tokio::test]
    async fn test_missing_program_is_external_error() {
        let mut command = Command::new("fsh-no-such-program-for-tests");
        let error = run_to_completion(&mut command).await.unwrap_err();
        assert_eq!(
            error.to_string(),
            "fsh-no-such-program-for-tests: program not found"
        );
    }
}
