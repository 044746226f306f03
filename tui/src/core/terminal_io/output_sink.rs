// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::Debug,
          io::{self, Write},
          sync::Arc};

use crate::{StdMutex, lock_or_recover};

pub const CRLF: &str = "\r\n";

/// The one ordered sink that all terminal output for a session passes through.
///
/// Cloning is cheap, every clone writes to the same terminal. Each call to
/// [`Write::write`] holds the lock for the whole payload, so output from the session
/// loop and from concurrently running command handlers never interleaves within a
/// write. Build a frame in a buffer and write it once when it must land atomically.
///
/// The sink also remembers whether the last byte written ended a line, which the
/// session uses to decide whether the prompt needs a fresh line first.
#[derive(Clone)]
pub struct OutputSink {
    inner: Arc<StdMutex<SinkState>>,
}

struct SinkState {
    terminal: Box<dyn Write + Send>,
    at_line_start: bool,
}

impl Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSink")
            .field("at_line_start", &self.is_at_line_start())
            .finish_non_exhaustive()
    }
}

impl OutputSink {
    pub fn new(terminal: impl Write + Send + 'static) -> Self {
        Self {
            inner: Arc::new(StdMutex::new(SinkState {
                terminal: Box::new(terminal),
                at_line_start: true,
            })),
        }
    }

    /// Write text as is. Errors from the underlying terminal are logged and dropped,
    /// there is nowhere else to report them.
    pub fn write_str(&self, text: &str) { self.write_bytes(text.as_bytes()); }

    /// Write bytes as is. Output from a child process goes through here undecoded, so a
    /// UTF-8 sequence split across two reads still reaches the terminal whole.
    pub fn write_bytes(&self, bytes: &[u8]) {
        let mut it = self.clone();
        if let Err(error) = it.write_all(bytes).and_then(|()| it.flush()) {
            // % is Display, ? is Debug.
            tracing::warn!(message = "terminal write failed", ?error);
        }
    }

    /// Write text followed by CRLF. Raw mode terminals don't translate `\n`.
    pub fn writeln(&self, text: impl AsRef<str>) {
        let mut line = String::from(text.as_ref());
        line.push_str(CRLF);
        self.write_str(&line);
    }

    /// Write text, converting bare `\n` into CRLF.
    pub fn write_lines(&self, text: &str) {
        let converted = text.replace("\r\n", "\n").replace('\n', CRLF);
        self.write_str(&converted);
    }

    #[must_use]
    pub fn is_at_line_start(&self) -> bool { lock_or_recover(&self.inner).at_line_start }

    /// Record that the cursor sits at column 0 even though the last byte written was
    /// not a newline, eg: after clearing the screen and homing the cursor.
    pub fn mark_at_line_start(&self) { lock_or_recover(&self.inner).at_line_start = true; }
}

impl Write for OutputSink {
    fn write(&mut self, payload: &[u8]) -> io::Result<usize> {
        let state = &mut *lock_or_recover(&self.inner);
        state.terminal.write_all(payload)?;
        if let Some(last) = payload.last() {
            state.at_line_start = *last == b'\n';
        }
        Ok(payload.len())
    }

    fn flush(&mut self) -> io::Result<()> { lock_or_recover(&self.inner).terminal.flush() }
}
