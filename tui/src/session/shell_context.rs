// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{path::{Path, PathBuf},
          sync::Arc};

use futures_util::future::BoxFuture;

use crate::{CancelSlot, CaptureSlot, CommandRouter, FileSystem, OutputSink,
            SharedTerminalSize, StdMutex, lock_or_recover, resolve_path};

/// Everything a command handler may touch. Clones share the same session state: the
/// output sink, working directory, capture and cancel slots, and the router (so a
/// handler can run nested lines, eg: `npm run` scripts).
#[derive(Debug, Clone)]
pub struct ShellContext {
    pub sink: OutputSink,
    pub fs: Arc<dyn FileSystem>,
    pub terminal_size: SharedTerminalSize,
    pub capture: CaptureSlot,
    pub cancel: CancelSlot,
    /// Where `alias` persists new entries. `None` keeps aliases in memory only.
    pub config_file: Option<PathBuf>,
    cwd: Arc<StdMutex<PathBuf>>,
    router: Arc<CommandRouter>,
}

impl ShellContext {
    pub fn new(
        sink: OutputSink,
        fs: Arc<dyn FileSystem>,
        cwd: impl Into<PathBuf>,
        router: Arc<CommandRouter>,
    ) -> Self {
        Self {
            sink,
            fs,
            terminal_size: SharedTerminalSize::default(),
            capture: CaptureSlot::default(),
            cancel: CancelSlot::default(),
            config_file: None,
            cwd: Arc::new(StdMutex::new(cwd.into())),
            router,
        }
    }

    #[must_use]
    pub fn with_terminal_size(mut self, terminal_size: SharedTerminalSize) -> Self {
        self.terminal_size = terminal_size;
        self
    }

    #[must_use]
    pub fn with_config_file(mut self, config_file: impl Into<PathBuf>) -> Self {
        self.config_file = Some(config_file.into());
        self
    }

    #[must_use]
    pub fn cwd(&self) -> PathBuf { lock_or_recover(&self.cwd).clone() }

    pub fn set_cwd(&self, cwd: impl AsRef<Path>) {
        let cwd = cwd.as_ref().to_path_buf();
        tracing::debug!(message = "cwd changed", cwd = %cwd.display());
        *lock_or_recover(&self.cwd) = cwd;
    }

    /// Resolve user input against the working directory.
    #[must_use]
    pub fn resolve(&self, input: &str) -> PathBuf { resolve_path(&self.cwd(), input) }

    #[must_use]
    pub fn router(&self) -> &Arc<CommandRouter> { &self.router }

    /// Run a line through the router as if it had been typed.
    pub fn execute_line(&self, line: impl Into<String>) -> BoxFuture<'static, i32> {
        self.router.execute_line(line, self.clone())
    }
}
