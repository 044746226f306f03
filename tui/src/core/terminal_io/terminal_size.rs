// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

use crate::{StdMutex, lock_or_recover};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub cols: u16,
    pub rows: u16,
}

impl Default for TerminalSize {
    fn default() -> Self { Self { cols: 80, rows: 24 } }
}

impl TerminalSize {
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self { Self { cols, rows } }

    /// Ask the real terminal. Falls back to 80x24 when stdout is not a tty.
    #[must_use]
    pub fn detect() -> Self {
        crossterm::terminal::size()
            .map(|(cols, rows)| Self { cols, rows })
            .unwrap_or_default()
    }
}

/// Terminal size shared between the binary (which sees resize events) and command
/// handlers (which lay out columns or a full-screen editor).
#[derive(Debug, Clone, Default)]
pub struct SharedTerminalSize {
    inner: Arc<StdMutex<TerminalSize>>,
}

impl SharedTerminalSize {
    #[must_use]
    pub fn new(size: TerminalSize) -> Self {
        Self {
            inner: Arc::new(StdMutex::new(size)),
        }
    }

    #[must_use]
    pub fn get(&self) -> TerminalSize { *lock_or_recover(&self.inner) }

    pub fn set(&self, size: TerminalSize) { *lock_or_recover(&self.inner) = size; }
}
