// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::PathBuf;

/// Operator waiting for its motion. Only `d` exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOperator {
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Normal { pending: Option<PendingOperator> },
    Insert,
    /// `buffer` starts with the char that opened the mode, `:` or `?`.
    Command { buffer: String },
}

impl Default for EditorMode {
    fn default() -> Self { Self::Normal { pending: None } }
}

/// What the editor asks of its owner after an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    Continue,
    /// Persist `contents` to `path`, then report back through
    /// [`crate::ModalEditor::on_write_complete`].
    Write {
        path: PathBuf,
        contents: String,
        quit_after: bool,
    },
    Quit,
}
