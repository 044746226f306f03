// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::Debug,
          path::PathBuf};

use fsh_tui::ShellError;
use futures_util::future::BoxFuture;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub line_text: Option<String>,
}

/// A warning or error reported by the bundler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildMessage {
    pub text: String,
    pub location: Option<SourceLocation>,
}

impl BuildMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            location: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOutput {
    pub artifacts: Vec<PathBuf>,
    pub warnings: Vec<BuildMessage>,
    pub errors: Vec<BuildMessage>,
}

/// Bundles the given entry points. A directory entry means the project in that
/// directory. Diagnostics are data in [`BuildOutput`], `Err` is reserved for failing to
/// run the bundler at all.
pub trait BuildService: Debug + Send + Sync {
    fn bundle(&self, entries: Vec<PathBuf>) -> BoxFuture<'_, Result<BuildOutput, ShellError>>;
}

/// Render a diagnostic for the terminal:
///
/// ```text
/// Could not resolve "left-pad"
///     at src/index.ts:1:7
///     import pad from "left-pad"
///            ^
/// ```
#[must_use]
pub fn format_build_message(message: &BuildMessage) -> String {
    let mut acc = message.text.replace('\n', "\r\n");
    if let Some(location) = &message.location {
        acc.push_str(&format!(
            "\r\n    at {}:{}:{}",
            location.file, location.line, location.column
        ));
        if let Some(line_text) = &location.line_text {
            acc.push_str(&format!(
                "\r\n    {line_text}\r\n    {}^",
                " ".repeat(location.column)
            ));
        }
    }
    acc
}
