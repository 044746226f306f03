// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::Debug;

use tracing_core::LevelFilter;

use crate::OutputSink;

pub const DEFAULT_LOG_FILE_NAME: &str = "fsh.log";

/// Where tracing output goes, and at which level.
///
/// A shell owns the terminal in raw mode, so logging to stdout would corrupt the
/// prompt. Interactive sessions log to a file. Logging to the session's
/// [`OutputSink`] is available for debugging a single command.
#[derive(Debug)]
pub struct TracingConfig {
    pub writer_config: WriterConfig,
    pub level: tracing::Level,
}

#[derive(Debug, Clone)]
pub enum WriterConfig {
    None,
    Display(DisplayPreference),
    File(String /* log file path */),
    DisplayAndFile(DisplayPreference, String /* log file path */),
}

#[derive(Clone)]
pub enum DisplayPreference {
    Stderr,
    OutputSink(OutputSink),
}

impl Debug for DisplayPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayPreference::Stderr => write!(f, "Stderr"),
            DisplayPreference::OutputSink(_) => write!(f, "OutputSink"),
        }
    }
}

impl TracingConfig {
    #[must_use]
    pub fn new_file(path: Option<String>, level: tracing::Level) -> Self {
        Self {
            writer_config: WriterConfig::File(
                path.unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string()),
            ),
            level,
        }
    }

    #[must_use]
    pub fn new_display(preferred_display: DisplayPreference) -> Self {
        Self {
            writer_config: WriterConfig::Display(preferred_display),
            level: tracing::Level::DEBUG,
        }
    }

    #[must_use]
    pub fn get_writer_config(&self) -> WriterConfig { self.writer_config.clone() }

    #[must_use]
    pub fn get_level_filter(&self) -> LevelFilter { LevelFilter::from_level(self.level) }
}
