// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # fsh-cmdr
//!
//! The `fsh` binary and the builtin commands it registers with the [`fsh_tui`] command
//! router. The terminal core (line editing, chains, aliases, capture, autocomplete, the
//! modal editor) lives in [`fsh_tui`]. This crate adds:
//!
//! - [`commands`]: the builtin [`fsh_tui::CommandHandler`]s (`ls`, `cat`, `cd`, `mkdir`,
//!   `rm`, `mv`, `clear`, `vi`, `alias`, `help`, `exit`, `npm`, `bundle`, `git`, `ssh`).
//! - [`services`]: the collaborator contracts those commands delegate to (version
//!   control, packages, build, remote shell, device flow) and implementations backed by
//!   the `git`, `npm`, `esbuild` and `ssh` programs and the GitHub API.
//! - [`launcher`]: wiring a [`fsh_tui::Session`] to the real terminal, configuration
//!   folder, and logging.

// Enforce strict error handling in production library code only.
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod clap_config;
pub mod commands;
pub mod common;
pub mod launcher;
pub mod services;

#[cfg(test)]
pub mod test_fixtures;

// Re-export.
pub use clap_config::*;
pub use commands::*;
pub use common::*;
pub use launcher::*;
pub use services::*;
