// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # fsh_tui
//!
//! The interactive core of `fsh`, a single session command shell that runs over a raw
//! mode terminal. This crate has no opinion about which commands exist, it provides the
//! machinery that commands plug into:
//!
//! - [`readline`]: decodes raw terminal input into [`InputEvent`]s and edits the
//!   in-progress [`CommandLine`] with history navigation and word jumps. Every
//!   mutation repaints the whole line.
//! - [`router`]: splits a submitted line at unquoted `&&`, resolves aliases (longest
//!   name first, recursively), tokenizes, and dispatches to [`CommandHandler`]s. The
//!   chain stops at the first non zero exit code.
//! - [`capture`]: a single slot that gives one foreground program (the editor, a remote
//!   shell) exclusive ownership of raw input, Ctrl-C included.
//! - [`autocomplete`]: command name and path completion for Tab.
//! - [`editor`]: a small full screen modal editor with NORMAL, INSERT and COMMAND
//!   modes, backward search, and an optional line number gutter.
//! - [`session`]: the event loop that ties these together, plus the [`ShellContext`]
//!   that handlers receive.
//! - [`core`]: the output sink, the filesystem contract, INI config, logging, the error
//!   taxonomy, and test fixtures.
//!
//! # Life of a keystroke
//!
//! ```text
//! terminal ──► decode() ──► captured? ──yes──► capture owner (editor, ssh, ...)
//!                               │
//!                               no
//!                               ▼
//!                         LineEditor ──Enter──► CommandRouter ──► CommandHandler
//!                               ▲                                      │
//!                               └──────── prompt repaint ◄── OutputSink ◄┘
//! ```
//!
//! All output for a session goes through one [`OutputSink`], so writes from handlers,
//! the line editor, and the editor never interleave.

// Enforce strict error handling in production library code only.
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod autocomplete;
pub mod capture;
pub mod core;
pub mod editor;
pub mod readline;
pub mod router;
pub mod session;

// Re-export.
pub use autocomplete::*;
pub use capture::*;
pub use core::*;
pub use editor::*;
pub use readline::*;
pub use router::*;
pub use session::*;
