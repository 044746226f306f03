// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Builtin commands. Each one is a [`fsh_tui::CommandHandler`]; the ones backed by a
//! service hold an `Arc` of it so tests can swap in fakes.

// Attach sources.
pub mod alias;
pub mod builtin_registry;
pub mod bundle;
pub mod cat;
pub mod cd;
pub mod clear;
pub mod exit;
pub mod git;
pub mod git_format;
pub mod help;
pub mod ls;
pub mod mkdir;
pub mod mv;
pub mod npm;
pub mod rm;
pub mod ssh;
pub mod vi;

// Re-export.
pub use alias::*;
pub use builtin_registry::*;
pub use bundle::*;
pub use cat::*;
pub use cd::*;
pub use clear::*;
pub use exit::*;
pub use git::*;
pub use git_format::*;
pub use help::*;
pub use ls::*;
pub use mkdir::*;
pub use mv::*;
pub use npm::*;
pub use rm::*;
pub use ssh::*;
pub use vi::*;
