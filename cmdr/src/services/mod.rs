// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Collaborators that builtin commands delegate to. Each contract is a trait so that
//! tests can substitute fakes; the `*_cli` modules implement them by driving external
//! programs with [`tokio::process`].

// Attach.
pub mod build_service;
pub mod device_flow;
pub mod esbuild_cli;
pub mod git_cli;
pub mod npm_cli;
pub mod package_service;
pub mod process_runner;
pub mod remote_shell;
pub mod service_set;
pub mod service_stream;
pub mod ssh_cli;
pub mod version_control;

// Re-export.
pub use build_service::*;
pub use device_flow::*;
pub use esbuild_cli::*;
pub use git_cli::*;
pub use npm_cli::*;
pub use package_service::*;
pub use process_runner::*;
pub use remote_shell::*;
pub use service_set::*;
pub use service_stream::*;
pub use ssh_cli::*;
pub use version_control::*;
