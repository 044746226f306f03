// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod common;
pub mod config;
pub mod fs;
pub mod log;
pub mod terminal_io;
pub mod test_fixtures;

// Re-export.
pub use common::*;
pub use config::*;
pub use fs::*;
pub use log::*;
pub use terminal_io::*;
pub use test_fixtures::*;
