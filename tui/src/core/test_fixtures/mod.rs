// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Test doubles shared by this crate and by crates that implement commands on top of it.

// Attach sources.
pub mod command_fixtures;
pub mod input_stream_mock;
pub mod memory_file_system;
pub mod stdout_mock;
pub mod temp_dir;

// Re-export.
pub use command_fixtures::*;
pub use input_stream_mock::*;
pub use memory_file_system::*;
pub use stdout_mock::*;
pub use temp_dir::*;
