// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod config_folder;
pub mod fmt;
pub mod parse_args;

// Re-export.
pub use config_folder::*;
pub use fmt::*;
pub use parse_args::*;
