// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod file_system;
pub mod local_file_system;

// Re-export.
pub use file_system::*;
pub use local_file_system::*;
