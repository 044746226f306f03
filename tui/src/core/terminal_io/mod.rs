// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod output_sink;
pub mod terminal_io_type_aliases;
pub mod terminal_size;

// Re-export.
pub use output_sink::*;
pub use terminal_io_type_aliases::*;
pub use terminal_size::*;
