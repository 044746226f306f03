// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod command_line;
pub mod crossterm_adapter;
pub mod history;
pub mod input_decoder;
pub mod line_editor;

// Re-export.
pub use command_line::*;
pub use crossterm_adapter::*;
pub use history::*;
pub use input_decoder::*;
pub use line_editor::*;
