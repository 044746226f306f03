// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod session_loop;
pub mod shell_context;

// Re-export.
pub use session_loop::*;
pub use shell_context::*;
