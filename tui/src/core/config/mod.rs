// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod ini_document;
pub mod shell_config;

// Re-export.
pub use ini_document::*;
pub use shell_config::*;
