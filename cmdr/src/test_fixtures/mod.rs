// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod builtin_fixtures;
pub mod fake_services;

// Re-export.
pub use builtin_fixtures::*;
pub use fake_services::*;
