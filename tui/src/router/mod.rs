// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod alias_table;
pub mod cancel_slot;
pub mod chain_split;
pub mod command_handler;
pub mod command_registry;
pub mod command_router;

// Re-export.
pub use alias_table::*;
pub use cancel_slot::*;
pub use chain_split::*;
pub use command_handler::*;
pub use command_registry::*;
pub use command_router::*;
