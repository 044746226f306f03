// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Full-screen modal text editor. [`ModalEditor`] is a pure state machine: it consumes
//! [`crate::InputEvent`]s, mutates its [`EditorDocument`] and hands back an
//! [`EditorAction`] for anything that needs the outside world (writing the file,
//! quitting). [`run_modal_editor`] wires it to the terminal through the capture slot.

// Attach sources.
pub mod editor_document;
pub mod editor_mode;
pub mod editor_render;
pub mod editor_runner;
pub mod ex_command;
pub mod modal_editor;

// Re-export.
pub use editor_document::*;
pub use editor_mode::*;
pub use editor_render::*;
pub use editor_runner::*;
pub use ex_command::*;
pub use modal_editor::*;
