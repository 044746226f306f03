// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::pin::Pin;

use futures_core::Stream;

/// Disambiguate the type of `StdMutex` from stdlib and tokio to avoid conflicts.
pub type StdMutex<T> = std::sync::Mutex<T>;

/// Raw input unit as delivered by the terminal: a single character, a pasted chunk, or
/// one complete escape sequence.
pub type RawInput = String;

/// Type alias for a pinned stream that is async safe. `T` is usually [`RawInput`].
pub type PinnedInputStream<T> = Pin<Box<dyn Stream<Item = T>>>;
