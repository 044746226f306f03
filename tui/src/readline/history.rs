// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::HISTORY_SIZE_MAX;

/// Submitted lines, oldest first, plus a browsing index in `[0, len]`. Index `len`
/// means "not browsing", and the in-progress line is stashed while browsing so Down
/// past the newest entry restores it. Stored entries never change once appended.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    index: usize,
    live_buffer: Option<String>,
    pub max_size: usize,
}

impl Default for History {
    fn default() -> Self { Self::new(HISTORY_SIZE_MAX) }
}

impl History {
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: vec![],
            index: 0,
            live_buffer: None,
            max_size: max_size.max(1),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[String] { &self.entries }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    #[must_use]
    pub fn index(&self) -> usize { self.index }

    /// Append a submitted line (blank lines are skipped) and stop browsing.
    pub fn push(&mut self, line: &str) {
        if !line.trim().is_empty() {
            self.entries.push(line.to_string());
            if self.entries.len() > self.max_size {
                self.entries.remove(0);
            }
        }
        self.reset_index();
    }

    /// Stop browsing: index back to the end, stash dropped.
    pub fn reset_index(&mut self) {
        self.index = self.entries.len();
        self.live_buffer = None;
    }

    /// Step to the previous entry. `current` is the buffer being edited, stashed when
    /// browsing starts. Returns `None` (no-op) at index 0.
    pub fn older(&mut self, current: &str) -> Option<String> {
        if self.index == 0 {
            return None;
        }
        if self.index == self.entries.len() {
            self.live_buffer = Some(current.to_string());
        }
        self.index -= 1;
        Some(self.entries[self.index].clone())
    }

    /// Step to the next entry, or back to the stashed in-progress line. Returns `None`
    /// (no-op) when not browsing.
    pub fn newer(&mut self) -> Option<String> {
        if self.index >= self.entries.len() {
            return None;
        }
        self.index += 1;
        if self.index == self.entries.len() {
            return Some(self.live_buffer.take().unwrap_or_default());
        }
        Some(self.entries[self.index].clone())
    }
}
