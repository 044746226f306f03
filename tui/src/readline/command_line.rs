// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use unicode_width::UnicodeWidthStr;

/// The in-progress command. `cursor` is a char index and always satisfies
/// `0 <= cursor <= len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    buffer: String,
    cursor: usize,
}

impl CommandLine {
    #[must_use]
    pub fn new(buffer: impl Into<String>) -> Self {
        let buffer = buffer.into();
        let cursor = buffer.chars().count();
        Self { buffer, cursor }
    }

    #[must_use]
    pub fn as_str(&self) -> &str { &self.buffer }

    #[must_use]
    pub fn cursor(&self) -> usize { self.cursor }

    /// Length in chars.
    #[must_use]
    pub fn len(&self) -> usize { self.buffer.chars().count() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }

    fn byte_index(&self, char_index: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_index)
            .map_or(self.buffer.len(), |(it, _)| it)
    }

    fn char_at(&self, char_index: usize) -> Option<char> { self.buffer.chars().nth(char_index) }

    /// Display width of the text right of the cursor. This is how far the terminal
    /// cursor has to move back after the whole line is written.
    #[must_use]
    pub fn width_after_cursor(&self) -> usize {
        self.buffer[self.byte_index(self.cursor)..].width()
    }

    pub fn insert_str(&mut self, text: &str) {
        let at = self.byte_index(self.cursor);
        self.buffer.insert_str(at, text);
        self.cursor += text.chars().count();
    }

    /// Delete the char before the cursor. Returns false at column 0.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.buffer.remove(at);
        true
    }

    /// Returns the display width moved over, 0 if the cursor didn't move.
    pub fn move_left(&mut self) -> usize {
        match self.cursor.checked_sub(1) {
            Some(new_cursor) => self.move_to(new_cursor),
            None => 0,
        }
    }

    /// Returns the display width moved over, 0 if the cursor didn't move.
    pub fn move_right(&mut self) -> usize {
        if self.cursor >= self.len() {
            return 0;
        }
        self.move_to(self.cursor + 1)
    }

    /// Skip the spaces left of the cursor, then the word before them. Returns the
    /// display width moved over.
    pub fn move_word_left(&mut self) -> usize {
        let mut it = self.cursor;
        while it > 0 && self.char_at(it - 1) == Some(' ') {
            it -= 1;
        }
        while it > 0 && self.char_at(it - 1).is_some_and(|ch| ch != ' ') {
            it -= 1;
        }
        self.move_to(it)
    }

    /// Skip the spaces right of the cursor, then the word after them. Returns the display
    /// width moved over.
    pub fn move_word_right(&mut self) -> usize {
        let len = self.len();
        let mut it = self.cursor;
        while it < len && self.char_at(it) == Some(' ') {
            it += 1;
        }
        while it < len && self.char_at(it).is_some_and(|ch| ch != ' ') {
            it += 1;
        }
        self.move_to(it)
    }

    fn move_to(&mut self, new_cursor: usize) -> usize {
        let (start, end) = if new_cursor < self.cursor {
            (new_cursor, self.cursor)
        } else {
            (self.cursor, new_cursor)
        };
        let distance = self.buffer[self.byte_index(start)..self.byte_index(end)].width();
        self.cursor = new_cursor;
        distance
    }

    /// Replace the whole buffer and put the cursor at the end.
    pub fn set(&mut self, buffer: impl Into<String>) { *self = Self::new(buffer); }

    /// Return the buffer and reset to empty.
    pub fn take(&mut self) -> String { std::mem::take(self).buffer }
}
