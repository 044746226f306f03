// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Caret position. `col` is a char index into the line and may equal the line length
/// (one past the last char).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Caret {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Lines of text plus the caret, the dirty flag and the vertical scroll offset.
///
/// Invariants: there is always at least one line, the caret row is a valid line index,
/// and the caret col never exceeds the length of its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorDocument {
    lines: Vec<String>,
    pub caret: Caret,
    pub dirty: bool,
    pub scroll_offset: usize,
}

impl Default for EditorDocument {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            caret: Caret::default(),
            dirty: false,
            scroll_offset: 0,
        }
    }
}

fn char_len(line: &str) -> usize { line.chars().count() }

fn byte_index(line: &str, char_index: usize) -> usize {
    line.char_indices()
        .nth(char_index)
        .map_or(line.len(), |(index, _)| index)
}

impl EditorDocument {
    /// Split `content` on `\n`. Joining the lines back with `\n` gives `content` again.
    #[must_use]
    pub fn from_content(content: &str) -> Self {
        Self {
            lines: content.split('\n').map(ToString::to_string).collect(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[String] { &self.lines }

    #[must_use]
    pub fn content(&self) -> String { self.lines.join("\n") }

    #[must_use]
    pub fn line_count(&self) -> usize { self.lines.len() }

    #[must_use]
    pub fn current_line(&self) -> &str { &self.lines[self.caret.row] }

    fn current_line_len(&self) -> usize { char_len(self.current_line()) }

    pub fn move_caret(&mut self, direction: CaretDirection) {
        match direction {
            CaretDirection::Left => {
                self.caret.col = self.caret.col.saturating_sub(1);
            }
            CaretDirection::Right => {
                if self.caret.col < self.current_line_len() {
                    self.caret.col += 1;
                }
            }
            CaretDirection::Up => {
                if self.caret.row > 0 {
                    self.caret.row -= 1;
                    self.clamp_caret_col();
                }
            }
            CaretDirection::Down => {
                if self.caret.row + 1 < self.lines.len() {
                    self.caret.row += 1;
                    self.clamp_caret_col();
                }
            }
        }
    }

    fn clamp_caret_col(&mut self) { self.caret.col = self.caret.col.min(self.current_line_len()); }

    pub fn insert_chunk_at_caret(&mut self, chunk: &str) {
        let Caret { row, col } = self.caret;
        let line = &mut self.lines[row];
        line.insert_str(byte_index(line, col), chunk);
        self.caret.col += char_len(chunk);
        self.dirty = true;
    }

    /// Split the current line at the caret. The caret moves to the start of the new line.
    pub fn insert_new_line_at_caret(&mut self) {
        let Caret { row, col } = self.caret;
        let line = &mut self.lines[row];
        let rest = line.split_off(byte_index(line, col));
        self.lines.insert(row + 1, rest);
        self.caret = Caret { row: row + 1, col: 0 };
        self.dirty = true;
    }

    /// Delete the char before the caret. At col 0 join the current line onto the end of
    /// the previous one.
    pub fn backspace_at_caret(&mut self) {
        let Caret { row, col } = self.caret;
        if col > 0 {
            let line = &mut self.lines[row];
            line.remove(byte_index(line, col - 1));
            self.caret.col -= 1;
            self.dirty = true;
        } else if row > 0 {
            let removed = self.lines.remove(row);
            let previous = &mut self.lines[row - 1];
            self.caret = Caret {
                row: row - 1,
                col: char_len(previous),
            };
            previous.push_str(&removed);
            self.dirty = true;
        }
    }

    /// Delete the char under the caret. If that was the last char, the caret steps back
    /// onto the new last char.
    pub fn delete_at_caret(&mut self) {
        let Caret { row, col } = self.caret;
        let line = &mut self.lines[row];
        if col >= char_len(line) {
            return;
        }
        line.remove(byte_index(line, col));
        if self.caret.col >= char_len(line) && self.caret.col > 0 {
            self.caret.col -= 1;
        }
        self.dirty = true;
    }

    /// Remove the current line. The document never becomes empty, it collapses to a
    /// single empty line instead. The caret goes to col 0.
    pub fn delete_line_at_caret(&mut self) {
        self.lines.remove(self.caret.row);
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.caret.row = self.caret.row.min(self.lines.len() - 1);
        self.caret.col = 0;
        self.dirty = true;
    }

    /// Search backwards for `query`: from the line above the caret up to the first line,
    /// then wrapping from the last line down to the caret's line. Moves the caret to the
    /// first match and returns it.
    pub fn search_backward(&mut self, query: &str) -> Option<Caret> {
        let row = self.caret.row;
        let rows_above = (0..row).rev();
        let rows_wrapped = (row..self.lines.len()).rev();
        let found = rows_above.chain(rows_wrapped).find_map(|row| {
            let line = &self.lines[row];
            line.find(query).map(|byte| Caret {
                row,
                col: char_len(&line[..byte]),
            })
        })?;
        self.caret = found;
        Some(found)
    }

    /// Keep the caret row inside a viewport of `viewport_rows` lines.
    pub fn scroll_to_caret(&mut self, viewport_rows: usize) {
        let viewport_rows = viewport_rows.max(1);
        if self.caret.row < self.scroll_offset {
            self.scroll_offset = self.caret.row;
        } else if self.caret.row >= self.scroll_offset + viewport_rows {
            self.scroll_offset = self.caret.row + 1 - viewport_rows;
        }
    }
}
