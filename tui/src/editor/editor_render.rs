// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{self, Write};

use crossterm::{QueueableCommand,
                cursor::MoveTo,
                style::{Attribute, Print, ResetColor, SetAttribute},
                terminal::{Clear, ClearType}};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{CRLF, EditorMode, ModalEditor};

/// Shown on rows past the end of the document.
pub const EMPTY_ROW_GLYPH: &str = "~";
pub const NO_NAME: &str = "[No Name]";
/// Plain SGR 33 (yellow foreground) for line numbers.
pub const GUTTER_COLOR: &str = "\x1b[33m";

fn to_u16(it: usize) -> u16 { u16::try_from(it).unwrap_or(u16::MAX) }

/// Display width of the first `char_count` chars of `text`.
#[must_use]
pub fn width_of_prefix(text: &str, char_count: usize) -> usize {
    text.chars()
        .take(char_count)
        .map(|it| it.width().unwrap_or(0))
        .sum()
}

/// The part of `text` that lands in display columns `skip..skip + width`. A wide char
/// that straddles either edge is left out.
#[must_use]
pub fn slice_by_width(text: &str, skip: usize, width: usize) -> &str {
    let mut start = None;
    let mut end = text.len();
    let mut col = 0;
    for (index, ch) in text.char_indices() {
        if col >= skip && start.is_none() {
            start = Some(index);
        }
        let next_col = col + ch.width().unwrap_or(0);
        if next_col > skip + width {
            end = index;
            break;
        }
        col = next_col;
    }
    match start {
        Some(start) if start <= end => &text[start..end],
        _ => "",
    }
}

impl ModalEditor {
    /// Width of the line number gutter, including its trailing space. Zero when line
    /// numbers are off.
    #[must_use]
    pub fn gutter_width(&self) -> usize {
        if self.show_line_numbers {
            self.doc.line_count().to_string().len() + 1
        } else {
            0
        }
    }

    /// Status line text before padding.
    #[must_use]
    pub fn status_text(&self) -> String {
        match &self.mode {
            EditorMode::Command { buffer } => buffer.clone(),
            _ => {
                let file_name = self
                    .file
                    .as_ref()
                    .map_or(NO_NAME, |it| it.display_name.as_str());
                let caret = self.doc.caret;
                format!("{}  {file_name}  {},{}", self.message, caret.row + 1, caret.col + 1)
            }
        }
    }

    /// Repaint the whole screen: clear and home, the visible text rows, the status line
    /// in reverse video, then place the terminal cursor on the caret.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        out.queue(MoveTo(0, 0))?.queue(Clear(ClearType::All))?;

        let cols = usize::from(self.size.cols);
        let gutter_width = self.gutter_width();
        let text_width = cols.saturating_sub(gutter_width).max(1);
        let lines = self.doc.lines();

        // Lines are clipped to the screen, scrolled sideways just enough to show the caret.
        let caret = self.doc.caret;
        let caret_x = lines
            .get(caret.row)
            .map_or(0, |line| width_of_prefix(line, caret.col));
        let h_offset = caret_x.saturating_sub(text_width - 1);

        for row_index in self.doc.scroll_offset..self.doc.scroll_offset + self.text_rows() {
            let Some(line) = lines.get(row_index) else {
                out.queue(Print(EMPTY_ROW_GLYPH))?.queue(Print(CRLF))?;
                continue;
            };
            if gutter_width > 0 {
                let number = format!("{:>width$} ", row_index + 1, width = gutter_width - 1);
                out.queue(Print(GUTTER_COLOR))?
                    .queue(Print(number))?
                    .queue(ResetColor)?;
            }
            out.queue(Print(slice_by_width(line, h_offset, text_width)))?
                .queue(Print(CRLF))?;
        }

        let status = self.status_text();
        let status = slice_by_width(&status, 0, cols);
        let padding = cols.saturating_sub(status.width());
        out.queue(SetAttribute(Attribute::Reverse))?
            .queue(Print(status))?
            .queue(Print(" ".repeat(padding)))?
            .queue(SetAttribute(Attribute::Reset))?;

        out.queue(MoveTo(
            to_u16(gutter_width + caret_x - h_offset),
            to_u16(caret.row - self.doc.scroll_offset),
        ))?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{BoundFile, InputEvent, StdoutMock, TerminalSize};

    fn editor(content: &str, size: TerminalSize) -> ModalEditor {
        let file = BoundFile {
            display_name: "a.txt".into(),
            path: "/a.txt".into(),
        };
        ModalEditor::open(file, Some(content), size)
    }

    #[test]
    fn test_render_frame() {
        let editor = editor("hello\nworld", TerminalSize::new(20, 4));
        let mut stdout_mock = StdoutMock::new();
        editor.render(&mut stdout_mock).unwrap();

        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "\x1b[1;1H\x1b[2J\
             hello\r\nworld\r\n~\r\n\
             \x1b[7m  a.txt  1,1        \x1b[0m\
             \x1b[1;1H"
        );
    }

    #[test]
    fn test_render_gutter_and_scroll() {
        let content = (1..=12).map(|it| format!("line{it}")).collect::<Vec<_>>().join("\n");
        let mut editor = editor(&content, TerminalSize::new(30, 3));
        editor.show_line_numbers = true;
        for _ in 0..11 {
            editor.handle_input(&InputEvent::Char('j'));
        }
        editor.handle_input(&InputEvent::Char('l'));

        let mut stdout_mock = StdoutMock::new();
        editor.render(&mut stdout_mock).unwrap();
        let output = stdout_mock.get_copy_of_buffer_as_string();

        assert!(output.contains("\x1b[33m11 \x1b[0mline11\r\n"));
        assert!(output.contains("\x1b[33m12 \x1b[0mline12\r\n"));
        assert!(!output.contains("line10"));
        // Row 2 of the viewport, col 1 plus a 3 wide gutter.
        assert!(output.ends_with("\x1b[2;5H"));
    }

    #[test]
    fn test_long_line_is_clipped_and_scrolled_to_caret() {
        let mut editor = editor("0123456789abcdef\nxy", TerminalSize::new(10, 3));
        let mut stdout_mock = StdoutMock::new();
        editor.render(&mut stdout_mock).unwrap();
        let output = stdout_mock.get_copy_of_buffer_as_string();
        assert!(output.contains("\x1b[2J0123456789\r\nxy\r\n"));

        for _ in 0..12 {
            editor.handle_input(&InputEvent::Char('l'));
        }
        let mut stdout_mock = StdoutMock::new();
        editor.render(&mut stdout_mock).unwrap();
        let output = stdout_mock.get_copy_of_buffer_as_string();
        // Caret on 'c' (col 12) sits in the last screen column.
        assert!(output.contains("\x1b[2J3456789abc\r\n\r\n"));
        assert!(output.ends_with("\x1b[1;10H"));
    }

    #[test]
    fn test_caret_uses_display_width() {
        let mut editor = editor("漢字ab", TerminalSize::new(20, 3));
        editor.handle_input(&InputEvent::Char('l'));
        editor.handle_input(&InputEvent::Char('l'));

        let mut stdout_mock = StdoutMock::new();
        editor.render(&mut stdout_mock).unwrap();
        // Two wide chars before the caret put it at screen column 4.
        assert!(stdout_mock.get_copy_of_buffer_as_string().ends_with("\x1b[1;5H"));
    }

    #[test]
    fn test_slice_by_width() {
        assert_eq!(slice_by_width("hello", 0, 3), "hel");
        assert_eq!(slice_by_width("hello", 2, 10), "llo");
        assert_eq!(slice_by_width("ab", 5, 3), "");
        assert_eq!(slice_by_width("漢字ab", 0, 3), "漢");
        assert_eq!(width_of_prefix("漢字ab", 3), 5);
    }

    #[test]
    fn test_status_line_in_command_mode() {
        let mut editor = editor("", TerminalSize::default());
        editor.handle_input(&InputEvent::Char(':'));
        editor.handle_input(&InputEvent::Char('w'));
        assert_eq!(editor.status_text(), ":w");

        editor.handle_input(&InputEvent::Escape);
        editor.handle_input(&InputEvent::Char('i'));
        assert_eq!(editor.status_text(), "-- INSERT --  a.txt  1,1");
    }
}
