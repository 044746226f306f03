// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{self, Write};

use crossterm::{QueueableCommand,
                cursor::{MoveLeft, MoveRight},
                style::Print,
                terminal::{Clear, ClearType}};

use crate::{CommandLine, History, InputEvent, ok};

/// What the caller has to act on after a key event. `None` from
/// [`LineEditor::apply_event_and_render`] means the key was fully handled here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEditorEvent {
    /// Enter was pressed. The buffer has been reset and the line stored in history.
    Submitted(String),
    /// Ctrl-C discarded the line. The prompt has already been reprinted.
    Interrupted,
    /// Tab was pressed. The buffer is unchanged.
    AutocompleteRequested,
}

/// Owns the prompt, the in-progress [`CommandLine`] and the [`History`]. Every mutation
/// repaints the whole line: carriage return, erase to end, prompt, buffer, then move
/// the terminal cursor back from the end to the cursor index.
#[derive(Debug, Clone, Default)]
pub struct LineEditor {
    pub prompt: String,
    pub line: CommandLine,
    pub history: History,
}

fn to_u16(it: usize) -> u16 { u16::try_from(it).unwrap_or(u16::MAX) }

impl LineEditor {
    #[must_use]
    pub fn new(prompt: impl Into<String>, history: History) -> Self {
        Self {
            prompt: prompt.into(),
            line: CommandLine::default(),
            history,
        }
    }

    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn render_and_flush(&self, term: &mut dyn Write) -> io::Result<()> {
        term.queue(Print("\r"))?
            .queue(Clear(ClearType::UntilNewLine))?
            .queue(Print(&self.prompt))?
            .queue(Print(self.line.as_str()))?;
        let back = self.line.width_after_cursor();
        if back > 0 {
            term.queue(MoveLeft(to_u16(back)))?;
        }
        term.flush()
    }

    /// Print the prompt and the current buffer, starting a new line first unless the
    /// terminal is already at column 0.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn render_prompt(&self, term: &mut dyn Write, at_line_start: bool) -> io::Result<()> {
        if !at_line_start {
            term.queue(Print("\r\n"))?;
        }
        self.render_and_flush(term)
    }

    /// Append completion text at the end of the buffer. When the cursor is already at the
    /// end only the new text is echoed.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn append_completion(&mut self, text: &str, term: &mut dyn Write) -> io::Result<()> {
        if self.line.cursor() == self.line.len() {
            self.line.insert_str(text);
            term.queue(Print(text))?;
            return term.flush();
        }
        let mut buffer = self.line.as_str().to_string();
        buffer.push_str(text);
        self.line.set(buffer);
        self.render_and_flush(term)
    }

    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn apply_event_and_render(
        &mut self,
        event: &InputEvent,
        term: &mut dyn Write,
    ) -> io::Result<Option<LineEditorEvent>> {
        match event {
            InputEvent::Enter => handle_enter(self, term),
            InputEvent::CtrlC => handle_ctrl_c(self, term),
            InputEvent::Tab => Ok(Some(LineEditorEvent::AutocompleteRequested)),
            InputEvent::Backspace => handle_backspace(self, term),
            InputEvent::Left => handle_move(self, term, CommandLine::move_left, false),
            InputEvent::Right => handle_move(self, term, CommandLine::move_right, true),
            InputEvent::WordLeft => handle_move(self, term, CommandLine::move_word_left, false),
            InputEvent::WordRight => handle_move(self, term, CommandLine::move_word_right, true),
            InputEvent::Up => handle_up(self, term),
            InputEvent::Down => handle_down(self, term),
            InputEvent::Char(ch) => handle_insert(self, &ch.to_string(), term),
            InputEvent::Text(text) => handle_insert(self, text, term),
            InputEvent::Escape | InputEvent::Unrecognized(_) => Ok(None),
        }
    }
}

fn handle_enter(
    editor: &mut LineEditor,
    term: &mut dyn Write,
) -> io::Result<Option<LineEditorEvent>> {
    term.queue(Print("\r\n"))?;
    term.flush()?;
    let line = editor.line.take();
    editor.history.push(&line);
    ok!(Some(LineEditorEvent::Submitted(line)))
}

fn handle_ctrl_c(
    editor: &mut LineEditor,
    term: &mut dyn Write,
) -> io::Result<Option<LineEditorEvent>> {
    term.queue(Print("^C\r\n"))?;
    editor.line.take();
    editor.history.reset_index();
    editor.render_and_flush(term)?;
    ok!(Some(LineEditorEvent::Interrupted))
}

fn handle_backspace(
    editor: &mut LineEditor,
    term: &mut dyn Write,
) -> io::Result<Option<LineEditorEvent>> {
    if editor.line.backspace() {
        editor.render_and_flush(term)?;
    }
    ok!(None)
}

fn handle_insert(
    editor: &mut LineEditor,
    text: &str,
    term: &mut dyn Write,
) -> io::Result<Option<LineEditorEvent>> {
    editor.line.insert_str(text);
    editor.render_and_flush(term)?;
    ok!(None)
}

fn handle_move(
    editor: &mut LineEditor,
    term: &mut dyn Write,
    movement: fn(&mut CommandLine) -> usize,
    forward: bool,
) -> io::Result<Option<LineEditorEvent>> {
    let distance = to_u16(movement(&mut editor.line));
    if distance > 0 {
        if forward {
            term.queue(MoveRight(distance))?;
        } else {
            term.queue(MoveLeft(distance))?;
        }
        term.flush()?;
    }
    ok!(None)
}

fn handle_up(
    editor: &mut LineEditor,
    term: &mut dyn Write,
) -> io::Result<Option<LineEditorEvent>> {
    if let Some(entry) = editor.history.older(editor.line.as_str()) {
        editor.line.set(entry);
        editor.render_and_flush(term)?;
    }
    ok!(None)
}

fn handle_down(
    editor: &mut LineEditor,
    term: &mut dyn Write,
) -> io::Result<Option<LineEditorEvent>> {
    if let Some(entry) = editor.history.newer() {
        editor.line.set(entry);
        editor.render_and_flush(term)?;
    }
    ok!(None)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{StdoutMock, decode};

    fn type_keys(editor: &mut LineEditor, term: &mut StdoutMock, keys: &[&str]) -> Vec<LineEditorEvent> {
        keys.iter()
            .filter_map(|raw| editor.apply_event_and_render(&decode(raw), term).unwrap())
            .collect()
    }

    #[test]
    fn test_typing_repaints_full_line() {
        let mut stdout_mock = StdoutMock::default();
        let mut editor = LineEditor::new("/ $ ", History::default());

        type_keys(&mut editor, &mut stdout_mock, &["l", "s"]);

        assert_eq!(editor.line.as_str(), "ls");
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "\r\x1b[K/ $ l\r\x1b[K/ $ ls"
        );
    }

    #[test]
    fn test_insert_in_middle_moves_cursor_back() {
        let mut stdout_mock = StdoutMock::default();
        let mut editor = LineEditor::new("$ ", History::default());
        type_keys(&mut editor, &mut stdout_mock, &["a", "c", "\x1b[D"]);
        stdout_mock.clear();

        type_keys(&mut editor, &mut stdout_mock, &["b"]);

        assert_eq!(editor.line.as_str(), "abc");
        assert_eq!(editor.line.cursor(), 2);
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "\r\x1b[K$ abc\x1b[1D"
        );
    }

    #[test]
    fn test_word_jump_emits_offset() {
        let mut stdout_mock = StdoutMock::default();
        let mut editor = LineEditor::new("$ ", History::default());
        type_keys(&mut editor, &mut stdout_mock, &["git commit  "]);
        stdout_mock.clear();

        type_keys(&mut editor, &mut stdout_mock, &["\x1b[1;3D"]);

        assert_eq!(editor.line.cursor(), 4);
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "\x1b[8D");
    }

    #[test]
    fn test_submit_records_history_and_resets() {
        let mut stdout_mock = StdoutMock::default();
        let mut editor = LineEditor::new("$ ", History::default());

        let events = type_keys(&mut editor, &mut stdout_mock, &["ls", "\r", "   ", "\r", "pwd", "\r"]);

        assert_eq!(
            events,
            vec![
                LineEditorEvent::Submitted("ls".into()),
                LineEditorEvent::Submitted("   ".into()),
                LineEditorEvent::Submitted("pwd".into()),
            ]
        );
        assert_eq!(editor.history.len(), 2);
        assert_eq!(editor.history.index(), 2);
        assert!(editor.line.is_empty());
    }

    #[test]
    fn test_history_browsing_restores_live_buffer() {
        let mut stdout_mock = StdoutMock::default();
        let mut editor = LineEditor::new("$ ", History::default());
        type_keys(&mut editor, &mut stdout_mock, &["ls", "\r", "cd /", "\r", "gi"]);

        type_keys(&mut editor, &mut stdout_mock, &["\x1b[A"]);
        assert_eq!(editor.line.as_str(), "cd /");
        type_keys(&mut editor, &mut stdout_mock, &["\x1b[A", "\x1b[A"]);
        assert_eq!(editor.line.as_str(), "ls");
        type_keys(&mut editor, &mut stdout_mock, &["\x1b[B", "\x1b[B"]);
        assert_eq!(editor.line.as_str(), "gi");
        type_keys(&mut editor, &mut stdout_mock, &["\x1b[B"]);
        assert_eq!(editor.line.as_str(), "gi");
    }

    #[test]
    fn test_ctrl_c_discards_and_reprints_prompt() {
        let mut stdout_mock = StdoutMock::default();
        let mut editor = LineEditor::new("$ ", History::default());
        type_keys(&mut editor, &mut stdout_mock, &["ls", "\r", "rm -rf", "\x1b[A"]);
        stdout_mock.clear();

        let events = type_keys(&mut editor, &mut stdout_mock, &["\x03"]);

        assert_eq!(events, vec![LineEditorEvent::Interrupted]);
        assert!(editor.line.is_empty());
        assert_eq!(editor.history.index(), 1);
        assert_eq!(editor.history.entries(), &["ls".to_string()]);
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "^C\r\n\r\x1b[K$ ");
    }

    #[test]
    fn test_append_completion_echoes_only_new_text() {
        let mut stdout_mock = StdoutMock::default();
        let mut editor = LineEditor::new("$ ", History::default());
        type_keys(&mut editor, &mut stdout_mock, &["l"]);
        stdout_mock.clear();

        editor.append_completion("s", &mut stdout_mock).unwrap();

        assert_eq!(editor.line.as_str(), "ls");
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "s");
    }

    #[test]
    fn test_tab_and_unknown_keys() {
        let mut stdout_mock = StdoutMock::default();
        let mut editor = LineEditor::new("$ ", History::default());
        let events = type_keys(&mut editor, &mut stdout_mock, &["\t", "\x1b[1;5D", "\x1b"]);
        assert_eq!(events, vec![LineEditorEvent::AutocompleteRequested]);
        assert!(stdout_mock.get_copy_of_buffer().is_empty());
    }
}
