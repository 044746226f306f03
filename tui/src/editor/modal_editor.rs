// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::PathBuf;

use crate::{CaretDirection, EditorAction, EditorDocument, EditorMode, ExCommand, InputEvent,
            PendingOperator, TerminalSize, is_printable};

pub const MSG_INSERT: &str = "-- INSERT --";
pub const MSG_NEW_FILE: &str = "New File";
pub const MSG_NO_FILE_NAME: &str = "No file name";
pub const MSG_UNSAVED_CHANGES: &str = "No write since last change (add ! to override)";

/// The file an editor session reads from and writes to. `display_name` is what the
/// user typed, `path` is where it resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundFile {
    pub display_name: String,
    pub path: PathBuf,
}

/// Modal editor state machine. All input goes through [`ModalEditor::handle_input`],
/// which branches on the current [`EditorMode`].
#[derive(Debug, Clone)]
pub struct ModalEditor {
    pub doc: EditorDocument,
    pub mode: EditorMode,
    pub file: Option<BoundFile>,
    pub message: String,
    pub show_line_numbers: bool,
    pub size: TerminalSize,
}

impl ModalEditor {
    /// Editor with an empty document and no file.
    #[must_use]
    pub fn new(size: TerminalSize) -> Self {
        Self {
            doc: EditorDocument::default(),
            mode: EditorMode::default(),
            file: None,
            message: String::new(),
            show_line_numbers: false,
            size,
        }
    }

    /// Editor bound to `file`. `content` is `None` when the file does not exist yet.
    #[must_use]
    pub fn open(file: BoundFile, content: Option<&str>, size: TerminalSize) -> Self {
        let mut it = Self::new(size);
        match content {
            Some(content) => it.doc = EditorDocument::from_content(content),
            None => it.message = MSG_NEW_FILE.into(),
        }
        it.file = Some(file);
        it
    }

    /// Rows available for text, the last row is the status line.
    #[must_use]
    pub fn text_rows(&self) -> usize { usize::from(self.size.rows.saturating_sub(1)).max(1) }

    pub fn set_size(&mut self, size: TerminalSize) {
        self.size = size;
        self.doc.scroll_to_caret(self.text_rows());
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> EditorAction {
        let action = match &mut self.mode {
            EditorMode::Normal { pending } => {
                let pending = pending.take();
                self.handle_normal_input(event, pending)
            }
            EditorMode::Insert => self.handle_insert_input(event),
            EditorMode::Command { buffer } => {
                let buffer = std::mem::take(buffer);
                self.handle_command_input(event, buffer)
            }
        };
        self.doc.scroll_to_caret(self.text_rows());
        action
    }

    /// Report the outcome of an [`EditorAction::Write`].
    pub fn on_write_complete(&mut self, result: Result<(), String>, quit_after: bool) -> EditorAction {
        match result {
            Ok(()) => {
                self.doc.dirty = false;
                if let Some(file) = &self.file {
                    self.message = format!("\"{}\" written", file.display_name);
                }
                tracing::debug!(message = "editor write complete", quit_after);
                if quit_after {
                    EditorAction::Quit
                } else {
                    EditorAction::Continue
                }
            }
            Err(error) => {
                self.message = error;
                EditorAction::Continue
            }
        }
    }

    fn handle_normal_input(
        &mut self,
        event: &InputEvent,
        pending: Option<PendingOperator>,
    ) -> EditorAction {
        match event {
            InputEvent::Char('i') => {
                self.mode = EditorMode::Insert;
                self.message = MSG_INSERT.into();
            }
            InputEvent::Char(ch @ (':' | '?')) => {
                self.mode = EditorMode::Command {
                    buffer: ch.to_string(),
                };
            }
            InputEvent::Char('h') | InputEvent::Left => self.doc.move_caret(CaretDirection::Left),
            InputEvent::Char('l') | InputEvent::Right => {
                self.doc.move_caret(CaretDirection::Right);
            }
            InputEvent::Char('j') | InputEvent::Down => self.doc.move_caret(CaretDirection::Down),
            InputEvent::Char('k') | InputEvent::Up => self.doc.move_caret(CaretDirection::Up),
            InputEvent::Char('x') => self.doc.delete_at_caret(),
            InputEvent::Char('d') => match pending {
                Some(PendingOperator::Delete) => self.doc.delete_line_at_caret(),
                None => {
                    self.mode = EditorMode::Normal {
                        pending: Some(PendingOperator::Delete),
                    };
                }
            },
            // Anything else just drops the pending operator.
            _ => {}
        }
        EditorAction::Continue
    }

    fn handle_insert_input(&mut self, event: &InputEvent) -> EditorAction {
        match event {
            InputEvent::Up => self.doc.move_caret(CaretDirection::Up),
            InputEvent::Down => self.doc.move_caret(CaretDirection::Down),
            InputEvent::Left => self.doc.move_caret(CaretDirection::Left),
            InputEvent::Right => self.doc.move_caret(CaretDirection::Right),
            InputEvent::Escape => {
                self.mode = EditorMode::default();
                self.message.clear();
                self.doc.move_caret(CaretDirection::Left);
            }
            InputEvent::Enter => self.doc.insert_new_line_at_caret(),
            InputEvent::Backspace => self.doc.backspace_at_caret(),
            InputEvent::Char(ch) if is_printable(*ch) => {
                self.doc.insert_chunk_at_caret(&ch.to_string());
            }
            InputEvent::Text(text) => {
                let chunk = text.chars().filter(|it| is_printable(*it)).collect::<String>();
                if !chunk.is_empty() {
                    self.doc.insert_chunk_at_caret(&chunk);
                }
            }
            _ => {}
        }
        EditorAction::Continue
    }

    /// `buffer` has already been taken out of the mode. Putting it back keeps the editor
    /// in COMMAND mode.
    fn handle_command_input(&mut self, event: &InputEvent, mut buffer: String) -> EditorAction {
        match event {
            InputEvent::Escape => {
                self.mode = EditorMode::default();
                self.message.clear();
                EditorAction::Continue
            }
            InputEvent::Enter => {
                self.mode = EditorMode::default();
                let mut chars = buffer.chars();
                match chars.next() {
                    Some(':') => self.execute_ex_command(ExCommand::parse(chars.as_str())),
                    Some('?') => {
                        self.execute_search(chars.as_str());
                        EditorAction::Continue
                    }
                    _ => EditorAction::Continue,
                }
            }
            InputEvent::Backspace => {
                if buffer.chars().count() > 1 {
                    buffer.pop();
                    self.mode = EditorMode::Command { buffer };
                } else {
                    self.mode = EditorMode::default();
                }
                EditorAction::Continue
            }
            InputEvent::Char(ch) => {
                buffer.push(*ch);
                self.mode = EditorMode::Command { buffer };
                EditorAction::Continue
            }
            InputEvent::Text(text) => {
                buffer.push_str(text);
                self.mode = EditorMode::Command { buffer };
                EditorAction::Continue
            }
            _ => {
                self.mode = EditorMode::Command { buffer };
                EditorAction::Continue
            }
        }
    }

    fn execute_ex_command(&mut self, command: ExCommand) -> EditorAction {
        tracing::debug!(message = "ex command", ?command);
        match command {
            ExCommand::Nothing => {}
            ExCommand::Quit { force: false } if self.doc.dirty => {
                self.message = MSG_UNSAVED_CHANGES.into();
            }
            ExCommand::Quit { .. } => return EditorAction::Quit,
            ExCommand::Write | ExCommand::WriteQuit => {
                let quit_after = command == ExCommand::WriteQuit;
                match &self.file {
                    Some(file) => {
                        return EditorAction::Write {
                            path: file.path.clone(),
                            contents: self.doc.content(),
                            quit_after,
                        };
                    }
                    None => self.message = MSG_NO_FILE_NAME.into(),
                }
            }
            ExCommand::DeleteLine => self.doc.delete_line_at_caret(),
            ExCommand::SetLineNumbers(it) => self.show_line_numbers = it,
            ExCommand::Unknown(text) => self.message = format!("Not an editor command: {text}"),
        }
        EditorAction::Continue
    }

    fn execute_search(&mut self, query: &str) {
        if query.is_empty() {
            return;
        }
        // A hit shows the query with a `/`, whichever direction was searched.
        self.message = match self.doc.search_backward(query) {
            Some(_) => format!("/{query}"),
            None => format!("Pattern not found: {query}"),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Caret, decode, raw_keystrokes};

    fn bound_file() -> BoundFile {
        BoundFile {
            display_name: "notes.txt".into(),
            path: "/home/notes.txt".into(),
        }
    }

    /// Feed every keystroke, returning the last non [`EditorAction::Continue`] action.
    fn type_keys(editor: &mut ModalEditor, text: &str) -> EditorAction {
        let mut last = EditorAction::Continue;
        for raw in raw_keystrokes(text) {
            let action = editor.handle_input(&decode(&raw));
            if action != EditorAction::Continue {
                last = action;
            }
        }
        last
    }

    #[test]
    fn test_insert_then_write_quit() {
        let mut editor = ModalEditor::open(bound_file(), None, TerminalSize::default());
        assert_eq!(editor.message, MSG_NEW_FILE);

        assert_eq!(type_keys(&mut editor, "i"), EditorAction::Continue);
        assert_eq!(editor.mode, EditorMode::Insert);
        assert_eq!(editor.message, MSG_INSERT);

        type_keys(&mut editor, "hi\x1b");
        assert_eq!(editor.mode, EditorMode::default());
        assert_eq!(editor.doc.caret, Caret { row: 0, col: 1 });

        let action = type_keys(&mut editor, ":wq\n");
        assert_eq!(
            action,
            EditorAction::Write {
                path: "/home/notes.txt".into(),
                contents: "hi".into(),
                quit_after: true,
            }
        );
        assert_eq!(editor.on_write_complete(Ok(()), true), EditorAction::Quit);
        assert_eq!(editor.message, "\"notes.txt\" written");
        assert!(!editor.doc.dirty);
    }

    #[test]
    fn test_quit_refuses_when_dirty() {
        let mut editor = ModalEditor::new(TerminalSize::default());
        type_keys(&mut editor, "ia\x1b");
        assert_eq!(type_keys(&mut editor, ":q\n"), EditorAction::Continue);
        assert_eq!(editor.message, MSG_UNSAVED_CHANGES);
        assert_eq!(type_keys(&mut editor, ":q!\n"), EditorAction::Quit);
    }

    #[test]
    fn test_write_without_file_name() {
        let mut editor = ModalEditor::new(TerminalSize::default());
        assert_eq!(type_keys(&mut editor, ":w\n"), EditorAction::Continue);
        assert_eq!(editor.message, MSG_NO_FILE_NAME);
        assert_eq!(type_keys(&mut editor, ":wq!\n"), EditorAction::Continue);
        assert_eq!(editor.message, MSG_NO_FILE_NAME);
    }

    #[test]
    fn test_failed_write_keeps_editor_open() {
        let mut editor = ModalEditor::open(bound_file(), Some("x"), TerminalSize::default());
        type_keys(&mut editor, "x");
        assert_eq!(
            editor.on_write_complete(Err("permission denied".into()), true),
            EditorAction::Continue
        );
        assert_eq!(editor.message, "permission denied");
        assert!(editor.doc.dirty);
    }

    #[test]
    fn test_dd_and_pending_operator() {
        let mut editor = ModalEditor::open(bound_file(), Some("one\ntwo"), TerminalSize::default());

        // `d` then an unrelated key then `d` deletes nothing.
        type_keys(&mut editor, "djd");
        assert_eq!(editor.doc.lines().len(), 2);
        assert_eq!(editor.mode, EditorMode::Normal { pending: Some(PendingOperator::Delete) });

        type_keys(&mut editor, "d");
        assert_eq!(editor.doc.lines(), &["one".to_string()]);

        type_keys(&mut editor, "dd");
        assert_eq!(editor.doc.lines(), &[String::new()]);
        assert_eq!(editor.doc.caret, Caret::default());
    }

    #[test]
    fn test_ex_commands() {
        let mut editor = ModalEditor::open(bound_file(), Some("a\nb"), TerminalSize::default());
        type_keys(&mut editor, ":set nu\n");
        assert!(editor.show_line_numbers);
        type_keys(&mut editor, ":set nonu\n");
        assert!(!editor.show_line_numbers);
        type_keys(&mut editor, ":d\n");
        assert_eq!(editor.doc.lines(), &["b".to_string()]);
        type_keys(&mut editor, ":foo\n");
        assert_eq!(editor.message, "Not an editor command: foo");
    }

    #[test]
    fn test_search_wraps_to_last_match() {
        let mut editor = ModalEditor::open(bound_file(), Some("a\nb\na"), TerminalSize::default());
        type_keys(&mut editor, "?a\n");
        assert_eq!(editor.doc.caret, Caret { row: 2, col: 0 });
        assert_eq!(editor.message, "/a");

        type_keys(&mut editor, "?zz\n");
        assert_eq!(editor.message, "Pattern not found: zz");
    }

    #[test]
    fn test_command_mode_escape_and_backspace() {
        let mut editor = ModalEditor::new(TerminalSize::default());
        type_keys(&mut editor, ":wq");
        assert_eq!(editor.mode, EditorMode::Command { buffer: ":wq".into() });
        type_keys(&mut editor, "\x1b");
        assert_eq!(editor.mode, EditorMode::default());

        type_keys(&mut editor, ":q\x7f");
        assert_eq!(editor.mode, EditorMode::Command { buffer: ":".into() });
        type_keys(&mut editor, "\x7f");
        assert_eq!(editor.mode, EditorMode::default());
    }

    #[test]
    fn test_insert_mode_editing() {
        let mut editor = ModalEditor::new(TerminalSize::default());
        type_keys(&mut editor, "iab\x1b[D\ncd");
        assert_eq!(editor.doc.lines(), &["a".to_string(), "cdb".to_string()]);
        type_keys(&mut editor, "\x1b[D\x1b[D\x7f");
        assert_eq!(editor.doc.lines(), &["acdb".to_string()]);
        assert_eq!(editor.mode, EditorMode::Insert);
    }

    #[test]
    fn test_viewport_follows_caret() {
        let content = (1..=10).map(|it| it.to_string()).collect::<Vec<_>>().join("\n");
        let mut editor = ModalEditor::open(bound_file(), Some(&content), TerminalSize::new(20, 4));
        type_keys(&mut editor, "jjjjj");
        assert_eq!(editor.doc.scroll_offset, 3);
        type_keys(&mut editor, "kkkkk");
        assert_eq!(editor.doc.scroll_offset, 0);
    }
}
