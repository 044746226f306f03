// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{RawInput, TerminalSize};

/// What the binary's crossterm event stream turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalInput {
    Raw(RawInput),
    Resize(TerminalSize),
}

/// Convert a crossterm event back into the raw unit that a byte oriented terminal
/// would have sent, so that the rest of the shell (and any capture owner, like a remote
/// shell) sees one input vocabulary.
#[must_use]
pub fn terminal_input_from_crossterm(event: Event) -> Option<TerminalInput> {
    match event {
        Event::Key(key_event) => raw_input_from_key_event(key_event).map(TerminalInput::Raw),
        Event::Paste(text) => Some(TerminalInput::Raw(text)),
        Event::Resize(cols, rows) => Some(TerminalInput::Resize(TerminalSize::new(cols, rows))),
        _ => None,
    }
}

fn raw_input_from_key_event(key_event: KeyEvent) -> Option<RawInput> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    let alt = key_event.modifiers.contains(KeyModifiers::ALT);
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    let it = match key_event.code {
        KeyCode::Char(ch) if ctrl => {
            let lower = ch.to_ascii_lowercase();
            if !lower.is_ascii_lowercase() {
                return None;
            }
            // Ctrl-A is 0x01 ... Ctrl-Z is 0x1a.
            char::from(lower as u8 - b'a' + 1).to_string()
        }
        KeyCode::Char('b') if alt => "\x1bb".into(),
        KeyCode::Char('f') if alt => "\x1bf".into(),
        KeyCode::Char(ch) => ch.to_string(),
        KeyCode::Enter => "\r".into(),
        KeyCode::Backspace => "\x7f".into(),
        KeyCode::Tab => "\t".into(),
        KeyCode::Esc => "\x1b".into(),
        KeyCode::Up => "\x1b[A".into(),
        KeyCode::Down => "\x1b[B".into(),
        KeyCode::Right if alt => "\x1b[1;3C".into(),
        KeyCode::Left if alt => "\x1b[1;3D".into(),
        KeyCode::Right => "\x1b[C".into(),
        KeyCode::Left => "\x1b[D".into(),
        _ => return None,
    };
    Some(it)
}
