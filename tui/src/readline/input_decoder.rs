// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Semantic key event decoded from one raw input unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Char(char),
    /// More than one printable character delivered at once (a paste).
    Text(String),
    Enter,
    Backspace,
    Tab,
    Escape,
    CtrlC,
    Up,
    Down,
    Left,
    Right,
    WordLeft,
    WordRight,
    /// Anything not in the table, passed through unmodified.
    Unrecognized(String),
}

/// Printable means visible ASCII or anything from U+00A0 up.
#[must_use]
pub fn is_printable(ch: char) -> bool { (' '..='~').contains(&ch) || ch >= '\u{a0}' }

/// Decode a raw input unit. Escape sequences are matched as whole strings against a
/// fixed table, never parsed incrementally, so a partial sequence is simply
/// [`InputEvent::Unrecognized`].
#[must_use]
pub fn decode(raw: &str) -> InputEvent {
    match raw {
        "\r" | "\n" | "\r\n" => InputEvent::Enter,
        "\x7f" | "\x08" => InputEvent::Backspace,
        "\t" => InputEvent::Tab,
        "\x1b" => InputEvent::Escape,
        "\x03" => InputEvent::CtrlC,
        "\x1b[A" | "\x1bOA" => InputEvent::Up,
        "\x1b[B" | "\x1bOB" => InputEvent::Down,
        "\x1b[C" | "\x1bOC" => InputEvent::Right,
        "\x1b[D" | "\x1bOD" => InputEvent::Left,
        "\x1b[1;3D" | "\x1bb" => InputEvent::WordLeft,
        "\x1b[1;3C" | "\x1bf" => InputEvent::WordRight,
        _ => decode_text(raw),
    }
}

fn decode_text(raw: &str) -> InputEvent {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if is_printable(ch) => InputEvent::Char(ch),
        (Some(_), Some(_)) if raw.chars().all(is_printable) => InputEvent::Text(raw.into()),
        _ => InputEvent::Unrecognized(raw.into()),
    }
}
