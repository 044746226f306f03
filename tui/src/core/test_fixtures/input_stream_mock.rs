// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::Duration;

use async_stream::stream;

use crate::{PinnedInputStream, RawInput};

pub fn gen_input_stream<T>(generator_vec: Vec<T>) -> PinnedInputStream<T>
where
    T: Send + Sync + 'static,
{
    let it = stream! {
        for item in generator_vec {
            yield item;
        }
    };
    Box::pin(it)
}

pub fn gen_input_stream_with_delay<T>(
    generator_vec: Vec<T>,
    delay: Duration,
) -> PinnedInputStream<T>
where
    T: Send + Sync + 'static,
{
    let it = stream! {
        for item in generator_vec {
            tokio::time::sleep(delay).await;
            yield item;
        }
    };
    Box::pin(it)
}

/// Escape sequences that [`raw_keystrokes`] keeps whole. `ESC b` and `ESC f` are left
/// out so tests can type Escape followed by a letter.
const WHOLE_SEQUENCES: &[&str] = &[
    "\x1b[1;3D",
    "\x1b[1;3C",
    "\x1b[A",
    "\x1b[B",
    "\x1b[C",
    "\x1b[D",
];

/// Turn typed text into the raw input units a terminal would deliver: one unit per
/// character or arrow key sequence, with `\r` for Enter.
#[must_use]
pub fn raw_keystrokes(text: &str) -> Vec<RawInput> {
    let mut acc = vec![];
    let mut rest = text;
    while let Some(ch) = rest.chars().next() {
        if let Some(sequence) = WHOLE_SEQUENCES.iter().find(|it| rest.starts_with(**it)) {
            acc.push((*sequence).to_string());
            rest = &rest[sequence.len()..];
            continue;
        }
        acc.push(if ch == '\n' { "\r".to_string() } else { ch.to_string() });
        rest = &rest[ch.len_utf8()..];
    }
    acc
}
