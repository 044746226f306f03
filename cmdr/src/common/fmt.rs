// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::Display;

use crossterm::style::Stylize;

/// Text for additions and the current branch.
pub fn green(arg_text: impl Display) -> String { arg_text.to_string().green().to_string() }

/// Text for unstaged changes and detached heads.
pub fn red(arg_text: impl Display) -> String { arg_text.to_string().red().to_string() }

/// Text for commit hashes and tags.
pub fn yellow(arg_text: impl Display) -> String { arg_text.to_string().yellow().to_string() }

const BYTE_UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// Format a byte count with decimal (1000 based) units and three significant digits,
/// eg: `1337` is `1.34 kB`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes_human(bytes: u64) -> String {
    if bytes < 1000 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit_index = 0;
    while value >= 1000.0 && unit_index < BYTE_UNITS.len() - 1 {
        value /= 1000.0;
        unit_index += 1;
    }

    let decimals = if value >= 100.0 {
        0
    } else if value >= 10.0 {
        1
    } else {
        2
    };
    let number = format!("{value:.decimals$}");
    let number = if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number.as_str()
    };
    format!("{number} {unit}", unit = BYTE_UNITS[unit_index])
}
