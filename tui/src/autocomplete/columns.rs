// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use unicode_width::UnicodeWidthStr;

use crate::CRLF;

/// Gap between columns.
const COLUMN_GUTTER: usize = 2;

/// Lay `items` out row-major in as many equal width columns as fit in `width`. Every
/// item is padded to the column width, and every row, the last included, ends in CRLF.
#[must_use]
pub fn print_in_columns(items: &[String], width: u16) -> String {
    let Some(longest) = items.iter().map(|it| it.width()).max() else {
        return String::new();
    };
    let col_width = longest + COLUMN_GUTTER;
    let cols = (usize::from(width) / col_width).max(1);

    let mut acc = String::new();
    for (index, item) in items.iter().enumerate() {
        acc.push_str(item);
        acc.push_str(&" ".repeat(col_width - item.width()));
        if (index + 1) % cols == 0 || index + 1 == items.len() {
            acc.push_str(CRLF);
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn strings(items: &[&str]) -> Vec<String> { items.iter().map(ToString::to_string).collect() }

    #[test]
    fn test_row_major_layout() {
        let items = strings(&["a", "bb", "ccc", "d", "e"]);
        // Column width 5, 12 / 5 = 2 columns.
        assert_eq!(
            print_in_columns(&items, 12),
            "a    bb   \r\nccc  d    \r\ne    \r\n"
        );
    }

    #[test]
    fn test_narrow_terminal_still_has_one_column() {
        let items = strings(&["alpha", "beta"]);
        assert_eq!(print_in_columns(&items, 3), "alpha  \r\nbeta   \r\n");
    }

    #[test]
    fn test_empty() {
        assert_eq!(print_in_columns(&[], 80), "");
    }
}
