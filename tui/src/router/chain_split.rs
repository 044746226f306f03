// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Sequences sub-commands with logical-AND semantics.
pub const CHAIN_OPERATOR: &str = "&&";

/// Split a submitted line at every `&&` that is not inside matching single or double
/// quotes. Sub-commands are trimmed and empty ones dropped. Quote characters are kept,
/// they belong to the sub-command text.
#[must_use]
pub fn split_chain(line: &str) -> Vec<String> {
    let mut sub_commands = vec![];
    let mut current = String::new();
    let mut open_quote: Option<char> = None;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match open_quote {
            Some(quote) if ch == quote => open_quote = None,
            Some(_) => {}
            None if ch == '\'' || ch == '"' => open_quote = Some(ch),
            None if ch == '&' && chars.peek() == Some(&'&') => {
                chars.next();
                sub_commands.push(std::mem::take(&mut current));
                continue;
            }
            None => {}
        }
        current.push(ch);
    }
    sub_commands.push(current);

    sub_commands
        .into_iter()
        .map(|it| it.trim().to_string())
        .filter(|it| !it.is_empty())
        .collect()
}

/// Split a sub-command on whitespace into its command name and arguments.
#[must_use]
pub fn tokenize(sub_command: &str) -> Vec<String> {
    sub_command.split_whitespace().map(ToString::to_string).collect()
}
