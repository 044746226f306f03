// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A line preserving INI document. `[section]` headers and `key = value` properties are
//! matched exactly (case-sensitive). Edits patch a single line, or append one, so
//! comments, blank lines and ordering survive a round trip untouched.

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
enum IniLine<'a> {
    Header(&'a str),
    Property { key: &'a str, value: &'a str },
    Other,
}

fn classify(line: &str) -> IniLine<'_> {
    let trimmed = line.trim();
    if trimmed.starts_with(';') || trimmed.starts_with('#') {
        return IniLine::Other;
    }
    if let Some(name) = trimmed.strip_prefix('[').and_then(|it| it.strip_suffix(']')) {
        return IniLine::Header(name.trim());
    }
    match trimmed.split_once('=') {
        Some((key, value)) => IniLine::Property {
            key: key.trim(),
            value: value.trim(),
        },
        None => IniLine::Other,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    lines: Vec<String>,
    trailing_newline: bool,
}

impl IniDocument {
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let trailing_newline = text.ends_with('\n');
        let lines = text
            .lines()
            .map(|it| it.strip_suffix('\r').unwrap_or(it).to_string())
            .collect();
        Self {
            lines,
            trailing_newline,
        }
    }

    /// Line range `[start, end)` of the properties of `section`. The empty section name
    /// addresses properties before the first header.
    fn section_range(&self, section: &str) -> Option<(usize, usize)> {
        let start = if section.is_empty() {
            0
        } else {
            self.lines
                .iter()
                .position(|it| classify(it) == IniLine::Header(section))?
                + 1
        };
        let end = self.lines[start..]
            .iter()
            .position(|it| matches!(classify(it), IniLine::Header(_)))
            .map_or(self.lines.len(), |offset| start + offset);
        Some((start, end))
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let (start, end) = self.section_range(section)?;
        self.lines[start..end]
            .iter()
            .find_map(|line| match classify(line) {
                IniLine::Property { key: it, value } if it == key => Some(value),
                _ => None,
            })
    }

    /// All properties of `section`, in file order.
    #[must_use]
    pub fn section_entries(&self, section: &str) -> Vec<(String, String)> {
        let Some((start, end)) = self.section_range(section) else {
            return vec![];
        };
        self.lines[start..end]
            .iter()
            .filter_map(|line| match classify(line) {
                IniLine::Property { key, value } => Some((key.to_string(), value.to_string())),
                _ => None,
            })
            .collect()
    }

    /// Set `key` in `section`: replace the matching property line in place, or append
    /// it after the last non-blank line of the section, or append a new section at the
    /// end of the document.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let new_line = format!("{key} = {value}");

        let Some((start, end)) = self.section_range(section) else {
            if self.lines.last().is_some_and(|it| !it.trim().is_empty()) {
                self.lines.push(String::new());
            }
            self.lines.push(format!("[{section}]"));
            self.lines.push(new_line);
            self.trailing_newline = true;
            return;
        };

        let existing = (start..end).find(|&index| {
            matches!(classify(&self.lines[index]), IniLine::Property { key: it, .. } if it == key)
        });
        if let Some(index) = existing {
            self.lines[index] = new_line;
            return;
        }

        let insert_at = (start..end)
            .rev()
            .find(|&index| !self.lines[index].trim().is_empty())
            .map_or(start, |index| index + 1);
        self.lines.insert(insert_at, new_line);
    }

    /// Remove `key` from `section`. Returns true if a line was removed.
    pub fn remove(&mut self, section: &str, key: &str) -> bool {
        let Some((start, end)) = self.section_range(section) else {
            return false;
        };
        let found = (start..end).find(|&index| {
            matches!(classify(&self.lines[index]), IniLine::Property { key: it, .. } if it == key)
        });
        found.map(|index| self.lines.remove(index)).is_some()
    }
}

impl Display for IniDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines.join("\n"))?;
        if self.trailing_newline && !self.lines.is_empty() {
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = "; shell settings\n[shell]\nhistory_size = 500\n\n[alias]\nll = ls -l\n";

    #[test]
    fn test_get_and_entries() {
        let doc = IniDocument::parse(SAMPLE);
        assert_eq!(doc.get("shell", "history_size"), Some("500"));
        assert_eq!(doc.get("Shell", "history_size"), None);
        assert_eq!(doc.get("alias", "ll"), Some("ls -l"));
        assert_eq!(
            doc.section_entries("alias"),
            vec![("ll".to_string(), "ls -l".to_string())]
        );
        assert!(doc.section_entries("missing").is_empty());
    }

    #[test]
    fn test_round_trip_is_identity() {
        assert_eq!(IniDocument::parse(SAMPLE).to_string(), SAMPLE);
    }

    #[test]
    fn test_set_replaces_existing_property() {
        let mut doc = IniDocument::parse(SAMPLE);
        doc.set("shell", "history_size", "10");
        assert_eq!(
            doc.to_string(),
            "; shell settings\n[shell]\nhistory_size = 10\n\n[alias]\nll = ls -l\n"
        );
    }

    #[test]
    fn test_set_appends_to_section_before_blank_lines() {
        let mut doc = IniDocument::parse(SAMPLE);
        doc.set("shell", "prompt_suffix", "%");
        assert_eq!(
            doc.to_string(),
            "; shell settings\n[shell]\nhistory_size = 500\nprompt_suffix = %\n\n[alias]\nll = ls -l\n"
        );
    }

    #[test]
    fn test_set_is_case_sensitive_and_appends_new_section() {
        let mut doc = IniDocument::parse(SAMPLE);
        doc.set("Alias", "la", "ls -a");
        assert_eq!(
            doc.to_string(),
            "; shell settings\n[shell]\nhistory_size = 500\n\n[alias]\nll = ls -l\n\n[Alias]\nla = ls -a\n"
        );
    }

    #[test]
    fn test_set_on_empty_document() {
        let mut doc = IniDocument::parse("");
        doc.set("alias", "g", "git status");
        assert_eq!(doc.to_string(), "[alias]\ng = git status\n");
    }

    #[test]
    fn test_remove() {
        let mut doc = IniDocument::parse(SAMPLE);
        assert!(doc.remove("alias", "ll"));
        assert!(!doc.remove("alias", "ll"));
        assert_eq!(doc.get("alias", "ll"), None);
    }
}
