// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::IniDocument;

pub const CONFIG_FILE_NAME: &str = "config.ini";
pub const SECTION_SHELL: &str = "shell";
pub const SECTION_ALIAS: &str = "alias";
pub const KEY_HISTORY_SIZE: &str = "history_size";
pub const KEY_PROMPT_SUFFIX: &str = "prompt_suffix";

pub const HISTORY_SIZE_MAX: usize = 1_000;
pub const DEFAULT_PROMPT_SUFFIX: &str = "$";

/// Settings read from `config.ini`. Anything missing or malformed falls back to the
/// default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub history_size: usize,
    pub prompt_suffix: String,
    pub aliases: Vec<(String, String)>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            history_size: HISTORY_SIZE_MAX,
            prompt_suffix: DEFAULT_PROMPT_SUFFIX.to_string(),
            aliases: vec![],
        }
    }
}

impl ShellConfig {
    #[must_use]
    pub fn from_ini(doc: &IniDocument) -> Self {
        let defaults = Self::default();
        let history_size = doc
            .get(SECTION_SHELL, KEY_HISTORY_SIZE)
            .and_then(|it| it.parse::<usize>().ok())
            .filter(|it| *it > 0)
            .unwrap_or(defaults.history_size);
        let prompt_suffix = doc
            .get(SECTION_SHELL, KEY_PROMPT_SUFFIX)
            .filter(|it| !it.is_empty())
            .map_or(defaults.prompt_suffix, ToString::to_string);
        Self {
            history_size,
            prompt_suffix,
            aliases: doc.section_entries(SECTION_ALIAS),
        }
    }

    #[must_use]
    pub fn parse(text: &str) -> Self { Self::from_ini(&IniDocument::parse(text)) }
}
