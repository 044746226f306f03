// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::BTreeMap,
          path::PathBuf};

use fsh_tui::ShellContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Present,
    Value(String),
}

/// Arguments of the service backed commands (`git`, `npm`) split into flags and
/// positionals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    pub flags: BTreeMap<String, FlagValue>,
    pub positionals: Vec<String>,
}

impl ParsedArgs {
    /// True if any of `names` was passed, with or without a value.
    #[must_use]
    pub fn has_flag(&self, names: &[&str]) -> bool {
        names.iter().any(|it| self.flags.contains_key(*it))
    }

    /// The value of the first of `names` that was passed with one.
    #[must_use]
    pub fn flag_value(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|it| match self.flags.get(*it) {
            Some(FlagValue::Value(value)) => Some(value.as_str()),
            _ => None,
        })
    }

    /// The `--directory` flag resolved against the working directory, or the working
    /// directory itself.
    #[must_use]
    pub fn directory(&self, ctx: &ShellContext) -> PathBuf {
        match self.flag_value(&["directory"]) {
            Some(it) => ctx.resolve(it),
            None => ctx.cwd(),
        }
    }
}

/// Split `args` into flags and positionals.
///
/// - A flag is any argument starting with `-`, its name has the dashes removed.
/// - A flag takes the next argument as its value unless that argument is another flag
///   or the flag is listed in `switches`.
/// - Arguments that the whitespace tokenizer split apart inside quotes are joined back
///   together and the quotes removed, eg: `-m "fix the build"` has the value
///   `fix the build`.
#[must_use]
pub fn parse_args(args: &[String], switches: &[&str]) -> ParsedArgs {
    let mut acc = ParsedArgs::default();
    let mut index = 0;

    while index < args.len() {
        let arg = &args[index];
        if arg.starts_with('-') {
            let key = arg.trim_start_matches('-').to_string();
            let takes_value = !switches.contains(&key.as_str())
                && args.get(index + 1).is_some_and(|it| !it.starts_with('-'));
            if takes_value {
                let (value, last_index) = consume_quoted(args, index + 1);
                acc.flags.insert(key, FlagValue::Value(value));
                index = last_index;
            } else {
                acc.flags.insert(key, FlagValue::Present);
            }
        } else {
            let (value, last_index) = consume_quoted(args, index);
            acc.positionals.push(value);
            index = last_index;
        }
        index += 1;
    }

    acc
}

/// Read the argument at `index`, continuing across following arguments until the
/// closing quote when it starts with one. Returns the value and the index of the last
/// argument consumed.
fn consume_quoted(args: &[String], index: usize) -> (String, usize) {
    let value = &args[index];
    let Some(quote) = value.chars().next().filter(|it| *it == '"' || *it == '\'') else {
        return (value.clone(), index);
    };

    if value.len() > 1 && value.ends_with(quote) {
        return (value[1..value.len() - 1].to_string(), index);
    }

    let mut last_index = index;
    while last_index + 1 < args.len() {
        last_index += 1;
        if args[last_index].ends_with(quote) {
            break;
        }
    }

    let full = args[index..=last_index].join(" ");
    let inner = &full[1..];
    let inner = inner.strip_suffix(quote).unwrap_or(inner);
    (inner.to_string(), last_index)
}

/// Single letter flags in the `ls -lh` style: every argument starting with `-`
/// contributes its letters, everything else is an operand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortFlags {
    letters: String,
    pub operands: Vec<String>,
}

impl ShortFlags {
    #[must_use]
    pub fn parse(args: &[String]) -> Self {
        let mut acc = Self::default();
        for arg in args {
            match arg.strip_prefix('-') {
                Some(letters) => acc.letters.push_str(letters),
                None => acc.operands.push(arg.clone()),
            }
        }
        acc
    }

    #[must_use]
    pub fn has(&self, letter: char) -> bool { self.letters.contains(letter) }
}
