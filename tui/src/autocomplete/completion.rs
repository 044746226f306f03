// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::Path;

use crate::{FileSystem, resolve_path};

/// Commands whose arguments complete against the filesystem.
pub const PATH_AWARE_COMMANDS: &[&str] = &["ls", "cat", "cd", "mkdir", "rm", "vi", "mv"];

/// What Tab does to the line being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Append this text at the end of the buffer and echo it.
    Append(String),
    /// Several candidates and nothing more to append. Print them, then repaint the
    /// prompt with the buffer unchanged.
    List(Vec<String>),
    NoMatch,
}

/// Complete the word at the end of `buffer`.
///
/// A buffer without whitespace completes against `command_names`. Otherwise, if the
/// first word is in [`PATH_AWARE_COMMANDS`], the last word completes against the
/// entries of the folder it names (relative to `cwd`). Listing failures are treated as
/// no candidates.
pub async fn complete(
    buffer: &str,
    command_names: &[String],
    fs: &dyn FileSystem,
    cwd: &Path,
) -> Completion {
    let Some((command, rest)) = buffer.split_once(char::is_whitespace) else {
        let candidates = command_names
            .iter()
            .filter(|it| it.starts_with(buffer))
            .cloned()
            .collect::<Vec<_>>();
        return resolve(buffer, candidates, false);
    };

    if !PATH_AWARE_COMMANDS.contains(&command) {
        return Completion::NoMatch;
    }

    let last_arg = rest.rsplit(char::is_whitespace).next().unwrap_or_default();
    let (dir, fragment) = match last_arg.rfind('/') {
        Some(index) => (&last_arg[..=index], &last_arg[index + 1..]),
        None => ("", last_arg),
    };
    let search_dir = resolve_path(cwd, dir);

    let candidates = match fs.list_dir(search_dir.clone()).await {
        Ok(entries) => entries
            .into_iter()
            .filter(|it| it.starts_with(fragment))
            .collect::<Vec<_>>(),
        Err(error) => {
            tracing::debug!(message = "autocomplete listing failed", %error);
            vec![]
        }
    };

    let single_is_dir = match candidates.as_slice() {
        [only] => fs
            .stat(search_dir.join(only))
            .await
            .is_ok_and(|stat| stat.is_dir),
        _ => false,
    };

    resolve(fragment, candidates, single_is_dir)
}

fn resolve(fragment: &str, candidates: Vec<String>, single_is_dir: bool) -> Completion {
    if single_is_dir && let [only] = candidates.as_slice() {
        return Completion::Append(format!("{}/", &only[fragment.len()..]));
    }

    let lcp = longest_common_prefix(&candidates);
    if lcp.len() > fragment.len() {
        return Completion::Append(lcp[fragment.len()..].to_string());
    }

    if candidates.len() > 1 {
        Completion::List(candidates)
    } else {
        Completion::NoMatch
    }
}

/// Longest common prefix, never splitting a `char`.
#[must_use]
pub fn longest_common_prefix(items: &[String]) -> &str {
    let Some((first, rest)) = items.split_first() else {
        return "";
    };
    let mut end = first.len();
    for item in rest {
        end = first[..end]
            .char_indices()
            .zip(item.chars())
            .find(|((_, lhs), rhs)| lhs != rhs)
            .map_or(end.min(item.len()), |((index, _), _)| index);
    }
    // `item.len()` may land inside a multi byte char of `first`.
    while !first.is_char_boundary(end) {
        end -= 1;
    }
    &first[..end]
}
