// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::collections::BTreeMap;

/// Alias name to expansion. An expansion may contain `&&` chains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<String, String>,
}

impl AliasTable {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, name: impl Into<String>, expansion: impl Into<String>) {
        self.entries.insert(name.into(), expansion.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> { self.entries.remove(name) }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> { self.entries.get(name).map(String::as_str) }

    /// Sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Match `sub_command` against the aliases, longest name first. A name matches the
    /// whole sub-command, or a prefix followed by a space, in which case the rest of the
    /// sub-command is appended to the expansion. Names in `skip` (aliases already being
    /// expanded) never match, so `ls = ls -l` does not recurse.
    #[must_use]
    pub fn resolve(&self, sub_command: &str, skip: &[String]) -> Option<(String, String)> {
        let mut names = self
            .entries
            .keys()
            .filter(|it| !skip.contains(it))
            .collect::<Vec<_>>();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        names.into_iter().find_map(|name| {
            let rest = sub_command.strip_prefix(name.as_str())?;
            if !rest.is_empty() && !rest.starts_with(' ') {
                return None;
            }
            let expansion = &self.entries[name];
            Some((name.clone(), format!("{expansion}{rest}")))
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AliasTable {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut it = Self::new();
        for (name, expansion) in iter {
            it.insert(name, expansion);
        }
        it
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn table() -> AliasTable {
        AliasTable::from_iter([("g", "git"), ("gs", "git status"), ("ll", "ls -l")])
    }

    #[test]
    fn test_longest_key_first() {
        assert_eq!(
            table().resolve("gs", &[]),
            Some(("gs".into(), "git status".into()))
        );
        assert_eq!(
            table().resolve("g log", &[]),
            Some(("g".into(), "git log".into()))
        );
    }

    #[test]
    fn test_prefix_must_end_at_space() {
        assert_eq!(table().resolve("gx", &[]), None);
        assert_eq!(table().resolve("lls", &[]), None);
        assert_eq!(
            table().resolve("ll /tmp", &[]),
            Some(("ll".into(), "ls -l /tmp".into()))
        );
    }

    #[test]
    fn test_skip_prevents_self_expansion() {
        let table = AliasTable::from_iter([("ls", "ls -l")]);
        assert_eq!(table.resolve("ls", &["ls".to_string()]), None);
    }
}
