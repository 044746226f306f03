// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::BTreeMap,
          path::{Path, PathBuf},
          sync::Arc};

use futures_util::{FutureExt, future::BoxFuture};

use crate::{FileStat, FileSystem, FsError, FsResult, RemoveOptions, StdMutex,
            lock_or_recover, ok};

#[derive(Debug, Clone, PartialEq, Eq)]
enum MemoryEntry {
    Dir,
    File(String),
}

/// In-memory [`FileSystem`] for tests. The root `/` always exists. Every operation
/// completes without yielding, which keeps session tests deterministic.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    entries: Arc<StdMutex<BTreeMap<PathBuf, MemoryEntry>>>,
}

impl MemoryFileSystem {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Add a file, creating missing parent folders.
    #[must_use]
    pub fn with_file(self, path: impl AsRef<Path>, contents: &str) -> Self {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        lock_or_recover(&self.entries).insert(path, MemoryEntry::File(contents.into()));
        self
    }

    /// Add a folder, creating missing parent folders.
    #[must_use]
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        lock_or_recover(&self.entries).insert(path, MemoryEntry::Dir);
        self
    }

    #[must_use]
    pub fn file_contents(&self, path: impl AsRef<Path>) -> Option<String> {
        match lock_or_recover(&self.entries).get(path.as_ref()) {
            Some(MemoryEntry::File(contents)) => Some(contents.clone()),
            _ => None,
        }
    }

    #[must_use]
    pub fn exists(&self, path: impl AsRef<Path>) -> bool { self.entry(path.as_ref()).is_some() }

    fn add_parents(&self, path: &Path) {
        let mut entries = lock_or_recover(&self.entries);
        for ancestor in path.ancestors().skip(1) {
            if ancestor != Path::new("/") && !ancestor.as_os_str().is_empty() {
                entries.insert(ancestor.to_path_buf(), MemoryEntry::Dir);
            }
        }
    }

    fn entry(&self, path: &Path) -> Option<MemoryEntry> {
        if path == Path::new("/") {
            return Some(MemoryEntry::Dir);
        }
        lock_or_recover(&self.entries).get(path).cloned()
    }

    fn require_parent_dir(&self, path: &Path) -> FsResult<()> {
        let parent = path.parent().unwrap_or(Path::new("/"));
        match self.entry(parent) {
            Some(MemoryEntry::Dir) => ok!(),
            Some(MemoryEntry::File(_)) => Err(FsError::NotADirectory {
                path: parent.to_path_buf(),
            }),
            None => Err(FsError::NotFound {
                path: path.to_path_buf(),
            }),
        }
    }

    fn stat_sync(&self, path: &Path) -> FsResult<FileStat> {
        match self.entry(path) {
            Some(MemoryEntry::Dir) => ok!(FileStat {
                is_dir: true,
                len: 0,
            }),
            Some(MemoryEntry::File(contents)) => ok!(FileStat {
                is_dir: false,
                len: contents.len() as u64,
            }),
            None => Err(FsError::NotFound {
                path: path.to_path_buf(),
            }),
        }
    }

    fn list_dir_sync(&self, path: &Path) -> FsResult<Vec<String>> {
        if !self.stat_sync(path)?.is_dir {
            return Err(FsError::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        let entries = lock_or_recover(&self.entries);
        ok!(entries
            .keys()
            .filter(|it| it.parent() == Some(path))
            .filter_map(|it| it.file_name())
            .map(|it| it.to_string_lossy().into_owned())
            .collect())
    }

    fn write_sync(&self, path: PathBuf, contents: String) -> FsResult<()> {
        self.require_parent_dir(&path)?;
        if matches!(self.entry(&path), Some(MemoryEntry::Dir)) {
            return Err(FsError::Other {
                message: format!("{}: is a directory", path.display()),
                path,
            });
        }
        lock_or_recover(&self.entries).insert(path, MemoryEntry::File(contents));
        ok!()
    }

    fn rename_sync(&self, from: &Path, to: &Path) -> FsResult<()> {
        self.stat_sync(from)?;
        self.require_parent_dir(to)?;
        let mut entries = lock_or_recover(&self.entries);
        let moved = entries
            .keys()
            .filter(|it| it.starts_with(from))
            .cloned()
            .collect::<Vec<_>>();
        for old_path in moved {
            if let Some(entry) = entries.remove(&old_path) {
                let suffix = old_path.strip_prefix(from).unwrap_or(Path::new(""));
                let new_path = if suffix.as_os_str().is_empty() {
                    to.to_path_buf()
                } else {
                    to.join(suffix)
                };
                entries.insert(new_path, entry);
            }
        }
        ok!()
    }

    fn remove_sync(&self, path: &Path, options: RemoveOptions) -> FsResult<()> {
        let stat = match self.stat_sync(path) {
            Ok(it) => it,
            Err(error) if options.force && error.is_not_found() => return ok!(),
            Err(error) => return Err(error),
        };
        if stat.is_dir && !options.recursive {
            return Err(FsError::Other {
                path: path.to_path_buf(),
                message: format!("{}: is a directory", path.display()),
            });
        }
        lock_or_recover(&self.entries).retain(|it, _| !it.starts_with(path));
        ok!()
    }

    fn create_dir_sync(&self, path: PathBuf, recursive: bool) -> FsResult<()> {
        if recursive {
            if matches!(self.entry(&path), Some(MemoryEntry::File(_))) {
                return Err(FsError::NotADirectory { path });
            }
            self.add_parents(&path);
        } else {
            self.require_parent_dir(&path)?;
            if self.entry(&path).is_some() {
                return Err(FsError::Other {
                    message: format!("{}: file exists", path.display()),
                    path,
                });
            }
        }
        lock_or_recover(&self.entries).insert(path, MemoryEntry::Dir);
        ok!()
    }
}

impl FileSystem for MemoryFileSystem {
    fn stat(&self, path: PathBuf) -> BoxFuture<'_, FsResult<FileStat>> {
        async move { self.stat_sync(&path) }.boxed()
    }

    fn list_dir(&self, path: PathBuf) -> BoxFuture<'_, FsResult<Vec<String>>> {
        async move { self.list_dir_sync(&path) }.boxed()
    }

    fn read_to_string(&self, path: PathBuf) -> BoxFuture<'_, FsResult<String>> {
        async move {
            match self.entry(&path) {
                Some(MemoryEntry::File(contents)) => ok!(contents),
                Some(MemoryEntry::Dir) => Err(FsError::Other {
                    message: format!("{}: is a directory", path.display()),
                    path,
                }),
                None => Err(FsError::NotFound { path }),
            }
        }
        .boxed()
    }

    fn write(&self, path: PathBuf, contents: String) -> BoxFuture<'_, FsResult<()>> {
        async move { self.write_sync(path, contents) }.boxed()
    }

    fn rename(&self, from: PathBuf, to: PathBuf) -> BoxFuture<'_, FsResult<()>> {
        async move { self.rename_sync(&from, &to) }.boxed()
    }

    fn remove(&self, path: PathBuf, options: RemoveOptions) -> BoxFuture<'_, FsResult<()>> {
        async move { self.remove_sync(&path, options) }.boxed()
    }

    fn create_dir(&self, path: PathBuf, recursive: bool) -> BoxFuture<'_, FsResult<()>> {
        async move { self.create_dir_sync(path, recursive) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_file_system() {
        let fs = MemoryFileSystem::new()
            .with_file("/home/a.txt", "a")
            .with_dir("/home/docs");

        pretty_assertions::assert_eq!(
            fs.list_dir("/home".into()).await.unwrap(),
            vec!["a.txt".to_string(), "docs".to_string()]
        );
        pretty_assertions::assert_eq!(
            fs.list_dir("/".into()).await.unwrap(),
            vec!["home".to_string()]
        );

        fs.rename("/home/a.txt".into(), "/home/docs/b.txt".into())
            .await
            .unwrap();
        pretty_assertions::assert_eq!(fs.file_contents("/home/docs/b.txt"), Some("a".into()));
        assert!(!fs.exists("/home/a.txt"));

        assert!(fs.write("/nope/x".into(), String::new()).await.is_err());
        assert!(
            fs.remove("/home".into(), RemoveOptions::default())
                .await
                .is_err()
        );
    }
}
