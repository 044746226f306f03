// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::Debug,
          io::ErrorKind,
          path::{Path, PathBuf}};

use futures_util::future::BoxFuture;

/// Filesystem failures, classed the way commands report them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum FsError {
    #[error("no such file or directory: {}", path.display())]
    #[diagnostic(code(fsh::fs::not_found))]
    NotFound { path: PathBuf },

    #[error("not a directory: {}", path.display())]
    #[diagnostic(code(fsh::fs::not_a_directory))]
    NotADirectory { path: PathBuf },

    #[error("permission denied: {}", path.display())]
    #[diagnostic(code(fsh::fs::permission_denied))]
    PermissionDenied { path: PathBuf },

    #[error("{message}")]
    #[diagnostic(code(fsh::fs::other))]
    Other { path: PathBuf, message: String },
}

impl FsError {
    /// Class an [`std::io::Error`] that happened while operating on `path`.
    pub fn from_io(path: impl AsRef<Path>, error: &std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match error.kind() {
            ErrorKind::NotFound => Self::NotFound { path },
            ErrorKind::NotADirectory => Self::NotADirectory { path },
            ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Other {
                message: format!("{}: {error}", path.display()),
                path,
            },
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound { .. }) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub is_dir: bool,
    pub len: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    pub recursive: bool,
    /// Ignore paths that don't exist.
    pub force: bool,
}

pub type FsResult<T> = Result<T, FsError>;

/// The narrow filesystem contract that the shell core and the builtin commands use.
/// All paths passed in are absolute, relative path resolution against the session's
/// working directory happens before calling in.
pub trait FileSystem: Debug + Send + Sync {
    fn stat(&self, path: PathBuf) -> BoxFuture<'_, FsResult<FileStat>>;

    /// File names (not paths) in the directory, sorted.
    fn list_dir(&self, path: PathBuf) -> BoxFuture<'_, FsResult<Vec<String>>>;

    fn read_to_string(&self, path: PathBuf) -> BoxFuture<'_, FsResult<String>>;

    fn write(&self, path: PathBuf, contents: String) -> BoxFuture<'_, FsResult<()>>;

    fn rename(&self, from: PathBuf, to: PathBuf) -> BoxFuture<'_, FsResult<()>>;

    fn remove(&self, path: PathBuf, options: RemoveOptions) -> BoxFuture<'_, FsResult<()>>;

    fn create_dir(&self, path: PathBuf, recursive: bool) -> BoxFuture<'_, FsResult<()>>;
}

/// Lexically resolve `input` against `cwd`, folding `.` and `..` without touching the
/// disk. An absolute `input` ignores `cwd`.
pub fn resolve_path(cwd: &Path, input: &str) -> PathBuf {
    use std::path::Component;

    let joined = cwd.join(input);
    let mut it = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::ParentDir => {
                it.pop();
            }
            Component::CurDir => {}
            other => it.push(other.as_os_str()),
        }
    }
    if it.as_os_str().is_empty() {
        it.push("/");
    }
    it
}
