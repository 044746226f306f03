// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::PathBuf;

use futures_util::{FutureExt, future::BoxFuture};

use crate::{FileStat, FileSystem, FsError, FsResult, RemoveOptions, ok};

/// [`FileSystem`] backed by the local disk, using [`tokio::fs`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn stat(&self, path: PathBuf) -> BoxFuture<'_, FsResult<FileStat>> {
        async move {
            let metadata = tokio::fs::metadata(&path)
                .await
                .map_err(|error| FsError::from_io(&path, &error))?;
            ok!(FileStat {
                is_dir: metadata.is_dir(),
                len: metadata.len(),
            })
        }
        .boxed()
    }

    fn list_dir(&self, path: PathBuf) -> BoxFuture<'_, FsResult<Vec<String>>> {
        async move {
            let map_err = |error: std::io::Error| FsError::from_io(&path, &error);
            let mut read_dir = tokio::fs::read_dir(&path).await.map_err(map_err)?;
            let mut names = vec![];
            while let Some(entry) = read_dir.next_entry().await.map_err(map_err)? {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
            names.sort();
            ok!(names)
        }
        .boxed()
    }

    fn read_to_string(&self, path: PathBuf) -> BoxFuture<'_, FsResult<String>> {
        async move {
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|error| FsError::from_io(&path, &error))
        }
        .boxed()
    }

    fn write(&self, path: PathBuf, contents: String) -> BoxFuture<'_, FsResult<()>> {
        async move {
            tokio::fs::write(&path, contents)
                .await
                .map_err(|error| FsError::from_io(&path, &error))
        }
        .boxed()
    }

    fn rename(&self, from: PathBuf, to: PathBuf) -> BoxFuture<'_, FsResult<()>> {
        async move {
            tokio::fs::rename(&from, &to)
                .await
                .map_err(|error| FsError::from_io(&from, &error))
        }
        .boxed()
    }

    fn remove(&self, path: PathBuf, options: RemoveOptions) -> BoxFuture<'_, FsResult<()>> {
        async move {
            let map_err = |error: std::io::Error| FsError::from_io(&path, &error);
            let metadata = match tokio::fs::symlink_metadata(&path).await {
                Ok(it) => it,
                Err(error) => {
                    let error = map_err(error);
                    if options.force && error.is_not_found() {
                        return ok!();
                    }
                    return Err(error);
                }
            };
            if !metadata.is_dir() {
                return tokio::fs::remove_file(&path).await.map_err(map_err);
            }
            if !options.recursive {
                return Err(FsError::Other {
                    message: format!("{}: is a directory", path.display()),
                    path: path.clone(),
                });
            }
            tokio::fs::remove_dir_all(&path).await.map_err(map_err)
        }
        .boxed()
    }

    fn create_dir(&self, path: PathBuf, recursive: bool) -> BoxFuture<'_, FsResult<()>> {
        async move {
            let result = if recursive {
                tokio::fs::create_dir_all(&path).await
            } else {
                tokio::fs::create_dir(&path).await
            };
            result.map_err(|error| FsError::from_io(&path, &error))
        }
        .boxed()
    }
}
