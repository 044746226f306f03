// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::PathBuf;

/// Create an appender that writes to exactly `path_str` and never rotates.
///
/// # Errors
///
/// Returns an error if the path has no parent folder or no file name.
pub fn try_create(
    path_str: &str,
) -> miette::Result<tracing_appender::rolling::RollingFileAppender> {
    let path = PathBuf::from(path_str);

    let parent = match path.parent() {
        Some(it) if it.as_os_str().is_empty() => PathBuf::from("."),
        Some(it) => it.to_path_buf(),
        None => miette::bail!("Can't access folder for log file {}", path.display()),
    };

    let file_name = path.file_name().ok_or_else(|| {
        miette::miette!("Can't access file name of log file {}", path.display())
    })?;

    Ok(tracing_appender::rolling::never(parent, file_name))
}
