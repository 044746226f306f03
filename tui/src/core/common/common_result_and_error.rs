// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{MutexGuard, PoisonError};

use crate::{FsError, StdMutex};

/// Simple macro to create a [`Result`] with an [`Ok`] variant. It is just syntactic sugar
/// that helps having to write `Ok(())`.
/// - If no arg is passed in then it will return `Ok(())`.
/// - If an arg is passed in then it will return `Ok($arg)`.
#[macro_export]
macro_rules! ok {
    // No args.
    () => {
        Ok(())
    };
    // With arg.
    ($value:expr) => {
        Ok($value)
    };
}

/// Exit code reported by a command handler. `None` is treated the same as `Some(0)`.
pub type ExitCode = Option<i32>;

pub const EXIT_CODE_SUCCESS: i32 = 0;
pub const EXIT_CODE_FAILURE: i32 = 1;
/// Returned by the router when a sub-command was canceled with Ctrl-C.
pub const EXIT_CODE_CANCELED: i32 = 130;

/// Lock a [`StdMutex`], recovering the guard if a previous holder panicked. None of the
/// state guarded in this crate can be left half-updated by a panic, so the data is still
/// usable.
pub fn lock_or_recover<T: ?Sized>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Errors that command handlers report to the user. Handlers catch these and print
/// them to the output sink (see `report_error` in the command handler module), they are
/// never propagated out of a session.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ShellError {
    #[error("{message}")]
    #[diagnostic(code(fsh::usage), help("Check the arguments passed to the command"))]
    Usage { message: String },

    #[error("no such file or directory: {path}")]
    #[diagnostic(code(fsh::not_found))]
    NotFound { path: String },

    #[error("not a directory: {path}")]
    #[diagnostic(code(fsh::not_a_directory))]
    NotADirectory { path: String },

    #[error("permission denied: {path}")]
    #[diagnostic(code(fsh::permission))]
    Permission { path: String },

    /// Message surfaced verbatim from an external collaborator.
    #[error("{message}")]
    #[diagnostic(code(fsh::external_service))]
    ExternalService { message: String },

    #[error("{guidance}")]
    #[diagnostic(
        code(fsh::auth_required),
        help("Configure an identity, then run the command again")
    )]
    AuthRequired { guidance: String },

    #[error("input is already captured by {owner}")]
    #[diagnostic(code(fsh::capture_busy))]
    CaptureBusy { owner: String },

    #[error("a cancel callback is already registered for this command")]
    #[diagnostic(code(fsh::cancel_already_registered))]
    CancelAlreadyRegistered,

    #[error(transparent)]
    #[diagnostic(code(fsh::io))]
    Io(#[from] std::io::Error),
}

impl ShellError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    pub fn external(message: impl Into<String>) -> Self {
        Self::ExternalService {
            message: message.into(),
        }
    }
}

impl From<FsError> for ShellError {
    fn from(error: FsError) -> Self {
        match error {
            FsError::NotFound { path } => Self::NotFound {
                path: path.display().to_string(),
            },
            FsError::NotADirectory { path } => Self::NotADirectory {
                path: path.display().to_string(),
            },
            FsError::PermissionDenied { path } => Self::Permission {
                path: path.display().to_string(),
            },
            FsError::Other { message, .. } => Self::ExternalService { message },
        }
    }
}
