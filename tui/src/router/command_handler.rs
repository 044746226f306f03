// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use futures_util::future::BoxFuture;

use crate::{CancelRegistrar, EXIT_CODE_FAILURE, ExitCode, ShellContext, ShellError};

/// A command the router can dispatch to.
///
/// Handlers run to completion before the next chained sub-command starts. They report
/// their own failures to `ctx.sink` and signal them through the exit code, nothing is
/// propagated. A long running handler should register a cancel callback through
/// `cancel` that makes it stop, otherwise Ctrl-C only aborts the line being edited.
pub trait CommandHandler: Send + Sync {
    fn name(&self) -> &str;

    /// One line summary for `help`.
    fn description(&self) -> &'static str { "" }

    fn execute(
        &self,
        args: Vec<String>,
        ctx: ShellContext,
        cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode>;
}

/// Print `"<command>: <error>"` and return the failure exit code.
pub fn report_error(ctx: &ShellContext, command: &str, error: &ShellError) -> ExitCode {
    tracing::debug!(message = "command failed", command, %error);
    match error {
        // Usage text is printed as is.
        ShellError::Usage { message } => ctx.sink.writeln(message),
        _ => ctx.sink.writeln(format!("{command}: {error}")),
    }
    Some(EXIT_CODE_FAILURE)
}

/// Turn a handler body that returns `Result` into an exit code, reporting the error.
pub fn exit_code_from(ctx: &ShellContext, command: &str, result: Result<ExitCode, ShellError>) -> ExitCode {
    match result {
        Ok(it) => it,
        Err(error) => report_error(ctx, command, &error),
    }
}
