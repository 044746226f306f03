// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

use fsh_tui::{AliasTable, CommandHandler, CommandRegistry, CommandRouter, ExitCode,
              MemoryFileSystem, ShellContext, StdoutMock, new_test_context_with_fs, tokenize};

/// A context whose router knows only `handler`, over `fs`, with the working directory
/// at `/`.
pub fn new_builtin_context(
    handler: impl CommandHandler + 'static,
    fs: MemoryFileSystem,
) -> (ShellContext, StdoutMock) {
    let registry = CommandRegistry::new().with(handler);
    let router = Arc::new(CommandRouter::new(registry, AliasTable::new()));
    new_test_context_with_fs(router, fs)
}

/// Call `handler` directly with the arguments of `line` (its first word is the command
/// name and is dropped), inside a fresh invocation.
pub async fn run_in_context(
    handler: &dyn CommandHandler,
    ctx: &ShellContext,
    line: &str,
) -> ExitCode {
    let args = tokenize(line).into_iter().skip(1).collect();
    let cancel = ctx.cancel.begin_invocation();
    let exit_code = handler.execute(args, ctx.clone(), cancel).await;
    ctx.cancel.finish_invocation();
    exit_code
}

/// Run one line through `handler` over `fs`. Returns the exit code and everything the
/// handler wrote.
pub async fn run_builtin(
    handler: impl CommandHandler + 'static,
    fs: MemoryFileSystem,
    line: &str,
) -> (ExitCode, String) {
    let name = handler.name().to_string();
    let (ctx, stdout_mock) = new_builtin_context(handler, fs);
    let Some(handler) = ctx.router().registry().get(&name) else {
        panic!("{name} is not registered");
    };
    let exit_code = run_in_context(handler.as_ref(), &ctx, line).await;
    (exit_code, stdout_mock.get_copy_of_buffer_as_string())
}
