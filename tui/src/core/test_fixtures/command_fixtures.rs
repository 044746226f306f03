// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

use futures_util::{FutureExt, future::BoxFuture};

use crate::{CancelRegistrar, CommandHandler, CommandRouter, ExitCode, MemoryFileSystem,
            OutputSink, ShellContext, StdMutex, StdoutMock, lock_or_recover};

/// Build a context over a fresh [`MemoryFileSystem`] rooted at `/`. Output lands in the
/// returned [`StdoutMock`].
#[must_use]
pub fn new_test_context(router: Arc<CommandRouter>) -> (ShellContext, StdoutMock) {
    new_test_context_with_fs(router, MemoryFileSystem::new())
}

#[must_use]
pub fn new_test_context_with_fs(
    router: Arc<CommandRouter>,
    fs: MemoryFileSystem,
) -> (ShellContext, StdoutMock) {
    let stdout_mock = StdoutMock::new();
    let ctx = ShellContext::new(
        OutputSink::new(stdout_mock.clone()),
        Arc::new(fs),
        "/",
        router,
    );
    (ctx, stdout_mock)
}

/// Shared log of every invocation made through the handlers it hands out.
#[derive(Debug, Clone, Default)]
pub struct RecordingCommand {
    calls: Arc<StdMutex<Vec<String>>>,
}

impl RecordingCommand {
    /// A handler called `name` that records `"<name> <args...>"` and returns
    /// `exit_code`.
    #[must_use]
    pub fn named(&self, name: &str, exit_code: ExitCode) -> RecordedCommand {
        RecordedCommand {
            name: name.into(),
            exit_code,
            calls: self.calls.clone(),
        }
    }

    #[must_use]
    pub fn calls(&self) -> Vec<String> { lock_or_recover(&self.calls).clone() }
}

#[derive(Debug)]
pub struct RecordedCommand {
    name: String,
    exit_code: ExitCode,
    calls: Arc<StdMutex<Vec<String>>>,
}

impl CommandHandler for RecordedCommand {
    fn name(&self) -> &str { &self.name }

    fn execute(
        &self,
        args: Vec<String>,
        _ctx: ShellContext,
        _cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode> {
        async move {
            let call = std::iter::once(self.name.clone()).chain(args).collect::<Vec<_>>();
            lock_or_recover(&self.calls).push(call.join(" "));
            self.exit_code
        }
        .boxed()
    }
}

/// Registers a cancel callback that does nothing, then succeeds.
#[derive(Debug)]
pub struct RegisteringCommand;

impl CommandHandler for RegisteringCommand {
    fn name(&self) -> &str { "register" }

    fn execute(
        &self,
        _args: Vec<String>,
        _ctx: ShellContext,
        cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode> {
        async move {
            cancel.register(|| {}).ok()?;
            Some(0)
        }
        .boxed()
    }
}

/// Prints `waiting`, then blocks until Ctrl-C fires its cancel callback. Prints
/// `stopped` on the way out.
#[derive(Debug)]
pub struct WaitForCancelCommand;

impl CommandHandler for WaitForCancelCommand {
    fn name(&self) -> &str { "wait" }

    fn execute(
        &self,
        _args: Vec<String>,
        ctx: ShellContext,
        cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode> {
        async move {
            let canceled = cancel.register_oneshot().ok()?;
            ctx.sink.writeln("waiting");
            canceled.await.ok();
            ctx.sink.writeln("stopped");
            Some(0)
        }
        .boxed()
    }
}

/// Blocks until the shared [`tokio::sync::Notify`] fires. It registers no cancel
/// callback, so Ctrl-C falls back to the default line abort.
#[derive(Debug, Clone, Default)]
pub struct GateCommand {
    pub gate: Arc<tokio::sync::Notify>,
}

impl CommandHandler for GateCommand {
    fn name(&self) -> &str { "gate" }

    fn execute(
        &self,
        _args: Vec<String>,
        ctx: ShellContext,
        _cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode> {
        async move {
            self.gate.notified().await;
            ctx.sink.writeln("opened");
            Some(0)
        }
        .boxed()
    }
}
