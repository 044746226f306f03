// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use fsh_tui::{CancelRegistrar, CommandHandler, ExitCode, ShellContext, ShellError,
              exit_code_from, ok};
use futures_util::{FutureExt, future::BoxFuture};
use tokio::sync::watch;

pub const EXIT_USAGE: &str = "Usage: exit [code]";

/// Lets the `exit` builtin end the session. The binary stops reading input once an
/// exit is requested and uses the requested code as its own.
#[derive(Debug, Clone)]
pub struct ExitRequest {
    sender: watch::Sender<Option<i32>>,
}

impl Default for ExitRequest {
    fn default() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }
}

impl ExitRequest {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// The first request wins.
    pub fn request(&self, code: i32) {
        self.sender.send_if_modified(|it| {
            if it.is_some() {
                return false;
            }
            *it = Some(code);
            true
        });
    }

    #[must_use]
    pub fn requested(&self) -> Option<i32> { *self.sender.borrow() }

    /// Resolves with the code once an exit is requested.
    pub async fn wait(&self) -> i32 {
        let mut receiver = self.sender.subscribe();
        let result = receiver
            .wait_for(Option::is_some)
            .await
            .map(|it| (*it).unwrap_or_default());
        match result {
            Ok(code) => code,
            // The sender lives in `self`, so the channel can't close while waiting.
            Err(_) => std::future::pending().await,
        }
    }
}

/// `exit [code]`. Ends the session with `code` (default 0).
#[derive(Debug, Clone)]
pub struct Exit {
    pub request: ExitRequest,
}

impl CommandHandler for Exit {
    fn name(&self) -> &str { "exit" }

    fn description(&self) -> &'static str { "Exit the shell" }

    fn execute(
        &self,
        args: Vec<String>,
        ctx: ShellContext,
        _cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode> {
        async move {
            let result = match args.as_slice() {
                [] => ok!(0),
                [code] => code.parse::<i32>().map_err(|_| ShellError::usage(EXIT_USAGE)),
                _ => Err(ShellError::usage(EXIT_USAGE)),
            };
            let result = result.map(|code| {
                tracing::debug!(message = "exit requested", code);
                self.request.request(code);
                Some(code)
            });
            exit_code_from(&ctx, self.name(), result)
        }
        .boxed()
    }
}
