// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::{cursor::MoveTo,
                execute,
                terminal::{Clear as ClearTerminal, ClearType}};
use fsh_tui::{CancelRegistrar, CommandHandler, ExitCode, ShellContext, report_error};
use futures_util::{FutureExt, future::BoxFuture};

/// `clear`. Wipes the screen and homes the cursor.
#[derive(Debug, Default, Clone, Copy)]
pub struct Clear;

impl CommandHandler for Clear {
    fn name(&self) -> &str { "clear" }

    fn description(&self) -> &'static str { "Clear the screen" }

    fn execute(
        &self,
        _args: Vec<String>,
        ctx: ShellContext,
        _cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode> {
        async move {
            let mut sink = ctx.sink.clone();
            if let Err(error) = execute!(sink, ClearTerminal(ClearType::All), MoveTo(0, 0)) {
                return report_error(&ctx, self.name(), &error.into());
            }
            ctx.sink.mark_at_line_start();
            Some(0)
        }
        .boxed()
    }
}
