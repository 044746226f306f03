// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use fsh_tui::{CancelRegistrar, CommandHandler, ExitCode, ShellContext};
use futures_util::{FutureExt, future::BoxFuture};

use crate::ShortFlags;

/// `mkdir [-p] <dir...>`. Keeps going after a failure and exits 1 if any failed.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mkdir;

impl CommandHandler for Mkdir {
    fn name(&self) -> &str { "mkdir" }

    fn description(&self) -> &'static str { "Create directories" }

    fn execute(
        &self,
        args: Vec<String>,
        ctx: ShellContext,
        _cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode> {
        async move {
            let flags = ShortFlags::parse(&args);
            if flags.operands.is_empty() {
                ctx.sink.writeln("mkdir: missing operand");
                return Some(1);
            }

            let mut exit_code = 0;
            for dir in &flags.operands {
                if let Err(error) = ctx.fs.create_dir(ctx.resolve(dir), flags.has('p')).await {
                    ctx.sink.writeln(format!("mkdir: {error}"));
                    exit_code = 1;
                }
            }
            Some(exit_code)
        }
        .boxed()
    }
}
