// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use fsh_tui::{CancelRegistrar, CommandHandler, ExitCode, RemoveOptions, ShellContext};
use futures_util::{FutureExt, future::BoxFuture};

use crate::ShortFlags;

pub const RM_USAGE: &str = "usage: rm [-rf] <file/dir>";

/// `rm [-rf] <path...>`. `-r` removes directories, `-f` ignores missing paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct Rm;

impl CommandHandler for Rm {
    fn name(&self) -> &str { "rm" }

    fn description(&self) -> &'static str { "Remove files or directories" }

    fn execute(
        &self,
        args: Vec<String>,
        ctx: ShellContext,
        _cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode> {
        async move {
            let flags = ShortFlags::parse(&args);
            if flags.operands.is_empty() {
                ctx.sink.writeln(RM_USAGE);
                return Some(1);
            }

            let options = RemoveOptions {
                recursive: flags.has('r') || flags.has('R'),
                force: flags.has('f'),
            };
            let mut exit_code = 0;
            for path in &flags.operands {
                if let Err(error) = ctx.fs.remove(ctx.resolve(path), options).await {
                    ctx.sink.writeln(format!("rm: {error}"));
                    exit_code = 1;
                }
            }
            Some(exit_code)
        }
        .boxed()
    }
}
