// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use fsh_tui::{CancelRegistrar, CommandHandler, ExitCode, FsError, ShellContext};
use futures_util::{FutureExt, future::BoxFuture};

/// Where `cd` with no argument goes.
pub const HOME_DIR: &str = "/";

/// `cd [dir]`. Errors name the directory as typed, not the resolved path.
#[derive(Debug, Default, Clone, Copy)]
pub struct Cd;

impl CommandHandler for Cd {
    fn name(&self) -> &str { "cd" }

    fn description(&self) -> &'static str { "Change the working directory" }

    fn execute(
        &self,
        args: Vec<String>,
        ctx: ShellContext,
        _cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode> {
        async move {
            let dest = args.first().map_or(HOME_DIR, String::as_str);
            let path = ctx.resolve(dest);
            let message = match ctx.fs.stat(path.clone()).await {
                Ok(stat) if stat.is_dir => {
                    ctx.set_cwd(path);
                    return Some(0);
                }
                Ok(_) | Err(FsError::NotADirectory { .. }) => {
                    format!("cd: not a directory: {dest}")
                }
                Err(FsError::NotFound { .. }) => {
                    format!("cd: no such file or directory: {dest}")
                }
                Err(error) => format!("cd: {error}"),
            };
            ctx.sink.writeln(message);
            Some(1)
        }
        .boxed()
    }
}
