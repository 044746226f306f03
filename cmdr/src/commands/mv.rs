// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use fsh_tui::{CancelRegistrar, CommandHandler, ExitCode, ShellContext, ShellError,
              exit_code_from, ok};
use futures_util::{FutureExt, future::BoxFuture};

pub const MV_USAGE: &str = "Usage: mv <source> <destination>";

/// `mv <src> <dst>`. When `dst` is an existing directory, `src` moves into it.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mv;

impl CommandHandler for Mv {
    fn name(&self) -> &str { "mv" }

    fn description(&self) -> &'static str { "Move or rename a file" }

    fn execute(
        &self,
        args: Vec<String>,
        ctx: ShellContext,
        _cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode> {
        async move {
            let result = move_path(&ctx, &args).await;
            exit_code_from(&ctx, self.name(), result)
        }
        .boxed()
    }
}

async fn move_path(ctx: &ShellContext, args: &[String]) -> Result<ExitCode, ShellError> {
    let [src, dst] = args else {
        return Err(ShellError::usage(MV_USAGE));
    };
    let src = ctx.resolve(src);
    let mut dst = ctx.resolve(dst);

    let dst_is_dir = ctx.fs.stat(dst.clone()).await.is_ok_and(|it| it.is_dir);
    if dst_is_dir && let Some(file_name) = src.file_name() {
        dst = dst.join(file_name);
    }

    tracing::debug!(message = "mv", src = %src.display(), dst = %dst.display());
    ctx.fs.rename(src, dst).await?;
    ok!(Some(0))
}
