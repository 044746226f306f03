// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use fsh_tui::{CRLF, CancelRegistrar, CommandHandler, ExitCode, ShellContext, ShellError,
              exit_code_from, ok};
use futures_util::{FutureExt, future::BoxFuture};

pub const CAT_USAGE: &str = "Usage: cat <filename>";

/// `cat <file>`. Prints the file, always leaving the cursor on a fresh line.
#[derive(Debug, Default, Clone, Copy)]
pub struct Cat;

impl CommandHandler for Cat {
    fn name(&self) -> &str { "cat" }

    fn description(&self) -> &'static str { "Print a file" }

    fn execute(
        &self,
        args: Vec<String>,
        ctx: ShellContext,
        _cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode> {
        async move {
            let result = print_file(&ctx, args.first()).await;
            exit_code_from(&ctx, self.name(), result)
        }
        .boxed()
    }
}

async fn print_file(ctx: &ShellContext, file: Option<&String>) -> Result<ExitCode, ShellError> {
    let Some(file) = file else {
        return Err(ShellError::usage(CAT_USAGE));
    };
    let contents = ctx.fs.read_to_string(ctx.resolve(file)).await?;
    ctx.sink.write_lines(&contents);
    if !contents.ends_with('\n') {
        ctx.sink.write_str(CRLF);
    }
    ok!(Some(0))
}
