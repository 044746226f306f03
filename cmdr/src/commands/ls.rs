// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use fsh_tui::{CancelRegistrar, CommandHandler, ExitCode, ShellContext, ShellError,
              exit_code_from, ok, print_in_columns};
use futures_util::{FutureExt, future::BoxFuture};

use crate::{ShortFlags, format_bytes_human};

/// `ls [-l] [-h] [dir]`. Names in columns, or one `size name` row per entry with `-l`
/// (human readable sizes with `-h`).
#[derive(Debug, Default, Clone, Copy)]
pub struct Ls;

impl CommandHandler for Ls {
    fn name(&self) -> &str { "ls" }

    fn description(&self) -> &'static str { "List directory contents" }

    fn execute(
        &self,
        args: Vec<String>,
        ctx: ShellContext,
        _cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode> {
        async move {
            let result = list(&ctx, &ShortFlags::parse(&args)).await;
            exit_code_from(&ctx, self.name(), result)
        }
        .boxed()
    }
}

async fn list(ctx: &ShellContext, flags: &ShortFlags) -> Result<ExitCode, ShellError> {
    let dir = ctx.resolve(flags.operands.first().map_or(".", String::as_str));
    let names = ctx.fs.list_dir(dir.clone()).await?;

    if !flags.has('l') {
        let width = ctx.terminal_size.get().cols;
        ctx.sink.write_str(&print_in_columns(&names, width));
        return ok!(Some(0));
    }

    let mut rows = Vec::with_capacity(names.len());
    for name in names {
        // A vanished entry still gets a row.
        let len = ctx
            .fs
            .stat(dir.join(&name))
            .await
            .map_or(0, |it| it.len);
        let size = if flags.has('h') {
            format_bytes_human(len)
        } else {
            len.to_string()
        };
        rows.push((size, name));
    }

    let size_width = rows.iter().map(|(size, _)| size.len()).max().unwrap_or(0);
    for (size, name) in rows {
        ctx.sink.writeln(format!("{size:>size_width$} {name}"));
    }
    ok!(Some(0))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_fixtures::run_builtin;

    fn fs() -> fsh_tui::MemoryFileSystem {
        fsh_tui::MemoryFileSystem::new()
            .with_file("/src/main.rs", &"x".repeat(1337))
            .with_file("/src/lib.rs", "abc")
            .with_dir("/src/bin")
    }

    #[tokio::test]
    async fn test_ls_columns() {
        let (exit_code, output) = run_builtin(Ls, fs(), "ls src").await;
        assert_eq!(exit_code, Some(0));
        assert_eq!(output, "bin      lib.rs   main.rs  \r\n");
    }

    #[tokio::test]
    async fn test_ls_long_human() {
        let (exit_code, output) = run_builtin(Ls, fs(), "ls -l -h /src").await;
        assert_eq!(exit_code, Some(0));
        assert_eq!(output, "    0 B bin\r\n    3 B lib.rs\r\n1.34 kB main.rs\r\n");
    }

    #[tokio::test]
    async fn test_ls_long_raw_sizes() {
        let (_, output) = run_builtin(Ls, fs(), "ls -lh").await;
        assert_eq!(output, "0 B src\r\n");
        let (_, output) = run_builtin(Ls, fs(), "ls -l src").await;
        assert_eq!(output, "   0 bin\r\n   3 lib.rs\r\n1337 main.rs\r\n");
    }

    #[tokio::test]
    async fn test_ls_missing_dir() {
        let (exit_code, output) = run_builtin(Ls, fs(), "ls nope").await;
        assert_eq!(exit_code, Some(1));
        assert_eq!(output, "ls: no such file or directory: /nope\r\n");
    }
}
