// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use fsh_tui::{CancelRegistrar, CommandHandler, ExitCode, ShellContext, exit_code_from,
              run_modal_editor};
use futures_util::{FutureExt, future::BoxFuture};

/// `vi [file]`. Runs the modal editor until it quits.
#[derive(Debug, Default, Clone, Copy)]
pub struct Vi;

impl CommandHandler for Vi {
    fn name(&self) -> &str { "vi" }

    fn description(&self) -> &'static str { "Text editor" }

    fn execute(
        &self,
        args: Vec<String>,
        ctx: ShellContext,
        _cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode> {
        async move {
            let result = run_modal_editor(&ctx, args.first().map(String::as_str))
                .await
                .map(|()| Some(0));
            exit_code_from(&ctx, self.name(), result)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use fsh_tui::{MemoryFileSystem, raw_keystrokes};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_fixtures::{new_builtin_context, run_in_context};

    #[tokio::test]
    async fn test_vi_writes_and_quits() {
        let fs = MemoryFileSystem::new();
        let (ctx, _stdout_mock) = new_builtin_context(Vi, fs.clone());

        let run = {
            let ctx = ctx.clone();
            tokio::spawn(async move { run_in_context(&Vi, &ctx, "vi hello.txt").await })
        };

        // Wait for the editor to own the input.
        while !ctx.capture.is_captured() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        for raw in raw_keystrokes("ihi\x1b:wq\r") {
            ctx.capture.try_forward(raw).unwrap();
        }

        assert_eq!(run.await.unwrap(), Some(0));
        assert_eq!(fs.file_contents("/hello.txt"), Some("hi".into()));
        assert!(!ctx.capture.is_captured());
    }

    #[tokio::test]
    async fn test_vi_refuses_when_input_is_captured() {
        let (ctx, stdout_mock) = new_builtin_context(Vi, MemoryFileSystem::new());
        let _held = ctx.capture.acquire("ssh").unwrap();

        assert_eq!(run_in_context(&Vi, &ctx, "vi").await, Some(1));
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "vi: input is already captured by ssh\r\n"
        );
    }
}
