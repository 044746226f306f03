// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use fsh_tui::{CancelRegistrar, CommandHandler, ExitCode, ShellContext};
use futures_util::{FutureExt, future::BoxFuture};

/// `help`. One line per registered command, then the aliases.
#[derive(Debug, Default, Clone, Copy)]
pub struct Help;

impl CommandHandler for Help {
    fn name(&self) -> &str { "help" }

    fn description(&self) -> &'static str { "Show this help" }

    fn execute(
        &self,
        _args: Vec<String>,
        ctx: ShellContext,
        _cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode> {
        async move {
            let mut handlers = ctx.router().registry().handlers().cloned().collect::<Vec<_>>();
            handlers.sort_by(|a, b| a.name().cmp(b.name()));
            let name_width = handlers.iter().map(|it| it.name().len()).max().unwrap_or(0);

            for handler in &handlers {
                let line = format!("  {:name_width$}  {}", handler.name(), handler.description());
                ctx.sink.writeln(line.trim_end());
            }

            let aliases = ctx.router().aliases();
            if !aliases.is_empty() {
                ctx.sink.writeln("");
                ctx.sink.writeln("Aliases:");
                for (name, expansion) in aliases.iter() {
                    ctx.sink.writeln(format!("  {name} = {expansion}"));
                }
            }
            Some(0)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fsh_tui::{AliasTable, CommandRegistry, CommandRouter, RecordingCommand,
                  new_test_context};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Cat, test_fixtures::run_in_context};

    #[tokio::test]
    async fn test_help_lists_commands_and_aliases() {
        let recording = RecordingCommand::default();
        let registry = CommandRegistry::new()
            .with(Help)
            .with(Cat)
            .with(recording.named("zz", Some(0)));
        let aliases = AliasTable::from_iter([("c", "cat")]);
        let (ctx, stdout_mock) =
            new_test_context(Arc::new(CommandRouter::new(registry, aliases)));

        assert_eq!(run_in_context(&Help, &ctx, "help").await, Some(0));
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "  cat   Print a file\r\n  help  Show this help\r\n  zz\r\n\r\nAliases:\r\n  c = cat\r\n"
        );
    }
}
