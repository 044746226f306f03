// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

use futures_util::{FutureExt, future::BoxFuture};

use crate::{AliasTable, CommandRegistry, EXIT_CODE_CANCELED, EXIT_CODE_FAILURE,
            EXIT_CODE_SUCCESS, ShellContext, StdMutex, lock_or_recover, split_chain,
            tokenize};

/// Splits a submitted line into `&&` chained sub-commands, expands aliases, and
/// dispatches each sub-command to its handler, strictly one after the other. The first
/// nonzero exit code halts the chain and becomes the result of the line.
#[derive(Debug)]
pub struct CommandRouter {
    registry: CommandRegistry,
    aliases: StdMutex<AliasTable>,
}

impl CommandRouter {
    #[must_use]
    pub fn new(registry: CommandRegistry, aliases: AliasTable) -> Self {
        Self {
            registry,
            aliases: StdMutex::new(aliases),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &CommandRegistry { &self.registry }

    #[must_use]
    pub fn aliases(&self) -> AliasTable { lock_or_recover(&self.aliases).clone() }

    pub fn set_alias(&self, name: impl Into<String>, expansion: impl Into<String>) {
        lock_or_recover(&self.aliases).insert(name, expansion);
    }

    /// Run a whole line. The future is `'static` so the session can poll it alongside
    /// input.
    pub fn execute_line(
        self: &Arc<Self>,
        line: impl Into<String>,
        ctx: ShellContext,
    ) -> BoxFuture<'static, i32> {
        run_chain(self.clone(), line.into(), ctx, vec![])
    }

    fn resolve_alias(&self, sub_command: &str, expanding: &[String]) -> Option<(String, String)> {
        lock_or_recover(&self.aliases).resolve(sub_command, expanding)
    }

    async fn dispatch(&self, sub_command: &str, ctx: &ShellContext) -> i32 {
        let mut tokens = tokenize(sub_command).into_iter();
        let Some(name) = tokens.next() else {
            return EXIT_CODE_SUCCESS;
        };
        let args = tokens.collect::<Vec<_>>();

        let Some(handler) = self.registry.get(&name) else {
            ctx.sink.writeln(format!("command not found: {name}"));
            return EXIT_CODE_FAILURE;
        };

        // % is Display, ? is Debug.
        tracing::debug!(message = "dispatch", command = %name, args = ?args);
        let registrar = ctx.cancel.begin_invocation();
        let exit_code = handler
            .execute(args, ctx.clone(), registrar)
            .await
            .unwrap_or(EXIT_CODE_SUCCESS);
        let canceled = ctx.cancel.finish_invocation();
        tracing::debug!(message = "settled", command = %name, exit_code, canceled);

        if canceled { EXIT_CODE_CANCELED } else { exit_code }
    }
}

fn run_chain(
    router: Arc<CommandRouter>,
    line: String,
    ctx: ShellContext,
    expanding: Vec<String>,
) -> BoxFuture<'static, i32> {
    async move {
        let sub_commands = split_chain(&line);
        tracing::debug!(message = "chain", sub_commands = ?sub_commands);

        for sub_command in sub_commands {
            let exit_code = match router.resolve_alias(&sub_command, &expanding) {
                Some((alias, expansion)) => {
                    tracing::debug!(message = "alias", %alias, %expansion);
                    let mut expanding = expanding.clone();
                    expanding.push(alias);
                    run_chain(router.clone(), expansion, ctx.clone(), expanding).await
                }
                None => router.dispatch(&sub_command, &ctx).await,
            };
            if exit_code != EXIT_CODE_SUCCESS {
                return exit_code;
            }
        }
        EXIT_CODE_SUCCESS
    }
    .boxed()
}
