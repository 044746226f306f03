// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::PathBuf;

use fsh_tui::{CancelRegistrar, CommandHandler, ExitCode, IniDocument, SECTION_ALIAS,
              ShellContext, ShellError, exit_code_from, ok};
use futures_util::{FutureExt, future::BoxFuture};

pub const ALIAS_USAGE: &str = "Usage: alias [name[=expansion]]";

/// `alias` lists aliases, `alias name` shows one, `alias name=expansion` defines one
/// and persists it to the `[alias]` section of the config file.
#[derive(Debug, Default, Clone, Copy)]
pub struct Alias;

impl CommandHandler for Alias {
    fn name(&self) -> &str { "alias" }

    fn description(&self) -> &'static str { "Define or list aliases" }

    fn execute(
        &self,
        args: Vec<String>,
        ctx: ShellContext,
        _cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode> {
        async move {
            let result = run_alias(&ctx, &args.join(" ")).await;
            exit_code_from(&ctx, self.name(), result)
        }
        .boxed()
    }
}

fn format_alias(name: &str, expansion: &str) -> String { format!("alias {name}='{expansion}'") }

/// Remove one pair of matching surrounding quotes.
fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() > 1
            && let Some(inner) = text.strip_prefix(quote).and_then(|it| it.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}

async fn run_alias(ctx: &ShellContext, line: &str) -> Result<ExitCode, ShellError> {
    let aliases = ctx.router().aliases();
    let line = line.trim();

    if line.is_empty() {
        for (name, expansion) in aliases.iter() {
            ctx.sink.writeln(format_alias(name, expansion));
        }
        return ok!(Some(0));
    }

    let Some((name, expansion)) = line.split_once('=') else {
        return match aliases.get(line) {
            Some(expansion) => {
                ctx.sink.writeln(format_alias(line, expansion));
                ok!(Some(0))
            }
            None => {
                ctx.sink.writeln(format!("alias: {line}: not found"));
                ok!(Some(1))
            }
        };
    };

    let name = name.trim();
    let expansion = unquote(expansion.trim());
    if name.is_empty() || name.contains(char::is_whitespace) || expansion.is_empty() {
        return Err(ShellError::usage(ALIAS_USAGE));
    }

    ctx.router().set_alias(name, expansion);
    if let Some(config_file) = &ctx.config_file {
        persist_alias(ctx, config_file.clone(), name, expansion).await?;
    }
    ok!(Some(0))
}

/// Patch the alias into the config file, creating the file if needed.
async fn persist_alias(
    ctx: &ShellContext,
    config_file: PathBuf,
    name: &str,
    expansion: &str,
) -> Result<(), ShellError> {
    let text = match ctx.fs.read_to_string(config_file.clone()).await {
        Ok(it) => it,
        Err(error) if error.is_not_found() => String::new(),
        Err(error) => return Err(error.into()),
    };
    let mut doc = IniDocument::parse(&text);
    doc.set(SECTION_ALIAS, name, expansion);
    ctx.fs.write(config_file.clone(), doc.to_string()).await?;

    // % is Display, ? is Debug.
    tracing::debug!(message = "alias saved", name, config_file = %config_file.display());
    ok!()
}
