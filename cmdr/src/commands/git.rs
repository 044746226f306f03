// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

use fsh_tui::{CancelRegistrar, CommandHandler, EXIT_CODE_CANCELED, ExitCode, ShellContext,
              ShellError, exit_code_from, ok};
use futures_util::{FutureExt, future::BoxFuture};

use crate::{Author, DeviceFlowPoller, RemoteEvent, RemoteOperation, VersionControl,
            format_branches, format_log, format_status, format_tags, parse_args};

pub const GIT_USAGE: &str = "Usage: git <command> [args]";
/// Flags that never take a value, so `checkout -b feature` keeps `feature` as the ref.
const SWITCHES: [&str; 4] = ["hard", "b", "B", "create"];

/// `git <command>`. Every subcommand is delegated to the [`VersionControl`] service,
/// `--directory <dir>` picks the repository (default: the working directory). When a
/// remote asks for credentials they are obtained through the [`DeviceFlowPoller`].
#[derive(Debug, Clone)]
pub struct Git {
    pub version_control: Arc<dyn VersionControl>,
    pub device_flow: Arc<dyn DeviceFlowPoller>,
}

impl CommandHandler for Git {
    fn name(&self) -> &str { "git" }

    fn description(&self) -> &'static str { "Version control" }

    fn execute(
        &self,
        args: Vec<String>,
        ctx: ShellContext,
        cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode> {
        async move {
            let result = self.run_git(&ctx, &args, cancel).await;
            exit_code_from(&ctx, self.name(), result)
        }
        .boxed()
    }
}

/// Print text returned by the service, if there is any.
fn write_text(ctx: &ShellContext, text: &str) {
    let text = text.trim_end();
    if !text.is_empty() {
        ctx.sink.write_lines(text);
        ctx.sink.writeln("");
    }
}

fn require_positional(positionals: &[String], usage: &str) -> Result<(), ShellError> {
    if positionals.is_empty() {
        return Err(ShellError::usage(usage));
    }
    ok!()
}

impl Git {
    async fn run_git(
        &self,
        ctx: &ShellContext,
        args: &[String],
        cancel: CancelRegistrar,
    ) -> Result<ExitCode, ShellError> {
        let Some(command) = args.first() else {
            return Err(ShellError::usage(GIT_USAGE));
        };
        let parsed = parse_args(&args[1..], &SWITCHES);
        let dir = parsed.directory(ctx);
        let vcs = &self.version_control;

        // % is Display, ? is Debug.
        tracing::debug!(message = "git", %command, dir = %dir.display());

        match command.as_str() {
            "status" => write_text(ctx, &format_status(&vcs.status(dir).await?)),
            "add" => {
                require_positional(&parsed.positionals, "Usage: git add <path>")?;
                write_text(ctx, &vcs.add(dir, parsed.positionals).await?);
            }
            "commit" => {
                let Some(message) = parsed.flag_value(&["m", "message"]) else {
                    return Err(ShellError::usage("Usage: git commit -m <message>"));
                };
                let author = match (parsed.flag_value(&["name"]), parsed.flag_value(&["email"])) {
                    (Some(name), Some(email)) => Some(Author {
                        name: name.into(),
                        email: email.into(),
                    }),
                    (None, None) => None,
                    _ => {
                        return Err(ShellError::usage(
                            "Usage: git commit -m <message> --name <name> --email <email>",
                        ));
                    }
                };
                write_text(ctx, &vcs.commit(dir, message.into(), author).await?);
            }
            "log" => write_text(ctx, &format_log(&vcs.log(dir).await?)),
            "branch" => write_text(ctx, &format_branches(&vcs.branches(dir).await?)),
            "tag" | "tags" => write_text(ctx, &format_tags(&vcs.tags(dir).await?)),
            "checkout" => {
                let Some(reference) = parsed.positionals.first() else {
                    return Err(ShellError::usage("Usage: git checkout <ref>"));
                };
                let create = parsed.has_flag(&SWITCHES[1..]);
                write_text(ctx, &vcs.checkout(dir, reference.clone(), create).await?);
            }
            "merge" => {
                let Some(branch) = parsed.positionals.first() else {
                    return Err(ShellError::usage("Usage: git merge <branch>"));
                };
                write_text(ctx, &vcs.merge(dir, branch.clone()).await?);
            }
            "reset" => {
                let hard = parsed.has_flag(&["hard"]);
                write_text(ctx, &vcs.reset(dir, hard, parsed.positionals).await?);
            }
            "restore" => {
                require_positional(&parsed.positionals, "Usage: git restore <paths>")?;
                write_text(ctx, &vcs.restore(dir, parsed.positionals).await?);
            }
            "clone" => {
                let Some(url) = parsed.positionals.first() else {
                    return Err(ShellError::usage("Usage: git clone <url>"));
                };
                let operation = vcs.clone_repo(url.clone(), dir);
                return self.follow_remote(ctx, operation, cancel).await;
            }
            "pull" => return self.follow_remote(ctx, vcs.pull(dir), cancel).await,
            "push" => return self.follow_remote(ctx, vcs.push(dir), cancel).await,
            _ => {
                ctx.sink.writeln(format!("Unknown git command: {command}"));
                return ok!(Some(1));
            }
        }

        ok!(Some(0))
    }

    /// Write a remote operation's output until it finishes. Credential requests are
    /// answered through the device flow. Ctrl-C aborts the operation.
    async fn follow_remote(
        &self,
        ctx: &ShellContext,
        mut operation: RemoteOperation,
        cancel: CancelRegistrar,
    ) -> Result<ExitCode, ShellError> {
        let mut canceled = cancel.register_oneshot()?;

        loop {
            let maybe_event = tokio::select! {
                // This branch is cancel safe because a oneshot receiver can be polled again.
                _ = &mut canceled => {
                    operation.abort();
                    return ok!(Some(EXIT_CODE_CANCELED));
                }
                // This branch is cancel safe because `recv` is cancel safe.
                it = operation.next() => it,
            };

            match maybe_event {
                Some(RemoteEvent::Output(bytes)) => {
                    ctx.sink.write_bytes(&bytes);
                }
                Some(RemoteEvent::AuthRequest(responder)) => {
                    tokio::select! {
                        // This branch is cancel safe because a oneshot receiver can be
                        // polled again.
                        _ = &mut canceled => {
                            operation.abort();
                            return ok!(Some(EXIT_CODE_CANCELED));
                        }
                        credentials = self.device_flow.poll(ctx.sink.clone()) => {
                            responder.respond(credentials);
                        }
                    }
                }
                Some(RemoteEvent::Done(result)) => {
                    if !ctx.sink.is_at_line_start() {
                        ctx.sink.writeln("");
                    }
                    return match result {
                        Ok(()) => ok!(Some(0)),
                        Err(message) => Err(ShellError::external(message)),
                    };
                }
                None => return ok!(Some(0)),
            }
        }
    }
}
