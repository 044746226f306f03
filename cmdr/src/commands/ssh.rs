// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

use fsh_tui::{CancelRegistrar, CommandHandler, EXIT_CODE_CANCELED, ExitCode, RawInput,
              ShellContext, ShellError, exit_code_from, ok};
use futures_util::{FutureExt, future::BoxFuture};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{RemoteShellEvent, RemoteShellTransport};

pub const SSH_USAGE: &str = "usage: ssh [user@]host";
pub const CAPTURE_OWNER_SSH: &str = "ssh";

const CTRL_C: &str = "\x03";
const BACKSPACE_KEYS: [&str; 2] = ["\x7f", "\x08"];
const ENTER_KEYS: [&str; 2] = ["\r", "\n"];

/// `ssh [user@]host`. Owns the input for the whole session: the username and password
/// prompts are read from captured keystrokes, then every keystroke (Ctrl-C included)
/// goes to the remote until it hangs up.
#[derive(Debug, Clone)]
pub struct Ssh {
    pub transport: Arc<dyn RemoteShellTransport>,
}

/// How a prompt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PromptResult {
    Line(String),
    Interrupted,
    InputClosed,
}

impl CommandHandler for Ssh {
    fn name(&self) -> &str { "ssh" }

    fn description(&self) -> &'static str { "Connect to a remote shell" }

    fn execute(
        &self,
        args: Vec<String>,
        ctx: ShellContext,
        _cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode> {
        async move {
            let result = self.run_ssh(&ctx, &args).await;
            exit_code_from(&ctx, self.name(), result)
        }
        .boxed()
    }
}

/// Read keystrokes until Enter. Hidden prompts echo nothing.
async fn read_prompt(
    ctx: &ShellContext,
    input: &mut UnboundedReceiver<RawInput>,
    prompt: &str,
    hidden: bool,
) -> PromptResult {
    ctx.sink.write_str(prompt);
    let mut acc = String::new();

    loop {
        let Some(raw) = input.recv().await else {
            ctx.sink.writeln("");
            return PromptResult::InputClosed;
        };
        let raw = raw.as_str();
        if ENTER_KEYS.contains(&raw) {
            ctx.sink.writeln("");
            return PromptResult::Line(acc);
        }
        if raw == CTRL_C {
            ctx.sink.writeln("^C");
            return PromptResult::Interrupted;
        }
        if BACKSPACE_KEYS.contains(&raw) {
            if acc.pop().is_some() && !hidden {
                ctx.sink.write_str("\x08 \x08");
            }
            continue;
        }
        // Arrow keys and other control input.
        if raw.chars().any(char::is_control) {
            continue;
        }
        acc.push_str(raw);
        if !hidden {
            ctx.sink.write_str(raw);
        }
    }
}

impl Ssh {
    async fn run_ssh(&self, ctx: &ShellContext, args: &[String]) -> Result<ExitCode, ShellError> {
        let Some(target) = args.iter().find(|it| !it.starts_with('-')) else {
            return Err(ShellError::usage(SSH_USAGE));
        };
        let (user, host) = match target.split_once('@') {
            Some((user, host)) => (user.to_string(), host.to_string()),
            None => (String::new(), target.clone()),
        };
        if host.is_empty() {
            return Err(ShellError::usage(SSH_USAGE));
        }

        let (capture_handle, mut input) = ctx.capture.acquire(CAPTURE_OWNER_SSH)?;

        let user = if user.is_empty() {
            match read_prompt(ctx, &mut input, "login as: ", false).await {
                PromptResult::Line(line) => line.trim().to_string(),
                PromptResult::Interrupted => return ok!(Some(EXIT_CODE_CANCELED)),
                PromptResult::InputClosed => String::new(),
            }
        } else {
            user
        };
        if user.is_empty() {
            return Err(ShellError::usage("Username required"));
        }

        let password_prompt = format!("{user}@{host}'s password: ");
        let password = match read_prompt(ctx, &mut input, &password_prompt, true).await {
            PromptResult::Line(line) => line,
            PromptResult::Interrupted => return ok!(Some(EXIT_CODE_CANCELED)),
            PromptResult::InputClosed => return ok!(Some(1)),
        };

        ctx.sink.writeln(format!("Connecting to {user}@{host}..."));
        // % is Display, ? is Debug.
        tracing::debug!(message = "ssh connect", %user, %host);
        let mut session = self.transport.connect(
            &host,
            &user,
            (!password.is_empty()).then_some(password.as_str()),
        );

        let mut input_open = true;
        let mut failed = false;
        loop {
            tokio::select! {
                // This branch is cancel safe because `recv` is cancel safe.
                maybe_raw = input.recv(), if input_open => {
                    match maybe_raw {
                        Some(raw) => {
                            session.send(raw.into_bytes());
                        }
                        None => {
                            input_open = false;
                            session.close();
                        }
                    }
                }

                // This branch is cancel safe because `recv` is cancel safe.
                maybe_event = session.events.next() => {
                    match maybe_event {
                        Some(RemoteShellEvent::Data(bytes)) => {
                            ctx.sink.write_bytes(&bytes);
                        }
                        Some(RemoteShellEvent::Error(message)) => {
                            failed = true;
                            ctx.sink.writeln(format!("SSH Error: {message}"));
                        }
                        Some(RemoteShellEvent::Close) | None => break,
                    }
                }
            }
        }

        capture_handle.release();
        ctx.sink.writeln(format!("\r\nConnection to {host} closed."));
        // % is Display, ? is Debug.
        tracing::debug!(message = "ssh closed", %host, failed);
        ok!(Some(i32::from(failed)))
    }
}
