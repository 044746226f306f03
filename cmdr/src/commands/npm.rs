// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::BTreeMap,
          sync::Arc};

use fsh_tui::{CancelRegistrar, CommandHandler, EXIT_CODE_CANCELED, ExitCode, ShellContext,
              ShellError, exit_code_from, ok};
use futures_util::{FutureExt, future::BoxFuture};
use serde::Deserialize;

use crate::{PackageEvent, PackageOperation, PackageService, format_progress, parse_args};

pub const NPM_USAGE: &str = "Usage: npm <run|start|restart|test|install|uninstall|audit>";
pub const PACKAGE_JSON: &str = "package.json";
/// Lifecycle commands that don't need `run`.
const SCRIPT_COMMANDS: [&str; 4] = ["run", "start", "restart", "test"];
const SAVE_DEV_SWITCHES: [&str; 2] = ["D", "save-dev"];

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    #[serde(default)]
    scripts: BTreeMap<String, String>,
}

/// `npm`. Script commands run `package.json` scripts through the router, so scripts
/// can use aliases and `&&`. Everything else goes to the [`PackageService`].
#[derive(Debug, Clone)]
pub struct Npm {
    pub packages: Arc<dyn PackageService>,
}

impl CommandHandler for Npm {
    fn name(&self) -> &str { "npm" }

    fn description(&self) -> &'static str { "Run package scripts and manage packages" }

    fn execute(
        &self,
        args: Vec<String>,
        ctx: ShellContext,
        cancel: CancelRegistrar,
    ) -> BoxFuture<'_, ExitCode> {
        async move {
            let result = match args.first().map(String::as_str) {
                None => Err(ShellError::usage(NPM_USAGE)),
                Some(command) if SCRIPT_COMMANDS.contains(&command) => {
                    run_script_command(&ctx, command, &args[1..]).await
                }
                Some(command) => self.run_package_command(&ctx, command, &args[1..], cancel).await,
            };
            exit_code_from(&ctx, self.name(), result)
        }
        .boxed()
    }
}

async fn load_scripts(ctx: &ShellContext) -> Result<BTreeMap<String, String>, ShellError> {
    let path = ctx.cwd().join(PACKAGE_JSON);
    let text = match ctx.fs.read_to_string(path).await {
        Ok(it) => it,
        Err(error) if error.is_not_found() => {
            return Err(ShellError::usage("npm: package.json not found"));
        }
        Err(error) => return Err(error.into()),
    };
    let package_json: PackageJson = serde_json::from_str(&text)
        .map_err(|_| ShellError::usage("npm: failed to parse package.json"))?;
    ok!(package_json.scripts)
}

async fn run_script_command(
    ctx: &ShellContext,
    command: &str,
    args: &[String],
) -> Result<ExitCode, ShellError> {
    let scripts = load_scripts(ctx).await?;

    let target = match (command, args.first()) {
        ("run", None) => {
            ctx.sink.writeln("Scripts available:");
            for name in scripts.keys() {
                ctx.sink.writeln(format!("  {name}"));
            }
            return ok!(Some(0));
        }
        ("run", Some(name)) => name.as_str(),
        (command, _) => command,
    };

    // Without a restart script, restart means stop (if there is one) then start.
    if target == "restart" && !scripts.contains_key("restart") {
        let exit_code = run_script(ctx, &scripts, "stop").await;
        if exit_code != 0 {
            return ok!(Some(exit_code));
        }
        return ok!(Some(run_required_script(ctx, &scripts, "start").await));
    }

    ok!(Some(run_required_script(ctx, &scripts, target).await))
}

async fn run_required_script(
    ctx: &ShellContext,
    scripts: &BTreeMap<String, String>,
    name: &str,
) -> i32 {
    if !scripts.contains_key(name) {
        ctx.sink.writeln(format!("npm ERR! missing script: {name}"));
        return 1;
    }
    run_script(ctx, scripts, name).await
}

/// Run `pre<name>`, `<name>`, `post<name>`, stopping at the first failure. Missing
/// scripts are skipped, and pre scripts get their own pre scripts.
fn run_script<'a>(
    ctx: &'a ShellContext,
    scripts: &'a BTreeMap<String, String>,
    name: &'a str,
) -> BoxFuture<'a, i32> {
    async move {
        let Some(script) = scripts.get(name) else {
            return 0;
        };

        let pre_exit_code = run_script(ctx, scripts, &format!("pre{name}")).await;
        if pre_exit_code != 0 {
            return pre_exit_code;
        }

        ctx.sink.writeln(format!("> {name}"));
        ctx.sink.writeln(format!("> {script}"));
        // % is Display, ? is Debug.
        tracing::debug!(message = "npm script", %name, %script);
        let exit_code = ctx.execute_line(script.clone()).await;
        if exit_code != 0 {
            return exit_code;
        }

        // Post scripts don't get pre scripts of their own here.
        match scripts.get(&format!("post{name}")) {
            Some(post_script) => {
                ctx.sink.writeln(format!("> post{name}"));
                ctx.sink.writeln(format!("> {post_script}"));
                ctx.execute_line(post_script.clone()).await
            }
            None => 0,
        }
    }
    .boxed()
}

impl Npm {
    async fn run_package_command(
        &self,
        ctx: &ShellContext,
        command: &str,
        args: &[String],
        cancel: CancelRegistrar,
    ) -> Result<ExitCode, ShellError> {
        let parsed = parse_args(args, &SAVE_DEV_SWITCHES);
        let dir = parsed.directory(ctx);

        match command {
            "install" | "i" => {
                let save_dev = parsed.has_flag(&SAVE_DEV_SWITCHES);
                let operation = self.packages.install(dir, save_dev, parsed.positionals);
                follow_operation(ctx, operation, cancel, "added").await
            }
            "uninstall" | "remove" | "rm" => {
                if parsed.positionals.is_empty() {
                    return Err(ShellError::usage("Usage: npm uninstall <package...>"));
                }
                let operation = self.packages.uninstall(dir, parsed.positionals);
                follow_operation(ctx, operation, cancel, "removed").await
            }
            "audit" => {
                let report = self.packages.audit(dir).await?;
                let text = serde_json::to_string_pretty(&report)
                    .map_err(|error| ShellError::external(error.to_string()))?;
                ctx.sink.write_lines(&text);
                ctx.sink.writeln("");
                ok!(Some(0))
            }
            _ => {
                ctx.sink.writeln(format!("Unknown packages command: {command}"));
                ok!(Some(1))
            }
        }
    }
}

/// Print progress until the operation ends or Ctrl-C stops it.
async fn follow_operation(
    ctx: &ShellContext,
    mut operation: PackageOperation,
    cancel: CancelRegistrar,
    verb: &str,
) -> Result<ExitCode, ShellError> {
    let mut canceled = cancel.register_oneshot()?;

    loop {
        tokio::select! {
            // This branch is cancel safe because a oneshot receiver can be polled again.
            _ = &mut canceled => {
                operation.abort();
                return ok!(Some(EXIT_CODE_CANCELED));
            }

            // This branch is cancel safe because `recv` is cancel safe.
            maybe_event = operation.next() => {
                match maybe_event {
                    Some(PackageEvent::Progress(items)) => {
                        for item in &items {
                            ctx.sink.writeln(format_progress(item));
                        }
                    }
                    Some(PackageEvent::Done { count }) => {
                        let plural = if count == 1 { "" } else { "s" };
                        ctx.sink.writeln(format!("{verb} {count} package{plural}"));
                        return ok!(Some(0));
                    }
                    Some(PackageEvent::Failed(message)) => {
                        return Err(ShellError::external(message));
                    }
                    // Ended without saying how.
                    None => return ok!(Some(0)),
                }
            }
        }
    }
}
