// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::stdout,
          path::{Path, PathBuf},
          sync::Arc};

use crossterm::{event::EventStream,
                terminal::{disable_raw_mode, enable_raw_mode}};
use fsh_tui::{AliasTable, CommandRouter, LocalFileSystem, OutputSink, PinnedInputStream,
              RawInput, Session, SharedTerminalSize, ShellConfig, ShellContext, TerminalInput,
              TerminalSize, terminal_input_from_crossterm};
use futures_util::{StreamExt, future::ready};
use miette::IntoDiagnostic;

use crate::{CLIArg, ExitRequest, Services, get_config_file_path, new_builtin_registry,
            try_create_config_folder};

/// Read `config.ini`. A missing or unreadable file means the defaults.
#[must_use]
pub fn load_shell_config(config_file: &Path) -> ShellConfig {
    match std::fs::read_to_string(config_file) {
        Ok(text) => ShellConfig::parse(&text),
        Err(error) => {
            // % is Display, ? is Debug.
            tracing::debug!(
                message = "Using default config",
                config_file = %config_file.display(),
                %error
            );
            ShellConfig::default()
        }
    }
}

/// Wire the builtins, the configured aliases, and the local file system into a context
/// that starts in `cwd`.
#[must_use]
pub fn new_shell_context(
    services: &Services,
    exit_request: ExitRequest,
    config: &ShellConfig,
    sink: OutputSink,
    cwd: PathBuf,
) -> ShellContext {
    let registry = new_builtin_registry(services, exit_request);
    let aliases = config.aliases.iter().cloned().collect::<AliasTable>();
    let router = Arc::new(CommandRouter::new(registry, aliases));
    ShellContext::new(sink, Arc::new(LocalFileSystem), cwd, router)
}

/// Run one line and return its exit code, unless `exit` asked for another one.
pub async fn run_once(ctx: &ShellContext, exit_request: &ExitRequest, line: &str) -> i32 {
    let exit_code = ctx.execute_line(line).await;
    exit_request.requested().unwrap_or(exit_code)
}

/// Raw keystrokes from the terminal until it closes or `exit` runs. Resize events update
/// `terminal_size` and are not passed on.
fn terminal_input(
    terminal_size: SharedTerminalSize,
    exit_request: ExitRequest,
) -> PinnedInputStream<RawInput> {
    let raw_input = EventStream::new().filter_map(move |maybe_event| {
        let it = match maybe_event.ok().and_then(terminal_input_from_crossterm) {
            Some(TerminalInput::Raw(raw)) => Some(raw),
            Some(TerminalInput::Resize(size)) => {
                terminal_size.set(size);
                None
            }
            None => None,
        };
        ready(it)
    });
    Box::pin(raw_input.take_until(async move { exit_request.wait().await }))
}

/// Run an interactive session on the real terminal.
///
/// # Errors
///
/// Returns an error if raw mode can't be turned on.
pub async fn run_interactive(
    ctx: ShellContext,
    config: &ShellConfig,
    exit_request: ExitRequest,
) -> miette::Result<i32> {
    enable_raw_mode().into_diagnostic()?;
    ctx.sink.writeln(format!(
        "Welcome to fsh {}. Type `help` to list the builtins.",
        env!("CARGO_PKG_VERSION")
    ));

    let input = terminal_input(ctx.terminal_size.clone(), exit_request.clone());
    let sink = ctx.sink.clone();
    let exit_code = Session::new(ctx, config).run(input).await;

    if !sink.is_at_line_start() {
        sink.writeln("");
    }
    disable_raw_mode().into_diagnostic()?;
    Ok(exit_request.requested().unwrap_or(exit_code))
}

/// The directory the shell starts in: `directory` resolved against the process cwd, or
/// the process cwd itself.
///
/// # Errors
///
/// Returns an error if the result isn't an existing directory.
pub fn resolve_start_dir(directory: Option<&str>) -> miette::Result<PathBuf> {
    let cwd = match directory {
        Some(dir) => std::path::absolute(dir).into_diagnostic()?,
        None => std::env::current_dir().into_diagnostic()?,
    };
    if !cwd.is_dir() {
        miette::bail!("Not a directory: {}", cwd.display());
    }
    Ok(cwd)
}

/// Figure out the config folder and starting directory, then run `cli_arg.command`
/// once or an interactive session.
///
/// # Errors
///
/// Returns an error if the starting directory doesn't exist or the terminal can't be
/// set up.
pub async fn run_shell(cli_arg: CLIArg) -> miette::Result<i32> {
    let cwd = resolve_start_dir(cli_arg.directory.as_deref())?;

    // Without a config folder aliases still work, they just aren't saved.
    let config_file = try_create_config_folder()
        .ok()
        .map(|folder| get_config_file_path(&folder));
    let config = config_file
        .as_deref()
        .map(load_shell_config)
        .unwrap_or_default();

    let exit_request = ExitRequest::new();
    let mut ctx = new_shell_context(
        &Services::system(),
        exit_request.clone(),
        &config,
        OutputSink::new(stdout()),
        cwd,
    )
    .with_terminal_size(SharedTerminalSize::new(TerminalSize::detect()));
    if let Some(config_file) = config_file {
        ctx = ctx.with_config_file(config_file);
    }

    // % is Display, ? is Debug.
    tracing::debug!(message = "Starting fsh", cwd = %ctx.cwd().display(), ?config);

    match &cli_arg.command {
        Some(line) => Ok(run_once(&ctx, &exit_request, line).await),
        None => run_interactive(ctx, &config, exit_request).await,
    }
}

#[cfg(test)]
mod tests {
    use fsh_tui::{StdoutMock, try_create_temp_dir};
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;
    use crate::test_fixtures::fake_services;

    fn new_context(cwd: &Path, config: &ShellConfig) -> (ShellContext, StdoutMock, ExitRequest) {
        let stdout_mock = StdoutMock::new();
        let exit_request = ExitRequest::new();
        let ctx = new_shell_context(
            &fake_services(),
            exit_request.clone(),
            config,
            OutputSink::new(stdout_mock.clone()),
            cwd.to_path_buf(),
        );
        (ctx, stdout_mock, exit_request)
    }

    #[test]
    fn test_load_shell_config() {
        let temp_dir = try_create_temp_dir().unwrap();
        let config_file = temp_dir.join("config.ini");

        assert_eq!(load_shell_config(&config_file), ShellConfig::default());

        std::fs::write(&config_file, "[shell]\nhistory_size = 5\n\n[alias]\nll = ls -l\n")
            .unwrap();
        let config = load_shell_config(&config_file);
        assert_eq!(config.history_size, 5);
        assert_eq!(config.aliases, vec![("ll".to_string(), "ls -l".to_string())]);
    }

    #[test]
    #[serial]
    fn test_resolve_start_dir_against_process_cwd() {
        let temp_dir = try_create_temp_dir().unwrap();
        std::fs::create_dir_all(temp_dir.join("project")).unwrap();
        std::fs::write(temp_dir.join("notes.txt"), "").unwrap();
        let saved_cwd = std::env::current_dir().unwrap();
        std::env::set_current_dir(&*temp_dir).unwrap();

        let project = resolve_start_dir(Some("project"));
        let process_cwd = resolve_start_dir(None);
        let not_a_dir = resolve_start_dir(Some("notes.txt"));
        std::env::set_current_dir(saved_cwd).unwrap();

        assert!(project.unwrap().ends_with("project"));
        assert!(process_cwd.unwrap().is_dir());
        assert!(not_a_dir.is_err());
    }

    #[tokio::test]
    async fn test_run_once_on_local_file_system() {
        let temp_dir = try_create_temp_dir().unwrap();
        let config = ShellConfig::parse("[alias]\nmk = mkdir -p\n");
        let (ctx, _stdout_mock, exit_request) = new_context(&temp_dir, &config);

        let exit_code = run_once(&ctx, &exit_request, "mk a/b && cd a").await;

        assert_eq!(exit_code, 0);
        assert!(temp_dir.join("a/b").is_dir());
        assert_eq!(ctx.cwd(), temp_dir.join("a"));
    }

    #[tokio::test]
    async fn test_exit_code_wins() {
        let temp_dir = try_create_temp_dir().unwrap();
        let (ctx, _stdout_mock, exit_request) = new_context(&temp_dir, &ShellConfig::default());

        assert_eq!(run_once(&ctx, &exit_request, "exit 3").await, 3);
        assert_eq!(exit_request.requested(), Some(3));
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let temp_dir = try_create_temp_dir().unwrap();
        let (ctx, stdout_mock, exit_request) = new_context(&temp_dir, &ShellConfig::default());

        assert_eq!(run_once(&ctx, &exit_request, "frobnicate").await, 1);
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "command not found: frobnicate\r\n"
        );
    }
}
