// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use clap::Parser;
use fsh_cmdr::{CLIArg, get_log_file_path, run_shell, try_create_config_folder};
use fsh_tui::{TracingConfig, setup_default_miette_global_report_handler,
              try_initialize_logging_global};

const ISSUES_FOOTER: &str = "Run with `-l` and check fsh.log in the config folder for details.";

#[tokio::main]
async fn main() -> miette::Result<()> {
    setup_default_miette_global_report_handler(ISSUES_FOOTER);

    let cli_arg = CLIArg::parse();

    let enable_logging = cli_arg.global_options.enable_logging;
    enable_logging.then(|| {
        let log_file = try_create_config_folder()
            .ok()
            .map(|folder| get_log_file_path(&folder).display().to_string());
        try_initialize_logging_global(TracingConfig::new_file(log_file, tracing::Level::DEBUG))
            .ok();
        // % is Display, ? is Debug.
        tracing::debug!(message = "Start logging...", cli_arg = ?cli_arg);
    });

    let exit_code = run_shell(cli_arg).await?;

    enable_logging.then(|| {
        tracing::debug!(message = "Stop logging...", exit_code);
    });

    std::process::exit(exit_code);
}
