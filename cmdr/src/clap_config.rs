// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use clap::{Args, Parser};

/// More info: <https://docs.rs/clap/latest/clap/_derive/_tutorial/chapter_2/index.html>
#[derive(Debug, Parser)]
#[command(bin_name = "fsh")]
#[command(about = "🐚 An interactive shell for developers")]
#[command(version)]
#[command(next_line_help = true)]
#[command(arg_required_else_help(false))]
/// More info: <https://docs.rs/clap/latest/clap/struct.Command.html#method.help_template>
#[command(
      help_template = "{about}\nVersion: {bin} {version} 💻\n\nRun with no arguments for an interactive session, or pass a command line to run once.\nUSAGE 📓:\n  fsh [\x1b[34moptions\x1b[0m]\n\n[options]\n{options}"
  )]
pub struct CLIArg {
    #[arg(
        long,
        short = 'c',
        value_name = "LINE",
        help = "Run this command line (chains and aliases included) and exit with its code."
    )]
    pub command: Option<String>,

    #[arg(
        long,
        short = 'd',
        value_name = "DIR",
        help = "Start in this directory instead of the current one."
    )]
    pub directory: Option<String>,

    #[command(flatten)]
    pub global_options: GlobalOption,
}

#[derive(Debug, Args)]
pub struct GlobalOption {
    #[arg(
        global = true,
        long,
        short = 'l',
        help = "Log app output to `fsh.log` in the config folder for debugging."
    )]
    pub enable_logging: bool,
}
