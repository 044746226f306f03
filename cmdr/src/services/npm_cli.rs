// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::{Path, PathBuf};

use fsh_tui::ShellError;
use futures_util::{FutureExt, future::BoxFuture};
use tokio::{process::Command, sync::mpsc::UnboundedSender};

use crate::{PackageEvent, PackageOperation, PackageProgress, PackageService,
            process_runner::run_to_completion, spawn_service_stream};

pub const NPM_PROGRAM: &str = "npm";

/// [`PackageService`] backed by the `npm` program. npm has no machine readable
/// progress, so each requested package is reported when the run starts and again when
/// it finishes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NpmCli;

fn npm_in(dir: &Path) -> Command {
    let mut command = Command::new(NPM_PROGRAM);
    command
        .current_dir(dir)
        .args(["--no-fund", "--no-progress", "--color=false"]);
    command
}

fn progress_for(packages: &[String], stage: &str, progress: f64) -> Vec<PackageProgress> {
    packages
        .iter()
        .map(|spec| {
            let (name, version) = split_package_spec(spec);
            PackageProgress {
                stage: stage.to_string(),
                name,
                version,
                progress: Some(progress),
            }
        })
        .collect()
}

/// Split `name@version` (scoped names keep their leading `@`).
#[must_use]
pub fn split_package_spec(spec: &str) -> (String, Option<String>) {
    let search_from = usize::from(spec.starts_with('@'));
    match spec[search_from..].find('@') {
        Some(at) => {
            let at = at + search_from;
            (spec[..at].to_string(), Some(spec[at + 1..].to_string()))
        }
        None => (spec.to_string(), None),
    }
}

/// The package count from npm's summary line, eg: `added 3 packages in 2s`.
#[must_use]
pub fn parse_package_count(output: &str) -> Option<usize> {
    output.lines().find_map(|line| {
        let mut words = line.split_whitespace();
        match words.next()? {
            "added" | "removed" | "changed" | "up" => {}
            _ => return None,
        }
        words.find_map(|it| it.parse::<usize>().ok())
    })
}

async fn run_npm(
    dir: PathBuf,
    args: Vec<String>,
    packages: Vec<String>,
    sender: UnboundedSender<PackageEvent>,
) {
    let (start_stage, end_stage) = if args.first().is_some_and(|it| it == "uninstall") {
        ("remove", "removed")
    } else {
        ("fetch", "installed")
    };
    if !packages.is_empty() {
        sender
            .send(PackageEvent::Progress(progress_for(&packages, start_stage, 0.0)))
            .ok();
    }

    let mut command = npm_in(&dir);
    command.args(&args).args(&packages);
    let event = match run_to_completion(&mut command).await {
        Ok(output) if output.success => {
            if !packages.is_empty() {
                sender
                    .send(PackageEvent::Progress(progress_for(&packages, end_stage, 1.0)))
                    .ok();
            }
            PackageEvent::Done {
                count: parse_package_count(&output.stdout).unwrap_or(packages.len()),
            }
        }
        Ok(output) => PackageEvent::Failed(output.failure_message(NPM_PROGRAM)),
        Err(error) => PackageEvent::Failed(error.to_string()),
    };
    sender.send(event).ok();
}

impl PackageService for NpmCli {
    fn install(&self, dir: PathBuf, save_dev: bool, packages: Vec<String>) -> PackageOperation {
        let mut args = vec!["install".to_string()];
        if save_dev {
            args.push("--save-dev".into());
        }
        spawn_service_stream(move |sender| run_npm(dir, args, packages, sender))
    }

    fn uninstall(&self, dir: PathBuf, packages: Vec<String>) -> PackageOperation {
        let args = vec!["uninstall".to_string()];
        spawn_service_stream(move |sender| run_npm(dir, args, packages, sender))
    }

    fn audit(&self, dir: PathBuf) -> BoxFuture<'_, Result<serde_json::Value, ShellError>> {
        async move {
            let mut command = npm_in(&dir);
            command.args(["audit", "--json"]);
            // npm audit exits non zero when it finds vulnerabilities, the report is
            // still on stdout.
            let output = run_to_completion(&mut command).await?;
            serde_json::from_str(&output.stdout).map_err(|_| {
                ShellError::external(output.failure_message(NPM_PROGRAM))
            })
        }
        .boxed()
    }
}
