// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::{Path, PathBuf};

use base64::{Engine, engine::general_purpose::STANDARD};
use fsh_tui::ShellError;
use futures_util::{FutureExt, future::BoxFuture};
use tokio::{process::Command, sync::mpsc::UnboundedSender};

use crate::{Author, AuthResponder, BranchInfo, CommitInfo, Credentials, RemoteEvent,
            RemoteOperation, RepoHead, RepoStatus, StagedChanges, UnstagedChanges, VcsResult,
            VersionControl,
            process_runner::{pump_output, run_expecting_success, run_to_completion,
                             spawn_error},
            spawn_service_stream};

pub const GIT_PROGRAM: &str = "git";
pub const AUTH_REQUIRED_GUIDANCE: &str = "Author identity unknown. Pass --name <name> \
                                          --email <email>, or set user.name and \
                                          user.email with git config.";
const FIELD_SEPARATOR: char = '\x1f';
const RECORD_SEPARATOR: char = '\x1e';

/// Markers in git's stderr that mean the remote rejected (or never got) credentials.
const AUTH_FAILURE_MARKERS: [&str; 4] = [
    "Authentication failed",
    "could not read Username",
    "terminal prompts disabled",
    "Invalid username or password",
];

/// [`VersionControl`] backed by the `git` program. Prompts are disabled, when a remote
/// needs credentials the operation emits [`RemoteEvent::AuthRequest`] and retries once
/// with the answer.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitCli;

fn git_in(dir: &Path) -> Command {
    let mut command = Command::new(GIT_PROGRAM);
    command.arg("-C").arg(dir).env("GIT_TERMINAL_PROMPT", "0");
    command
}

async fn git_text(mut command: Command) -> VcsResult<String> {
    Ok(run_expecting_success(&mut command).await?.combined_text())
}

impl GitCli {
    async fn identity_is_configured(dir: &Path) -> bool {
        for key in ["user.name", "user.email"] {
            let mut command = git_in(dir);
            command.args(["config", key]);
            let configured = run_to_completion(&mut command)
                .await
                .is_ok_and(|it| it.success && !it.stdout.trim().is_empty());
            if !configured {
                return false;
            }
        }
        true
    }

    async fn detached_hash(dir: &Path) -> String {
        let mut command = git_in(dir);
        command.args(["rev-parse", "--short=7", "HEAD"]);
        match run_to_completion(&mut command).await {
            Ok(output) if output.success => output.stdout.trim().to_string(),
            _ => String::new(),
        }
    }
}

impl VersionControl for GitCli {
    fn status(&self, dir: PathBuf) -> BoxFuture<'_, VcsResult<RepoStatus>> {
        async move {
            let mut command = git_in(&dir);
            command.args(["status", "--porcelain=v1", "--branch"]);
            let output = run_expecting_success(&mut command).await?;
            let mut status = parse_porcelain_status(&output.stdout);
            if let RepoHead::Detached { hash } = &mut status.head {
                *hash = Self::detached_hash(&dir).await;
            }
            Ok(status)
        }
        .boxed()
    }

    fn add(&self, dir: PathBuf, paths: Vec<String>) -> BoxFuture<'_, VcsResult<String>> {
        let mut command = git_in(&dir);
        command.arg("add").arg("--").args(paths);
        git_text(command).boxed()
    }

    fn commit(
        &self,
        dir: PathBuf,
        message: String,
        author: Option<Author>,
    ) -> BoxFuture<'_, VcsResult<String>> {
        async move {
            let mut command = git_in(&dir);
            match author {
                Some(author) => {
                    command
                        .arg("-c")
                        .arg(format!("user.name={}", author.name))
                        .arg("-c")
                        .arg(format!("user.email={}", author.email));
                }
                None if !Self::identity_is_configured(&dir).await => {
                    return Err(ShellError::AuthRequired {
                        guidance: AUTH_REQUIRED_GUIDANCE.to_string(),
                    });
                }
                None => {}
            }
            command.args(["commit", "-m", &message]);
            git_text(command).await
        }
        .boxed()
    }

    fn log(&self, dir: PathBuf) -> BoxFuture<'_, VcsResult<Vec<CommitInfo>>> {
        async move {
            let mut command = git_in(&dir);
            command.arg("log").arg(format!(
                "--format=%H{f}%an{f}%ae{f}%ad{f}%B{r}",
                f = "%x1f",
                r = "%x1e"
            ));
            let output = run_expecting_success(&mut command).await?;
            Ok(parse_log(&output.stdout))
        }
        .boxed()
    }

    fn branches(&self, dir: PathBuf) -> BoxFuture<'_, VcsResult<Vec<BranchInfo>>> {
        async move {
            let mut command = git_in(&dir);
            command.args(["branch", "--format=%(HEAD)%(refname:short)"]);
            let output = run_expecting_success(&mut command).await?;
            Ok(parse_branches(&output.stdout))
        }
        .boxed()
    }

    fn tags(&self, dir: PathBuf) -> BoxFuture<'_, VcsResult<Vec<String>>> {
        async move {
            let mut command = git_in(&dir);
            command.args(["tag", "--list"]);
            let output = run_expecting_success(&mut command).await?;
            Ok(output.stdout.lines().map(ToString::to_string).collect())
        }
        .boxed()
    }

    fn checkout(
        &self,
        dir: PathBuf,
        reference: String,
        create: bool,
    ) -> BoxFuture<'_, VcsResult<String>> {
        let mut command = git_in(&dir);
        command.arg("checkout");
        if create {
            command.arg("-b");
        }
        command.arg(reference);
        git_text(command).boxed()
    }

    fn merge(&self, dir: PathBuf, branch: String) -> BoxFuture<'_, VcsResult<String>> {
        let mut command = git_in(&dir);
        command.args(["merge", "--no-edit"]).arg(branch);
        git_text(command).boxed()
    }

    fn reset(
        &self,
        dir: PathBuf,
        hard: bool,
        paths: Vec<String>,
    ) -> BoxFuture<'_, VcsResult<String>> {
        let mut command = git_in(&dir);
        command.arg("reset");
        if hard {
            command.arg("--hard");
        }
        command.args(paths);
        git_text(command).boxed()
    }

    fn restore(&self, dir: PathBuf, paths: Vec<String>) -> BoxFuture<'_, VcsResult<String>> {
        let mut command = git_in(&dir);
        command.arg("restore").arg("--").args(paths);
        git_text(command).boxed()
    }

    fn clone_repo(&self, url: String, dir: PathBuf) -> RemoteOperation {
        spawn_remote_operation(dir, vec!["clone".into(), "--progress".into(), url])
    }

    fn pull(&self, dir: PathBuf) -> RemoteOperation {
        spawn_remote_operation(dir, vec!["pull".into(), "--progress".into()])
    }

    fn push(&self, dir: PathBuf) -> RemoteOperation {
        spawn_remote_operation(dir, vec!["push".into(), "--progress".into()])
    }
}

/// The `http.extraHeader` value that authenticates a request with `credentials`.
#[must_use]
pub fn basic_auth_header(credentials: &Credentials) -> String {
    let encoded = STANDARD.encode(format!("{}:{}", credentials.username, credentials.password));
    format!("http.extraHeader=Authorization: Basic {encoded}")
}

#[must_use]
pub fn is_auth_failure(stderr: &str) -> bool {
    AUTH_FAILURE_MARKERS.iter().any(|it| stderr.contains(it))
}

fn spawn_remote_operation(dir: PathBuf, args: Vec<String>) -> RemoteOperation {
    spawn_service_stream(|sender: UnboundedSender<RemoteEvent>| async move {
        let mut credentials: Option<Credentials> = None;
        loop {
            let result = run_remote_attempt(&dir, &args, credentials.as_ref(), &sender).await;
            match result {
                Ok(()) => {
                    sender.send(RemoteEvent::Done(Ok(()))).ok();
                    return;
                }
                Err(stderr) if credentials.is_none() && is_auth_failure(&stderr) => {
                    tracing::debug!(message = "remote asked for credentials");
                    let (responder, answer) = AuthResponder::new();
                    if sender.send(RemoteEvent::AuthRequest(responder)).is_err() {
                        return;
                    }
                    if let Ok(Some(it)) = answer.await {
                        credentials = Some(it);
                    } else {
                        sender
                            .send(RemoteEvent::Done(Err("authentication canceled".into())))
                            .ok();
                        return;
                    }
                }
                Err(stderr) => {
                    let message = stderr
                        .lines()
                        .rev()
                        .find(|it| !it.trim().is_empty())
                        .unwrap_or("git exited with an error")
                        .trim()
                        .to_string();
                    sender.send(RemoteEvent::Done(Err(message))).ok();
                    return;
                }
            }
        }
    })
}

/// Run git once, forwarding its output. `Err` carries stderr.
async fn run_remote_attempt(
    dir: &Path,
    args: &[String],
    credentials: Option<&Credentials>,
    sender: &UnboundedSender<RemoteEvent>,
) -> Result<(), String> {
    let mut command = git_in(dir);
    if let Some(credentials) = credentials {
        command.arg("-c").arg(basic_auth_header(credentials));
    }
    command
        .args(args)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .map_err(|error| spawn_error(GIT_PROGRAM, &error).to_string())?;
    let stderr = pump_output(child.stdout.take(), child.stderr.take(), |chunk| {
        sender.send(RemoteEvent::Output(chunk)).ok();
    })
    .await;

    match child.wait().await {
        Ok(status) if status.success() => Ok(()),
        Ok(_) => Err(stderr),
        Err(error) => Err(error.to_string()),
    }
}

/// Parse `git status --porcelain=v1 --branch`. A detached head gets an empty hash for
/// the caller to fill in.
#[must_use]
pub fn parse_porcelain_status(text: &str) -> RepoStatus {
    let mut status = RepoStatus {
        head: RepoHead::Detached {
            hash: String::new(),
        },
        staged: StagedChanges::default(),
        unstaged: UnstagedChanges::default(),
        untracked: vec![],
    };

    for line in text.lines() {
        if let Some(header) = line.strip_prefix("## ") {
            status.head = parse_branch_header(header);
            continue;
        }
        if line.len() < 4 {
            continue;
        }
        let (codes, path) = line.split_at(3);
        let path = path.to_string();
        let mut codes = codes.chars();
        let (index, worktree) = (codes.next(), codes.next());

        if index == Some('?') {
            status.untracked.push(path);
            continue;
        }
        match index {
            Some('M' | 'R' | 'T') => status.staged.modified.push(path.clone()),
            Some('A') => status.staged.added.push(path.clone()),
            Some('D') => status.staged.deleted.push(path.clone()),
            _ => {}
        }
        match worktree {
            Some('M' | 'T') => status.unstaged.modified.push(path),
            Some('D') => status.unstaged.deleted.push(path),
            _ => {}
        }
    }

    status
}

fn parse_branch_header(header: &str) -> RepoHead {
    if header.starts_with("HEAD (no branch)") {
        return RepoHead::Detached {
            hash: String::new(),
        };
    }
    let header = header.strip_prefix("No commits yet on ").unwrap_or(header);
    let branch = header.split("...").next().unwrap_or(header);
    let branch = branch.split_whitespace().next().unwrap_or(branch);
    RepoHead::Branch(branch.to_string())
}

#[must_use]
pub fn parse_log(text: &str) -> Vec<CommitInfo> {
    text.split(RECORD_SEPARATOR)
        .filter_map(|record| {
            let mut fields = record.trim_start_matches('\n').split(FIELD_SEPARATOR);
            let hash = fields.next().filter(|it| !it.is_empty())?;
            let name = fields.next()?;
            let email = fields.next()?;
            let date = fields.next()?;
            let message = fields.next()?.trim();
            Some(CommitInfo {
                hash: hash.to_string(),
                author: Author {
                    name: name.to_string(),
                    email: email.to_string(),
                },
                date: date.to_string(),
                message: message.to_string(),
            })
        })
        .collect()
}

#[must_use]
pub fn parse_branches(text: &str) -> Vec<BranchInfo> {
    text.lines()
        .filter(|it| !it.trim().is_empty())
        .map(|line| match line.strip_prefix('*') {
            Some(name) => BranchInfo {
                name: name.trim().to_string(),
                is_head: true,
            },
            None => BranchInfo {
                name: line.trim().to_string(),
                is_head: false,
            },
        })
        .collect()
}
