// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! In-memory stand-ins for the collaborators. Each fake is cheap to clone and clones
//! share state, so a test keeps one clone to script answers and inspect calls.

use std::{path::PathBuf,
          sync::Arc};

use fsh_tui::{OutputSink, ShellError, StdMutex, lock_or_recover};
use futures_util::{FutureExt, future::BoxFuture};
use tokio::sync::mpsc::unbounded_channel;

use crate::{AUTH_REQUIRED_GUIDANCE, Author, AuthResponder, BranchInfo, BuildOutput,
            BuildService, CommitInfo, Credentials, DeviceFlowPoller, PackageEvent,
            PackageOperation, PackageService, RemoteEvent, RemoteOperation, RemoteShellEvent,
            RemoteShellSession, RemoteShellTransport, RepoHead, RepoStatus, ServiceStream,
            Services, StagedChanges, UnstagedChanges, VcsResult, VersionControl,
            spawn_service_stream};

/// End of transmission. [`FakeRemoteShell`] hangs up when it receives this.
pub const FAKE_REMOTE_HANG_UP: &[u8] = b"\x04";

#[must_use]
pub fn fake_services() -> Services {
    Services {
        version_control: Arc::new(FakeVersionControl::default()),
        packages: Arc::new(FakePackages::default()),
        build: Arc::new(FakeBuild::default()),
        remote_shell: Arc::new(FakeRemoteShell::default()),
        device_flow: Arc::new(FakeDeviceFlow::default()),
    }
}

#[derive(Debug, Default)]
struct VersionControlState {
    calls: Vec<String>,
    status: Option<RepoStatus>,
    branches: Vec<BranchInfo>,
    require_identity: bool,
    pull_output: Vec<Vec<u8>>,
}

/// Records calls as `"<operation> <dir> <args...>"`. `push` streams `pushing`, asks for
/// credentials, and succeeds only if it gets some.
#[derive(Debug, Clone, Default)]
pub struct FakeVersionControl {
    state: Arc<StdMutex<VersionControlState>>,
}

impl FakeVersionControl {
    pub fn set_status(&self, status: RepoStatus) {
        lock_or_recover(&self.state).status = Some(status);
    }

    pub fn set_branches(&self, branches: Vec<BranchInfo>) {
        lock_or_recover(&self.state).branches = branches;
    }

    /// Chunks that `pull` streams before it succeeds.
    pub fn set_pull_output(&self, chunks: Vec<Vec<u8>>) {
        lock_or_recover(&self.state).pull_output = chunks;
    }

    /// Commits without an author fail as if no identity were configured.
    pub fn require_identity(&self) { lock_or_recover(&self.state).require_identity = true; }

    #[must_use]
    pub fn calls(&self) -> Vec<String> { lock_or_recover(&self.state).calls.clone() }

    fn record(&self, call: String) { lock_or_recover(&self.state).calls.push(call); }

    fn answer<T: Send + 'static>(&self, call: String, value: T) -> BoxFuture<'_, VcsResult<T>> {
        self.record(call);
        async move { Ok(value) }.boxed()
    }
}

impl VersionControl for FakeVersionControl {
    fn status(&self, dir: PathBuf) -> BoxFuture<'_, VcsResult<RepoStatus>> {
        let status = lock_or_recover(&self.state).status.clone().unwrap_or(RepoStatus {
            head: RepoHead::Branch("main".into()),
            staged: StagedChanges::default(),
            unstaged: UnstagedChanges::default(),
            untracked: vec![],
        });
        self.answer(format!("status {}", dir.display()), status)
    }

    fn add(&self, dir: PathBuf, paths: Vec<String>) -> BoxFuture<'_, VcsResult<String>> {
        self.answer(format!("add {} {}", dir.display(), paths.join(" ")), String::new())
    }

    fn commit(
        &self,
        dir: PathBuf,
        message: String,
        author: Option<Author>,
    ) -> BoxFuture<'_, VcsResult<String>> {
        let mut call = format!("commit {} {message}", dir.display());
        if let Some(author) = &author {
            call.push_str(&format!(" author={} <{}>", author.name, author.email));
        }
        if author.is_none() && lock_or_recover(&self.state).require_identity {
            self.record(call);
            return async {
                Err(ShellError::AuthRequired {
                    guidance: AUTH_REQUIRED_GUIDANCE.into(),
                })
            }
            .boxed();
        }
        self.answer(call, format!("[main 0000000] {message}"))
    }

    fn log(&self, dir: PathBuf) -> BoxFuture<'_, VcsResult<Vec<CommitInfo>>> {
        self.answer(format!("log {}", dir.display()), vec![])
    }

    fn branches(&self, dir: PathBuf) -> BoxFuture<'_, VcsResult<Vec<BranchInfo>>> {
        let branches = lock_or_recover(&self.state).branches.clone();
        self.answer(format!("branch {}", dir.display()), branches)
    }

    fn tags(&self, dir: PathBuf) -> BoxFuture<'_, VcsResult<Vec<String>>> {
        self.answer(format!("tags {}", dir.display()), vec![])
    }

    fn checkout(
        &self,
        dir: PathBuf,
        reference: String,
        create: bool,
    ) -> BoxFuture<'_, VcsResult<String>> {
        let call = format!("checkout {} {reference} create={create}", dir.display());
        self.answer(call, format!("Switched to branch '{reference}'"))
    }

    fn merge(&self, dir: PathBuf, branch: String) -> BoxFuture<'_, VcsResult<String>> {
        self.answer(format!("merge {} {branch}", dir.display()), String::new())
    }

    fn reset(
        &self,
        dir: PathBuf,
        hard: bool,
        paths: Vec<String>,
    ) -> BoxFuture<'_, VcsResult<String>> {
        let call = format!("reset {} hard={hard} {}", dir.display(), paths.join(" "));
        self.answer(call, String::new())
    }

    fn restore(&self, dir: PathBuf, paths: Vec<String>) -> BoxFuture<'_, VcsResult<String>> {
        self.answer(format!("restore {} {}", dir.display(), paths.join(" ")), String::new())
    }

    fn clone_repo(&self, url: String, dir: PathBuf) -> RemoteOperation {
        self.record(format!("clone {url} {}", dir.display()));
        ServiceStream::from_events([RemoteEvent::Done(Ok(()))])
    }

    fn pull(&self, dir: PathBuf) -> RemoteOperation {
        self.record(format!("pull {}", dir.display()));
        let output = lock_or_recover(&self.state).pull_output.clone();
        ServiceStream::from_events(
            output
                .into_iter()
                .map(RemoteEvent::Output)
                .chain([RemoteEvent::Done(Ok(()))]),
        )
    }

    fn push(&self, dir: PathBuf) -> RemoteOperation {
        self.record(format!("push {}", dir.display()));
        spawn_service_stream(|sender| async move {
            sender.send(RemoteEvent::Output(b"pushing\r\n".to_vec())).ok();
            let (responder, response) = AuthResponder::new();
            sender.send(RemoteEvent::AuthRequest(responder)).ok();
            let event = match response.await.ok().flatten() {
                Some(credentials) => {
                    let text = format!("authorized as {}\r\n", credentials.username);
                    sender.send(RemoteEvent::Output(text.into_bytes())).ok();
                    RemoteEvent::Done(Ok(()))
                }
                None => RemoteEvent::Done(Err("authentication required".into())),
            };
            sender.send(event).ok();
        })
    }
}

/// Answers every poll with the scripted credentials, `None` by default.
#[derive(Debug, Clone, Default)]
pub struct FakeDeviceFlow {
    credentials: Arc<StdMutex<Option<Credentials>>>,
    poll_count: Arc<StdMutex<usize>>,
}

impl FakeDeviceFlow {
    pub fn set_credentials(&self, credentials: Option<Credentials>) {
        *lock_or_recover(&self.credentials) = credentials;
    }

    #[must_use]
    pub fn poll_count(&self) -> usize { *lock_or_recover(&self.poll_count) }
}

impl DeviceFlowPoller for FakeDeviceFlow {
    fn poll(&self, _sink: OutputSink) -> BoxFuture<'_, Option<Credentials>> {
        *lock_or_recover(&self.poll_count) += 1;
        let credentials = lock_or_recover(&self.credentials).clone();
        async move { credentials }.boxed()
    }
}

#[derive(Debug, Default)]
struct PackagesState {
    calls: Vec<String>,
    events: Vec<PackageEvent>,
    audit: Option<serde_json::Value>,
}

/// Replays the scripted events for the next install or uninstall.
#[derive(Debug, Clone, Default)]
pub struct FakePackages {
    state: Arc<StdMutex<PackagesState>>,
}

impl FakePackages {
    pub fn set_events(&self, events: Vec<PackageEvent>) {
        lock_or_recover(&self.state).events = events;
    }

    pub fn set_audit(&self, report: serde_json::Value) {
        lock_or_recover(&self.state).audit = Some(report);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<String> { lock_or_recover(&self.state).calls.clone() }

    fn replay(&self, call: String) -> PackageOperation {
        let state = &mut *lock_or_recover(&self.state);
        state.calls.push(call);
        ServiceStream::from_events(std::mem::take(&mut state.events))
    }
}

impl PackageService for FakePackages {
    fn install(&self, dir: PathBuf, save_dev: bool, packages: Vec<String>) -> PackageOperation {
        self.replay(format!(
            "install {} save_dev={save_dev} {}",
            dir.display(),
            packages.join(" ")
        ))
    }

    fn uninstall(&self, dir: PathBuf, packages: Vec<String>) -> PackageOperation {
        self.replay(format!("uninstall {} {}", dir.display(), packages.join(" ")))
    }

    fn audit(&self, dir: PathBuf) -> BoxFuture<'_, Result<serde_json::Value, ShellError>> {
        let state = &mut *lock_or_recover(&self.state);
        state.calls.push(format!("audit {}", dir.display()));
        let report = state.audit.clone().unwrap_or_else(|| serde_json::json!({}));
        async move { Ok(report) }.boxed()
    }
}

/// Hands out the scripted build result once, then empty successful builds.
#[derive(Debug, Clone, Default)]
pub struct FakeBuild {
    output: Arc<StdMutex<Option<Result<BuildOutput, ShellError>>>>,
    entries: Arc<StdMutex<Vec<PathBuf>>>,
}

impl FakeBuild {
    pub fn set_output(&self, output: Result<BuildOutput, ShellError>) {
        *lock_or_recover(&self.output) = Some(output);
    }

    /// Entries passed to the last bundle.
    #[must_use]
    pub fn entries(&self) -> Vec<PathBuf> { lock_or_recover(&self.entries).clone() }
}

impl BuildService for FakeBuild {
    fn bundle(&self, entries: Vec<PathBuf>) -> BoxFuture<'_, Result<BuildOutput, ShellError>> {
        *lock_or_recover(&self.entries) = entries;
        let output = lock_or_recover(&self.output)
            .take()
            .unwrap_or_else(|| Ok(BuildOutput::default()));
        async move { output }.boxed()
    }
}

#[derive(Debug, Default)]
struct RemoteShellState {
    connections: Vec<String>,
    received: Vec<u8>,
}

/// A remote that greets with `Welcome`, echoes what it receives, and hangs up on
/// [`FAKE_REMOTE_HANG_UP`]. A failing remote reports its error and hangs up at once.
#[derive(Debug, Clone, Default)]
pub struct FakeRemoteShell {
    state: Arc<StdMutex<RemoteShellState>>,
    failure: Option<String>,
    greeting: Option<Vec<Vec<u8>>>,
}

impl FakeRemoteShell {
    /// Send these chunks on connect instead of `Welcome`.
    #[must_use]
    pub fn with_greeting(mut self, chunks: Vec<Vec<u8>>) -> Self {
        self.greeting = Some(chunks);
        self
    }

    #[must_use]
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// `"<user>@<host> password=<password>"` per connect.
    #[must_use]
    pub fn connections(&self) -> Vec<String> {
        lock_or_recover(&self.state).connections.clone()
    }

    #[must_use]
    pub fn received(&self) -> String {
        String::from_utf8_lossy(&lock_or_recover(&self.state).received).into_owned()
    }
}

impl RemoteShellTransport for FakeRemoteShell {
    fn connect(&self, host: &str, user: &str, password: Option<&str>) -> RemoteShellSession {
        lock_or_recover(&self.state).connections.push(format!(
            "{user}@{host} password={}",
            password.unwrap_or("<none>")
        ));

        let (input_sender, mut input_receiver) = unbounded_channel::<Vec<u8>>();
        let state = self.state.clone();
        let failure = self.failure.clone();
        let greeting = self
            .greeting
            .clone()
            .unwrap_or_else(|| vec![b"Welcome\r\n".to_vec()]);
        let events = spawn_service_stream(move |sender| async move {
            if let Some(message) = failure {
                sender.send(RemoteShellEvent::Error(message)).ok();
                sender.send(RemoteShellEvent::Close).ok();
                return;
            }
            for chunk in greeting {
                sender.send(RemoteShellEvent::Data(chunk)).ok();
            }
            while let Some(bytes) = input_receiver.recv().await {
                if bytes == FAKE_REMOTE_HANG_UP {
                    break;
                }
                lock_or_recover(&state).received.extend_from_slice(&bytes);
                sender.send(RemoteShellEvent::Data(bytes)).ok();
            }
            sender.send(RemoteShellEvent::Close).ok();
        });
        RemoteShellSession::new(events, input_sender)
    }
}
