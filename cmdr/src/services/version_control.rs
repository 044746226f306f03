// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::Debug,
          path::PathBuf};

use fsh_tui::ShellError;
use futures_util::future::BoxFuture;
use tokio::sync::oneshot;

use crate::{Credentials, ServiceStream};

pub type VcsResult<T> = Result<T, ShellError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoHead {
    Branch(String),
    Detached { hash: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedChanges {
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
    pub added: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnstagedChanges {
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoStatus {
    pub head: RepoHead,
    pub staged: StagedChanges,
    pub unstaged: UnstagedChanges,
    pub untracked: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub hash: String,
    pub author: Author,
    pub date: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchInfo {
    pub name: String,
    pub is_head: bool,
}

/// Answers an [`RemoteEvent::AuthRequest`]: `Some` retries with the credentials, `None`
/// cancels the operation.
#[derive(Debug)]
pub struct AuthResponder(oneshot::Sender<Option<Credentials>>);

impl AuthResponder {
    #[must_use]
    pub fn new() -> (Self, oneshot::Receiver<Option<Credentials>>) {
        let (sender, receiver) = oneshot::channel();
        (Self(sender), receiver)
    }

    pub fn respond(self, credentials: Option<Credentials>) { self.0.send(credentials).ok(); }
}

/// Progress of a clone, pull, or push.
#[derive(Debug)]
pub enum RemoteEvent {
    /// Raw progress output, to be written to the terminal as is.
    Output(Vec<u8>),
    /// The remote wants credentials.
    AuthRequest(AuthResponder),
    /// Always the last event.
    Done(Result<(), String>),
}

pub type RemoteOperation = ServiceStream<RemoteEvent>;

/// The version control operations that the `git` builtin delegates to. Local
/// operations resolve to structured results or the tool's message text; operations
/// that talk to a remote stream [`RemoteEvent`]s.
pub trait VersionControl: Debug + Send + Sync {
    fn status(&self, dir: PathBuf) -> BoxFuture<'_, VcsResult<RepoStatus>>;

    fn add(&self, dir: PathBuf, paths: Vec<String>) -> BoxFuture<'_, VcsResult<String>>;

    /// Fails with [`ShellError::AuthRequired`] when no author is given and the
    /// repository has no identity configured.
    fn commit(
        &self,
        dir: PathBuf,
        message: String,
        author: Option<Author>,
    ) -> BoxFuture<'_, VcsResult<String>>;

    fn log(&self, dir: PathBuf) -> BoxFuture<'_, VcsResult<Vec<CommitInfo>>>;

    fn branches(&self, dir: PathBuf) -> BoxFuture<'_, VcsResult<Vec<BranchInfo>>>;

    fn tags(&self, dir: PathBuf) -> BoxFuture<'_, VcsResult<Vec<String>>>;

    fn checkout(
        &self,
        dir: PathBuf,
        reference: String,
        create: bool,
    ) -> BoxFuture<'_, VcsResult<String>>;

    fn merge(&self, dir: PathBuf, branch: String) -> BoxFuture<'_, VcsResult<String>>;

    fn reset(
        &self,
        dir: PathBuf,
        hard: bool,
        paths: Vec<String>,
    ) -> BoxFuture<'_, VcsResult<String>>;

    fn restore(&self, dir: PathBuf, paths: Vec<String>) -> BoxFuture<'_, VcsResult<String>>;

    fn clone_repo(&self, url: String, dir: PathBuf) -> RemoteOperation;

    fn pull(&self, dir: PathBuf) -> RemoteOperation;

    fn push(&self, dir: PathBuf) -> RemoteOperation;
}
