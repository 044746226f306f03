// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::Debug;

use tokio::sync::mpsc::UnboundedSender;

use crate::ServiceStream;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteShellEvent {
    /// Bytes from the remote terminal.
    Data(Vec<u8>),
    Error(String),
    /// The connection ended. Always the last event.
    Close,
}

/// A live connection: events come from the remote, bytes sent go to it. Dropping the
/// session tears the connection down.
#[derive(Debug)]
pub struct RemoteShellSession {
    pub events: ServiceStream<RemoteShellEvent>,
    input: Option<UnboundedSender<Vec<u8>>>,
}

impl RemoteShellSession {
    #[must_use]
    pub fn new(
        events: ServiceStream<RemoteShellEvent>,
        input: UnboundedSender<Vec<u8>>,
    ) -> Self {
        Self {
            events,
            input: Some(input),
        }
    }

    /// Forward bytes to the remote. Returns false once the connection is gone.
    pub fn send(&self, bytes: impl Into<Vec<u8>>) -> bool {
        match &self.input {
            Some(input) => input.send(bytes.into()).is_ok(),
            None => false,
        }
    }

    /// Close the input side. The remote sees end of input, and the event stream ends
    /// with [`RemoteShellEvent::Close`] once it hangs up.
    pub fn close(&mut self) { self.input = None; }
}

/// Connects to remote hosts.
pub trait RemoteShellTransport: Debug + Send + Sync {
    fn connect(&self, host: &str, user: &str, password: Option<&str>) -> RemoteShellSession;
}
