// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tokio::{sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
            task::AbortHandle};

/// Events from a long running collaborator operation. The stream ends (`recv` returns
/// `None`) when the operation is finished, so consumers can select between "next item"
/// and "stream ended" deterministically. Dropping the stream or calling
/// [`ServiceStream::abort`] stops the task producing it.
#[derive(Debug)]
pub struct ServiceStream<E> {
    pub events: UnboundedReceiver<E>,
    abort_handle: Option<AbortHandle>,
}

impl<E> ServiceStream<E> {
    #[must_use]
    pub fn new(events: UnboundedReceiver<E>, abort_handle: Option<AbortHandle>) -> Self {
        Self {
            events,
            abort_handle,
        }
    }

    /// A stream that yields exactly `events` and then ends. Handy for fakes and for
    /// operations that fail before any work starts.
    #[must_use]
    pub fn from_events(events: impl IntoIterator<Item = E>) -> Self {
        let (sender, receiver) = unbounded_channel();
        for event in events {
            sender.send(event).ok();
        }
        Self::new(receiver, None)
    }

    /// Stop the producing task, if there is one.
    pub fn abort(&self) {
        if let Some(abort_handle) = &self.abort_handle {
            abort_handle.abort();
        }
    }

    pub async fn next(&mut self) -> Option<E> { self.events.recv().await }
}

impl<E> Drop for ServiceStream<E> {
    fn drop(&mut self) { self.abort(); }
}

/// Create a stream whose events are produced by `task`.
pub fn spawn_service_stream<E, F, Fut>(task: F) -> ServiceStream<E>
where
    E: Send + 'static,
    F: FnOnce(UnboundedSender<E>) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let (sender, receiver) = unbounded_channel();
    let join_handle = tokio::spawn(task(sender));
    ServiceStream::new(receiver, Some(join_handle.abort_handle()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_events_ends_after_last() {
        let mut stream = ServiceStream::from_events([1, 2]);
        assert_eq!(stream.next().await, Some(1));
        assert_eq!(stream.next().await, Some(2));
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn test_abort_ends_the_stream() {
        let mut stream = spawn_service_stream(|sender| async move {
            sender.send("started").ok();
            std::future::pending::<()>().await;
        });
        assert_eq!(stream.next().await, Some("started"));
        stream.abort();
        assert_eq!(stream.next().await, None);
    }
}
