// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::Debug, sync::Arc};

use tokio::sync::oneshot;

use crate::{ShellError, StdMutex, lock_or_recover};

pub type CancelCallback = Box<dyn FnOnce() + Send>;

/// Holds the cancel callback of the currently running command handler. At most one
/// callback is registered per handler invocation. Ctrl-C takes and runs it, the router
/// clears it once the handler settles.
///
/// Invocations nest: a handler that runs a line through the router (eg: `npm run`)
/// starts an inner invocation on top of its own. Finishing the inner one hands the slot
/// back to the outer handler with its callback intact. Ctrl-C runs the innermost
/// registered callback.
#[derive(Clone, Default)]
pub struct CancelSlot {
    inner: Arc<StdMutex<CancelSlotState>>,
}

#[derive(Default)]
struct CancelSlotState {
    last_invocation: u64,
    /// Running invocations, innermost last.
    frames: Vec<InvocationFrame>,
}

struct InvocationFrame {
    invocation: u64,
    callback: Option<CancelCallback>,
    registered: bool,
    canceled: bool,
}

impl CancelSlotState {
    fn frame_mut(&mut self, invocation: u64) -> Option<&mut InvocationFrame> {
        self.frames.iter_mut().find(|it| it.invocation == invocation)
    }
}

impl Debug for CancelSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock_or_recover(&self.inner);
        f.debug_struct("CancelSlot")
            .field("depth", &state.frames.len())
            .field("has_callback", &state.frames.iter().any(|it| it.callback.is_some()))
            .finish()
    }
}

impl CancelSlot {
    /// Start a handler invocation and hand out its registrar.
    #[must_use]
    pub fn begin_invocation(&self) -> CancelRegistrar {
        let state = &mut *lock_or_recover(&self.inner);
        state.last_invocation += 1;
        let invocation = state.last_invocation;
        state.frames.push(InvocationFrame {
            invocation,
            callback: None,
            registered: false,
            canceled: false,
        });
        CancelRegistrar {
            slot: self.clone(),
            invocation,
        }
    }

    /// End the innermost invocation unconditionally. Returns whether it was canceled.
    /// Its registrar goes stale, the enclosing invocation (if any) is current again.
    pub fn finish_invocation(&self) -> bool {
        lock_or_recover(&self.inner)
            .frames
            .pop()
            .is_some_and(|it| it.canceled)
    }

    /// Run and clear the innermost registered callback. Returns false if there was
    /// none, in which case Ctrl-C falls back to its default behavior.
    pub fn cancel(&self) -> bool {
        let callback = {
            let state = &mut *lock_or_recover(&self.inner);
            state
                .frames
                .iter_mut()
                .rev()
                .find(|it| it.callback.is_some())
                .and_then(|frame| {
                    frame.canceled = true;
                    frame.callback.take()
                })
        };
        match callback {
            Some(callback) => {
                tracing::debug!(message = "running cancel callback");
                callback();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn has_callback(&self) -> bool {
        lock_or_recover(&self.inner)
            .frames
            .iter()
            .any(|it| it.callback.is_some())
    }
}

/// Given to a command handler so it can register how to stop itself.
#[derive(Debug, Clone)]
pub struct CancelRegistrar {
    slot: CancelSlot,
    invocation: u64,
}

impl CancelRegistrar {
    /// # Errors
    ///
    /// Returns [`ShellError::CancelAlreadyRegistered`] on a second registration within
    /// the same invocation.
    pub fn register(&self, callback: impl FnOnce() + Send + 'static) -> Result<(), ShellError> {
        let state = &mut *lock_or_recover(&self.slot.inner);
        let Some(frame) = state.frame_mut(self.invocation) else {
            tracing::debug!(message = "ignoring cancel registration from a settled handler");
            return Ok(());
        };
        if frame.registered {
            return Err(ShellError::CancelAlreadyRegistered);
        }
        frame.registered = true;
        frame.callback = Some(Box::new(callback));
        Ok(())
    }

    /// Register a callback that completes the returned receiver.
    ///
    /// # Errors
    ///
    /// See [`Self::register`].
    pub fn register_oneshot(&self) -> Result<oneshot::Receiver<()>, ShellError> {
        let (sender, receiver) = oneshot::channel();
        self.register(move || {
            // The receiver may be gone if the handler already finished.
            sender.send(()).ok();
        })?;
        Ok(receiver)
    }
}
