// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::{RawInput, ShellError, StdMutex, lock_or_recover};

/// Identifies one acquisition of the [`CaptureSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureId(uuid::Uuid);

#[derive(Debug)]
struct CaptureOwner {
    id: CaptureId,
    name: String,
    sender: UnboundedSender<RawInput>,
}

/// Exclusive owner of raw input. While an owner is installed the session forwards every
/// input unit to it verbatim (Ctrl-C included) and the line editor sees nothing.
///
/// Acquiring hands back a [`CaptureHandle`] and the receiving end of the input channel.
/// Dropping or releasing the handle empties the slot, so an owner that returns early
/// can't leave the shell deaf.
#[derive(Debug, Clone, Default)]
pub struct CaptureSlot {
    inner: Arc<StdMutex<CaptureState>>,
}

#[derive(Debug, Default)]
struct CaptureState {
    owner: Option<CaptureOwner>,
    /// Set once the terminal has no more input to give.
    input_closed: bool,
}

impl CaptureSlot {
    /// # Errors
    ///
    /// Returns [`ShellError::CaptureBusy`] if another owner holds the slot.
    pub fn acquire(
        &self,
        owner_name: impl Into<String>,
    ) -> Result<(CaptureHandle, UnboundedReceiver<RawInput>), ShellError> {
        let state = &mut *lock_or_recover(&self.inner);
        if let Some(owner) = state.owner.as_ref() {
            return Err(ShellError::CaptureBusy {
                owner: owner.name.clone(),
            });
        }
        let (sender, receiver) = unbounded_channel();
        let id = CaptureId(uuid::Uuid::new_v4());
        let name = owner_name.into();
        tracing::debug!(message = "input captured", owner = %name, input_closed = state.input_closed);
        // With no more input coming the owner gets a receiver that is already closed.
        if !state.input_closed {
            state.owner = Some(CaptureOwner { id, name, sender });
        }
        Ok((
            CaptureHandle {
                slot: self.clone(),
                id,
            },
            receiver,
        ))
    }

    #[must_use]
    pub fn is_captured(&self) -> bool { lock_or_recover(&self.inner).owner.is_some() }

    #[must_use]
    pub fn owner_name(&self) -> Option<String> {
        lock_or_recover(&self.inner)
            .owner
            .as_ref()
            .map(|it| it.name.clone())
    }

    /// Deliver `input` to the owner. Gives the input back if nobody holds the slot. An
    /// owner whose receiver is gone is evicted and the input is given back as well.
    ///
    /// # Errors
    ///
    /// Returns the input unchanged when it was not delivered.
    pub fn try_forward(&self, input: RawInput) -> Result<(), RawInput> {
        let state = &mut *lock_or_recover(&self.inner);
        let Some(owner) = state.owner.as_ref() else {
            return Err(input);
        };
        match owner.sender.send(input) {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::debug!(message = "capture owner went away", owner = %owner.name);
                state.owner = None;
                Err(error.0)
            }
        }
    }

    /// Evict whoever holds the slot. Their input channel closes, which is how they learn
    /// that they won't get any more input.
    pub fn close(&self) {
        if let Some(owner) = lock_or_recover(&self.inner).owner.take() {
            tracing::debug!(message = "capture closed", owner = %owner.name);
        }
    }

    /// The terminal reached end of input. Evicts the current owner, and every later
    /// owner starts out with a closed channel.
    pub fn close_input(&self) {
        lock_or_recover(&self.inner).input_closed = true;
        self.close();
    }

    fn release(&self, id: CaptureId) -> bool {
        let state = &mut *lock_or_recover(&self.inner);
        if state.owner.as_ref().is_some_and(|it| it.id == id) {
            if let Some(owner) = state.owner.take() {
                tracing::debug!(message = "input released", owner = %owner.name);
            }
            return true;
        }
        false
    }
}

/// Proof of ownership of the [`CaptureSlot`]. Releasing only empties the slot if this
/// handle still owns it.
#[derive(Debug)]
pub struct CaptureHandle {
    slot: CaptureSlot,
    id: CaptureId,
}

impl CaptureHandle {
    #[must_use]
    pub fn id(&self) -> CaptureId { self.id }

    /// Returns true if the slot was still held by this handle.
    pub fn release(self) -> bool { self.slot.release(self.id) }
}

impl Drop for CaptureHandle {
    fn drop(&mut self) { self.slot.release(self.id); }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_exclusive_acquire() {
        let slot = CaptureSlot::default();
        let (handle, _receiver) = slot.acquire("vi").unwrap();
        assert!(slot.is_captured());
        assert_eq!(slot.owner_name(), Some("vi".into()));

        let result = slot.acquire("ssh");
        assert!(matches!(result, Err(ShellError::CaptureBusy { owner }) if owner == "vi"));

        assert!(handle.release());
        assert!(!slot.is_captured());
        assert!(slot.acquire("ssh").is_ok());
    }

    #[test]
    fn test_forward_verbatim_including_ctrl_c() {
        let slot = CaptureSlot::default();
        assert_eq!(slot.try_forward("a".into()), Err("a".to_string()));

        let (_handle, mut receiver) = slot.acquire("vi").unwrap();
        for raw in ["i", "\x03", "\x1b[A"] {
            slot.try_forward(raw.into()).unwrap();
        }
        assert_eq!(receiver.try_recv().unwrap(), "i");
        assert_eq!(receiver.try_recv().unwrap(), "\x03");
        assert_eq!(receiver.try_recv().unwrap(), "\x1b[A");
    }

    #[test]
    fn test_drop_releases_and_stale_handle_is_harmless() {
        let slot = CaptureSlot::default();
        {
            let (_handle, _receiver) = slot.acquire("vi").unwrap();
        }
        assert!(!slot.is_captured());

        let (first, _receiver) = slot.acquire("vi").unwrap();
        slot.close();
        let (_second, _receiver2) = slot.acquire("ssh").unwrap();
        assert!(!first.release());
        assert_eq!(slot.owner_name(), Some("ssh".into()));
    }

    #[test]
    fn test_gone_receiver_evicts_owner() {
        let slot = CaptureSlot::default();
        let (_handle, receiver) = slot.acquire("vi").unwrap();
        drop(receiver);
        assert_eq!(slot.try_forward("x".into()), Err("x".to_string()));
        assert!(!slot.is_captured());
    }

    #[tokio::test]
    async fn test_owner_after_close_input_gets_closed_stream() {
        let slot = CaptureSlot::default();
        slot.close_input();
        let (_handle, mut receiver) = slot.acquire("vi").unwrap();
        assert!(!slot.is_captured());
        assert_eq!(receiver.recv().await, None);
    }

    #[tokio::test]
    async fn test_close_ends_owner_stream() {
        let slot = CaptureSlot::default();
        let (_handle, mut receiver) = slot.acquire("vi").unwrap();
        slot.close();
        assert_eq!(receiver.recv().await, None);
    }
}
