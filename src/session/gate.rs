//! Single-slot request gate
//!
//! At most one prediction request is outstanding per session. The slot is
//! taken with [`RequestGate::try_acquire`] and given back when the returned
//! guard is dropped, which covers success, error and cancelled futures alike.

use std::sync::atomic::{AtomicBool, Ordering};

/// Observable state of the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Pending,
}

/// Returned when a request is already in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("A prediction request is already in progress")]
pub struct Busy;

#[derive(Debug, Default)]
pub struct RequestGate {
    pending: AtomicBool,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move Idle → Pending, or fail if already Pending
    pub fn try_acquire(&self) -> Result<RequestGuard<'_>, Busy> {
        self.pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| RequestGuard { gate: self })
            .map_err(|_| Busy)
    }

    pub fn state(&self) -> RequestState {
        if self.pending.load(Ordering::Acquire) {
            RequestState::Pending
        } else {
            RequestState::Idle
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state() == RequestState::Pending
    }
}

/// Holds the gate in Pending until dropped
#[derive(Debug)]
pub struct RequestGuard<'a> {
    gate: &'a RequestGate,
}

impl Drop for RequestGuard<'_> {
    fn drop(&mut self) {
        self.gate.pending.store(false, Ordering::Release);
    }
}
