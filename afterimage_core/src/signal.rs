// Copyright 2026 the Afterimage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Auto-reset wake primitive with a two-phase shutdown handshake.
//!
//! A [`WakeSignal`] is a single-slot notification: any number of
//! [`raise`](WakeSignal::raise) calls before the worker wakes coalesce
//! into one pending paint. Shutdown is a handshake rather than a bare
//! join: teardown requests the kill, the worker acknowledges after
//! leaving its loop (and after releasing the paint target), and only
//! then does teardown proceed.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Why [`WakeSignal::wait`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Wake {
    /// A paint was requested; the pending flag has been consumed.
    Paint,
    /// Shutdown was requested. The kill wins over a pending paint.
    Kill,
}

#[derive(Debug, Default)]
struct SignalState {
    wake: bool,
    kill: bool,
    stopped: bool,
}

/// Condvar-backed auto-reset event shared between the surface and its
/// paint worker.
#[derive(Debug, Default)]
pub(crate) struct WakeSignal {
    state: Mutex<SignalState>,
    cond: Condvar,
}

impl WakeSignal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SignalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Requests a paint. Raises before the next wait coalesce.
    pub(crate) fn raise(&self) {
        let mut state = self.state();
        state.wake = true;
        drop(state);
        self.cond.notify_all();
    }

    /// Blocks until a paint or kill is pending.
    pub(crate) fn wait(&self) -> Wake {
        let mut state = self.state();
        loop {
            if state.kill {
                return Wake::Kill;
            }
            if state.wake {
                state.wake = false;
                return Wake::Paint;
            }
            state = self
                .cond
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// First shutdown phase: flags the worker to exit and wakes it.
    pub(crate) fn request_kill(&self) {
        let mut state = self.state();
        state.kill = true;
        drop(state);
        self.cond.notify_all();
    }

    /// Worker-side acknowledgement that it has observed the kill and
    /// will not paint again.
    pub(crate) fn acknowledge_stopped(&self) {
        let mut state = self.state();
        state.stopped = true;
        drop(state);
        self.cond.notify_all();
    }

    /// Second shutdown phase: blocks until the worker acknowledged.
    pub(crate) fn wait_stopped(&self) {
        let mut state = self.state();
        while !state.stopped {
            state = self
                .cond
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}
