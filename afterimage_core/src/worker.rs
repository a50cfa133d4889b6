// Copyright 2026 the Afterimage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The background paint thread.
//!
//! The worker owns the paint target outright: it is moved into the
//! thread at spawn and dropped there after the kill is observed, so no
//! drawing resource outlives the shutdown handshake. The loop is the
//! Idle → Painting → Idle machine, with Kill as the only exit.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::error::SurfaceError;
use crate::signal::{Wake, WakeSignal};
use crate::surface::{self, SurfaceShared};
use crate::target::PaintTarget;

#[derive(Debug)]
pub(crate) struct PaintWorker {
    signal: Arc<WakeSignal>,
    handle: Option<JoinHandle<()>>,
}

impl PaintWorker {
    /// Spawns the paint thread, moving `target` into it.
    pub(crate) fn spawn<T>(
        mut target: T,
        shared: Arc<Mutex<SurfaceShared>>,
    ) -> Result<Self, SurfaceError>
    where
        T: PaintTarget + Send + 'static,
    {
        let signal = Arc::new(WakeSignal::new());
        let worker_signal = Arc::clone(&signal);
        let handle = thread::Builder::new()
            .name("afterimage-paint".into())
            .spawn(move || {
                surface::with_sink(&shared, |sink| sink.on_worker_start());
                loop {
                    match worker_signal.wait() {
                        Wake::Kill => break,
                        Wake::Paint => {
                            // Paint errors were already reported to the
                            // sink inside the pass; no retry.
                            let _ = surface::paint_pass(&mut target, &shared);
                        }
                    }
                }
                surface::with_sink(&shared, |sink| sink.on_worker_stop());
                // The target must be released before the acknowledgement:
                // once wait_stopped returns, teardown may free whatever
                // the target draws into.
                drop(target);
                worker_signal.acknowledge_stopped();
            })
            .map_err(SurfaceError::Spawn)?;

        Ok(Self {
            signal,
            handle: Some(handle),
        })
    }

    /// Schedules a paint; never blocks, raises coalesce.
    pub(crate) fn raise(&self) {
        self.signal.raise();
    }

    /// Two-phase shutdown: request the kill, wait for the worker's
    /// acknowledgement, then join. Idempotent.
    pub(crate) fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.signal.request_kill();
        self.signal.wait_stopped();
        let _ = handle.join();
    }
}
