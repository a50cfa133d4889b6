// Copyright 2026 the Afterimage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The viewport aggregate.
//!
//! A [`RetainedViewport`] owns the buffer slot, the presentation
//! configuration, and the paint dispatcher. Producers install buffers;
//! the host forwards its "please repaint" notifications; the surface
//! decides whether the paint runs on the calling thread or on the
//! dedicated worker, and guarantees the retirement queue drains on
//! every paint pass and at teardown.
//!
//! At most two threads interact with a viewport: the owning thread and,
//! in threaded mode, the paint worker. Installs are linearized by the
//! single internal mutex; the paint that follows an install observes
//! that install's buffer or a strictly later one, never a stale one.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::buffer::FrameBuffer;
use crate::error::{PaintError, SurfaceError};
use crate::render::{self, ScaleMode};
use crate::retire::RetirePolicy;
use crate::slot::BufferSlot;
use crate::target::PaintTarget;
use crate::trace::{InstallEvent, PaintBeginEvent, PaintEndEvent, TraceSink};
use crate::worker::PaintWorker;

/// Construction-time configuration for a [`RetainedViewport`].
///
/// The threading mode is fixed for the surface's lifetime; the scale
/// mode can be changed later with
/// [`RetainedViewport::set_scale_mode`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewportOptions {
    /// Paint on a dedicated background thread instead of the calling
    /// thread.
    pub threaded: bool,
    /// Initial presentation mode.
    pub scale_mode: ScaleMode,
}

impl ViewportOptions {
    /// Creates options with the given mode pair.
    #[must_use]
    pub const fn new(threaded: bool, scale_mode: ScaleMode) -> Self {
        Self {
            threaded,
            scale_mode,
        }
    }
}

/// State shared between the owning thread and the paint worker: the
/// slot, the scale mode, and the trace sink, all under one mutex.
pub(crate) struct SurfaceShared {
    pub(crate) slot: BufferSlot,
    pub(crate) scale: ScaleMode,
    pub(crate) sink: Option<Box<dyn TraceSink + Send>>,
}

pub(crate) fn lock(shared: &Mutex<SurfaceShared>) -> MutexGuard<'_, SurfaceShared> {
    // A panicking paint must not wedge teardown; the shared state stays
    // consistent because every critical section is panic-free.
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn with_sink(shared: &Mutex<SurfaceShared>, f: impl FnOnce(&mut dyn TraceSink)) {
    let mut guard = lock(shared);
    if let Some(sink) = &mut guard.sink {
        f(sink.as_mut());
    }
}

/// Runs one paint pass: peek, render, then drain the retirement queue.
///
/// The lock is held for the peek and the drain but released across the
/// drawing calls, so a producer can install a new frame while a blit is
/// in flight. Drain runs even when there was nothing to draw, and even
/// when the backend failed.
pub(crate) fn paint_pass<T: PaintTarget + ?Sized>(
    target: &mut T,
    shared: &Mutex<SurfaceShared>,
) -> Result<(), PaintError> {
    let extent = target.extent();
    let (buffer, scale) = {
        let mut guard = lock(shared);
        let scale = guard.scale;
        if let Some(sink) = &mut guard.sink {
            sink.on_paint_begin(&PaintBeginEvent {
                target: extent,
                scale_mode: scale,
            });
        }
        (guard.slot.current(), scale)
    };

    let painted = buffer.is_some();
    let result = render::render_frame(target, buffer.as_deref(), extent, scale);
    // Drop the peeked handle before draining, so a frame replaced during
    // the blit can retire this pass instead of next.
    drop(buffer);

    let mut guard = lock(shared);
    match &result {
        Ok(()) => {
            if let Some(sink) = &mut guard.sink {
                sink.on_paint_end(&PaintEndEvent { painted });
            }
        }
        Err(error) => {
            if let Some(sink) = &mut guard.sink {
                sink.on_paint_error(error);
            }
        }
    }
    let SurfaceShared { slot, sink, .. } = &mut *guard;
    slot.drain_with(|e| {
        if let Some(sink) = sink {
            sink.on_retire(e);
        }
    });
    result
}

enum DispatchMode<T> {
    /// Paints run synchronously on whichever thread triggers them.
    Direct { target: T },
    /// Paints run on the dedicated worker; triggers only raise the wake
    /// signal.
    Threaded { worker: PaintWorker },
}

/// A display surface that repaints itself from the last installed frame.
///
/// The viewport starts with a trivial placeholder buffer current, so a
/// paint before the first real install still draws. Dropping the
/// viewport closes it; [`close`](Self::close) is idempotent and, in
/// threaded mode, returns only after the worker has acknowledged exit.
pub struct RetainedViewport<T: PaintTarget + Send + 'static> {
    shared: Arc<Mutex<SurfaceShared>>,
    mode: DispatchMode<T>,
    disposed: bool,
}

impl<T: PaintTarget + Send + 'static> RetainedViewport<T> {
    /// Creates a viewport over `target`.
    ///
    /// With `options.threaded` the target moves onto the paint worker
    /// thread, which is why `T` must be `Send`.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::Spawn`] when the worker thread cannot start.
    pub fn new(target: T, options: ViewportOptions) -> Result<Self, SurfaceError> {
        let shared = Arc::new(Mutex::new(SurfaceShared {
            slot: BufferSlot::new(FrameBuffer::placeholder()),
            scale: options.scale_mode,
            sink: None,
        }));
        let mode = if options.threaded {
            DispatchMode::Threaded {
                worker: PaintWorker::spawn(target, Arc::clone(&shared))?,
            }
        } else {
            DispatchMode::Direct { target }
        };
        Ok(Self {
            shared,
            mode,
            disposed: false,
        })
    }

    /// Installs `buffer` as the new current frame and triggers a
    /// repaint.
    ///
    /// Takes ownership; the previous current buffer moves to the
    /// retirement queue. Never blocks in threaded mode.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::Disposed`] after [`close`](Self::close).
    pub fn install(&mut self, buffer: FrameBuffer) -> Result<(), SurfaceError> {
        if self.disposed {
            return Err(SurfaceError::Disposed);
        }
        {
            let mut guard = lock(&self.shared);
            let extent = buffer.extent();
            let retired_previous = guard.slot.install(buffer);
            if let Some(sink) = &mut guard.sink {
                sink.on_install(&InstallEvent {
                    extent,
                    retired_previous,
                });
            }
        }
        self.dispatch();
        Ok(())
    }

    /// Host "please repaint" notification, mapped 1:1 to a dispatch.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::Disposed`] after [`close`](Self::close).
    pub fn repaint(&mut self) -> Result<(), SurfaceError> {
        if self.disposed {
            return Err(SurfaceError::Disposed);
        }
        self.dispatch();
        Ok(())
    }

    /// Observes the current buffer without taking ownership.
    ///
    /// `None` only after the viewport has been closed.
    pub fn with_current<R>(&self, f: impl FnOnce(Option<&FrameBuffer>) -> R) -> R {
        let current = lock(&self.shared).slot.current();
        f(current.as_deref())
    }

    /// Current presentation mode.
    #[must_use]
    pub fn scale_mode(&self) -> ScaleMode {
        lock(&self.shared).scale
    }

    /// Switches the presentation mode for subsequent paints.
    pub fn set_scale_mode(&mut self, mode: ScaleMode) {
        lock(&self.shared).scale = mode;
    }

    /// Whether paints run on the dedicated worker thread.
    #[must_use]
    pub fn is_threaded(&self) -> bool {
        matches!(self.mode, DispatchMode::Threaded { .. })
    }

    /// Binds the retire policy consulted for every retired buffer.
    pub fn set_retire_policy(&mut self, policy: impl RetirePolicy + Send + 'static) {
        lock(&self.shared).slot.set_policy(Some(Box::new(policy)));
    }

    /// Removes the retire policy; retired buffers are destroyed again.
    pub fn clear_retire_policy(&mut self) {
        lock(&self.shared).slot.set_policy(None);
    }

    /// Binds the trace sink receiving hand-off and paint events.
    pub fn set_trace_sink(&mut self, sink: impl TraceSink + Send + 'static) {
        lock(&self.shared).sink = Some(Box::new(sink));
    }

    /// Closes the viewport. Idempotent.
    ///
    /// In threaded mode this blocks until the worker has acknowledged
    /// the kill; no paint starts afterwards. The current buffer and
    /// every queued retirement are then drained through the retire
    /// policy on the calling thread.
    pub fn close(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let DispatchMode::Threaded { worker } = &mut self.mode {
            worker.shutdown();
        }
        let mut guard = lock(&self.shared);
        guard.slot.retire_current();
        let SurfaceShared { slot, sink, .. } = &mut *guard;
        slot.drain_with(|e| {
            if let Some(sink) = sink {
                sink.on_retire(e);
            }
        });
    }

    fn dispatch(&mut self) {
        match &mut self.mode {
            DispatchMode::Direct { target } => {
                // The backend's failure is reported to the sink inside
                // the pass; the scheduling contract is all that is
                // guaranteed here.
                let _ = paint_pass(target, &self.shared);
            }
            DispatchMode::Threaded { worker } => worker.raise(),
        }
    }
}

impl<T: PaintTarget + Send + 'static> Drop for RetainedViewport<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T: PaintTarget + Send + 'static> fmt::Debug for RetainedViewport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetainedViewport")
            .field("threaded", &self.is_threaded())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}
