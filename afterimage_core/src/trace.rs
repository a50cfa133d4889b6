// Copyright 2026 the Afterimage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instrumentation for the buffer hand-off and paint loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods the
//! surface calls at each stage. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! The surface owns at most one boxed sink and invokes it under the
//! shared-state lock, so a sink only needs `Send`, not `Sync`.

use crate::error::PaintError;
use crate::render::ScaleMode;
use crate::target::Extent;

/// What happened to a retired buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RetireDisposition {
    /// The surface destroyed the buffer (no policy, or the policy
    /// declined it).
    Destroyed,
    /// The retire policy took ownership for reuse.
    Reclaimed,
}

/// Emitted when a producer installs a new current buffer.
#[derive(Clone, Copy, Debug)]
pub struct InstallEvent {
    /// Size of the installed buffer.
    pub extent: Extent,
    /// Whether a previous current buffer moved to the retirement queue.
    pub retired_previous: bool,
}

/// Emitted when a paint pass begins.
#[derive(Clone, Copy, Debug)]
pub struct PaintBeginEvent {
    /// Drawable size of the target at the start of the pass.
    pub target: Extent,
    /// Presentation mode for this pass.
    pub scale_mode: ScaleMode,
}

/// Emitted when a paint pass completes without a backend error.
#[derive(Clone, Copy, Debug)]
pub struct PaintEndEvent {
    /// `false` when there was no current buffer and nothing was drawn.
    pub painted: bool,
}

/// Emitted for each buffer leaving the retirement queue.
#[derive(Clone, Copy, Debug)]
pub struct RetireEvent {
    /// Size of the retired buffer.
    pub extent: Extent,
    /// Whether the buffer was destroyed or reclaimed.
    pub disposition: RetireDisposition,
}

/// Receives events from the surface.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a new buffer becomes current.
    fn on_install(&mut self, e: &InstallEvent) {
        _ = e;
    }

    /// Called at the start of a paint pass.
    fn on_paint_begin(&mut self, e: &PaintBeginEvent) {
        _ = e;
    }

    /// Called when a paint pass finishes cleanly.
    fn on_paint_end(&mut self, e: &PaintEndEvent) {
        _ = e;
    }

    /// Called when the drawing backend reported a failure.
    fn on_paint_error(&mut self, error: &PaintError) {
        _ = error;
    }

    /// Called once per retired buffer as the queue drains.
    fn on_retire(&mut self, e: &RetireEvent) {
        _ = e;
    }

    /// Called when the background paint worker starts.
    fn on_worker_start(&mut self) {}

    /// Called when the background paint worker acknowledges shutdown.
    fn on_worker_stop(&mut self) {}
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}
