// Copyright 2026 the Afterimage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A paint target that records instead of drawing.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use afterimage_core::buffer::FrameBuffer;
use afterimage_core::error::PaintError;
use afterimage_core::target::{Extent, FilterMode, PaintTarget, Rgba8};
use kurbo::Rect;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One recorded drawing call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaintOp {
    /// A buffer blit.
    Blit {
        /// Size of the source buffer.
        buffer: Extent,
        /// Destination rectangle.
        dest: Rect,
        /// Requested sampling filter.
        filter: FilterMode,
    },
    /// A solid fill.
    Fill {
        /// Filled rectangle.
        rect: Rect,
        /// Fill color.
        color: Rgba8,
    },
}

/// Shared handle onto a [`RecordingTarget`]'s op list.
///
/// The target itself usually moves onto the paint worker thread; tests
/// keep a clone of the log to inspect from outside.
#[derive(Clone, Debug, Default)]
pub struct OpLog {
    ops: Arc<Mutex<Vec<PaintOp>>>,
}

impl OpLog {
    /// Copies out everything recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<PaintOp> {
        lock(&self.ops).clone()
    }

    /// Number of recorded ops.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.ops).len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The source-buffer extents of the recorded blits, in order.
    #[must_use]
    pub fn blit_extents(&self) -> Vec<Extent> {
        lock(&self.ops)
            .iter()
            .filter_map(|op| match op {
                PaintOp::Blit { buffer, .. } => Some(*buffer),
                PaintOp::Fill { .. } => None,
            })
            .collect()
    }

    fn push(&self, op: PaintOp) {
        lock(&self.ops).push(op);
    }
}

#[derive(Debug, Default)]
struct GateState {
    entered: usize,
    released: usize,
    open: bool,
}

/// Blocks paints mid-blit until the test releases them.
///
/// Each blit through a gated target takes a ticket after recording its
/// op, then parks until that many [`release_one`](Self::release_one)
/// calls have happened or the gate is [`open`](Self::open)ed. This
/// makes "the worker is busy painting right now" a condition a test
/// can establish and hold.
#[derive(Debug, Default)]
pub struct PaintGate {
    state: Mutex<GateState>,
    cond: Condvar,
}

impl PaintGate {
    /// Creates a shared gate.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Blocks until at least `n` blits have entered the gate.
    ///
    /// # Panics
    ///
    /// Panics after ten seconds, so a broken test fails instead of
    /// hanging.
    pub fn wait_entered(&self, n: usize) {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut state = lock(&self.state);
        while state.entered < n {
            let timeout = deadline.saturating_duration_since(Instant::now());
            assert!(
                !timeout.is_zero(),
                "timed out waiting for {n} paints to enter the gate"
            );
            let (next, _) = self
                .cond
                .wait_timeout(state, timeout)
                .unwrap_or_else(PoisonError::into_inner);
            state = next;
        }
    }

    /// Lets exactly one parked blit proceed.
    pub fn release_one(&self) {
        let mut state = lock(&self.state);
        state.released += 1;
        drop(state);
        self.cond.notify_all();
    }

    /// Opens the gate permanently; all current and future blits pass.
    ///
    /// Call before closing a viewport whose worker might be parked
    /// here.
    pub fn open(&self) {
        let mut state = lock(&self.state);
        state.open = true;
        drop(state);
        self.cond.notify_all();
    }

    fn pass(&self) {
        let mut state = lock(&self.state);
        state.entered += 1;
        let ticket = state.entered;
        self.cond.notify_all();
        while !state.open && state.released < ticket {
            state = self
                .cond
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// A [`PaintTarget`] that records every call into an [`OpLog`].
#[derive(Debug)]
pub struct RecordingTarget {
    extent: Extent,
    log: OpLog,
    gate: Option<Arc<PaintGate>>,
}

impl RecordingTarget {
    /// Creates a target reporting the given drawable size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            extent: Extent::new(width, height),
            log: OpLog::default(),
            gate: None,
        }
    }

    /// Attaches a [`PaintGate`] that every blit must pass.
    #[must_use]
    pub fn with_gate(mut self, gate: Arc<PaintGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Returns a shared handle onto the recorded ops.
    #[must_use]
    pub fn log(&self) -> OpLog {
        self.log.clone()
    }
}

impl PaintTarget for RecordingTarget {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn blit(
        &mut self,
        buffer: &FrameBuffer,
        dest: Rect,
        filter: FilterMode,
    ) -> Result<(), PaintError> {
        // Record first so wait_entered(n) implies the nth op is visible.
        self.log.push(PaintOp::Blit {
            buffer: buffer.extent(),
            dest,
            filter,
        });
        if let Some(gate) = &self.gate {
            gate.pass();
        }
        Ok(())
    }

    fn fill(&mut self, rect: Rect, color: Rgba8) -> Result<(), PaintError> {
        self.log.push(PaintOp::Fill { rect, color });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ops_are_recorded_in_order() {
        let mut target = RecordingTarget::new(8, 8);
        let log = target.log();
        let buffer = FrameBuffer::new(4, 4);

        target
            .fill(Rect::new(0.0, 0.0, 8.0, 8.0), Rgba8::BLACK)
            .expect("fill");
        target
            .blit(&buffer, Rect::new(0.0, 0.0, 4.0, 4.0), FilterMode::Nearest)
            .expect("blit");

        let ops = log.snapshot();
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0], PaintOp::Fill { .. }));
        assert_eq!(log.blit_extents(), &[Extent::new(4, 4)]);
    }

    #[test]
    fn open_gate_does_not_block() {
        let gate = PaintGate::new();
        gate.open();
        let mut target = RecordingTarget::new(8, 8).with_gate(Arc::clone(&gate));
        let buffer = FrameBuffer::new(1, 1);
        target
            .blit(&buffer, Rect::new(0.0, 0.0, 8.0, 8.0), FilterMode::Nearest)
            .expect("blit");
        gate.wait_entered(1);
    }

    #[test]
    fn release_one_admits_exactly_one_pass() {
        let gate = PaintGate::new();
        gate.release_one();
        let mut target = RecordingTarget::new(8, 8).with_gate(Arc::clone(&gate));
        let buffer = FrameBuffer::new(1, 1);
        // First blit consumes the single release and returns.
        target
            .blit(&buffer, Rect::new(0.0, 0.0, 8.0, 8.0), FilterMode::Nearest)
            .expect("blit");
        gate.wait_entered(1);
    }
}
