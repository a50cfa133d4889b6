// Copyright 2026 the Afterimage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The single-current buffer slot and its retirement queue.
//!
//! A [`BufferSlot`] holds the one buffer the surface will draw next and
//! a FIFO queue of previously-current buffers awaiting disposition. All
//! mutation happens under the surface's single mutex; the painter reads
//! the current buffer through a cheap [`Arc`] clone so the lock is never
//! held across the actual drawing call. A buffer replaced mid-paint
//! simply waits in the retirement queue — it is never destroyed while a
//! paint still reads it.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use crate::buffer::FrameBuffer;
use crate::retire::RetirePolicy;
use crate::trace::{RetireDisposition, RetireEvent};

/// Holds the current buffer, the retirement queue, and the bound policy.
pub struct BufferSlot {
    current: Option<Arc<FrameBuffer>>,
    retired: VecDeque<Arc<FrameBuffer>>,
    policy: Option<Box<dyn RetirePolicy + Send>>,
}

impl BufferSlot {
    /// Creates a slot with `initial` as the current buffer.
    #[must_use]
    pub fn new(initial: FrameBuffer) -> Self {
        Self {
            current: Some(Arc::new(initial)),
            retired: VecDeque::new(),
            policy: None,
        }
    }

    /// Installs a new current buffer, retiring the previous one.
    ///
    /// O(1) critical section: one queue push and one pointer swap.
    /// Returns `true` when a previous buffer moved to the retirement
    /// queue.
    pub fn install(&mut self, new: FrameBuffer) -> bool {
        let retired_previous = if let Some(previous) = self.current.take() {
            self.retired.push_back(previous);
            true
        } else {
            false
        };
        self.current = Some(Arc::new(new));
        retired_previous
    }

    /// Non-owning read of the current buffer.
    ///
    /// The returned handle keeps the pixels alive for the duration of a
    /// blit without blocking a concurrent install; drop it before the
    /// post-paint drain so a replaced buffer can be retired promptly.
    #[must_use]
    pub fn current(&self) -> Option<Arc<FrameBuffer>> {
        self.current.clone()
    }

    /// Binds the retire policy consulted by [`Self::drain_with`].
    pub fn set_policy(&mut self, policy: Option<Box<dyn RetirePolicy + Send>>) {
        self.policy = policy;
    }

    /// Moves the current buffer (if any) to the retirement queue.
    ///
    /// Teardown uses this so the final drain disposes of every buffer
    /// the slot still owns.
    pub fn retire_current(&mut self) {
        if let Some(current) = self.current.take() {
            self.retired.push_back(current);
        }
    }

    /// Number of buffers waiting in the retirement queue.
    #[must_use]
    pub fn pending_retirements(&self) -> usize {
        self.retired.len()
    }

    /// Drains the retirement queue through the bound policy.
    ///
    /// Buffers are processed oldest-first, each consulted exactly once.
    /// `on_retire` observes the disposition of each processed buffer. A
    /// buffer still pinned by an in-flight paint stays at the queue
    /// front for the next drain.
    pub fn drain_with(&mut self, mut on_retire: impl FnMut(&RetireEvent)) {
        while let Some(entry) = self.retired.pop_front() {
            match Arc::try_unwrap(entry) {
                Ok(buffer) => {
                    let extent = buffer.extent();
                    let declined = match &mut self.policy {
                        Some(policy) => policy.retire(buffer),
                        None => Some(buffer),
                    };
                    let disposition = if declined.is_some() {
                        RetireDisposition::Destroyed
                    } else {
                        RetireDisposition::Reclaimed
                    };
                    drop(declined);
                    on_retire(&RetireEvent {
                        extent,
                        disposition,
                    });
                }
                Err(pinned) => {
                    self.retired.push_front(pinned);
                    break;
                }
            }
        }
    }

    /// Drains the retirement queue without observing dispositions.
    pub fn drain(&mut self) {
        self.drain_with(|_| {});
    }
}

impl fmt::Debug for BufferSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferSlot")
            .field("current", &self.current)
            .field("pending_retirements", &self.retired.len())
            .field("has_policy", &self.policy.is_some())
            .finish()
    }
}
