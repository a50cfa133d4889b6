// Copyright 2026 the Afterimage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A recycling retire policy.
//!
//! [`BufferPool`] is the external pool the retirement callback exists
//! for: instead of freeing each retired buffer, the pool re-adopts the
//! allocation and hands it back out through
//! [`acquire`](BufferPool::acquire). Producers and the surface can hold
//! clones of the same pool; all clones share one free list.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use afterimage_core::buffer::FrameBuffer;
use afterimage_core::retire::RetirePolicy;
use afterimage_core::target::Extent;

/// Counters describing a pool's traffic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Retired buffers the pool kept.
    pub reclaimed: u64,
    /// Retired buffers declined because the pool was full.
    pub destroyed: u64,
    /// Acquisitions served from the free list.
    pub reused: u64,
    /// Acquisitions that had to allocate.
    pub allocated: u64,
}

#[derive(Debug)]
struct PoolInner {
    free: Vec<FrameBuffer>,
    capacity: usize,
    stats: PoolStats,
}

/// A capacity-bounded free list of frame buffers, usable directly as a
/// [`RetirePolicy`].
#[derive(Clone, Debug)]
pub struct BufferPool {
    inner: Arc<Mutex<PoolInner>>,
}

impl BufferPool {
    /// Creates a pool keeping at most `capacity` retired buffers.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PoolInner {
                free: Vec::with_capacity(capacity),
                capacity,
                stats: PoolStats::default(),
            })),
        }
    }

    /// Hands out a buffer of exactly the given size, reusing a pooled
    /// one when available.
    ///
    /// Reused buffers keep their previous pixel contents; producers
    /// overwrite the whole frame anyway.
    #[must_use]
    pub fn acquire(&self, width: u32, height: u32) -> FrameBuffer {
        let wanted = Extent::new(width, height);
        let mut inner = self.lock();
        if let Some(index) = inner.free.iter().position(|b| b.extent() == wanted) {
            inner.stats.reused += 1;
            inner.free.swap_remove(index)
        } else {
            inner.stats.allocated += 1;
            FrameBuffer::new(width, height)
        }
    }

    /// Number of buffers currently pooled.
    #[must_use]
    pub fn pooled(&self) -> usize {
        self.lock().free.len()
    }

    /// Copies out the traffic counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.lock().stats
    }

    fn lock(&self) -> MutexGuard<'_, PoolInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RetirePolicy for BufferPool {
    fn retire(&mut self, buffer: FrameBuffer) -> Option<FrameBuffer> {
        let mut inner = self.lock();
        if inner.free.len() < inner.capacity {
            inner.stats.reclaimed += 1;
            inner.free.push(buffer);
            None
        } else {
            inner.stats.destroyed += 1;
            Some(buffer)
        }
    }
}
