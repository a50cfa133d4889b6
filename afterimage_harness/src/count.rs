// Copyright 2026 the Afterimage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event tallies for leak and scheduling assertions.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use afterimage_core::error::PaintError;
use afterimage_core::trace::{
    InstallEvent, PaintBeginEvent, PaintEndEvent, RetireDisposition, RetireEvent, TraceSink,
};

/// Totals observed by a [`CountingSink`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    /// Buffers installed.
    pub installs: u64,
    /// Paint passes begun.
    pub paints_begun: u64,
    /// Paint passes that drew a buffer.
    pub paints_drawn: u64,
    /// Paint passes with nothing to draw.
    pub paints_blank: u64,
    /// Backend failures reported.
    pub paint_errors: u64,
    /// Retired buffers destroyed by the surface.
    pub retired_destroyed: u64,
    /// Retired buffers reclaimed by the policy.
    pub retired_reclaimed: u64,
    /// Worker threads started.
    pub worker_starts: u64,
    /// Worker threads stopped.
    pub worker_stops: u64,
}

impl Counts {
    /// Total retirement dispositions, destroyed plus reclaimed.
    ///
    /// At the end of a closed surface's life this equals the number of
    /// installs plus one (the placeholder): every buffer ever owned is
    /// disposed of exactly once.
    #[must_use]
    pub fn retired_total(&self) -> u64 {
        self.retired_destroyed + self.retired_reclaimed
    }
}

/// A cloneable [`TraceSink`] tallying every event.
///
/// Clones share one set of counters, so a test keeps a handle while the
/// sink itself is boxed into the surface.
#[derive(Clone, Debug, Default)]
pub struct CountingSink {
    counts: Arc<Mutex<Counts>>,
}

impl CountingSink {
    /// Creates a sink with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out the current totals.
    #[must_use]
    pub fn counts(&self) -> Counts {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, Counts> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TraceSink for CountingSink {
    fn on_install(&mut self, _e: &InstallEvent) {
        self.lock().installs += 1;
    }

    fn on_paint_begin(&mut self, _e: &PaintBeginEvent) {
        self.lock().paints_begun += 1;
    }

    fn on_paint_end(&mut self, e: &PaintEndEvent) {
        let mut counts = self.lock();
        if e.painted {
            counts.paints_drawn += 1;
        } else {
            counts.paints_blank += 1;
        }
    }

    fn on_paint_error(&mut self, _error: &PaintError) {
        self.lock().paint_errors += 1;
    }

    fn on_retire(&mut self, e: &RetireEvent) {
        let mut counts = self.lock();
        match e.disposition {
            RetireDisposition::Destroyed => counts.retired_destroyed += 1,
            RetireDisposition::Reclaimed => counts.retired_reclaimed += 1,
        }
    }

    fn on_worker_start(&mut self) {
        self.lock().worker_starts += 1;
    }

    fn on_worker_stop(&mut self) {
        self.lock().worker_stops += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use afterimage_core::target::Extent;

    #[test]
    fn clones_share_counters() {
        let sink = CountingSink::new();
        let mut boxed = sink.clone();
        boxed.on_install(&InstallEvent {
            extent: Extent::new(1, 1),
            retired_previous: false,
        });
        boxed.on_retire(&RetireEvent {
            extent: Extent::new(1, 1),
            disposition: RetireDisposition::Reclaimed,
        });

        let counts = sink.counts();
        assert_eq!(counts.installs, 1);
        assert_eq!(counts.retired_reclaimed, 1);
        assert_eq!(counts.retired_total(), 1);
    }
}
