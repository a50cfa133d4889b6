// Copyright 2026 the Afterimage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable test and demo support for the afterimage viewport.
//!
//! This crate provides the doubles the integration suite (and demo
//! hosts) drive the core with:
//!
//! - [`RecordingTarget`] — a [`PaintTarget`](afterimage_core::PaintTarget)
//!   that records every blit and fill into a shared [`OpLog`], with an
//!   optional [`PaintGate`] for holding a paint mid-blit so coalescing
//!   and teardown ordering can be asserted deterministically.
//! - [`BufferPool`] — a recycling
//!   [`RetirePolicy`](afterimage_core::RetirePolicy) with
//!   reclaimed/destroyed counters, the external pool the retirement
//!   callback exists for.
//! - [`CountingSink`] — a [`TraceSink`](afterimage_core::trace::TraceSink)
//!   tallying installs, paints, and retirement dispositions, used to
//!   check the no-leak property.

mod count;
mod pool;
mod record;

pub use count::{CountingSink, Counts};
pub use pool::{BufferPool, PoolStats};
pub use record::{OpLog, PaintGate, PaintOp, RecordingTarget};
