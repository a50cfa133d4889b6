// Copyright 2026 the Afterimage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained-mode bitmap viewport core.
//!
//! `afterimage_core` manages a display surface that holds exactly one
//! *current* image and repaints itself from that image whenever the host
//! asks, independently of how or when the image was produced. Producers
//! hand fully-formed frame buffers to the surface; the surface owns the
//! swap, the retirement of the previous frame, and the scheduling of the
//! paint that follows.
//!
//! # Architecture
//!
//! The crate is organized around a single buffer hand-off path:
//!
//! ```text
//!   Producer ──install──► RetainedViewport
//!                              │ swap under lock
//!                              ▼
//!                         BufferSlot ── previous frame ──► retirement queue
//!                              │
//!                  trigger ────┤
//!                              ▼
//!                     direct paint  or  wake signal ──► paint worker
//!                              │                             │
//!                              ▼                             ▼
//!                         render_frame ──► PaintTarget (blit / fill)
//!                              │
//!                              ▼
//!                         drain ──► RetirePolicy (destroy or reclaim)
//! ```
//!
//! **[`buffer`]** — Owned RGBA8 [`FrameBuffer`](buffer::FrameBuffer)
//! images, including the trivial placeholder the surface starts with.
//!
//! **[`slot`]** — The single-current slot plus the FIFO retirement queue,
//! all guarded by one mutex.
//!
//! **[`retire`]** — The [`RetirePolicy`](retire::RetirePolicy) capability
//! deciding whether a retired buffer is destroyed or handed back to an
//! external pool.
//!
//! **[`target`]** — The [`PaintTarget`](target::PaintTarget) contract the
//! platform drawing backend implements; the core never touches pixels
//! itself.
//!
//! **[`render`]** — Destination-rect layout for the two presentation
//! modes and the blit/fill sequence of a paint pass.
//!
//! `signal` / `worker` (internal) — The auto-reset wake primitive and
//! the optional dedicated paint thread with its two-phase shutdown
//! handshake.
//!
//! **[`surface`]** — The [`RetainedViewport`](surface::RetainedViewport)
//! aggregate tying everything together.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types
//! for hand-off and paint instrumentation.

pub mod buffer;
pub mod error;
pub mod render;
pub mod retire;
pub(crate) mod signal;
pub mod slot;
pub mod surface;
pub mod target;
pub mod trace;
pub(crate) mod worker;

pub use buffer::FrameBuffer;
pub use error::{BufferError, PaintError, SurfaceError};
pub use render::ScaleMode;
pub use retire::RetirePolicy;
pub use surface::{RetainedViewport, ViewportOptions};
pub use target::{Extent, FilterMode, PaintTarget, Rgba8};
