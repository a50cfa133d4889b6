// Copyright 2026 the Afterimage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end viewport behavior through the harness doubles.

use afterimage_core::{
    Extent, FilterMode, FrameBuffer, RetainedViewport, Rgba8, ScaleMode, SurfaceError,
    ViewportOptions,
};
use afterimage_harness::{BufferPool, CountingSink, PaintGate, PaintOp, RecordingTarget};
use kurbo::Rect;

#[test]
fn direct_installs_paint_scale_to_fit_over_the_full_target() {
    let target = RecordingTarget::new(20, 15);
    let log = target.log();
    let mut viewport =
        RetainedViewport::new(target, ViewportOptions::default()).expect("direct mode");

    for n in 1..=3 {
        viewport.install(FrameBuffer::new(n, n)).expect("install");
    }

    let ops = log.snapshot();
    assert_eq!(ops.len(), 3, "one blit per install, no fills");
    for (n, op) in (1..=3_u32).zip(&ops) {
        assert_eq!(
            *op,
            PaintOp::Blit {
                buffer: Extent::new(n, n),
                dest: Rect::new(0.0, 0.0, 20.0, 15.0),
                filter: FilterMode::Nearest,
            }
        );
    }
}

#[test]
fn native_size_fills_margins_then_blits_unscaled() {
    let target = RecordingTarget::new(20, 15);
    let log = target.log();
    let mut viewport = RetainedViewport::new(
        target,
        ViewportOptions::new(false, ScaleMode::NativeSize),
    )
    .expect("direct mode");

    viewport.install(FrameBuffer::new(10, 10)).expect("install");

    assert_eq!(
        log.snapshot(),
        &[
            PaintOp::Fill {
                rect: Rect::new(10.0, 0.0, 20.0, 15.0),
                color: Rgba8::BLACK,
            },
            PaintOp::Fill {
                rect: Rect::new(0.0, 10.0, 10.0, 15.0),
                color: Rgba8::BLACK,
            },
            PaintOp::Blit {
                buffer: Extent::new(10, 10),
                dest: Rect::new(0.0, 0.0, 10.0, 10.0),
                filter: FilterMode::Nearest,
            },
        ]
    );
}

#[test]
fn every_buffer_ever_owned_is_retired_exactly_once() {
    let target = RecordingTarget::new(8, 8);
    let sink = CountingSink::new();
    let mut viewport =
        RetainedViewport::new(target, ViewportOptions::default()).expect("direct mode");
    viewport.set_trace_sink(sink.clone());

    for _ in 0..5 {
        viewport.install(FrameBuffer::new(4, 4)).expect("install");
    }
    viewport.close();

    let counts = sink.counts();
    assert_eq!(counts.installs, 5);
    // Five installs plus the initial placeholder.
    assert_eq!(counts.retired_total(), 6);
    assert_eq!(counts.retired_destroyed, 6, "no policy bound");
    assert_eq!(counts.paints_drawn, 5);
}

#[test]
fn pool_policy_reclaims_and_acquire_reuses() {
    let target = RecordingTarget::new(8, 8);
    let pool = BufferPool::with_capacity(8);
    let mut viewport =
        RetainedViewport::new(target, ViewportOptions::default()).expect("direct mode");
    viewport.set_retire_policy(pool.clone());

    viewport.install(pool.acquire(4, 4)).expect("install");
    viewport.install(pool.acquire(4, 4)).expect("install");
    viewport.close();

    // Placeholder plus both installed frames came back to the pool.
    let stats = pool.stats();
    assert_eq!(stats.reclaimed, 3);
    assert_eq!(stats.destroyed, 0);

    let pooled_before = pool.pooled();
    let reused = pool.acquire(4, 4);
    assert_eq!(reused.extent(), Extent::new(4, 4));
    assert_eq!(pool.pooled(), pooled_before - 1);
    assert_eq!(pool.stats().reused, 1);
}

#[test]
fn threaded_installs_coalesce_to_the_latest_frame() {
    let gate = PaintGate::new();
    let target = RecordingTarget::new(8, 8).with_gate(gate.clone());
    let log = target.log();
    let sink = CountingSink::new();
    let mut viewport = RetainedViewport::new(target, ViewportOptions::new(true, ScaleMode::default()))
        .expect("worker spawns");
    viewport.set_trace_sink(sink.clone());
    assert!(viewport.is_threaded());

    viewport.install(FrameBuffer::new(1, 1)).expect("install");
    // The first paint is now parked inside its blit.
    gate.wait_entered(1);

    // These four land while the worker is busy; the wakes coalesce.
    for n in 2..=5 {
        viewport.install(FrameBuffer::new(n, 1)).expect("install");
    }

    gate.release_one();
    gate.wait_entered(2);
    gate.open();
    viewport.close();

    assert_eq!(
        log.blit_extents(),
        &[Extent::new(1, 1), Extent::new(5, 1)],
        "the second paint draws the newest frame, skipping the middle ones"
    );
    let counts = sink.counts();
    assert_eq!(counts.installs, 5);
    assert_eq!(counts.retired_total(), 6);
}

#[test]
fn threaded_triggers_return_while_a_paint_is_in_flight() {
    let gate = PaintGate::new();
    let target = RecordingTarget::new(8, 8).with_gate(gate.clone());
    let log = target.log();
    let mut viewport = RetainedViewport::new(target, ViewportOptions::new(true, ScaleMode::default()))
        .expect("worker spawns");

    viewport.install(FrameBuffer::new(3, 3)).expect("install");
    gate.wait_entered(1);

    // The worker is parked mid-blit; this must not block the caller.
    viewport.repaint().expect("repaint");

    gate.release_one();
    // The coalesced repaint draws the same frame a second time.
    gate.wait_entered(2);
    gate.open();
    viewport.close();

    assert_eq!(log.blit_extents(), &[Extent::new(3, 3), Extent::new(3, 3)]);
}

#[test]
fn close_stops_the_worker_and_rejects_later_operations() {
    let gate = PaintGate::new();
    gate.open();
    let target = RecordingTarget::new(8, 8).with_gate(gate.clone());
    let log = target.log();
    let sink = CountingSink::new();
    let mut viewport = RetainedViewport::new(target, ViewportOptions::new(true, ScaleMode::default()))
        .expect("worker spawns");
    viewport.set_trace_sink(sink.clone());

    viewport.install(FrameBuffer::new(2, 2)).expect("install");
    viewport.close();

    // The start event may beat the sink binding; the stop cannot.
    let counts = sink.counts();
    assert_eq!(counts.worker_stops, 1, "close waits for the worker to exit");

    assert!(matches!(
        viewport.install(FrameBuffer::new(1, 1)),
        Err(SurfaceError::Disposed)
    ));
    assert!(matches!(viewport.repaint(), Err(SurfaceError::Disposed)));

    let ops_after_close = log.len();
    viewport.close();
    assert_eq!(log.len(), ops_after_close, "second close paints nothing");
}
