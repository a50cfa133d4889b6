// Copyright 2026 the Afterimage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Destination-rect layout and the drawing sequence of a paint pass.
//!
//! Two presentation modes are supported. *Scale-to-fit* stretches the
//! buffer over the whole target with nearest-neighbor sampling.
//! *Native-size* draws the buffer unscaled at the origin and fills the
//! exposed margins with opaque black, so stale pixels from a previous,
//! larger frame are never visible. The right strip spans the full target
//! height (covering the bottom-right corner as well as the area beside
//! the image); the bottom strip covers the area below the image.
//!
//! The layout helpers are pure functions over extents, independent of
//! any [`PaintTarget`] implementation.

use kurbo::Rect;

use crate::buffer::FrameBuffer;
use crate::error::PaintError;
use crate::target::{Extent, FilterMode, PaintTarget, Rgba8};

/// How buffer pixels map onto the display region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ScaleMode {
    /// Stretch the buffer to occupy the full target extent.
    #[default]
    ScaleToFit,
    /// Draw at native resolution anchored at the origin, with black
    /// background fill over the remaining margins.
    NativeSize,
}

/// The rectangles of a native-size paint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NativeLayout {
    /// Where the buffer lands, always `(0, 0)..(bw, bh)`.
    pub image: Rect,
    /// Full-height strip right of the image, when the target is wider.
    pub right_margin: Option<Rect>,
    /// Strip below the image, when the target is taller.
    pub bottom_margin: Option<Rect>,
}

/// Destination for a scale-to-fit blit: the whole target.
#[must_use]
pub fn scaled_dest(target: Extent) -> Rect {
    target.to_rect()
}

/// Computes the image and margin rectangles for native-size drawing.
#[must_use]
pub fn native_layout(buffer: Extent, target: Extent) -> NativeLayout {
    let (bw, bh) = (f64::from(buffer.width), f64::from(buffer.height));
    let (tw, th) = (f64::from(target.width), f64::from(target.height));

    let right_margin = (tw > bw).then(|| Rect::new(bw, 0.0, tw, th));
    let bottom_margin = (th > bh).then(|| Rect::new(0.0, bh, bw.min(tw), th));

    NativeLayout {
        image: Rect::new(0.0, 0.0, bw, bh),
        right_margin,
        bottom_margin,
    }
}

/// Draws one frame onto `target`.
///
/// With no buffer this is a no-op; the caller's paint pass still drains
/// the retirement queue afterwards. Fills precede the blit so a failed
/// blit never leaves a margin unpainted over a drawn image.
///
/// # Errors
///
/// Propagates the first [`PaintError`] from the target, undecorated.
pub fn render_frame<T: PaintTarget + ?Sized>(
    target: &mut T,
    buffer: Option<&FrameBuffer>,
    extent: Extent,
    mode: ScaleMode,
) -> Result<(), PaintError> {
    let Some(buffer) = buffer else {
        return Ok(());
    };

    match mode {
        ScaleMode::ScaleToFit => target.blit(buffer, scaled_dest(extent), FilterMode::Nearest),
        ScaleMode::NativeSize => {
            let layout = native_layout(buffer.extent(), extent);
            if let Some(right) = layout.right_margin {
                target.fill(right, Rgba8::BLACK)?;
            }
            if let Some(bottom) = layout.bottom_margin {
                target.fill(bottom, Rgba8::BLACK)?;
            }
            target.blit(buffer, layout.image, FilterMode::Nearest)
        }
    }
}
