// Copyright 2026 the Afterimage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing-backend contract.
//!
//! The core never rasterizes. Every pixel that reaches the screen goes
//! through a [`PaintTarget`] supplied by the platform integration: a
//! blit of the current frame buffer into a destination rectangle and a
//! solid fill for the margin strips of native-size presentation.
//!
//! Calls arrive on whichever thread runs the paint pass: the caller's
//! thread in direct mode, the dedicated paint thread in threaded mode.
//! A target therefore needs to be `Send`, but it is never shared between
//! two threads at once.

use kurbo::Rect;

use crate::buffer::FrameBuffer;
use crate::error::PaintError;

/// A width/height pair in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Extent {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Extent {
    /// Creates an extent from a width and height.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The rectangle `(0, 0)..(width, height)`.
    #[must_use]
    pub fn to_rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// Sampling filter for a blit.
///
/// The core always asks for [`FilterMode::Nearest`]: the viewport is a
/// live surface optimized for throughput, not resampling quality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Nearest-neighbor sampling.
    Nearest,
    /// Bilinear sampling, for targets that want it anyway.
    Bilinear,
}

/// A solid RGBA color with 8-bit channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black, the background fill for native-size margins.
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
}

/// Platform drawing capability the render routine draws through.
///
/// Implementations may clip freely; destination rectangles can extend
/// past the target extent (a native-size buffer larger than the target
/// is drawn at the origin and clipped).
pub trait PaintTarget {
    /// Current drawable size of the target.
    fn extent(&self) -> Extent;

    /// Draws `buffer` into `dest`, stretching as needed with `filter`.
    ///
    /// # Errors
    ///
    /// Backend failures are returned as an opaque [`PaintError`]; the
    /// core reports them to its trace sink and does not retry.
    fn blit(&mut self, buffer: &FrameBuffer, dest: Rect, filter: FilterMode)
    -> Result<(), PaintError>;

    /// Fills `rect` with a solid color.
    ///
    /// # Errors
    ///
    /// Backend failures are returned as an opaque [`PaintError`]; the
    /// core reports them to its trace sink and does not retry.
    fn fill(&mut self, rect: Rect, color: Rgba8) -> Result<(), PaintError>;
}
