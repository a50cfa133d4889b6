// Copyright 2026 the Afterimage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned RGBA8 frame buffers.
//!
//! A [`FrameBuffer`] is a fully-formed image a producer hands to the
//! surface. Ownership transfers on install; the producer must supply a
//! fresh buffer per install and never touch one it has given away.

use std::fmt;

use crate::error::BufferError;
use crate::target::Extent;

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// An owned RGBA8 image with row-major pixels and no padding.
#[derive(Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    /// Creates a zero-filled (transparent black) buffer.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * BYTES_PER_PIXEL;
        Self {
            width,
            height,
            pixels: vec![0; len],
        }
    }

    /// Creates a buffer from existing pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::SizeMismatch`] when `pixels.len()` is not
    /// exactly `width * height * 4`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BufferError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(BufferError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// The trivial 2×2 buffer every surface starts with, so the first
    /// paint never reads empty state.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::new(2, 2)
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width and height as an [`Extent`].
    #[must_use]
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Read-only pixel bytes, row-major RGBA8.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable pixel bytes for producers filling the frame.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.pixels.len())
            .finish()
    }
}
