// Copyright 2026 the Afterimage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for buffer construction, surface lifecycle, and the
//! drawing backend.
//!
//! The error surface is deliberately narrow. Drawing failures are opaque
//! to the core: a [`PaintError`] coming back from the
//! [`PaintTarget`](crate::target::PaintTarget) is reported to the trace
//! sink and never retried or interpreted.

use std::error::Error;
use std::fmt;
use std::io;

/// Error constructing a [`FrameBuffer`](crate::buffer::FrameBuffer).
#[derive(Debug)]
#[non_exhaustive]
pub enum BufferError {
    /// The pixel vector length does not match `width * height * 4`.
    SizeMismatch {
        /// Expected byte length for the given dimensions.
        expected: usize,
        /// Actual length of the supplied pixel vector.
        actual: usize,
    },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => write!(
                f,
                "pixel buffer length {actual} does not match expected {expected}"
            ),
        }
    }
}

impl Error for BufferError {}

/// Error from surface lifecycle operations.
#[derive(Debug)]
#[non_exhaustive]
pub enum SurfaceError {
    /// The surface has been closed; installs and repaints are rejected.
    Disposed,
    /// The background paint thread could not be spawned.
    Spawn(io::Error),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disposed => write!(f, "surface has been disposed"),
            Self::Spawn(_) => write!(f, "failed to spawn paint worker thread"),
        }
    }
}

impl Error for SurfaceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Disposed => None,
            Self::Spawn(e) => Some(e),
        }
    }
}

/// Opaque failure reported by the drawing backend.
///
/// The core forwards these to the trace sink and otherwise guarantees
/// only the scheduling contract; it never retries a failed paint.
#[derive(Debug)]
pub struct PaintError {
    message: String,
}

impl PaintError {
    /// Creates a paint error with a backend-supplied message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the backend-supplied message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for PaintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "paint failed: {}", self.message)
    }
}

impl Error for PaintError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_error_reports_lengths() {
        let e = BufferError::SizeMismatch {
            expected: 16,
            actual: 12,
        };
        let text = e.to_string();
        assert!(text.contains("12"), "message should contain actual length");
        assert!(
            text.contains("16"),
            "message should contain expected length"
        );
    }

    #[test]
    fn spawn_error_carries_source() {
        let e = SurfaceError::Spawn(io::Error::other("no threads"));
        assert!(e.source().is_some(), "spawn error should expose its cause");
        assert!(
            SurfaceError::Disposed.source().is_none(),
            "disposed has no cause"
        );
    }

    #[test]
    fn paint_error_preserves_message() {
        let e = PaintError::new("surface lost");
        assert_eq!(e.message(), "surface lost");
        assert_eq!(e.to_string(), "paint failed: surface lost");
    }
}
