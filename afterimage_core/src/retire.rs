// Copyright 2026 the Afterimage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The retirement capability.
//!
//! When a buffer stops being current it is queued for retirement, and on
//! the next paint pass (or at teardown) the surface consults the bound
//! [`RetirePolicy`] once per buffer. The policy consumes the buffer and
//! either keeps it — an external pool re-adopting the allocation — or
//! hands it back for destruction. Without a policy every retired buffer
//! is destroyed.

use crate::buffer::FrameBuffer;

/// Decides the fate of each retired buffer.
///
/// Ownership of the buffer transfers into the call. Return `None` when
/// the policy has taken the buffer for reuse; return `Some(buffer)` to
/// decline it, in which case the surface destroys it. Each retired
/// buffer is consulted exactly once, and a destroyed buffer is never
/// seen again.
pub trait RetirePolicy {
    /// Consumes a retired buffer, returning it only if the surface
    /// should destroy it.
    fn retire(&mut self, buffer: FrameBuffer) -> Option<FrameBuffer>;
}

impl<F> RetirePolicy for F
where
    F: FnMut(FrameBuffer) -> Option<FrameBuffer>,
{
    fn retire(&mut self, buffer: FrameBuffer) -> Option<FrameBuffer> {
        self(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_policies() {
        let mut kept = Vec::new();
        let mut policy = |buffer: FrameBuffer| {
            if buffer.width() >= 8 {
                kept.push(buffer);
                None
            } else {
                Some(buffer)
            }
        };

        assert!(
            policy.retire(FrameBuffer::new(8, 8)).is_none(),
            "large buffer should be kept"
        );
        assert!(
            policy.retire(FrameBuffer::new(2, 2)).is_some(),
            "small buffer should be declined"
        );
        drop(policy);
        assert_eq!(kept.len(), 1);
    }
}
