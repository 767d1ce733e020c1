//! Frame scheduling
//!
//! Widgets that animate every frame ask for the next frame explicitly with
//! [`FrameScheduler::request_frame`] and re-request after handling it, rather
//! than having a redraw re-enter the update code. Each request fires at most
//! once. Cancelling a request guarantees it is never delivered; widgets still
//! compare the delivered id with the one they armed so a request that was
//! already drained by the host cannot act after a stop.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a pending frame request
    pub struct FrameRequestId;
}

/// Capability to schedule a callback for the next frame
pub trait FrameScheduler {
    /// Ask to be called on the next frame
    fn request_frame(&mut self) -> FrameRequestId;

    /// Withdraw a request. Returns `false` if it already fired or was unknown.
    fn cancel_frame(&mut self, id: FrameRequestId) -> bool;
}

/// Host-side frame clock
///
/// Collects frame requests and hands them out once per frame through
/// [`FrameLoop::take_due`].
#[derive(Debug, Default)]
pub struct FrameLoop {
    pending: SlotMap<FrameRequestId, ()>,
    frame_count: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame and return every request due on it
    pub fn take_due(&mut self) -> Vec<FrameRequestId> {
        self.frame_count += 1;
        self.pending.drain().map(|(id, ())| id).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_pending(&self, id: FrameRequestId) -> bool {
        self.pending.contains_key(id)
    }

    /// Number of frames started so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl FrameScheduler for FrameLoop {
    fn request_frame(&mut self) -> FrameRequestId {
        self.pending.insert(())
    }

    fn cancel_frame(&mut self, id: FrameRequestId) -> bool {
        self.pending.remove(id).is_some()
    }
}
