//! Frame scheduling.
//!
//! The host owns the display-refresh loop. The session asks it for one tick at
//! a time through [`TickScheduler::schedule_tick`] and keeps the returned
//! [`TickHandle`]; a frame delivered with any other handle is stale and ignored.

use serde::{Deserialize, Serialize};

/// Opaque identifier of one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickHandle(pub u64);

pub trait TickScheduler {
    /// Request a single callback on the next frame.
    fn schedule_tick(&mut self) -> TickHandle;

    /// Cancel a previously scheduled callback. Unknown handles are ignored.
    fn cancel_tick(&mut self, handle: TickHandle);
}

/// Scheduler for hosts that pump frames themselves.
///
/// Holds at most one pending handle; scheduling again replaces it.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    pending: Option<TickHandle>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pending handle, if any, so the host can deliver it.
    pub fn take_due(&mut self) -> Option<TickHandle> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<TickHandle> {
        self.pending
    }
}

impl TickScheduler for FrameScheduler {
    fn schedule_tick(&mut self) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}
