//! Redraw coalescing.
//!
//! Any number of redraw requests between two animation frames collapse into
//! one paint. The host asks for an animation frame only when
//! [`FrameScheduler::request`] reports a new request, and calls
//! [`FrameScheduler::begin_frame`] from the frame callback.

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameScheduler {
    pending: bool,
}

impl FrameScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a redraw as needed. Returns `true` if this request is the first
    /// since the last frame, i.e. the caller should schedule a frame.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    /// Consume the pending request. Returns whether a paint is due.
    pub fn begin_frame(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Drop a pending request, e.g. when the frame could not be scheduled.
    pub fn cancel(&mut self) {
        self.pending = false;
    }
}
