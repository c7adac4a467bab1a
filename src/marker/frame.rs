/// Pending-work flag collapsing redundant triggers into one deferred run.
///
/// ```rust
/// use waymark::FrameCoalescer;
///
/// let mut frame = FrameCoalescer::default();
/// assert!(frame.trigger());
/// assert!(!frame.trigger());
///
/// assert!(frame.take());
/// assert!(!frame.take());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameCoalescer {
    pending: bool,
}

impl FrameCoalescer {
    /// Marks work as pending. Returns `true` only when the caller must
    /// schedule a new frame, i.e. nothing was pending before.
    pub fn trigger(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    /// Consumes the pending flag at frame time.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Drops any pending work. Returns whether a frame had been scheduled.
    pub fn cancel(&mut self) -> bool {
        self.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
