use super::{CancelToken, FrameOutcome, FrameSequenceRunner};
use crate::image::Frame;
use std::time::Instant;

/// Lazy, sequential view of a run. Each `next()` pulls and processes one frame.
pub struct FrameStream<'a, I> {
    runner: &'a mut FrameSequenceRunner,
    frames: I,
    next_index: usize,
    cancel: CancelToken,
}

impl<'a, I> FrameStream<'a, I> {
    pub(super) fn new(runner: &'a mut FrameSequenceRunner, frames: I) -> Self {
        let next_index = runner.report.frames;
        Self {
            runner,
            frames,
            next_index,
            cancel: CancelToken::new(),
        }
    }

    /// Stop the stream once `cancel` is raised.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle that ends the stream before its next frame.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

impl<I: Iterator<Item = Frame>> Iterator for FrameStream<'_, I> {
    type Item = FrameOutcome;

    fn next(&mut self) -> Option<FrameOutcome> {
        if self.cancel.is_cancelled() {
            return None;
        }
        let frame = self.frames.next()?;
        let start = Instant::now();
        let outcome = self.runner.process_sequential(self.next_index, frame);
        self.runner.wall += start.elapsed();
        self.next_index += 1;
        Some(outcome)
    }
}
