use std::sync::Arc;
use std::time::Duration;

use crate::shared::clock::ManualClock;
use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;

/// Simulated camera: yields `total` blank frames and moves a [`ManualClock`]
/// forward by one `step` before each, so replays run as fast as the CPU
/// allows yet see the same timeline every time.
pub struct SteppedFrameSource {
    clock: Arc<ManualClock>,
    step: Duration,
    width: u32,
    height: u32,
    next: usize,
    total: usize,
}

impl SteppedFrameSource {
    pub fn new(
        clock: Arc<ManualClock>,
        step: Duration,
        width: u32,
        height: u32,
        total: usize,
    ) -> Self {
        Self {
            clock,
            step,
            width,
            height,
            next: 0,
            total,
        }
    }
}

impl FrameSource for SteppedFrameSource {
    fn read_latest(&mut self) -> Option<Frame> {
        if self.next >= self.total {
            return None;
        }
        self.clock.advance(self.step);
        let frame = Frame::blank(self.width, self.height, self.next);
        self.next += 1;
        Some(frame)
    }

    fn is_exhausted(&self) -> bool {
        self.next >= self.total
    }
}
