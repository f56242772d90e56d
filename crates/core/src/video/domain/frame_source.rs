use crate::shared::frame::Frame;

/// Hands the tick loop the newest available frame.
///
/// Never blocks: `None` means no new frame since the last read, which the
/// loop treats as a skipped tick.
pub trait FrameSource: Send {
    fn read_latest(&mut self) -> Option<Frame>;

    /// True once the producer has finished and no frame remains.
    fn is_exhausted(&self) -> bool {
        false
    }
}
