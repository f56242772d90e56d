use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};

use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;

/// Single-slot, overwrite-on-write handoff from a background frame producer.
///
/// Layout: `producer thread → [1 frame] → tick loop`
///
/// When the slot is still full the producer evicts the stale frame before
/// inserting, so the reader only ever sees the newest frame. Evictions are
/// counted as dropped frames.
pub struct LatestFrameSlot {
    rx: Receiver<Frame>,
    dropped: Arc<AtomicUsize>,
    stop: Arc<AtomicBool>,
    exhausted: bool,
    producer: Option<JoinHandle<()>>,
}

impl LatestFrameSlot {
    /// Spawns a producer draining `frames`, sleeping `pace` between frames
    /// when given. The producer stops early once `cancelled` is raised.
    pub fn spawn<I>(frames: I, pace: Option<Duration>, cancelled: Arc<AtomicBool>) -> Self
    where
        I: Iterator<Item = Frame> + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::bounded::<Frame>(1);
        let evict = rx.clone();
        let dropped = Arc::new(AtomicUsize::new(0));
        let stop = Arc::new(AtomicBool::new(false));
        let halt = Halt {
            cancelled,
            stop: stop.clone(),
        };
        let producer = spawn_producer(frames, pace, halt, tx, evict, dropped.clone());
        Self {
            rx,
            dropped,
            stop,
            exhausted: false,
            producer: Some(producer),
        }
    }

    /// Frames overwritten before anyone read them.
    pub fn dropped_frames(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Producer stop conditions: the caller's cancellation or the slot's drop.
struct Halt {
    cancelled: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
}

impl Halt {
    fn is_raised(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed) || self.stop.load(Ordering::Relaxed)
    }
}

fn spawn_producer<I>(
    frames: I,
    pace: Option<Duration>,
    halt: Halt,
    tx: Sender<Frame>,
    evict: Receiver<Frame>,
    dropped: Arc<AtomicUsize>,
) -> JoinHandle<()>
where
    I: Iterator<Item = Frame> + Send + 'static,
{
    std::thread::spawn(move || {
        for frame in frames {
            if halt.is_raised() {
                break;
            }
            if !offer(&tx, &evict, frame, &dropped) {
                break;
            }
            if let Some(pace) = pace {
                std::thread::sleep(pace);
            }
        }
    })
}

/// Puts `frame` in the slot, evicting whatever is there. Returns false once
/// the channel is disconnected.
fn offer(
    tx: &Sender<Frame>,
    evict: &Receiver<Frame>,
    mut frame: Frame,
    dropped: &AtomicUsize,
) -> bool {
    loop {
        match tx.try_send(frame) {
            Ok(()) => return true,
            Err(TrySendError::Full(rejected)) => {
                if evict.try_recv().is_ok() {
                    dropped.fetch_add(1, Ordering::Relaxed);
                }
                frame = rejected;
            }
            Err(TrySendError::Disconnected(_)) => return false,
        }
    }
}

impl FrameSource for LatestFrameSlot {
    fn read_latest(&mut self) -> Option<Frame> {
        match self.rx.try_recv() {
            Ok(frame) => Some(frame),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.exhausted = true;
                None
            }
        }
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl Drop for LatestFrameSlot {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.producer.take() {
            let _ = handle.join();
        }
    }
}
