use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::control::domain::motion_controller::{ControllerPolicy, MotionController};
use crate::control::domain::motion_executor::{MotionExecutor, StagePlan};
use crate::control::domain::motion_intent::MotionIntent;
use crate::control::domain::motion_transport::{MotionTransport, TransportError};
use crate::detection::domain::candidate_selector::SelectionRule;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::clock::Clock;
use crate::shared::constants::{IDLE_POLL_MS, STATUS_INTERVAL_SECS};
use crate::shared::frame::Frame;
use crate::shared::frame_geometry::FrameGeometry;
use crate::shared::interval_timer::IntervalTimer;
use crate::shared::tracking_config::{ConfigError, TrackingConfig};
use crate::tracking::domain::face_tracker::FaceTracker;
use crate::tracking::domain::subject_evaluator::{EvaluatorPolicy, SubjectEvaluator};
use crate::video::domain::frame_source::FrameSource;

use super::tracking_logger::TrackingLogger;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("face detection failed: {0}")]
    Detection(#[source] Box<dyn std::error::Error>),
    #[error("transport failed while executing {intent}")]
    Transport {
        intent: MotionIntent,
        #[source]
        source: TransportError,
    },
}

/// What one processed tick saw and did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub face_count: usize,
    pub selected: Option<(f64, f64)>,
    pub intent: MotionIntent,
    pub confidence: f64,
}

/// Totals for one [`TrackSubjectUseCase::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub ticks: usize,
    pub idle_polls: usize,
    /// Intents other than `NoOp` that reached the transport.
    pub commands: usize,
}

/// One tracking session: frame in, at most one motion intent out, per tick.
///
/// Owns every piece of per-session state; nothing here is shared or locked.
/// A failed transport call is returned to the caller without being
/// acknowledged, so the controller's view of the camera stays truthful.
///
/// Lifecycle: [`start`](Self::start), then [`tick`](Self::tick) per frame,
/// then [`finish`](Self::finish). [`run`](Self::run) covers the last two.
pub struct TrackSubjectUseCase {
    clock: Arc<dyn Clock>,
    geometry: FrameGeometry,
    selection: SelectionRule,
    face: FaceTracker,
    subject: SubjectEvaluator,
    controller: MotionController,
    executor: MotionExecutor,
    detector: Box<dyn FaceDetector>,
    transport: Box<dyn MotionTransport>,
    logger: Box<dyn TrackingLogger>,
    status_timer: IntervalTimer,
    status_since: Instant,
    ticks: usize,
    ticks_since_status: usize,
}

impl TrackSubjectUseCase {
    pub fn new(
        config: &TrackingConfig,
        detector: Box<dyn FaceDetector>,
        transport: Box<dyn MotionTransport>,
        logger: Box<dyn TrackingLogger>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            geometry: config.geometry(),
            selection: config.selection,
            face: FaceTracker::new(config.recent_threshold(), clock.clone()),
            subject: SubjectEvaluator::new(EvaluatorPolicy::from(config)),
            controller: MotionController::new(ControllerPolicy::from(config), clock.clone()),
            executor: MotionExecutor::new(StagePlan::from(config)),
            detector,
            transport,
            logger,
            status_timer: IntervalTimer::new(
                Duration::from_secs_f64(STATUS_INTERVAL_SECS),
                false,
                clock.clone(),
            ),
            status_since: clock.now(),
            clock,
            ticks: 0,
            ticks_since_status: 0,
        })
    }

    /// Sends the camera home before the first tick.
    pub fn start(&mut self) -> Result<(), SessionError> {
        let intent = self.controller.begin_session();
        self.logger.info("Session started, moving to home position");
        self.apply(intent)
    }

    /// Runs one tick. `None` is a skipped tick and changes nothing.
    pub fn tick(&mut self, frame: Option<&Frame>) -> Result<Option<TickReport>, SessionError> {
        let Some(frame) = frame else {
            return Ok(None);
        };

        let t0 = Instant::now();
        let regions = self
            .detector
            .detect(frame)
            .map_err(SessionError::Detection)?;
        self.logger.timing("detect", elapsed_ms(t0));

        let t1 = Instant::now();
        let selected = self
            .selection
            .select(&regions, self.face.center())
            .map(|r| r.center());

        let was_visible = self.face.is_visible();
        self.face.update(selected);
        if self.face.just_disappeared() {
            self.logger.info("Subject lost");
        } else if !was_visible && self.face.is_visible() {
            self.logger.info("Subject acquired");
        }

        self.subject.evaluate(&self.face, &self.geometry);
        let intent = self.controller.decide(&self.face, &self.subject, regions.len());
        self.logger.timing("decide", elapsed_ms(t1));

        log::debug!(
            "frame {}: {} face(s), selected {:?}, {intent}",
            frame.index(),
            regions.len(),
            selected
        );

        let t2 = Instant::now();
        self.apply(intent)?;
        if !intent.is_noop() {
            self.logger.timing("transport", elapsed_ms(t2));
        }

        let confidence = self.controller.confidence();
        self.logger.metric("face_count", regions.len() as f64);
        self.logger.metric("confidence", confidence);

        self.ticks += 1;
        self.ticks_since_status += 1;
        self.logger.tick(self.ticks);
        self.report_status();

        Ok(Some(TickReport {
            face_count: regions.len(),
            selected,
            intent,
            confidence,
        }))
    }

    /// Ticks on every frame `source` yields until it is exhausted or
    /// `cancelled` is raised, then [`finish`](Self::finish)es the session.
    ///
    /// The camera is sent home even when a tick failed; the tick error takes
    /// precedence over a failed shutdown.
    pub fn run(
        &mut self,
        source: &mut dyn FrameSource,
        cancelled: &AtomicBool,
    ) -> Result<SessionSummary, SessionError> {
        let outcome = self.drive(source, cancelled);
        let shutdown = self.finish();
        let summary = outcome?;
        shutdown?;
        Ok(summary)
    }

    /// Sends the camera home and emits the logger summary.
    pub fn finish(&mut self) -> Result<(), SessionError> {
        self.logger.info("Session ended, returning home");
        let shutdown = self.apply(MotionIntent::Home);
        self.logger.summary();
        shutdown
    }

    fn drive(
        &mut self,
        source: &mut dyn FrameSource,
        cancelled: &AtomicBool,
    ) -> Result<SessionSummary, SessionError> {
        let mut summary = SessionSummary::default();

        while !cancelled.load(Ordering::Relaxed) {
            match source.read_latest() {
                Some(frame) => {
                    if let Some(report) = self.tick(Some(&frame))? {
                        summary.ticks += 1;
                        if !report.intent.is_noop() {
                            summary.commands += 1;
                        }
                    }
                }
                None if source.is_exhausted() => break,
                None => {
                    summary.idle_polls += 1;
                    std::thread::sleep(Duration::from_millis(IDLE_POLL_MS));
                }
            }
        }

        if cancelled.load(Ordering::Relaxed) {
            self.logger.info("Session cancelled");
        }
        Ok(summary)
    }

    pub fn controller(&self) -> &MotionController {
        &self.controller
    }

    pub fn face(&self) -> &FaceTracker {
        &self.face
    }

    pub fn subject(&self) -> &SubjectEvaluator {
        &self.subject
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    fn apply(&mut self, intent: MotionIntent) -> Result<(), SessionError> {
        match self.executor.execute(&intent, self.transport.as_mut()) {
            Ok(()) => {
                self.controller.acknowledge(&intent);
                Ok(())
            }
            Err(source) => {
                log::warn!("Transport failed on {intent}: {source}");
                Err(SessionError::Transport { intent, source })
            }
        }
    }

    fn report_status(&mut self) {
        if !self.status_timer.has_elapsed() {
            return;
        }
        let now = self.clock.now();
        let window = now.duration_since(self.status_since).as_secs_f64();
        let rate = if window > 0.0 {
            self.ticks_since_status as f64 / window
        } else {
            0.0
        };
        let age = self.face.age().as_secs_f64();
        self.logger
            .info(&format!("Status: {rate:.1} fps, subject age {age:.1}s"));
        self.status_since = now;
        self.ticks_since_status = 0;
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
