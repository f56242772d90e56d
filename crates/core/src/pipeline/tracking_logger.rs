use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for tracking-session events.
///
/// Keeps the tick loop free of output concerns so the CLI, tests and any
/// future front end can each observe a session in their own way.
pub trait TrackingLogger: Send {
    /// Report that tick number `tick` (1-based) completed.
    fn tick(&mut self, tick: usize);

    /// Record how long a named stage took for one tick.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. face count, confidence).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullTrackingLogger;

impl TrackingLogger for NullTrackingLogger {
    fn tick(&mut self, _tick: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Running count, sum and maximum of one timing stage or metric.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStat {
    pub count: usize,
    pub sum: f64,
    pub max: f64,
}

impl RunningStat {
    fn record(&mut self, value: f64) {
        self.max = if self.count == 0 {
            value
        } else {
            self.max.max(value)
        };
        self.count += 1;
        self.sum += value;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// CLI-oriented logger that aggregates per-stage timings and metrics and
/// reports them when the session ends.
///
/// Memory stays constant however long the session runs: only running
/// aggregates are kept. Tick output is throttled to every `throttle_ticks`
/// ticks.
pub struct StdoutTrackingLogger {
    throttle_ticks: usize,
    timings: HashMap<String, RunningStat>,
    metrics: HashMap<String, RunningStat>,
    start_time: Instant,
    total_ticks: usize,
    message_count: usize,
}

impl StdoutTrackingLogger {
    pub fn new(throttle_ticks: usize) -> Self {
        Self {
            throttle_ticks: throttle_ticks.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            total_ticks: 0,
            message_count: 0,
        }
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let ticks = self.total_ticks;
        let mut lines = Vec::new();

        lines.push(format!(
            "Session summary ({ticks} ticks, {:.1}s total):",
            elapsed_ms / 1000.0
        ));

        let mut stages: Vec<_> = self.timings.iter().collect();
        stages.sort_by(|a, b| a.0.cmp(b.0));
        for (stage, stat) in stages {
            lines.push(format!(
                "  {stage:12}: avg {:6.2}ms  max {:6.2}ms  total {:7.0}ms",
                stat.mean(),
                stat.max,
                stat.sum
            ));
        }

        let mut metrics: Vec<_> = self.metrics.iter().collect();
        metrics.sort_by(|a, b| a.0.cmp(b.0));
        for (name, stat) in metrics {
            lines.push(format!("  {name}: avg {:.1}", stat.mean()));
        }

        if ticks > 0 && elapsed_ms > 0.0 {
            let rate = ticks as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Tick rate: {rate:.1} Hz"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&RunningStat> {
        self.timings.get(stage)
    }

    pub fn metrics_for(&self, name: &str) -> Option<&RunningStat> {
        self.metrics.get(name)
    }

    pub fn total_ticks(&self) -> usize {
        self.total_ticks
    }
}

impl Default for StdoutTrackingLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl TrackingLogger for StdoutTrackingLogger {
    fn tick(&mut self, tick: usize) {
        self.total_ticks = tick;
        if tick % self.throttle_ticks == 0 {
            log::debug!("Processed {tick} ticks");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        record(&mut self.timings, stage, duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        record(&mut self.metrics, name, value);
    }

    fn info(&mut self, message: &str) {
        self.message_count += 1;
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

fn record(stats: &mut HashMap<String, RunningStat>, key: &str, value: f64) {
    match stats.get_mut(key) {
        Some(stat) => stat.record(value),
        None => {
            let mut stat = RunningStat::default();
            stat.record(value);
            stats.insert(key.to_string(), stat);
        }
    }
}
