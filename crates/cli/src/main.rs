use std::path::PathBuf;
use std::process;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use ptz_tracker_core::control::infrastructure::logging_transport::LoggingTransport;
use ptz_tracker_core::detection::infrastructure::replay_detector::ReplayDetector;
use ptz_tracker_core::pipeline::track_subject_use_case::TrackSubjectUseCase;
use ptz_tracker_core::pipeline::tracking_logger::StdoutTrackingLogger;
use ptz_tracker_core::shared::clock::{Clock, ManualClock, SystemClock};
use ptz_tracker_core::shared::frame::Frame;
use ptz_tracker_core::shared::tracking_config::TrackingConfig;
use ptz_tracker_core::video::infrastructure::latest_frame_slot::LatestFrameSlot;
use ptz_tracker_core::video::infrastructure::stepped_frame_source::SteppedFrameSource;

/// Replays recorded face detections through the PTZ tracking engine and logs
/// the camera commands it would send.
#[derive(Parser)]
#[command(name = "ptz-tracker")]
struct Cli {
    /// Detection script: JSON lines of {"frame": n, "boxes": [[x, y, w, h], ...]}.
    detections: PathBuf,

    /// Tracking config file (defaults to the per-user config, then built-in defaults).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Time between frames in milliseconds.
    #[arg(long, default_value = "33")]
    tick_ms: u64,

    /// Number of frames to replay (defaults to the last scripted frame + 1).
    #[arg(long)]
    frames: Option<usize>,

    /// Pace frames on the wall clock through the latest-frame slot instead of
    /// simulating time. Either way the camera is sent home when replay ends.
    #[arg(long)]
    realtime: bool,

    /// Ticks between progress lines at debug level.
    #[arg(long, default_value = "100")]
    progress_every: usize,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = load_config(&cli)?;
    let detector = ReplayDetector::from_path(&cli.detections)?;
    let total = cli
        .frames
        .unwrap_or_else(|| detector.last_frame().map_or(0, |last| last + 1));
    log::info!(
        "Replaying {total} frames from {} at {}ms per frame",
        cli.detections.display(),
        cli.tick_ms
    );

    let transport = LoggingTransport::new();
    let tick = Duration::from_millis(cli.tick_ms);
    let cancelled = Arc::new(AtomicBool::new(false));

    let summary = if cli.realtime {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let mut use_case = build_use_case(&cli, &config, detector, transport.clone(), clock)?;
        use_case.start()?;

        let (width, height) = (config.image_width, config.image_height);
        let frames = (0..total).map(move |index| Frame::blank(width, height, index));
        let mut slot = LatestFrameSlot::spawn(frames, Some(tick), cancelled.clone());
        let summary = use_case.run(&mut slot, &cancelled)?;
        if slot.dropped_frames() > 0 {
            log::warn!("{} frames dropped while the loop was busy", slot.dropped_frames());
        }
        summary
    } else {
        let clock = Arc::new(ManualClock::new());
        let mut use_case =
            build_use_case(&cli, &config, detector, transport.clone(), clock.clone())?;
        use_case.start()?;

        let mut source = SteppedFrameSource::new(
            clock,
            tick,
            config.image_width,
            config.image_height,
            total,
        );
        use_case.run(&mut source, &cancelled)?
    };

    log::info!(
        "Done: {} ticks, {} motion intents, {} transport commands",
        summary.ticks,
        summary.commands,
        transport.command_count()
    );
    Ok(())
}

fn build_use_case(
    cli: &Cli,
    config: &TrackingConfig,
    detector: ReplayDetector,
    transport: LoggingTransport,
    clock: Arc<dyn Clock>,
) -> Result<TrackSubjectUseCase, Box<dyn std::error::Error>> {
    Ok(TrackSubjectUseCase::new(
        config,
        Box::new(detector),
        Box::new(transport),
        Box::new(StdoutTrackingLogger::new(cli.progress_every)),
        clock,
    )?)
}

fn load_config(cli: &Cli) -> Result<TrackingConfig, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.config {
        log::info!("Loading config from {}", path.display());
        return Ok(TrackingConfig::load(path)?);
    }

    match TrackingConfig::default_path() {
        Ok(path) if path.exists() => {
            log::info!("Loading config from {}", path.display());
            Ok(TrackingConfig::load(&path)?)
        }
        _ => {
            log::info!("No config file found, using built-in defaults");
            Ok(TrackingConfig::default())
        }
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.detections.exists() {
        return Err(format!(
            "Detection script not found: {}",
            cli.detections.display()
        )
        .into());
    }
    if let Some(path) = &cli.config {
        if !path.exists() {
            return Err(format!("Config file not found: {}", path.display()).into());
        }
    }
    if cli.tick_ms == 0 {
        return Err("Tick interval must be at least 1ms".into());
    }
    if cli.progress_every == 0 {
        return Err("--progress-every must be positive".into());
    }
    Ok(())
}
