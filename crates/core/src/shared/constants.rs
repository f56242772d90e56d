/// Offset samples kept for the volatility verdict.
pub const OFFSET_HISTORY_CAPACITY: usize = 10;

/// VISCA-style camera address used when the config omits one.
pub const DEFAULT_CAMERA_UNIT: u8 = 1;

/// Upper bound on a blocking pan/tilt acknowledgement.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: f64 = 5.0;

/// How often the tick loop reports throughput and subject age.
pub const STATUS_INTERVAL_SECS: f64 = 10.0;

/// Sleep between polls when the frame slot is empty.
pub const IDLE_POLL_MS: u64 = 2;

pub const CONFIG_DIR_NAME: &str = "PtzTracker";
pub const CONFIG_FILE_NAME: &str = "config.json";
