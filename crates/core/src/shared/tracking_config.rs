use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detection::domain::candidate_selector::SelectionRule;
use crate::shared::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_CAMERA_UNIT, DEFAULT_COMMAND_TIMEOUT_SECS,
};
use crate::shared::frame_geometry::FrameGeometry;
use crate::tracking::domain::subject_evaluator::{HistoryMetric, QuadrantRule};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Session-wide tunables, read once at start and never mutated.
///
/// Every field named in the tracking contract is required in the JSON file;
/// only the transport details and policy variants fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TrackingConfig {
    pub image_width: u32,
    pub image_height: u32,
    /// Percent; confidence is `100 / face_count`.
    pub min_confidence: f64,
    pub recent_threshold_seconds: f64,
    pub centered_radius_fraction: f64,
    pub off_center_margin_fraction: f64,
    pub home_pan: i32,
    pub home_tilt: i32,
    pub home_zoom: u16,
    pub tracking_zoom: u16,
    pub return_home_speed: i32,
    pub home_pause_seconds: f64,
    pub zoom_max_seconds_safety: f64,
    pub base_speed: i32,
    pub volatility_threshold: f64,

    #[serde(default = "default_camera_unit")]
    pub camera_unit: u8,
    #[serde(default = "default_command_timeout")]
    pub command_timeout_seconds: f64,
    #[serde(default)]
    pub history_metric: HistoryMetric,
    #[serde(default)]
    pub quadrant_rule: QuadrantRule,
    #[serde(default)]
    pub selection: SelectionRule,
}

fn default_camera_unit() -> u8 {
    DEFAULT_CAMERA_UNIT
}

fn default_command_timeout() -> f64 {
    DEFAULT_COMMAND_TIMEOUT_SECS
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            image_width: 640,
            image_height: 480,
            min_confidence: 50.0,
            recent_threshold_seconds: 2.0,
            centered_radius_fraction: 0.15,
            off_center_margin_fraction: 0.05,
            home_pan: 0,
            home_tilt: 0,
            home_zoom: 0,
            tracking_zoom: 8000,
            return_home_speed: 12,
            home_pause_seconds: 3.0,
            zoom_max_seconds_safety: 3.0,
            base_speed: 10,
            volatility_threshold: 9.0,
            camera_unit: DEFAULT_CAMERA_UNIT,
            command_timeout_seconds: DEFAULT_COMMAND_TIMEOUT_SECS,
            history_metric: HistoryMetric::default(),
            quadrant_rule: QuadrantRule::default(),
            selection: SelectionRule::default(),
        }
    }
}

impl TrackingConfig {
    /// `<config dir>/PtzTracker/config.json`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Reads, parses and validates a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the engine cannot run with. Every `*_seconds` field of
    /// a validated config converts to a [`Duration`] without panicking.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(invalid(
                "imageWidth/imageHeight",
                format!(
                    "frame must be non-empty, got {}x{}",
                    self.image_width, self.image_height
                ),
            ));
        }
        check_range("minConfidence", self.min_confidence, 0.0, 100.0)?;
        check_seconds("recentThresholdSeconds", self.recent_threshold_seconds, true)?;
        if !(self.centered_radius_fraction > 0.0 && self.centered_radius_fraction <= 1.0) {
            return Err(invalid(
                "centeredRadiusFraction",
                format!("must be in (0, 1], got {}", self.centered_radius_fraction),
            ));
        }
        if !(0.0..0.5).contains(&self.off_center_margin_fraction) {
            return Err(invalid(
                "offCenterMarginFraction",
                format!("must be in [0, 0.5), got {}", self.off_center_margin_fraction),
            ));
        }
        if self.return_home_speed <= 0 {
            return Err(invalid(
                "returnHomeSpeed",
                format!("must be positive, got {}", self.return_home_speed),
            ));
        }
        if self.base_speed <= 0 {
            return Err(invalid(
                "baseSpeed",
                format!("must be positive, got {}", self.base_speed),
            ));
        }
        check_seconds("homePauseSeconds", self.home_pause_seconds, true)?;
        check_seconds("zoomMaxSecondsSafety", self.zoom_max_seconds_safety, false)?;
        check_seconds("commandTimeoutSeconds", self.command_timeout_seconds, false)?;
        check_non_negative("volatilityThreshold", self.volatility_threshold)?;
        Ok(())
    }

    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry::new(self.image_width, self.image_height)
    }

    pub fn recent_threshold(&self) -> Duration {
        Duration::from_secs_f64(self.recent_threshold_seconds)
    }

    pub fn home_pause(&self) -> Duration {
        Duration::from_secs_f64(self.home_pause_seconds)
    }

    pub fn zoom_max_safety(&self) -> Duration {
        Duration::from_secs_f64(self.zoom_max_seconds_safety)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.command_timeout_seconds)
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !(min..=max).contains(&value) {
        return Err(invalid(
            field,
            format!("must be between {min} and {max}, got {value}"),
        ));
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, format!("must be >= 0, got {value}")));
    }
    Ok(())
}

/// Seconds must form a representable [`Duration`]; zero only when `allow_zero`.
fn check_seconds(field: &'static str, value: f64, allow_zero: bool) -> Result<(), ConfigError> {
    match Duration::try_from_secs_f64(value) {
        Err(e) => Err(invalid(field, format!("{value} is not a usable duration: {e}"))),
        Ok(d) if d.is_zero() && !allow_zero => {
            Err(invalid(field, format!("must be > 0, got {value}")))
        }
        Ok(_) => Ok(()),
    }
}
