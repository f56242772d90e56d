use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

#[derive(Error, Debug)]
pub enum ReplayScriptError {
    #[error("failed to read detection script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// One line of a detection script.
#[derive(Debug, Deserialize)]
struct ScriptLine {
    frame: usize,
    #[serde(default)]
    boxes: Vec<Region>,
}

/// Replays recorded detections by frame index.
///
/// Scripts are JSON lines such as
/// `{"frame": 12, "boxes": [[280, 190, 60, 60]]}`. Frames absent from the
/// script detect nothing; blank lines and `#` comments are skipped.
pub struct ReplayDetector {
    script: Arc<HashMap<usize, Vec<Region>>>,
}

impl ReplayDetector {
    pub fn new(script: Arc<HashMap<usize, Vec<Region>>>) -> Self {
        Self { script }
    }

    pub fn from_path(path: &Path) -> Result<Self, ReplayScriptError> {
        let file = File::open(path).map_err(|source| ReplayScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            ReplayScriptError::Io { source, .. } => ReplayScriptError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self, ReplayScriptError> {
        let mut script: HashMap<usize, Vec<Region>> = HashMap::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| ReplayScriptError::Io {
                path: PathBuf::new(),
                source,
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let parsed: ScriptLine = serde_json::from_str(trimmed)
                .map_err(|source| ReplayScriptError::Parse { line: i + 1, source })?;
            script.entry(parsed.frame).or_default().extend(parsed.boxes);
        }
        Ok(Self::new(Arc::new(script)))
    }

    /// Highest frame index mentioned in the script.
    pub fn last_frame(&self) -> Option<usize> {
        self.script.keys().copied().max()
    }
}

impl FaceDetector for ReplayDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        Ok(self.script.get(&frame.index()).cloned().unwrap_or_default())
    }
}
