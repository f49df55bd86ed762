//! JSON configuration and report helpers for batch analysis.

use crate::board::BoardCalibration;
use crate::core::FrameSnapshot;
use crate::AnalyzerParams;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Batch run: one calibration image, then any number of frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeConfig {
    pub calibration_image: String,
    #[serde(default)]
    pub frames: Vec<String>,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub params: AnalyzerParams,
}

impl AnalyzeConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("gammon_analyze_report.json"))
    }
}

/// Outcome for a single frame: a snapshot, or the reason there is none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameReport {
    pub frame_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<FrameSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeReport {
    pub calibration_image: String,
    pub calibrated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration: Option<BoardCalibration>,
    #[serde(default)]
    pub frames: Vec<FrameReport>,
}

impl AnalyzeReport {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Frames that produced a snapshot.
    pub fn snapshots(&self) -> impl Iterator<Item = &FrameSnapshot> + '_ {
        self.frames.iter().filter_map(|f| f.snapshot.as_ref())
    }
}
