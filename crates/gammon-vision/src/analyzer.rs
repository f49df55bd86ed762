use crate::board::{BoardCalibration, BoardCalibrator, CalibrationParams};
use crate::checkers::{CheckerDetector, CheckerParams};
use crate::core::{
    CheckerObservation, DiceObservation, FrameSnapshot, FrameView, PointPosition, VisionBackend,
    VisionError,
};
use crate::dice::{DiceDetector, DiceParams};
use crate::io::IoError;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(thiserror::Error, Debug)]
pub enum AnalyzeError {
    #[error("board is not calibrated; call calibrate() with a board frame first")]
    NotCalibrated,

    #[error(transparent)]
    Vision(#[from] VisionError),
}

/// Every tunable of the pipeline, grouped per stage.
///
/// Defaults: Canny `50`/`150`, polygon epsilon `0.02` of the perimeter,
/// checker blobs `> 100` px² matched within `50` px, pip threshold `200`,
/// pip area `(20, 100)` px², pip cluster radius `50` px.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerParams {
    pub calibration: CalibrationParams,
    pub checkers: CheckerParams,
    pub dice: DiceParams,
}

impl AnalyzerParams {
    /// Load params from JSON; missing fields take their defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Calibrate once, then analyse frames of the same camera view.
///
/// The analyzer borrows its backend; it never reaches for global state. The
/// cached calibration is replaced only by a successful [`calibrate`] or an
/// explicit [`set_calibration`].
///
/// [`calibrate`]: BoardAnalyzer::calibrate
/// [`set_calibration`]: BoardAnalyzer::set_calibration
pub struct BoardAnalyzer<'b, B: VisionBackend + ?Sized> {
    backend: &'b B,
    calibrator: BoardCalibrator,
    checkers: CheckerDetector,
    dice: DiceDetector,
    calibration: Option<BoardCalibration>,
}

impl<'b, B: VisionBackend + ?Sized> BoardAnalyzer<'b, B> {
    pub fn new(backend: &'b B, params: AnalyzerParams) -> Self {
        Self {
            backend,
            calibrator: BoardCalibrator::new(params.calibration),
            checkers: CheckerDetector::new(params.checkers),
            dice: DiceDetector::new(params.dice),
            calibration: None,
        }
    }

    pub fn with_defaults(backend: &'b B) -> Self {
        Self::new(backend, AnalyzerParams::default())
    }

    pub fn params(&self) -> AnalyzerParams {
        AnalyzerParams {
            calibration: self.calibrator.params().clone(),
            checkers: self.checkers.params().clone(),
            dice: self.dice.params().clone(),
        }
    }

    #[inline]
    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_some()
    }

    #[inline]
    pub fn calibration(&self) -> Option<&BoardCalibration> {
        self.calibration.as_ref()
    }

    /// Cached point positions; empty until calibrated.
    pub fn point_positions(&self) -> &[PointPosition] {
        self.calibration
            .as_ref()
            .map(|c| c.points.as_slice())
            .unwrap_or(&[])
    }

    /// Install a previously computed calibration, e.g. one loaded from JSON.
    pub fn set_calibration(&mut self, calibration: BoardCalibration) {
        self.calibration = Some(calibration);
    }

    /// Locate the board in `frame` and cache its geometry.
    ///
    /// Returns `Ok(false)` when no quadrilateral outline is found; the
    /// previous calibration, if any, is kept in that case and on error.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, frame), fields(width = frame.width, height = frame.height))
    )]
    pub fn calibrate(&mut self, frame: &FrameView<'_>) -> Result<bool, VisionError> {
        match self.calibrator.calibrate(self.backend, frame)? {
            Some(calibration) => {
                info!(
                    "board calibrated: corners {:?}",
                    calibration.corners.to_array()
                );
                self.calibration = Some(calibration);
                Ok(true)
            }
            None => {
                warn!("no board outline found; keeping previous calibration");
                Ok(false)
            }
        }
    }

    pub fn detect_checkers(
        &self,
        frame: &FrameView<'_>,
    ) -> Result<Vec<CheckerObservation>, AnalyzeError> {
        let calibration = self.calibration.as_ref().ok_or(AnalyzeError::NotCalibrated)?;
        Ok(self
            .checkers
            .detect(self.backend, frame, &calibration.points)?)
    }

    /// Read dice; does not depend on calibration.
    pub fn detect_dice(&self, frame: &FrameView<'_>) -> Result<Vec<DiceObservation>, VisionError> {
        self.dice.detect(self.backend, frame)
    }

    /// Checkers then dice on one frame, stamped with wall-clock time.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, frame), fields(width = frame.width, height = frame.height))
    )]
    pub fn analyze(&self, frame: &FrameView<'_>) -> Result<FrameSnapshot, AnalyzeError> {
        if !self.is_calibrated() {
            return Err(AnalyzeError::NotCalibrated);
        }
        let checkers = self.detect_checkers(frame)?;
        let dice = self.detect_dice(frame)?;
        debug!(
            "frame analysed: {} checkers, {} dice",
            checkers.len(),
            dice.len()
        );
        Ok(FrameSnapshot::now(checkers, dice))
    }
}
