use gammon_core::{Contour, FrameView, VisionBackend, VisionError};
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::layout::BoardCalibration;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Thresholds for locating the board outline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationParams {
    /// Lower hysteresis threshold of the edge detector.
    pub edge_low_threshold: f32,
    /// Upper hysteresis threshold of the edge detector.
    pub edge_high_threshold: f32,
    /// Polygon approximation tolerance as a fraction of contour perimeter.
    pub approx_epsilon_rel: f64,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            edge_low_threshold: 50.0,
            edge_high_threshold: 150.0,
            approx_epsilon_rel: 0.02,
        }
    }
}

/// Locates the board outline and derives the point layout from it.
#[derive(Clone, Debug, Default)]
pub struct BoardCalibrator {
    params: CalibrationParams,
}

impl BoardCalibrator {
    pub fn new(params: CalibrationParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &CalibrationParams {
        &self.params
    }

    /// Search `frame` for the board outline.
    ///
    /// `Ok(None)` means no quadrilateral was found; that is an expected
    /// outcome, not an error. Errors come only from the backend.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, backend, frame), fields(width = frame.width, height = frame.height))
    )]
    pub fn calibrate<B: VisionBackend + ?Sized>(
        &self,
        backend: &B,
        frame: &FrameView<'_>,
    ) -> Result<Option<BoardCalibration>, VisionError> {
        let gray = backend.to_gray(frame)?;
        let edges = backend.canny(
            &gray,
            self.params.edge_low_threshold,
            self.params.edge_high_threshold,
        )?;
        let contours = backend.external_contours(&edges)?;

        let quad = find_board_quad(&contours, self.params.approx_epsilon_rel);
        debug!(
            "calibration: {} external contours, board outline {}",
            contours.len(),
            if quad.is_some() { "found" } else { "not found" }
        );

        Ok(quad.map(BoardCalibration::from_quad))
    }
}

/// Largest-area contour whose polygon approximation has exactly 4 vertices.
///
/// Non-quadrilateral contours are skipped no matter how large they are.
/// Zero-area contours never qualify.
pub fn find_board_quad(contours: &[Contour], epsilon_rel: f64) -> Option<[Point2<i32>; 4]> {
    let mut best: Option<[Point2<i32>; 4]> = None;
    let mut best_area = 0.0_f64;

    for contour in contours {
        let area = contour.area();
        if area <= best_area {
            continue;
        }
        let approx = contour.approximate(epsilon_rel * contour.perimeter());
        if let Ok(quad) = <[Point2<i32>; 4]>::try_from(approx) {
            best_area = area;
            best = Some(quad);
        }
    }

    best
}
