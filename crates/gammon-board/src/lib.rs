//! Backgammon board calibration.
//!
//! Current focus:
//! - find the board outline as the largest quadrilateral contour of an edge map,
//! - order its corners and lay out the 24 point positions along the top and
//!   bottom edges,
//! - derive bar and quadrant reference geometry from the same outline.

mod calibrator;
mod layout;

pub use calibrator::{find_board_quad, BoardCalibrator, CalibrationParams};
pub use layout::{
    interpolate_point, point_positions, BarGeometry, BoardCalibration, BoardCorners, Quadrant,
};
