//! Checker detection.
//!
//! Frames are split into dark and light HSV masks; every sufficiently large
//! blob is reduced to its centroid and assigned to the nearest calibrated
//! board point.

mod detector;

pub use detector::{nearest_point, CheckerDetector, CheckerParams};
