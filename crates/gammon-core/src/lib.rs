//! Core types and utilities for backgammon board recognition.
//!
//! This crate is intentionally small. It owns the frame/mask buffer types,
//! the contour geometry (area, perimeter and polygon approximation from
//! `imageproc::geometry`, plus moments), the observation types produced by
//! the detectors, and the [`VisionBackend`] trait through which every
//! pixel-level primitive is requested.

mod backend;
mod contour;
mod homography;
mod image;
mod logger;
mod types;

pub use backend::{VisionBackend, VisionError};
pub use contour::{approximate_polygon, Contour, Moments};
pub use homography::{homography_from_4pt, Homography};
pub use image::{FrameView, GrayImage, HsvImage, HsvRange, PixelLayout};
pub use types::{
    BoardRow, CheckerColor, CheckerObservation, DiceObservation, FrameSnapshot, PointPosition,
    POINTS_PER_ROW,
};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
