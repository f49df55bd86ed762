use crate::{Contour, FrameView, GrayImage, HsvImage, HsvRange};

/// Errors raised by a [`VisionBackend`].
#[derive(thiserror::Error, Debug)]
pub enum VisionError {
    #[error("vision backend unavailable: {0}")]
    Unavailable(String),

    #[error("invalid frame buffer length (expected {expected} bytes, got {got})")]
    InvalidFrame { expected: usize, got: usize },

    #[error("invalid frame dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },
}

/// Pixel-level primitives the recognition pipeline needs.
///
/// The backend is a capability handed to detectors by reference; nothing in
/// the pipeline looks one up from global state. Every returned buffer is
/// owned by the caller and dropped when the call that requested it returns.
pub trait VisionBackend {
    /// Luma conversion of an RGB(A) frame.
    fn to_gray(&self, frame: &FrameView<'_>) -> Result<GrayImage, VisionError>;

    /// HSV conversion of an RGB(A) frame (OpenCV 8-bit convention).
    fn to_hsv(&self, frame: &FrameView<'_>) -> Result<HsvImage, VisionError>;

    /// Binary edge map with hysteresis thresholds `low`/`high`.
    fn canny(&self, gray: &GrayImage, low: f32, high: f32) -> Result<GrayImage, VisionError>;

    /// `255` where `gray > thresh`, `0` elsewhere.
    fn threshold_binary(&self, gray: &GrayImage, thresh: u8) -> Result<GrayImage, VisionError>;

    /// `255` where the pixel falls inside the inclusive range, `0` elsewhere.
    fn in_range(&self, hsv: &HsvImage, range: &HsvRange) -> Result<GrayImage, VisionError>;

    /// Outermost contours of the non-zero regions of `mask`.
    fn external_contours(&self, mask: &GrayImage) -> Result<Vec<Contour>, VisionError>;
}

impl<B: VisionBackend + ?Sized> VisionBackend for &B {
    fn to_gray(&self, frame: &FrameView<'_>) -> Result<GrayImage, VisionError> {
        (**self).to_gray(frame)
    }

    fn to_hsv(&self, frame: &FrameView<'_>) -> Result<HsvImage, VisionError> {
        (**self).to_hsv(frame)
    }

    fn canny(&self, gray: &GrayImage, low: f32, high: f32) -> Result<GrayImage, VisionError> {
        (**self).canny(gray, low, high)
    }

    fn threshold_binary(&self, gray: &GrayImage, thresh: u8) -> Result<GrayImage, VisionError> {
        (**self).threshold_binary(gray, thresh)
    }

    fn in_range(&self, hsv: &HsvImage, range: &HsvRange) -> Result<GrayImage, VisionError> {
        (**self).in_range(hsv, range)
    }

    fn external_contours(&self, mask: &GrayImage) -> Result<Vec<Contour>, VisionError> {
        (**self).external_contours(mask)
    }
}
