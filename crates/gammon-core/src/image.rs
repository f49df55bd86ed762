use serde::{Deserialize, Serialize};

use crate::VisionError;

/// Channel layout of a borrowed frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelLayout {
    Rgb,
    Rgba,
}

impl PixelLayout {
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }
}

/// A decoded video frame, borrowed for the duration of one call.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub width: usize,
    pub height: usize,
    pub layout: PixelLayout,
    pub data: &'a [u8], // row-major, interleaved channels
}

impl<'a> FrameView<'a> {
    pub fn rgb(width: usize, height: usize, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            layout: PixelLayout::Rgb,
            data,
        }
    }

    pub fn rgba(width: usize, height: usize, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            layout: PixelLayout::Rgba,
            data,
        }
    }

    /// Check that the buffer length matches `width * height * channels`.
    pub fn validate(&self) -> Result<(), VisionError> {
        if self.width == 0 || self.height == 0 {
            return Err(VisionError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let expected = self
            .width
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(self.layout.channels()))
            .ok_or(VisionError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        if self.data.len() != expected {
            return Err(VisionError::InvalidFrame {
                expected,
                got: self.data.len(),
            });
        }
        Ok(())
    }

    /// Iterate `[r, g, b]` triples in row-major order (alpha is dropped).
    pub fn rgb_pixels(&self) -> impl Iterator<Item = [u8; 3]> + 'a {
        let step = self.layout.channels();
        self.data.chunks_exact(step).map(|px| [px[0], px[1], px[2]])
    }
}

/// Single-channel 8-bit image: grayscale conversions, edge maps and masks.
#[derive(Clone, Debug, PartialEq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }
}

/// Three-channel HSV image using the 8-bit OpenCV convention:
/// hue in `[0, 180)`, saturation and value in `[0, 255]`.
#[derive(Clone, Debug, PartialEq)]
pub struct HsvImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<[u8; 3]>,
}

/// Inclusive HSV bounds for colour segmentation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    /// Dark checkers: any hue and saturation, value at most 50.
    pub const BLACK_CHECKER: HsvRange = HsvRange::new([0, 0, 0], [180, 255, 50]);

    /// Light checkers: any hue, saturation at most 30, value at least 200.
    pub const WHITE_CHECKER: HsvRange = HsvRange::new([0, 0, 200], [180, 30, 255]);

    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| hsv[c] >= self.lower[c] && hsv[c] <= self.upper[c])
    }
}
