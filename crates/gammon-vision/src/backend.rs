//! Default [`VisionBackend`] built on `image` + `imageproc`.

use crate::core::{Contour, FrameView, GrayImage, HsvImage, HsvRange, VisionBackend, VisionError};
use imageproc::contours::{find_contours, BorderType};
use imageproc::contrast::{threshold, ThresholdType};
use nalgebra::Point2;

/// Pure-Rust pixel backend.
///
/// Colour conversions follow the OpenCV 8-bit conventions so that the stock
/// HSV ranges carry over: hue in `0..180`, saturation and value in `0..=255`,
/// luma as `0.299 R + 0.587 G + 0.114 B`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageprocBackend {
    _private: (),
}

impl ImageprocBackend {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

fn luma([r, g, b]: [u8; 3]) -> u8 {
    // Fixed point, 14 fractional bits.
    let y = 4899 * r as u32 + 9617 * g as u32 + 1868 * b as u32;
    ((y + (1 << 13)) >> 14) as u8
}

/// RGB to HSV with hue halved into `0..180`.
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let v = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let diff = v - min;

    let s = if v > 0.0 { 255.0 * diff / v } else { 0.0 };

    let mut h = if diff == 0.0 {
        0.0
    } else if v == rf {
        60.0 * (gf - bf) / diff
    } else if v == gf {
        120.0 + 60.0 * (bf - rf) / diff
    } else {
        240.0 + 60.0 * (rf - gf) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }

    let h = (h / 2.0).round();
    // 359.5 degrees rounds up to 180, which wraps to red.
    let h = if h >= 180.0 { 0.0 } else { h };
    [h as u8, s.round() as u8, v as u8]
}

fn to_image_gray(gray: &GrayImage) -> Result<::image::GrayImage, VisionError> {
    let invalid = || VisionError::InvalidFrame {
        expected: gray.width * gray.height,
        got: gray.data.len(),
    };
    let width = u32::try_from(gray.width).map_err(|_| invalid())?;
    let height = u32::try_from(gray.height).map_err(|_| invalid())?;
    ::image::GrayImage::from_raw(width, height, gray.data.clone()).ok_or_else(invalid)
}

fn from_image_gray(img: ::image::GrayImage) -> GrayImage {
    GrayImage {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.into_raw(),
    }
}

impl VisionBackend for ImageprocBackend {
    fn to_gray(&self, frame: &FrameView<'_>) -> Result<GrayImage, VisionError> {
        frame.validate()?;
        Ok(GrayImage {
            width: frame.width,
            height: frame.height,
            data: frame.rgb_pixels().map(luma).collect(),
        })
    }

    fn to_hsv(&self, frame: &FrameView<'_>) -> Result<HsvImage, VisionError> {
        frame.validate()?;
        Ok(HsvImage {
            width: frame.width,
            height: frame.height,
            data: frame.rgb_pixels().map(rgb_to_hsv).collect(),
        })
    }

    fn canny(&self, gray: &GrayImage, low: f32, high: f32) -> Result<GrayImage, VisionError> {
        let img = to_image_gray(gray)?;
        Ok(from_image_gray(imageproc::edges::canny(&img, low, high)))
    }

    fn threshold_binary(&self, gray: &GrayImage, thresh: u8) -> Result<GrayImage, VisionError> {
        let img = to_image_gray(gray)?;
        Ok(from_image_gray(threshold(&img, thresh, ThresholdType::Binary)))
    }

    fn in_range(&self, hsv: &HsvImage, range: &HsvRange) -> Result<GrayImage, VisionError> {
        Ok(GrayImage {
            width: hsv.width,
            height: hsv.height,
            data: hsv
                .data
                .iter()
                .map(|&px| if range.contains(px) { 255 } else { 0 })
                .collect(),
        })
    }

    fn external_contours(&self, mask: &GrayImage) -> Result<Vec<Contour>, VisionError> {
        let img = to_image_gray(mask)?;
        Ok(find_contours::<i32>(&img)
            .into_iter()
            .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
            .map(|c| Contour::new(c.points.iter().map(|p| Point2::new(p.x, p.y)).collect()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsv_matches_opencv_convention() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
        assert_eq!(rgb_to_hsv([240, 240, 240]), [0, 0, 240]);
        assert_eq!(rgb_to_hsv([255, 0, 1]), [0, 255, 255]);
    }

    #[test]
    fn checker_colours_land_in_their_ranges() {
        let black = rgb_to_hsv([25, 25, 25]);
        let white = rgb_to_hsv([240, 240, 240]);
        let felt = rgb_to_hsv([20, 80, 40]);
        assert!(HsvRange::BLACK_CHECKER.contains(black));
        assert!(!HsvRange::WHITE_CHECKER.contains(black));
        assert!(HsvRange::WHITE_CHECKER.contains(white));
        assert!(!HsvRange::BLACK_CHECKER.contains(felt));
        assert!(!HsvRange::WHITE_CHECKER.contains(felt));
    }

    #[test]
    fn luma_weights() {
        assert_eq!(luma([0, 0, 0]), 0);
        assert_eq!(luma([255, 255, 255]), 255);
        assert_eq!(luma([255, 0, 0]), 76);
        assert_eq!(luma([0, 255, 0]), 150);
    }

    #[test]
    fn threshold_is_strict() {
        let gray = GrayImage {
            width: 3,
            height: 1,
            data: vec![199, 200, 201],
        };
        let mask = ImageprocBackend::new().threshold_binary(&gray, 200).unwrap();
        assert_eq!(mask.data, vec![0, 0, 255]);
    }

    #[test]
    fn threshold_rejects_a_short_buffer() {
        let gray = GrayImage {
            width: 4,
            height: 2,
            data: vec![255; 7],
        };
        assert!(matches!(
            ImageprocBackend::new().threshold_binary(&gray, 10),
            Err(VisionError::InvalidFrame { expected: 8, got: 7 })
        ));
    }

    #[test]
    fn external_contours_skip_nested_blobs() {
        // 20x20 ring with a filled 4x4 island in its hole.
        let mut mask = GrayImage::new(20, 20);
        for y in 2..18 {
            for x in 2..18 {
                let ring = !(5..15).contains(&x) || !(5..15).contains(&y);
                let island = (8..12).contains(&x) && (8..12).contains(&y);
                if ring || island {
                    mask.data[y * 20 + x] = 255;
                }
            }
        }
        let contours = ImageprocBackend::new().external_contours(&mask).unwrap();
        assert_eq!(contours.len(), 1);
        assert!(contours[0].area() > 200.0);
    }

    #[test]
    fn short_frame_is_rejected() {
        let data = [0u8; 11];
        let frame = FrameView::rgb(2, 2, &data);
        assert!(matches!(
            ImageprocBackend::new().to_gray(&frame),
            Err(VisionError::InvalidFrame { expected: 12, got: 11 })
        ));
    }
}
