#![allow(dead_code)]

use gammon_vision::core::{
    Contour, FrameView, GrayImage, HsvImage, HsvRange, VisionBackend, VisionError,
};
use std::cell::Cell;

#[cfg(feature = "image")]
pub mod scene;

// Scripted masks are 1x1 images whose single pixel tags what produced them.
const TAG_EDGES: u8 = 1;
const TAG_BLACK: u8 = 2;
const TAG_WHITE: u8 = 3;
const TAG_BRIGHT: u8 = 4;
const TAG_OTHER: u8 = 5;

fn tagged(tag: u8) -> GrayImage {
    GrayImage {
        width: 1,
        height: 1,
        data: vec![tag],
    }
}

/// Backend that ignores pixels and returns canned contours per mask kind.
#[derive(Default)]
pub struct ScriptedBackend {
    pub edge_contours: Vec<Contour>,
    pub black_contours: Vec<Contour>,
    pub white_contours: Vec<Contour>,
    pub bright_contours: Vec<Contour>,
}

impl VisionBackend for ScriptedBackend {
    fn to_gray(&self, frame: &FrameView<'_>) -> Result<GrayImage, VisionError> {
        frame.validate()?;
        Ok(tagged(0))
    }

    fn to_hsv(&self, frame: &FrameView<'_>) -> Result<HsvImage, VisionError> {
        frame.validate()?;
        Ok(HsvImage {
            width: 1,
            height: 1,
            data: vec![[0, 0, 0]],
        })
    }

    fn canny(&self, _gray: &GrayImage, _low: f32, _high: f32) -> Result<GrayImage, VisionError> {
        Ok(tagged(TAG_EDGES))
    }

    fn threshold_binary(&self, _gray: &GrayImage, _thresh: u8) -> Result<GrayImage, VisionError> {
        Ok(tagged(TAG_BRIGHT))
    }

    fn in_range(&self, _hsv: &HsvImage, range: &HsvRange) -> Result<GrayImage, VisionError> {
        Ok(tagged(if *range == HsvRange::BLACK_CHECKER {
            TAG_BLACK
        } else if *range == HsvRange::WHITE_CHECKER {
            TAG_WHITE
        } else {
            TAG_OTHER
        }))
    }

    fn external_contours(&self, mask: &GrayImage) -> Result<Vec<Contour>, VisionError> {
        Ok(match mask.data.first().copied() {
            Some(TAG_EDGES) => self.edge_contours.clone(),
            Some(TAG_BLACK) => self.black_contours.clone(),
            Some(TAG_WHITE) => self.white_contours.clone(),
            Some(TAG_BRIGHT) => self.bright_contours.clone(),
            _ => Vec::new(),
        })
    }
}

/// Wraps a backend and counts every primitive call.
pub struct CountingBackend<B> {
    inner: B,
    calls: Cell<usize>,
}

impl<B> CountingBackend<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn tick(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

impl<B: VisionBackend> VisionBackend for CountingBackend<B> {
    fn to_gray(&self, frame: &FrameView<'_>) -> Result<GrayImage, VisionError> {
        self.tick();
        self.inner.to_gray(frame)
    }

    fn to_hsv(&self, frame: &FrameView<'_>) -> Result<HsvImage, VisionError> {
        self.tick();
        self.inner.to_hsv(frame)
    }

    fn canny(&self, gray: &GrayImage, low: f32, high: f32) -> Result<GrayImage, VisionError> {
        self.tick();
        self.inner.canny(gray, low, high)
    }

    fn threshold_binary(&self, gray: &GrayImage, thresh: u8) -> Result<GrayImage, VisionError> {
        self.tick();
        self.inner.threshold_binary(gray, thresh)
    }

    fn in_range(&self, hsv: &HsvImage, range: &HsvRange) -> Result<GrayImage, VisionError> {
        self.tick();
        self.inner.in_range(hsv, range)
    }

    fn external_contours(&self, mask: &GrayImage) -> Result<Vec<Contour>, VisionError> {
        self.tick();
        self.inner.external_contours(mask)
    }
}

/// Backend whose runtime never came up.
pub struct UnavailableBackend;

impl UnavailableBackend {
    fn err() -> VisionError {
        VisionError::Unavailable("test backend offline".into())
    }
}

impl VisionBackend for UnavailableBackend {
    fn to_gray(&self, _frame: &FrameView<'_>) -> Result<GrayImage, VisionError> {
        Err(Self::err())
    }

    fn to_hsv(&self, _frame: &FrameView<'_>) -> Result<HsvImage, VisionError> {
        Err(Self::err())
    }

    fn canny(&self, _gray: &GrayImage, _low: f32, _high: f32) -> Result<GrayImage, VisionError> {
        Err(Self::err())
    }

    fn threshold_binary(&self, _gray: &GrayImage, _thresh: u8) -> Result<GrayImage, VisionError> {
        Err(Self::err())
    }

    fn in_range(&self, _hsv: &HsvImage, _range: &HsvRange) -> Result<GrayImage, VisionError> {
        Err(Self::err())
    }

    fn external_contours(&self, _mask: &GrayImage) -> Result<Vec<Contour>, VisionError> {
        Err(Self::err())
    }
}

pub fn rect_contour(x0: i32, y0: i32, x1: i32, y1: i32) -> Contour {
    Contour::from_xy(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
}

/// Axis-aligned square of side `2 * half` around `(cx, cy)`.
pub fn blob(cx: i32, cy: i32, half: i32) -> Contour {
    rect_contour(cx - half, cy - half, cx + half, cy + half)
}

/// 6x6 square pip, 36 px².
pub fn pip(cx: i32, cy: i32) -> Contour {
    blob(cx, cy, 3)
}
