use crate::core::{FrameView, VisionBackend, VisionError};
use crate::io::{AnalyzeConfig, AnalyzeReport, FrameReport};
use crate::{AnalyzeError, AnalyzerParams, BoardAnalyzer};
use ::image::{DynamicImage, RgbImage, RgbaImage};
use log::{info, warn};
use std::path::{Path, PathBuf};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the end-to-end helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("failed to load image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: ::image::ImageError,
    },

    #[error(transparent)]
    Vision(#[from] VisionError),

    #[error(transparent)]
    Analyze(#[from] AnalyzeError),
}

/// Borrow an `image::RgbImage` as a frame.
pub fn frame_view(img: &RgbImage) -> FrameView<'_> {
    FrameView::rgb(img.width() as usize, img.height() as usize, img.as_raw())
}

/// Borrow an `image::RgbaImage` as a frame; alpha is ignored downstream.
pub fn rgba_frame_view(img: &RgbaImage) -> FrameView<'_> {
    FrameView::rgba(img.width() as usize, img.height() as usize, img.as_raw())
}

/// Normalise any decoded image to 8-bit RGB.
pub fn to_rgb(img: DynamicImage) -> RgbImage {
    match img {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.to_rgb8(),
    }
}

/// Decode an image file into 8-bit RGB.
pub fn load_frame(path: impl AsRef<Path>) -> Result<RgbImage, DetectError> {
    let path = path.as_ref();
    let img = ::image::open(path).map_err(|source| DetectError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(to_rgb(img))
}

/// Calibrate on `calibration_image`, then analyse each of `frames`.
///
/// Only a failure to load the calibration image or a backend error during
/// calibration aborts the run. Per-frame problems, including a failed
/// calibration, are recorded in that frame's [`FrameReport`].
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(backend, params, frames), fields(frames = frames.len()))
)]
pub fn analyze_paths<B, P>(
    backend: &B,
    calibration_image: &Path,
    frames: &[P],
    params: AnalyzerParams,
) -> Result<AnalyzeReport, DetectError>
where
    B: VisionBackend + ?Sized,
    P: AsRef<Path>,
{
    let mut analyzer = BoardAnalyzer::new(backend, params);

    let board = load_frame(calibration_image)?;
    let calibrated = analyzer.calibrate(&frame_view(&board))?;
    if !calibrated {
        warn!(
            "calibration failed on {}; frames will be reported as not calibrated",
            calibration_image.display()
        );
    }

    let mut reports = Vec::with_capacity(frames.len());
    for path in frames {
        let path = path.as_ref();
        let outcome = load_frame(path)
            .and_then(|img| Ok(analyzer.analyze(&frame_view(&img))?));
        let report = match outcome {
            Ok(snapshot) => {
                info!(
                    "{}: {} checkers, {} dice",
                    path.display(),
                    snapshot.checkers.len(),
                    snapshot.dice.len()
                );
                FrameReport {
                    frame_path: path.display().to_string(),
                    snapshot: Some(snapshot),
                    error: None,
                }
            }
            Err(err) => {
                warn!("{}: {err}", path.display());
                FrameReport {
                    frame_path: path.display().to_string(),
                    snapshot: None,
                    error: Some(err.to_string()),
                }
            }
        };
        reports.push(report);
    }

    Ok(AnalyzeReport {
        calibration_image: calibration_image.display().to_string(),
        calibrated,
        calibration: analyzer.calibration().cloned(),
        frames: reports,
    })
}

/// Run a batch described by an [`AnalyzeConfig`].
pub fn run_config<B: VisionBackend + ?Sized>(
    backend: &B,
    cfg: &AnalyzeConfig,
) -> Result<AnalyzeReport, DetectError> {
    analyze_paths(
        backend,
        Path::new(&cfg.calibration_image),
        cfg.frames.as_slice(),
        cfg.params.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_view_drops_alpha() {
        let img = RgbaImage::from_pixel(2, 1, ::image::Rgba([1, 2, 3, 4]));
        let view = rgba_frame_view(&img);
        assert!(view.validate().is_ok());
        assert_eq!(view.rgb_pixels().collect::<Vec<_>>(), vec![[1, 2, 3]; 2]);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_frame("/nonexistent/board.png").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/board.png"));
    }
}
