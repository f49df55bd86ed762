use gammon_core::{Contour, DiceObservation, FrameView, VisionBackend, VisionError};
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Pip segmentation and grouping thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiceParams {
    /// Gray levels strictly above this are pip candidates.
    pub brightness_threshold: u8,
    /// Exclusive lower bound on pip area, in square pixels.
    pub dot_area_min: f64,
    /// Exclusive upper bound on pip area, in square pixels.
    pub dot_area_max: f64,
    /// Pips strictly closer than this to a cluster seed join its die.
    pub cluster_radius: f32,
}

impl Default for DiceParams {
    fn default() -> Self {
        Self {
            brightness_threshold: 200,
            dot_area_min: 20.0,
            dot_area_max: 100.0,
            cluster_radius: 50.0,
        }
    }
}

/// Reads dice by counting bright pips per spatial cluster.
///
/// A die's value is its pip count; it is not checked against `1..=6`, die
/// faces are never located, and two dice whose pips lie within
/// `cluster_radius` of one seed are read as a single die.
#[derive(Clone, Debug, Default)]
pub struct DiceDetector {
    params: DiceParams,
}

impl DiceDetector {
    pub fn new(params: DiceParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &DiceParams {
        &self.params
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, backend, frame), fields(width = frame.width, height = frame.height))
    )]
    pub fn detect<B: VisionBackend + ?Sized>(
        &self,
        backend: &B,
        frame: &FrameView<'_>,
    ) -> Result<Vec<DiceObservation>, VisionError> {
        let gray = backend.to_gray(frame)?;
        let mask = backend.threshold_binary(&gray, self.params.brightness_threshold)?;
        let contours = backend.external_contours(&mask)?;

        let dots = self.dot_centroids(&contours);
        let dice = cluster_dots(&dots, self.params.cluster_radius);
        debug!(
            "dice: {} contours, {} pips, {} dice",
            contours.len(),
            dots.len(),
            dice.len()
        );
        Ok(dice)
    }

    /// Centroids of contours whose area lies strictly inside the pip range.
    pub fn dot_centroids(&self, contours: &[Contour]) -> Vec<Point2<f32>> {
        contours
            .iter()
            .filter(|c| {
                let area = c.area();
                area > self.params.dot_area_min && area < self.params.dot_area_max
            })
            .filter_map(Contour::centroid)
            .collect()
    }
}

/// Group pips into dice.
///
/// The first unassigned pip seeds a cluster that absorbs every other
/// unassigned pip within `radius` of the seed. Distances are measured to the
/// seed only, so clusters are not transitive.
pub fn cluster_dots(dots: &[Point2<f32>], radius: f32) -> Vec<DiceObservation> {
    let mut assigned = vec![false; dots.len()];
    let mut dice = Vec::new();

    for seed in 0..dots.len() {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;

        let mut count = 1usize;
        let mut sum = dots[seed].coords;
        for other in seed + 1..dots.len() {
            if !assigned[other] && (dots[other] - dots[seed]).norm() < radius {
                assigned[other] = true;
                count += 1;
                sum += dots[other].coords;
            }
        }

        dice.push(DiceObservation {
            value: count,
            position: Point2::from(sum / count as f32),
        });
    }

    dice
}
