use gammon_core::{
    CheckerColor, CheckerObservation, Contour, FrameView, HsvRange, PointPosition, VisionBackend,
    VisionError,
};
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Segmentation and matching thresholds for checkers.
///
/// The colour ranges are fixed per configuration, not adapted per board or
/// lighting condition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerParams {
    /// Blobs must enclose strictly more than this many square pixels.
    pub min_area: f64,
    /// A blob is assigned to its nearest point only if strictly closer than this.
    pub match_radius: f32,
    pub black_hsv_range: HsvRange,
    pub white_hsv_range: HsvRange,
}

impl Default for CheckerParams {
    fn default() -> Self {
        Self {
            min_area: 100.0,
            match_radius: 50.0,
            black_hsv_range: HsvRange::BLACK_CHECKER,
            white_hsv_range: HsvRange::WHITE_CHECKER,
        }
    }
}

/// Finds black and white checker blobs and assigns each to a board point.
///
/// Stacked or touching checkers of one colour merge into a single blob and
/// are reported once; there is no stack counting.
#[derive(Clone, Debug, Default)]
pub struct CheckerDetector {
    params: CheckerParams,
}

impl CheckerDetector {
    pub fn new(params: CheckerParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &CheckerParams {
        &self.params
    }

    /// Detect checkers in `frame` against calibrated `points`.
    ///
    /// Black observations come first, then white, each in contour order.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, backend, frame, points), fields(width = frame.width, height = frame.height))
    )]
    pub fn detect<B: VisionBackend + ?Sized>(
        &self,
        backend: &B,
        frame: &FrameView<'_>,
        points: &[PointPosition],
    ) -> Result<Vec<CheckerObservation>, VisionError> {
        let hsv = backend.to_hsv(frame)?;

        let mut out = Vec::new();
        for (color, range) in [
            (CheckerColor::Black, &self.params.black_hsv_range),
            (CheckerColor::White, &self.params.white_hsv_range),
        ] {
            let mask = backend.in_range(&hsv, range)?;
            let contours = backend.external_contours(&mask)?;
            let before = out.len();
            out.extend(self.observations_from_contours(&contours, color, points));
            debug!(
                "checkers: {:?} mask gave {} contours, {} assigned",
                color,
                contours.len(),
                out.len() - before
            );
        }

        Ok(out)
    }

    /// Filter blobs by area, reduce to centroids and assign to points.
    pub fn observations_from_contours(
        &self,
        contours: &[Contour],
        color: CheckerColor,
        points: &[PointPosition],
    ) -> Vec<CheckerObservation> {
        contours
            .iter()
            .filter(|c| c.area() > self.params.min_area)
            .filter_map(|c| c.centroid())
            .filter_map(|center| {
                let point = nearest_point(points, center, self.params.match_radius)?;
                Some(CheckerObservation {
                    point_index: point.index,
                    row: point.row,
                    color,
                    position: center,
                })
            })
            .collect()
    }
}

/// Nearest point to `p`, accepted only when its distance is `< radius`.
///
/// The first of several equidistant points wins.
pub fn nearest_point(
    points: &[PointPosition],
    p: Point2<f32>,
    radius: f32,
) -> Option<&PointPosition> {
    let mut best: Option<(&PointPosition, f32)> = None;
    for candidate in points {
        let d = (candidate.position - p).norm();
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((candidate, d));
        }
    }
    best.filter(|&(_, d)| d < radius).map(|(pt, _)| pt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gammon_core::BoardRow;

    fn points() -> Vec<PointPosition> {
        (0..12)
            .flat_map(|i| {
                [
                    PointPosition {
                        position: Point2::new(i as f32 * 100.0, 0.0),
                        row: BoardRow::Top,
                        index: i,
                    },
                    PointPosition {
                        position: Point2::new(i as f32 * 100.0, 400.0),
                        row: BoardRow::Bottom,
                        index: i,
                    },
                ]
            })
            .collect()
    }

    fn square(cx: i32, cy: i32, half: i32) -> Contour {
        Contour::from_xy(&[
            (cx - half, cy - half),
            (cx + half, cy - half),
            (cx + half, cy + half),
            (cx - half, cy + half),
        ])
    }

    #[test]
    fn centroid_on_a_point_maps_to_it() {
        let pts = points();
        let hit = nearest_point(&pts, Point2::new(300.0, 400.0), 50.0).expect("match");
        assert_eq!((hit.row, hit.index), (BoardRow::Bottom, 3));
    }

    #[test]
    fn centroid_at_match_radius_is_discarded() {
        let pts = points();
        assert!(nearest_point(&pts, Point2::new(300.0, 50.0), 50.0).is_none());
        assert!(nearest_point(&pts, Point2::new(300.0, 49.9), 50.0).is_some());
        assert!(nearest_point(&[], Point2::new(0.0, 0.0), 50.0).is_none());
    }

    #[test]
    fn equidistant_points_resolve_to_the_first() {
        let pts = points();
        // Halfway between top 3 and top 4.
        let hit = nearest_point(&pts, Point2::new(350.0, 0.0), 60.0).expect("match");
        assert_eq!((hit.row, hit.index), (BoardRow::Top, 3));
        // Halfway between top 5 and bottom 5; the top entry comes first.
        let hit = nearest_point(&pts, Point2::new(500.0, 200.0), 250.0).expect("match");
        assert_eq!((hit.row, hit.index), (BoardRow::Top, 5));
    }

    #[test]
    fn small_blobs_and_strays_are_dropped() {
        let det = CheckerDetector::default();
        let contours = vec![
            square(200, 10, 10), // area 400, near top point 2
            square(500, 390, 4), // area 64, too small
            square(650, 200, 10), // mid-board, no point within radius
        ];
        let obs = det.observations_from_contours(&contours, CheckerColor::White, &points());
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].point_index, 2);
        assert_eq!(obs[0].row, BoardRow::Top);
        assert_eq!(obs[0].color, CheckerColor::White);
        assert_eq!(obs[0].position, Point2::new(200.0, 10.0));
    }

    #[test]
    fn area_threshold_is_strict() {
        let det = CheckerDetector::default();
        // 10 x 10 polygon encloses exactly 100 square pixels.
        let obs = det.observations_from_contours(&[square(100, 0, 5)], CheckerColor::Black, &points());
        assert!(obs.is_empty());
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let p: CheckerParams = serde_json::from_str(r#"{"match_radius": 30.0}"#).unwrap();
        assert_eq!(p.match_radius, 30.0);
        assert_eq!(p.min_area, 100.0);
        assert_eq!(p.white_hsv_range, HsvRange::WHITE_CHECKER);
    }
}
