//! Board geometry derived from the four outline corners.

use gammon_core::{homography_from_4pt, BoardRow, Homography, PointPosition, POINTS_PER_ROW};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Board outline corners in image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardCorners {
    pub top_left: Point2<f32>,
    pub top_right: Point2<f32>,
    pub bottom_right: Point2<f32>,
    pub bottom_left: Point2<f32>,
}

impl BoardCorners {
    /// Order an unordered quadrilateral.
    ///
    /// The two smallest-x vertices form the left pair and the other two the
    /// right pair; within each pair the smaller y is the top corner.
    pub fn from_quad(quad: [Point2<i32>; 4]) -> Self {
        let mut pts = quad;
        pts.sort_by_key(|p| p.x);
        let (mut left, mut right) = ([pts[0], pts[1]], [pts[2], pts[3]]);
        left.sort_by_key(|p| p.y);
        right.sort_by_key(|p| p.y);

        let f = |p: Point2<i32>| Point2::new(p.x as f32, p.y as f32);
        Self {
            top_left: f(left[0]),
            top_right: f(right[0]),
            bottom_right: f(right[1]),
            bottom_left: f(left[1]),
        }
    }

    /// Corners in TL, TR, BR, BL order.
    pub fn to_array(&self) -> [Point2<f32>; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// `(left, right)` anchors of a row.
    pub fn row_anchors(&self, row: BoardRow) -> (Point2<f32>, Point2<f32>) {
        match row {
            BoardRow::Top => (self.top_left, self.top_right),
            BoardRow::Bottom => (self.bottom_left, self.bottom_right),
        }
    }
}

/// The bar runs halfway between the left and right board edges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarGeometry {
    pub top: Point2<f32>,
    pub bottom: Point2<f32>,
    pub center: Point2<f32>,
}

impl BarGeometry {
    pub fn from_corners(corners: &BoardCorners) -> Self {
        let top = midpoint(corners.top_left, corners.top_right);
        let bottom = midpoint(corners.bottom_left, corners.bottom_right);
        Self {
            top,
            bottom,
            center: midpoint(top, bottom),
        }
    }
}

/// Home/outer board quarter a point belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// Indices `0..6` are left of the bar, `6..12` right of it.
    pub fn of(row: BoardRow, index: usize) -> Self {
        let left = index < POINTS_PER_ROW / 2;
        match (row, left) {
            (BoardRow::Top, true) => Quadrant::TopLeft,
            (BoardRow::Top, false) => Quadrant::TopRight,
            (BoardRow::Bottom, true) => Quadrant::BottomLeft,
            (BoardRow::Bottom, false) => Quadrant::BottomRight,
        }
    }
}

#[inline]
fn midpoint(a: Point2<f32>, b: Point2<f32>) -> Point2<f32> {
    Point2::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

/// Point `index` of a row: linear interpolation from the left anchor to the
/// right anchor at `index / 11`.
pub fn interpolate_point(start: Point2<f32>, end: Point2<f32>, index: usize) -> Point2<f32> {
    let t = index as f32 / (POINTS_PER_ROW - 1) as f32;
    Point2::new(
        start.x + (end.x - start.x) * t,
        start.y + (end.y - start.y) * t,
    )
}

/// The 24 point positions, interleaved per index as `(top i, bottom i)`.
///
/// On an exact distance tie the nearest-point search keeps the first
/// candidate, so this order favours the top row.
pub fn point_positions(corners: &BoardCorners) -> Vec<PointPosition> {
    let mut points = Vec::with_capacity(2 * POINTS_PER_ROW);
    for index in 0..POINTS_PER_ROW {
        for row in [BoardRow::Top, BoardRow::Bottom] {
            let (start, end) = corners.row_anchors(row);
            points.push(PointPosition {
                position: interpolate_point(start, end, index),
                row,
                index,
            });
        }
    }
    points
}

/// Geometry cached by a successful calibration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardCalibration {
    pub corners: BoardCorners,
    pub points: Vec<PointPosition>,
    pub bar: BarGeometry,
}

impl BoardCalibration {
    pub fn from_quad(quad: [Point2<i32>; 4]) -> Self {
        Self::from_corners(BoardCorners::from_quad(quad))
    }

    pub fn from_corners(corners: BoardCorners) -> Self {
        Self {
            points: point_positions(&corners),
            bar: BarGeometry::from_corners(&corners),
            corners,
        }
    }

    /// Look up a point by row and index.
    pub fn point(&self, row: BoardRow, index: usize) -> Option<&PointPosition> {
        self.points
            .iter()
            .find(|p| p.row == row && p.index == index)
    }

    /// Points of one board quarter, in calibration order.
    pub fn points_in(&self, quadrant: Quadrant) -> impl Iterator<Item = &PointPosition> + '_ {
        self.points
            .iter()
            .filter(move |p| Quadrant::of(p.row, p.index) == quadrant)
    }

    /// Image pixels from normalised board coordinates (TL = (0,0), BR = (1,1)).
    fn img_from_board(&self) -> Option<Homography> {
        let unit = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        homography_from_4pt(&unit, &self.corners.to_array())
    }

    /// Map an image pixel into normalised board coordinates.
    ///
    /// Returns `None` when the outline is degenerate.
    pub fn to_board_coords(&self, p: Point2<f32>) -> Option<Point2<f32>> {
        Some(self.img_from_board()?.inverse()?.apply(p))
    }

    /// Map normalised board coordinates back into image pixels.
    pub fn from_board_coords(&self, p: Point2<f32>) -> Option<Point2<f32>> {
        Some(self.img_from_board()?.apply(p))
    }
}
