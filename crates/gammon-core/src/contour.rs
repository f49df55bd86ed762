//! Closed pixel contours and the geometry computed on them.
//!
//! Contours are treated as closed polygons through their pixel coordinates,
//! so area and moments follow Green's theorem over the polygon rather than a
//! per-pixel count.

use imageproc::geometry::{approximate_polygon_dp, arc_length, contour_area};
use imageproc::point::Point;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Boundary of one connected region, in tracing order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<Point2<i32>>,
}

/// Zeroth and first order spatial moments of a closed polygon.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    /// Area-weighted mean position, `None` for a zero-area polygon.
    pub fn centroid(&self) -> Option<Point2<f32>> {
        if self.m00.abs() < f64::EPSILON {
            return None;
        }
        Some(Point2::new(
            (self.m10 / self.m00) as f32,
            (self.m01 / self.m00) as f32,
        ))
    }
}

impl Contour {
    pub fn new(points: Vec<Point2<i32>>) -> Self {
        Self { points }
    }

    /// Build a contour from `(x, y)` pairs.
    pub fn from_xy(points: &[(i32, i32)]) -> Self {
        Self::new(points.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Polygon moments; orientation-independent (`m00 >= 0`).
    pub fn moments(&self) -> Moments {
        let n = self.points.len();
        if n < 3 {
            return Moments::default();
        }

        let mut m00 = 0.0_f64;
        let mut m10 = 0.0_f64;
        let mut m01 = 0.0_f64;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            let (xi, yi) = (p.x as f64, p.y as f64);
            let (xj, yj) = (q.x as f64, q.y as f64);
            let cross = xi * yj - xj * yi;
            m00 += cross;
            m10 += cross * (xi + xj);
            m01 += cross * (yi + yj);
        }

        let sign = if m00 < 0.0 { -1.0 } else { 1.0 };
        Moments {
            m00: sign * m00 / 2.0,
            m10: sign * m10 / 6.0,
            m01: sign * m01 / 6.0,
        }
    }

    /// Absolute enclosed area.
    pub fn area(&self) -> f64 {
        contour_area(&to_ip_points(&self.points))
    }

    /// Length of the closed boundary.
    pub fn perimeter(&self) -> f64 {
        arc_length(&to_ip_points(&self.points), true)
    }

    /// Centroid via moments, `None` for degenerate contours.
    pub fn centroid(&self) -> Option<Point2<f32>> {
        self.moments().centroid()
    }

    /// Closed polygon approximation at tolerance `epsilon` pixels.
    pub fn approximate(&self, epsilon: f64) -> Vec<Point2<i32>> {
        approximate_polygon(&self.points, epsilon)
    }
}

fn to_ip_points(points: &[Point2<i32>]) -> Vec<Point<i32>> {
    points.iter().map(|p| Point::new(p.x, p.y)).collect()
}

/// Approximate a closed curve by a polygon whose vertices deviate from the
/// curve by at most `epsilon`.
///
/// Douglas-Peucker always keeps the first point, so the curve is walked from
/// the point farthest from where tracing started. That point is an extreme
/// point of the shape. The result never repeats its first vertex.
pub fn approximate_polygon(points: &[Point2<i32>], epsilon: f64) -> Vec<Point2<i32>> {
    if points.len() < 3 || epsilon <= 0.0 {
        return points.to_vec();
    }

    let origin = points[0];
    let start = points
        .iter()
        .enumerate()
        .max_by_key(|(i, p)| {
            let dx = i64::from(p.x - origin.x);
            let dy = i64::from(p.y - origin.y);
            (dx * dx + dy * dy, std::cmp::Reverse(*i))
        })
        .map_or(0, |(i, _)| i);

    let mut curve = to_ip_points(points);
    curve.rotate_left(start);
    approximate_polygon_dp(&curve, epsilon, true)
        .into_iter()
        .map(|p| Point2::new(p.x, p.y))
        .collect()
}
