use nalgebra::{Matrix3, Point2, Vector2, Vector3};

/// Projective map between the normalised board square and image pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    #[inline]
    pub fn apply(&self, p: Point2<f32>) -> Point2<f32> {
        let v = self.h * Vector3::new(p.x as f64, p.y as f64, 1.0);
        let w = v[2];
        Point2::new((v[0] / w) as f32, (v[1] / w) as f32)
    }

    pub fn inverse(&self) -> Option<Self> {
        self.h.try_inverse().map(Self::new)
    }
}

/// Projective map taking the unit square `(0,0) (1,0) (1,1) (0,1)` onto `q`.
///
/// Closed form from the two edge vectors at `q[2]` and the quad's deviation
/// from a parallelogram; a parallelogram yields an affine map.
fn square_to_quad(q: &[Point2<f64>; 4]) -> Option<Matrix3<f64>> {
    let [p0, p1, p2, p3] = *q;
    let d1 = p1 - p2;
    let d3 = p3 - p2;
    let skew = p0 - p1 + (p2 - p3);

    let den = d1.x * d3.y - d3.x * d1.y;
    if den.abs() < f64::EPSILON {
        return None;
    }
    let g = (skew.x * d3.y - d3.x * skew.y) / den;
    let h = (d1.x * skew.y - skew.x * d1.y) / den;

    Some(Matrix3::new(
        p1.x - p0.x + g * p1.x,
        p3.x - p0.x + h * p3.x,
        p0.x,
        p1.y - p0.y + g * p1.y,
        p3.y - p0.y + h * p3.y,
        p0.y,
        g,
        h,
        1.0,
    ))
}

/// True when any three points are collinear relative to the quad's extent.
fn has_collinear_triple(pts: &[Point2<f64>; 4]) -> bool {
    let (min, max) = pts.iter().fold(
        (Vector2::repeat(f64::INFINITY), Vector2::repeat(f64::NEG_INFINITY)),
        |(lo, hi), p| (lo.inf(&p.coords), hi.sup(&p.coords)),
    );
    let extent = (max - min).max();
    if extent <= 0.0 {
        return true;
    }

    [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)]
        .iter()
        .any(|&(i, j, k)| {
            let (ab, ac) = (pts[j] - pts[i], pts[k] - pts[i]);
            (ab.x * ac.y - ab.y * ac.x).abs() < 1e-9 * extent * extent
        })
}

fn to_f64(pts: &[Point2<f32>; 4]) -> [Point2<f64>; 4] {
    pts.map(|p| Point2::new(p.x as f64, p.y as f64))
}

/// Compute H such that `dst ~ H * src` from 4 point correspondences.
///
/// Corner order must be consistent between `src` and `dst`. Both quads are
/// routed through the unit square, `H = S(dst) * S(src)^-1`. Returns `None`
/// when three of the points in either quad are collinear.
pub fn homography_from_4pt(src: &[Point2<f32>; 4], dst: &[Point2<f32>; 4]) -> Option<Homography> {
    let (src, dst) = (to_f64(src), to_f64(dst));
    if has_collinear_triple(&src) || has_collinear_triple(&dst) {
        return None;
    }

    let h = square_to_quad(&dst)? * square_to_quad(&src)?.try_inverse()?;
    let s = h[(2, 2)];
    if s.abs() < 1e-12 {
        return None;
    }
    Some(Homography::new(h / s))
}
