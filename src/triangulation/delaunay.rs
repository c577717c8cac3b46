//! Delaunay triangulation using the Bowyer-Watson algorithm.
//!
//! No site lies strictly inside the circumcircle of any output triangle,
//! which is what makes the triangle circumcenters the vertices of the
//! Voronoi diagram of the same sites.
//!
//! # Algorithm
//!
//! 1. Start with a super-triangle containing all sites
//! 2. Insert sites one at a time, re-triangulating the cavity of triangles
//!    whose circumcircle contains the new site
//! 3. Drop triangles connected to the super-triangle vertices
//!
//! # Complexity
//!
//! - Time: O(n²) worst case, since each insertion scans every triangle
//! - Space: O(n)
//!
//! # Example
//!
//! ```
//! use centerline::triangulation::delaunay_triangulation;
//! use centerline::Point2;
//!
//! let sites: Vec<Point2<f64>> = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(4.0, 0.0),
//!     Point2::new(4.0, 3.0),
//!     Point2::new(0.0, 3.0),
//!     Point2::new(2.0, 1.5),
//! ];
//!
//! // The center site fans the rectangle into four triangles
//! let triangles = delaunay_triangulation(&sites);
//! assert_eq!(triangles.len(), 4);
//! ```

use crate::primitives::Point2;
use num_traits::Float;
use std::collections::HashMap;

/// A triangle represented by indices into a site array.
///
/// Vertices are stored in counter-clockwise order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triangle {
    /// First vertex index
    pub a: usize,
    /// Second vertex index
    pub b: usize,
    /// Third vertex index
    pub c: usize,
}

impl Triangle {
    /// Creates a new triangle from vertex indices.
    #[inline]
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self { a, b, c }
    }

    /// The three vertex indices in order.
    #[inline]
    pub fn vertices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }

    /// Returns the three rotations `(s, u, v)` of this triangle, one starting
    /// at each vertex, all preserving the counter-clockwise order.
    #[inline]
    pub fn rotations(&self) -> [(usize, usize, usize); 3] {
        [
            (self.a, self.b, self.c),
            (self.b, self.c, self.a),
            (self.c, self.a, self.b),
        ]
    }
}

/// Tests if `p` lies strictly inside the circumcircle of the CCW triangle
/// `abc`, using the lifted determinant.
///
/// # Example
///
/// ```
/// use centerline::triangulation::in_circumcircle;
/// use centerline::Point2;
///
/// let a = Point2::new(0.0_f64, 0.0);
/// let b = Point2::new(2.0, 0.0);
/// let c = Point2::new(0.0, 2.0);
///
/// assert!(in_circumcircle(Point2::new(1.0, 1.0), a, b, c));
/// assert!(!in_circumcircle(Point2::new(3.0, 3.0), a, b, c));
/// ```
pub fn in_circumcircle<F: Float>(p: Point2<F>, a: Point2<F>, b: Point2<F>, c: Point2<F>) -> bool {
    let (ax, ay) = (a.x - p.x, a.y - p.y);
    let (bx, by) = (b.x - p.x, b.y - p.y);
    let (cx, cy) = (c.x - p.x, c.y - p.y);

    let aa = ax * ax + ay * ay;
    let bb = bx * bx + by * by;
    let cc = cx * cx + cy * cy;

    let det = ax * (by * cc - cy * bb) - ay * (bx * cc - cx * bb) + aa * (bx * cy - cx * by);

    det > F::zero()
}

/// Computes the circumcenter of a triangle.
///
/// Collinear input falls back to the centroid.
pub fn circumcenter<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>) -> Point2<F> {
    let two = F::one() + F::one();
    let d = two * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));

    if d.abs() < F::epsilon() {
        let three = two + F::one();
        return Point2::new((a.x + b.x + c.x) / three, (a.y + b.y + c.y) / three);
    }

    let aa = a.x * a.x + a.y * a.y;
    let bb = b.x * b.x + b.y * b.y;
    let cc = c.x * c.x + c.y * c.y;

    Point2::new(
        (aa * (b.y - c.y) + bb * (c.y - a.y) + cc * (a.y - b.y)) / d,
        (aa * (c.x - b.x) + bb * (a.x - c.x) + cc * (b.x - a.x)) / d,
    )
}

/// Positive if `abc` turns counter-clockwise.
fn orient2d<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>) -> F {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Builds a counter-clockwise triangle enclosing every site with a wide margin.
fn super_triangle<F: Float>(sites: &[Point2<F>]) -> [Point2<F>; 3] {
    let (min, max) = sites.iter().fold(
        (sites[0], sites[0]),
        |(min, max), p| {
            (
                Point2::new(min.x.min(p.x), min.y.min(p.y)),
                Point2::new(max.x.max(p.x), max.y.max(p.y)),
            )
        },
    );

    let two = F::one() + F::one();
    let delta = (max.x - min.x).max(max.y - min.y).max(F::one());
    let mid = min.midpoint(max);
    let margin = F::from(20.0).unwrap_or_else(|| two * two * two);

    [
        Point2::new(mid.x - margin * delta, mid.y - delta * two),
        Point2::new(mid.x + margin * delta, mid.y - delta * two),
        Point2::new(mid.x, mid.y + margin * delta),
    ]
}

/// Computes the Delaunay triangulation of a set of sites.
///
/// Returns triangles as indices into `sites`, each in counter-clockwise
/// order. Fewer than three sites, or all sites collinear, yield no
/// triangles. Exact duplicate sites are left out of the triangulation.
pub fn delaunay_triangulation<F: Float>(sites: &[Point2<F>]) -> Vec<Triangle> {
    if sites.len() < 3 {
        return Vec::new();
    }

    let n = sites.len();
    let mut points: Vec<Point2<F>> = sites.to_vec();
    points.extend(super_triangle(sites));

    let mut triangles = vec![Triangle::new(n, n + 1, n + 2)];

    for (i, &p) in sites.iter().enumerate() {
        let mut cavity = Vec::new();
        triangles.retain(|tri| {
            if in_circumcircle(p, points[tri.a], points[tri.b], points[tri.c]) {
                cavity.push(*tri);
                false
            } else {
                true
            }
        });

        // Cavity boundary: edges used by exactly one removed triangle
        let mut edge_count: HashMap<(usize, usize), usize> = HashMap::new();
        for tri in &cavity {
            for (s, u, _) in tri.rotations() {
                let key = if s < u { (s, u) } else { (u, s) };
                *edge_count.entry(key).or_insert(0) += 1;
            }
        }

        let mut boundary: Vec<(usize, usize)> = edge_count
            .into_iter()
            .filter(|&(_, count)| count == 1)
            .map(|(edge, _)| edge)
            .collect();
        boundary.sort_unstable();

        for (ea, eb) in boundary {
            if orient2d(points[ea], points[eb], p) > F::zero() {
                triangles.push(Triangle::new(ea, eb, i));
            } else {
                triangles.push(Triangle::new(eb, ea, i));
            }
        }
    }

    triangles.retain(|tri| tri.a < n && tri.b < n && tri.c < n);
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_delaunay(points: &[Point2<f64>], triangles: &[Triangle]) {
        for tri in triangles {
            let [a, b, c] = tri.vertices();
            assert!(orient2d(points[a], points[b], points[c]) > 0.0);
            for (i, &p) in points.iter().enumerate() {
                if i != a && i != b && i != c {
                    assert!(
                        !in_circumcircle(p, points[a], points[b], points[c]),
                        "site {} inside circumcircle of {:?}",
                        i,
                        tri
                    );
                }
            }
        }
    }

    #[test]
    fn test_rotations_keep_order() {
        let tri = Triangle::new(4, 7, 9);
        assert_eq!(tri.rotations(), [(4, 7, 9), (7, 9, 4), (9, 4, 7)]);
    }

    #[test]
    fn test_circumcenter_right_triangle() {
        // Hypotenuse midpoint
        let c = circumcenter(
            Point2::new(0.0_f64, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(0.0, 2.0),
        );
        assert_relative_eq!(c.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(c.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_circumcenter_collinear_falls_back() {
        let c = circumcenter(
            Point2::new(0.0_f64, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        );
        assert_relative_eq!(c.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(c.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_too_few_or_collinear_sites() {
        let two = vec![Point2::new(0.0_f64, 0.0), Point2::new(1.0, 0.0)];
        assert!(delaunay_triangulation(&two).is_empty());

        let line: Vec<Point2<f64>> = (0..5).map(|i| Point2::new(i as f64, 0.0)).collect();
        assert!(delaunay_triangulation(&line).is_empty());
    }

    #[test]
    fn test_grid_is_delaunay() {
        let mut points: Vec<Point2<f64>> = Vec::new();
        for i in 0..4 {
            for j in 0..4 {
                points.push(Point2::new(i as f64, j as f64));
            }
        }

        let triangles = delaunay_triangulation(&points);
        // 9 unit squares, two triangles each
        assert_eq!(triangles.len(), 18);
        assert_delaunay(&points, &triangles);
    }

    #[test]
    fn test_scattered_sites_are_delaunay() {
        let points: Vec<Point2<f64>> = vec![
            Point2::new(0.1, 0.2),
            Point2::new(0.8, 0.1),
            Point2::new(0.9, 0.9),
            Point2::new(0.2, 0.85),
            Point2::new(0.5, 0.5),
            Point2::new(0.3, 0.3),
            Point2::new(0.7, 0.6),
            Point2::new(0.4, 0.8),
        ];
        let triangles = delaunay_triangulation(&points);
        assert!(!triangles.is_empty());
        assert_delaunay(&points, &triangles);
    }

    #[test]
    fn test_duplicate_site_is_skipped() {
        let points = vec![
            Point2::new(0.0_f64, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 0.0),
        ];
        let triangles = delaunay_triangulation(&points);
        assert_eq!(triangles.len(), 1);
        assert!(!triangles[0].vertices().contains(&3));
    }
}
