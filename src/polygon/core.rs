//! Core polygon types and containment predicates.

use crate::primitives::{Point2, Segment2};
use num_traits::Float;

/// A polygon with an exterior ring and zero or more holes.
///
/// Rings are stored open: the first vertex is not repeated at the end.
/// Winding order is not significant.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<F> {
    /// Outer boundary.
    pub exterior: Vec<Point2<F>>,
    /// Inner boundaries.
    pub holes: Vec<Vec<Point2<F>>>,
}

impl<F: Float> Polygon<F> {
    /// Creates a polygon from an exterior ring and holes.
    ///
    /// Closed rings (first vertex repeated at the end) are opened.
    pub fn new(exterior: Vec<Point2<F>>, holes: Vec<Vec<Point2<F>>>) -> Self {
        Self {
            exterior: open_ring(exterior),
            holes: holes.into_iter().map(open_ring).collect(),
        }
    }

    /// Creates a polygon with no holes.
    #[inline]
    pub fn from_exterior(exterior: Vec<Point2<F>>) -> Self {
        Self::new(exterior, Vec::new())
    }

    /// Returns true if the exterior ring has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty()
    }

    /// Total number of vertices across all rings.
    pub fn vertex_count(&self) -> usize {
        self.exterior.len() + self.holes.iter().map(Vec::len).sum::<usize>()
    }

    /// Iterates over the exterior ring followed by each hole.
    pub fn rings(&self) -> impl Iterator<Item = &[Point2<F>]> {
        std::iter::once(self.exterior.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }

    /// Area of the exterior minus the area of the holes.
    pub fn area(&self) -> F {
        self.holes
            .iter()
            .fold(ring_signed_area(&self.exterior).abs(), |area, hole| {
                area - ring_signed_area(hole).abs()
            })
    }

    /// Tests if a point lies inside the exterior and outside every hole.
    ///
    /// Points exactly on a boundary may return either true or false.
    pub fn contains(&self, point: Point2<F>) -> bool {
        ring_contains(&self.exterior, point)
            && !self.holes.iter().any(|hole| ring_contains(hole, point))
    }

    /// Tests if the segment from `a` to `b` lies entirely inside the polygon.
    ///
    /// Both endpoints and the midpoint must be inside and no ring edge may
    /// cross the segment.
    pub fn contains_segment(&self, a: Point2<F>, b: Point2<F>) -> bool {
        if !self.contains(a) || !self.contains(b) || !self.contains(a.midpoint(b)) {
            return false;
        }

        let segment = Segment2::new(a, b);
        !self
            .rings()
            .flat_map(ring_edges)
            .any(|edge| edge.crosses(segment))
    }

    /// Returns the bounding box as (min, max) points.
    pub fn bounding_box(&self) -> Option<(Point2<F>, Point2<F>)> {
        let first = *self.exterior.first()?;
        Some(self.exterior.iter().skip(1).fold((first, first), |(min, max), v| {
            (
                Point2::new(min.x.min(v.x), min.y.min(v.y)),
                Point2::new(max.x.max(v.x), max.y.max(v.y)),
            )
        }))
    }
}

/// Drops a repeated closing vertex.
fn open_ring<F: Float>(mut ring: Vec<Point2<F>>) -> Vec<Point2<F>> {
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// Iterates over the edges of an open ring, including the closing edge.
fn ring_edges<F: Float>(ring: &[Point2<F>]) -> impl Iterator<Item = Segment2<F>> + '_ {
    let n = ring.len();
    (0..n).map(move |i| Segment2::new(ring[i], ring[(i + 1) % n]))
}

/// Computes the signed area of a ring using the shoelace formula.
///
/// Positive for CCW winding, negative for CW winding.
pub fn ring_signed_area<F: Float>(vertices: &[Point2<F>]) -> F {
    if vertices.len() < 3 {
        return F::zero();
    }

    let n = vertices.len();
    let twice = (0..n).fold(F::zero(), |acc, i| {
        let j = (i + 1) % n;
        acc + vertices[i].x * vertices[j].y - vertices[j].x * vertices[i].y
    });

    twice / (F::one() + F::one())
}

/// Tests if a point is inside a ring using the ray casting algorithm.
///
/// Points on the boundary may return either true or false.
pub fn ring_contains<F: Float>(vertices: &[Point2<F>], point: Point2<F>) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = vertices.len();

    let mut j = n - 1;
    for i in 0..n {
        let vi = vertices[i];
        let vj = vertices[j];

        if ((vi.y > point.y) != (vj.y > point.y))
            && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}
