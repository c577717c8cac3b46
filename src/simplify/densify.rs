//! Point densification along polylines and rings.

use crate::primitives::Point2;
use num_traits::Float;

/// Inserts evenly spaced points so that no gap exceeds `spacing`.
///
/// Every input point appears unchanged in the output, in order. Each segment
/// of length `L` is split into `ceil(L / spacing)` equal pieces. A
/// non-positive or non-finite spacing returns the input as-is.
///
/// # Example
///
/// ```
/// use centerline::{Point2, simplify::densify_line};
///
/// let line = vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)];
/// let dense = densify_line(&line, 3.0);
///
/// // 10 / 3 rounds up to 4 pieces of 2.5
/// assert_eq!(dense.len(), 5);
/// assert_eq!(dense[1], Point2::new(2.5, 0.0));
/// ```
pub fn densify_line<F: Float>(points: &[Point2<F>], spacing: F) -> Vec<Point2<F>> {
    if points.len() < 2 || !(spacing > F::zero()) || !spacing.is_finite() {
        return points.to_vec();
    }

    let mut dense = Vec::with_capacity(points.len());
    dense.push(points[0]);

    for pair in points.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);
        let pieces = (p1.distance(p2) / spacing)
            .ceil()
            .to_usize()
            .unwrap_or(1)
            .max(1);
        let count = F::from(pieces).unwrap_or_else(F::one);

        for j in 1..pieces {
            let t = F::from(j).unwrap_or_else(F::zero) / count;
            dense.push(p1.lerp(p2, t));
        }
        dense.push(p2);
    }

    dense
}

/// Densifies a ring, including the closing edge from the last vertex back
/// to the first.
///
/// The ring may be given open or closed; the output is always open (the
/// first point is not repeated at the end).
pub fn densify_ring<F: Float>(ring: &[Point2<F>], spacing: F) -> Vec<Point2<F>> {
    let mut closed = ring.to_vec();
    match (ring.first(), ring.last()) {
        (Some(&first), Some(&last)) if ring.len() > 1 && first != last => closed.push(first),
        _ => {}
    }

    let mut dense = densify_line(&closed, spacing);
    if dense.len() > 1 {
        dense.pop();
    }
    dense
}
