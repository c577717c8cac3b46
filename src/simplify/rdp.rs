//! Ramer-Douglas-Peucker polyline simplification.
//!
//! Recursively discards points that lie within a perpendicular-distance
//! tolerance of the chord between the points retained on either side.
//! Used to thin out noisy input lines before they are buffered.
//!
//! Time complexity: O(n²) worst case, O(n log n) typical.

use crate::primitives::{Point2, Segment2};
use num_traits::Float;

/// Simplifies a polyline using the Ramer-Douglas-Peucker algorithm.
///
/// The first and last points are always preserved. Running the simplifier
/// again on its own output with the same tolerance returns the same points.
///
/// # Arguments
///
/// * `points` - The input polyline as a slice of points
/// * `tolerance` - Points within this distance of the simplified line are removed
///
/// # Example
///
/// ```
/// use centerline::{Point2, simplify::simplify_line_dp};
///
/// let points = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.1),  // Close to the line, will be removed
///     Point2::new(2.0, 0.0),
///     Point2::new(3.0, 2.0),  // Far from line, will be kept
///     Point2::new(4.0, 0.0),
/// ];
///
/// let simplified = simplify_line_dp(&points, 0.5);
/// assert_eq!(simplified.len(), 3);
/// ```
pub fn simplify_line_dp<F: Float>(points: &[Point2<F>], tolerance: F) -> Vec<Point2<F>> {
    rdp_indices(points, tolerance)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

/// Simplifies a polyline and returns the indices of retained points, in order.
///
/// Always includes index 0 and the last index if the input has >= 2 points.
pub fn rdp_indices<F: Float>(points: &[Point2<F>], tolerance: F) -> Vec<usize> {
    let n = points.len();
    if n < 3 {
        return (0..n).collect();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    rdp_recursive(points, 0, n - 1, tolerance, &mut keep);

    keep.iter()
        .enumerate()
        .filter_map(|(i, &k)| if k { Some(i) } else { None })
        .collect()
}

/// Processes the span from `start` to `end` (inclusive).
fn rdp_recursive<F: Float>(
    points: &[Point2<F>],
    start: usize,
    end: usize,
    tolerance: F,
    keep: &mut [bool],
) {
    if end <= start + 1 {
        return;
    }

    let chord = Segment2::new(points[start], points[end]);
    let mut max_dist = F::zero();
    let mut max_idx = start;

    for (i, &p) in points.iter().enumerate().take(end).skip(start + 1) {
        let dist = chord.distance_to_point(p);
        if dist > max_dist {
            max_dist = dist;
            max_idx = i;
        }
    }

    if max_dist > tolerance {
        keep[max_idx] = true;
        rdp_recursive(points, start, max_idx, tolerance, keep);
        rdp_recursive(points, max_idx, end, tolerance, keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_short_inputs_untouched() {
        let empty: Vec<Point2<f64>> = vec![];
        assert!(simplify_line_dp(&empty, 1.0).is_empty());

        let two = vec![Point2::new(0.0, 0.0), Point2::new(10.0, 10.0)];
        assert_eq!(simplify_line_dp(&two, 100.0), two);
    }

    #[test]
    fn test_straight_line_collapses_to_endpoints() {
        let points: Vec<Point2<f64>> = (0..=10).map(|i| Point2::new(i as f64, 2.0 * i as f64)).collect();
        let result = simplify_line_dp(&points, 0.01);
        assert_eq!(result, vec![Point2::new(0.0, 0.0), Point2::new(10.0, 20.0)]);
    }

    #[test]
    fn test_keeps_corner() {
        let points: Vec<Point2<f64>> = vec![
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0),
            Point2::new(5.0, 5.0),
        ];
        assert_eq!(simplify_line_dp(&points, 0.1).len(), 3);
    }

    #[test]
    fn test_road_with_jitter() {
        // A road that wobbles by less than a metre before a real bend
        let points: Vec<Point2<f64>> = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.4),
            Point2::new(20.0, -0.3),
            Point2::new(30.0, 0.2),
            Point2::new(40.0, 0.0),
            Point2::new(50.0, 30.0),
            Point2::new(60.0, 30.4),
            Point2::new(70.0, 30.0),
        ];

        let result = simplify_line_dp(&points, 1.0);

        assert!(result.len() < points.len());
        assert_relative_eq!(result.first().unwrap().x, 0.0);
        assert_relative_eq!(result.last().unwrap().x, 70.0);
        assert!(result.iter().any(|p| p.x == 40.0 && p.y == 0.0));
        assert!(result.iter().any(|p| p.x == 50.0 && p.y == 30.0));
    }

    #[test]
    fn test_indices_are_ordered() {
        let points: Vec<Point2<f64>> = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(3.0, 5.0),
            Point2::new(4.0, 0.0),
            Point2::new(5.0, 0.0),
        ];
        assert_eq!(rdp_indices(&points, 0.5), vec![0, 2, 3, 4, 5]);
    }

    #[test]
    fn test_idempotent() {
        let points: Vec<Point2<f64>> = (0..200)
            .map(|i| {
                let t = i as f64 * 0.1;
                Point2::new(t * 10.0, (t.sin() * 8.0) + ((i * 7) % 5) as f64 * 0.3)
            })
            .collect();

        for tolerance in [0.5, 2.0, 5.0] {
            let once = simplify_line_dp(&points, tolerance);
            let twice = simplify_line_dp(&once, tolerance);
            assert_eq!(once, twice, "tolerance {}", tolerance);
        }
    }

    #[test]
    fn test_f32() {
        let points: Vec<Point2<f32>> = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ];
        assert_eq!(simplify_line_dp(&points, 0.1).len(), 2);
    }
}
