//! Visvalingam-Whyatt polyline simplification.
//!
//! Iteratively removes the point that contributes the least "effective area"
//! (the area of the triangle formed with its neighbors). Extracted centerline
//! routes run through this to drop cosmetically insignificant kinks.

use crate::primitives::Point2;
use num_traits::Float;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Sentinel for "no neighbor" in the linked list.
const NONE: usize = usize::MAX;

/// Simplifies a polyline using the Visvalingam-Whyatt algorithm.
///
/// Removes points while the smallest effective area is below `min_area`.
/// Endpoints are always kept.
///
/// # Example
///
/// ```
/// use centerline::{Point2, simplify::simplify_line_vw};
///
/// let points = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.1),
///     Point2::new(2.0, 0.0),
///     Point2::new(3.0, 2.0),
///     Point2::new(4.0, 0.0),
/// ];
///
/// let simplified = simplify_line_vw(&points, 0.5);
/// assert_eq!(simplified.len(), 4);
/// ```
pub fn simplify_line_vw<F: Float>(points: &[Point2<F>], min_area: F) -> Vec<Point2<F>> {
    visvalingam_indices(points, min_area)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

/// Simplifies a polyline and returns indices of retained points, in order.
pub fn visvalingam_indices<F: Float>(points: &[Point2<F>], min_area: F) -> Vec<usize> {
    let n = points.len();

    if n < 3 {
        return (0..n).collect();
    }

    let mut prev: Vec<usize> = (0..n).map(|i| if i == 0 { NONE } else { i - 1 }).collect();
    let mut next: Vec<usize> = (0..n).map(|i| if i == n - 1 { NONE } else { i + 1 }).collect();
    let mut active = vec![true; n];

    // Generation counters invalidate stale heap entries
    let mut generation = vec![0usize; n];

    let mut heap = BinaryHeap::with_capacity(n);
    for i in 1..n - 1 {
        heap.push(AreaEntry {
            index: i,
            area: triangle_area(points[i - 1], points[i], points[i + 1]),
            generation: 0,
        });
    }

    while let Some(entry) = heap.pop() {
        if !active[entry.index] || generation[entry.index] != entry.generation {
            continue;
        }
        if entry.area >= min_area {
            break;
        }

        let i = entry.index;
        active[i] = false;

        let p = prev[i];
        let nx = next[i];
        next[p] = nx;
        prev[nx] = p;

        // Neighbors never drop below the area of the point just removed
        for j in [p, nx] {
            if prev[j] == NONE || next[j] == NONE {
                continue;
            }
            let area = triangle_area(points[prev[j]], points[j], points[next[j]]).max(entry.area);
            generation[j] += 1;
            heap.push(AreaEntry {
                index: j,
                area,
                generation: generation[j],
            });
        }
    }

    active
        .iter()
        .enumerate()
        .filter_map(|(i, &a)| if a { Some(i) } else { None })
        .collect()
}

/// Entry for the priority queue.
struct AreaEntry<F> {
    index: usize,
    area: F,
    generation: usize,
}

impl<F: Float> PartialEq for AreaEntry<F> {
    fn eq(&self, other: &Self) -> bool {
        self.area == other.area
    }
}

impl<F: Float> Eq for AreaEntry<F> {}

impl<F: Float> PartialOrd for AreaEntry<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<F: Float> Ord for AreaEntry<F> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior
        other
            .area
            .partial_cmp(&self.area)
            .unwrap_or(Ordering::Equal)
    }
}

/// Unsigned area of the triangle `abc`.
fn triangle_area<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>) -> F {
    let two = F::one() + F::one();
    ((b - a).cross(c - a)).abs() / two
}
