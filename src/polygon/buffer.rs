//! Round-capped line buffers and their union.
//!
//! Each segment of a line is buffered as a capsule (a rectangle with two
//! semicircular caps), and the capsules are unioned into closed regions with
//! `geo::BooleanOps`.
//!
//! # Example
//!
//! ```
//! use centerline::{MultiLine, Point2, polygon::multiline_polygon};
//!
//! let lines = MultiLine::new(vec![
//!     vec![Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)],
//!     vec![Point2::new(50.0, -50.0), Point2::new(50.0, 50.0)],
//! ]);
//!
//! // The two crossing lines merge into one region
//! let regions = multiline_polygon(&lines, 10.0).unwrap();
//! assert_eq!(regions.len(), 1);
//! ```

use super::core::Polygon;
use crate::bridge::{from_geo_multi_polygon, to_geo_polygon};
use crate::error::{CenterlineError, Result};
use crate::multiline::MultiLine;
use crate::primitives::{Point2, Vec2};
use geo::{BooleanOps, MultiPolygon};
use std::f64::consts::FRAC_PI_2;

/// Number of segments used to approximate a quarter circle on caps.
pub const QUADRANT_SEGMENTS: usize = 3;

/// Builds the capsule around the segment from `a` to `b`.
///
/// The outline is counter-clockwise: the cap around `b` sweeps from the right
/// side of the segment to the left, and the cap around `a` sweeps back. A
/// zero-length segment becomes a disc.
pub fn capsule(a: Point2<f64>, b: Point2<f64>, radius: f64) -> Polygon<f64> {
    let step = FRAC_PI_2 / QUADRANT_SEGMENTS as f64;

    if a == b {
        let count = 4 * QUADRANT_SEGMENTS;
        let disc = (0..count)
            .map(|i| a + Vec2::from_angle(step * i as f64) * radius)
            .collect();
        return Polygon::from_exterior(disc);
    }

    let theta = (b - a).angle();
    let half = 2 * QUADRANT_SEGMENTS;
    let mut ring = Vec::with_capacity(2 * (half + 1));

    for i in 0..=half {
        let angle = theta - FRAC_PI_2 + step * i as f64;
        ring.push(b + Vec2::from_angle(angle) * radius);
    }
    for i in 0..=half {
        let angle = theta + FRAC_PI_2 + step * i as f64;
        ring.push(a + Vec2::from_angle(angle) * radius);
    }

    Polygon::from_exterior(ring)
}

/// Buffers one line part by `distance`.
///
/// Returns one polygon per disjoint region, which for a single connected
/// part is a single polygon, possibly with holes where the line loops.
pub fn buffer_line(points: &[Point2<f64>], distance: f64) -> Result<Vec<Polygon<f64>>> {
    check_distance(distance)?;
    check_part(points)?;

    let mut regions = MultiPolygon::new(Vec::new());
    union_part(&mut regions, points, distance);
    Ok(from_geo_multi_polygon(&regions))
}

/// Buffers every part of a multi-line and unions the results.
///
/// Returns one polygon per disjoint region. An empty multi-line yields no
/// polygons.
///
/// # Errors
///
/// Returns [`CenterlineError::InvalidInput`] if `distance` is not a positive
/// finite number or any part has fewer than two points.
pub fn multiline_polygon(multiline: &MultiLine, distance: f64) -> Result<Vec<Polygon<f64>>> {
    check_distance(distance)?;
    for part in multiline {
        check_part(part)?;
    }

    let mut regions = MultiPolygon::new(Vec::new());
    for part in multiline {
        union_part(&mut regions, part, distance);
    }
    Ok(from_geo_multi_polygon(&regions))
}

fn union_part(regions: &mut MultiPolygon<f64>, points: &[Point2<f64>], distance: f64) {
    for pair in points.windows(2) {
        let piece = to_geo_polygon(&capsule(pair[0], pair[1], distance));
        *regions = if regions.0.is_empty() {
            MultiPolygon::new(vec![piece])
        } else {
            regions.union(&piece)
        };
    }
}

fn check_distance(distance: f64) -> Result<()> {
    if distance > 0.0 && distance.is_finite() {
        Ok(())
    } else {
        Err(CenterlineError::invalid(format!(
            "buffer distance must be positive and finite, got {}",
            distance
        )))
    }
}

fn check_part(points: &[Point2<f64>]) -> Result<()> {
    if points.len() < 2 {
        return Err(CenterlineError::invalid(format!(
            "line part has {} point(s), at least 2 are required",
            points.len()
        )));
    }
    Ok(())
}
