//! Bridge between this crate's geometry and the `geo` crate.
//!
//! Buffer unions are delegated to `geo::BooleanOps`. This module converts
//! polygons and lines across that boundary.
//!
//! # Conversion Strategy
//!
//! - **Crate → geo**: rings are stored open here; `geo` closes them on
//!   construction.
//! - **geo → Crate**: the closing coordinate of each ring is dropped again.
//!   Degenerate polygons (fewer than three distinct exterior vertices) are
//!   filtered out when converting a `MultiPolygon`.
//!
//! # Example
//!
//! ```
//! use centerline::{Point2, polygon::Polygon};
//! use centerline::bridge::{from_geo_polygon, to_geo_polygon};
//!
//! let square = Polygon::from_exterior(vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//! ]);
//!
//! let geo_square = to_geo_polygon(&square);
//! assert_eq!(geo_square.exterior().0.len(), 5);
//! assert_eq!(from_geo_polygon(&geo_square), square);
//! ```

use crate::polygon::Polygon;
use crate::primitives::Point2;
use geo::{Coord, LineString, MultiPolygon};

impl From<Point2<f64>> for Coord<f64> {
    #[inline]
    fn from(p: Point2<f64>) -> Self {
        Coord { x: p.x, y: p.y }
    }
}

impl From<Coord<f64>> for Point2<f64> {
    #[inline]
    fn from(c: Coord<f64>) -> Self {
        Point2::new(c.x, c.y)
    }
}

/// Converts a sequence of points to a `geo::LineString`.
pub fn to_geo_line_string(points: &[Point2<f64>]) -> LineString<f64> {
    LineString::new(points.iter().map(|&p| Coord::from(p)).collect())
}

/// Converts a polygon to a `geo::Polygon`.
pub fn to_geo_polygon(polygon: &Polygon<f64>) -> geo::Polygon<f64> {
    geo::Polygon::new(
        to_geo_line_string(&polygon.exterior),
        polygon
            .holes
            .iter()
            .map(|hole| to_geo_line_string(hole))
            .collect(),
    )
}

/// Converts a `geo::Polygon` back, opening its rings.
pub fn from_geo_polygon(polygon: &geo::Polygon<f64>) -> Polygon<f64> {
    Polygon::new(
        ring_points(polygon.exterior()),
        polygon.interiors().iter().map(ring_points).collect(),
    )
}

/// Converts every non-degenerate member of a `geo::MultiPolygon`.
pub fn from_geo_multi_polygon(polygons: &MultiPolygon<f64>) -> Vec<Polygon<f64>> {
    polygons
        .iter()
        .map(from_geo_polygon)
        .filter(|p| p.exterior.len() >= 3)
        .collect()
}

fn ring_points(ring: &LineString<f64>) -> Vec<Point2<f64>> {
    ring.coords().map(|&c| Point2::from(c)).collect()
}
