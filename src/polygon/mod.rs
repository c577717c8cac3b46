//! Polygons with holes, containment tests and line buffering.
//!
//! This module provides:
//! - Area and bounding box calculation
//! - Point and segment containment testing
//! - Round-capped buffers of line parts, unioned into regions
//!
//! # Example
//!
//! ```
//! use centerline::polygon::buffer_line;
//! use centerline::Point2;
//!
//! let line = vec![Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)];
//! let regions = buffer_line(&line, 10.0).unwrap();
//!
//! assert_eq!(regions.len(), 1);
//! assert!(regions[0].contains(Point2::new(50.0, 5.0)));
//! assert!(regions[0].contains_segment(Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)));
//! ```

mod buffer;
mod core;

pub use buffer::{buffer_line, capsule, multiline_polygon, QUADRANT_SEGMENTS};
pub use core::{ring_contains, ring_signed_area, Polygon};
