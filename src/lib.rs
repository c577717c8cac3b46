//! centerline - Collapse line networks into simplified centerlines
//!
//! Roads drawn as several parallel carriageways or ragged parallel ways are
//! buffered into polygons, each polygon is reduced to its Voronoi skeleton,
//! and the longest routes through the skeleton become the centerline.
//!
//! # Example
//!
//! ```
//! use centerline::{multiline_centerline, CenterlineOptions, MultiLine, Point2};
//!
//! let road = MultiLine::new(vec![
//!     vec![Point2::new(0.0, 0.0), Point2::new(300.0, 0.0)],
//!     vec![Point2::new(300.0, 8.0), Point2::new(0.0, 8.0)],
//! ]);
//!
//! let center = multiline_centerline(&road, &CenterlineOptions::default()).unwrap();
//! assert!(center.is_some());
//! ```

pub mod bridge;
pub mod centerline;
pub mod error;
pub mod multiline;
pub mod network;
pub mod polygon;
pub mod primitives;
pub mod routes;
pub mod simplify;
pub mod skeleton;
pub mod triangulation;

pub use centerline::{multiline_centerline, CenterlineOptions, Centerliner};
pub use error::{CenterlineError, Result, VoronoiError};
pub use multiline::{LinePart, MultiLine};
pub use primitives::{Point2, Segment2, Vec2};
