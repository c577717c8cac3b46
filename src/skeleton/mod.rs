//! Voronoi skeletons of buffer polygons.
//!
//! A skeleton is built by sampling a polygon's rings, computing the Voronoi
//! diagram of the samples with a [`VoronoiEngine`], keeping the part that
//! lies inside the polygon, and pruning short dangling branches.
//!
//! # Example
//!
//! ```
//! use centerline::polygon::buffer_line;
//! use centerline::skeleton::{polygon_skeleton, DelaunayEngine};
//! use centerline::Point2;
//!
//! let line = vec![Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)];
//! let region = &buffer_line(&line, 10.0).unwrap()[0];
//!
//! let skeleton = polygon_skeleton(region, 5.0, &DelaunayEngine).unwrap();
//! assert!(skeleton.total_length() > 40.0);
//! ```

mod build;
mod engine;
mod graph;
pub mod protocol;
mod prune;

pub use build::{polygon_skeleton, polygon_skeleton_with_cutoff, sample_polygon};
pub use engine::{DelaunayEngine, QhullEngine, VoronoiEngine, DEFAULT_ENGINE_TIMEOUT};
pub use graph::{NodeId, SkeletonEdge, SkeletonGraph};
pub use prune::{prune_skeleton, DEFAULT_DEPTH_CUTOFF};
