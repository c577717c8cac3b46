//! Delaunay triangulation and its Voronoi dual.
//!
//! This is the in-process Voronoi engine used to build skeletons when no
//! external engine is configured.

mod delaunay;
mod voronoi;

pub use delaunay::{circumcenter, delaunay_triangulation, in_circumcircle, Triangle};
pub use voronoi::{voronoi_diagram, VoronoiDiagram, INFINITE_VERTEX};
