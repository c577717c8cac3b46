//! Skeleton construction from a polygon's Voronoi diagram.
//!
//! The polygon's rings are sampled densely and the Voronoi diagram of the
//! samples is computed. Voronoi vertices inside the polygon, joined by
//! Voronoi edges that stay inside it, approximate the medial axis.

use super::engine::VoronoiEngine;
use super::graph::{NodeId, SkeletonGraph};
use super::prune::{prune_skeleton, DEFAULT_DEPTH_CUTOFF};
use crate::error::{CenterlineError, Result};
use crate::polygon::Polygon;
use crate::primitives::Point2;
use crate::simplify::densify_ring;
use crate::triangulation::INFINITE_VERTEX;
use log::debug;

/// Samples every ring of a polygon, exterior first, at most `density` apart.
///
/// Original vertices are kept and each ring's closing duplicate is dropped.
pub fn sample_polygon(polygon: &Polygon<f64>, density: f64) -> Vec<Point2<f64>> {
    polygon
        .rings()
        .flat_map(|ring| densify_ring(ring, density))
        .collect()
}

/// Builds the pruned skeleton of a polygon.
///
/// Uses [`DEFAULT_DEPTH_CUTOFF`] for pruning.
///
/// # Arguments
///
/// * `polygon` - The polygon to skeletonize
/// * `density` - Maximum spacing between perimeter samples
/// * `engine` - Voronoi engine to submit the samples to
///
/// # Errors
///
/// [`CenterlineError::InvalidInput`] for a non-positive density, and
/// [`CenterlineError::VoronoiEngineFailure`] if the engine fails.
///
/// # Example
///
/// ```
/// use centerline::polygon::Polygon;
/// use centerline::skeleton::{polygon_skeleton, DelaunayEngine};
/// use centerline::Point2;
///
/// let corridor = Polygon::from_exterior(vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(200.0, 0.0),
///     Point2::new(200.0, 20.0),
///     Point2::new(0.0, 20.0),
/// ]);
///
/// let skeleton = polygon_skeleton(&corridor, 5.0, &DelaunayEngine).unwrap();
/// assert!(skeleton.edge_count() > 0);
/// for edge in skeleton.edges() {
///     assert!(corridor.contains(edge.segment.start));
/// }
/// ```
pub fn polygon_skeleton<E: VoronoiEngine + ?Sized>(
    polygon: &Polygon<f64>,
    density: f64,
    engine: &E,
) -> Result<SkeletonGraph> {
    polygon_skeleton_with_cutoff(polygon, density, engine, DEFAULT_DEPTH_CUTOFF)
}

/// Builds the skeleton of a polygon, pruning with `depth_cutoff`.
///
/// A polygon that samples to four points or fewer yields an empty graph
/// without calling the engine.
pub fn polygon_skeleton_with_cutoff<E: VoronoiEngine + ?Sized>(
    polygon: &Polygon<f64>,
    density: f64,
    engine: &E,
    depth_cutoff: f64,
) -> Result<SkeletonGraph> {
    if !(density > 0.0 && density.is_finite()) {
        return Err(CenterlineError::invalid(format!(
            "sampling density must be positive and finite, got {}",
            density
        )));
    }

    let samples = sample_polygon(polygon, density);
    debug!("sampled {} perimeter points", samples.len());
    if samples.len() <= 4 {
        return Ok(SkeletonGraph::new());
    }

    let voronoi = engine
        .voronoi(&samples)
        .map_err(|e| CenterlineError::VoronoiEngineFailure {
            polygon: Box::new(polygon.clone()),
            density,
            reason: e.to_string(),
        })?;

    let mut skeleton = SkeletonGraph::new();
    for (index, &vertex) in voronoi.vertices.iter().enumerate() {
        if index != INFINITE_VERTEX && vertex.is_finite() && polygon.contains(vertex) {
            skeleton.insert_node(NodeId(index), vertex);
        }
    }

    for (v, w) in voronoi.cell_pairs() {
        let (a, b) = (NodeId(v), NodeId(w));
        if a == b || skeleton.contains_edge(a, b) {
            continue;
        }
        if let (Some(pa), Some(pb)) = (skeleton.point(a), skeleton.point(b)) {
            if polygon.contains_segment(pa, pb) {
                skeleton.add_edge(a, b);
            }
        }
    }

    debug!(
        "kept {} of {} voronoi vertices and {} internal edges",
        skeleton.node_count(),
        voronoi.finite_vertex_count(),
        skeleton.edge_count()
    );

    prune_skeleton(&mut skeleton, depth_cutoff);
    Ok(skeleton)
}
