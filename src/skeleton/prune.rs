//! Leaf pruning of skeleton graphs.
//!
//! Short dangling branches are eaten from their tips inward. The length of
//! every removed edge, plus whatever the removed leaf had already absorbed,
//! moves into the neighbor's depth. A leaf whose depth has reached the
//! cutoff stands at the end of a long branch and is kept.

use super::graph::SkeletonGraph;
use log::debug;

/// Depth at which a leaf is considered the end of a real branch.
pub const DEFAULT_DEPTH_CUTOFF: f64 = 20.0;

/// Prunes leaves whose accumulated depth is below `depth_cutoff`.
///
/// Scans repeat until one removes nothing. Each scan visits the leaves it
/// started with in ascending id order and skips any that stopped being a
/// leaf earlier in the same scan. Returns the number of nodes removed.
///
/// Edge length is conserved: afterwards the remaining edge length plus the
/// total depth equals the edge length plus total depth before.
///
/// # Example
///
/// ```
/// use centerline::{Point2, skeleton::{prune_skeleton, SkeletonGraph}};
///
/// // A spine of 5-unit edges with a short spur off its middle
/// let mut graph = SkeletonGraph::new();
/// let spine: Vec<_> = (0..=20)
///     .map(|i| graph.add_node(Point2::new(i as f64 * 5.0, 0.0)))
///     .collect();
/// for pair in spine.windows(2) {
///     graph.add_edge(pair[0], pair[1]);
/// }
/// let spur = graph.add_node(Point2::new(50.0, 5.0));
/// graph.add_edge(spine[10], spur);
/// let before = graph.total_length();
///
/// prune_skeleton(&mut graph, 20.0);
///
/// // The spur is gone and each spine end lost four edges
/// assert!(!graph.contains_node(spur));
/// assert_eq!(graph.edge_count(), 12);
/// assert!((graph.total_length() + graph.total_depth() - before).abs() < 1e-9);
/// ```
pub fn prune_skeleton(graph: &mut SkeletonGraph, depth_cutoff: f64) -> usize {
    let mut removed = 0;

    loop {
        let mut removing = false;

        for leaf in graph.nodes_with_degree(1) {
            if graph.degree(leaf) != 1 {
                continue;
            }
            let depth = graph.depth(leaf).unwrap_or(0.0);
            if depth >= depth_cutoff {
                continue;
            }
            let Some(other) = graph.neighbors(leaf).next() else {
                continue;
            };

            let length = graph.edge_length(leaf, other).unwrap_or(0.0);
            graph.add_depth(other, depth + length);
            graph.remove_node(leaf);
            removed += 1;
            removing = true;
        }

        if !removing {
            break;
        }
    }

    debug!(
        "pruned {} leaves, {} nodes and {} edges remain",
        removed,
        graph.node_count(),
        graph.edge_count()
    );
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Point2;
    use crate::skeleton::NodeId;
    use approx::assert_relative_eq;

    fn path(points: &[(f64, f64)]) -> (SkeletonGraph, Vec<NodeId>) {
        let mut graph = SkeletonGraph::new();
        let ids: Vec<NodeId> = points
            .iter()
            .map(|&(x, y)| graph.add_node(Point2::new(x, y)))
            .collect();
        for pair in ids.windows(2) {
            graph.add_edge(pair[0], pair[1]);
        }
        (graph, ids)
    }

    #[test]
    fn test_short_path_collapses_to_one_node() {
        let (mut graph, ids) = path(&[(0.0, 0.0), (3.0, 0.0), (6.0, 0.0)]);
        assert_eq!(prune_skeleton(&mut graph, 20.0), 2);

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        // Both tips go in the first scan and the middle node absorbs them
        assert_relative_eq!(graph.depth(ids[1]).unwrap(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_long_branch_stops_at_cutoff() {
        // Spine of ten 5-unit steps
        let points: Vec<(f64, f64)> = (0..=10).map(|i| (i as f64 * 5.0, 0.0)).collect();
        let (mut graph, ids) = path(&points);

        prune_skeleton(&mut graph, 12.0);

        // Both tips advance until the absorbed depth reaches 12
        assert!(graph.edge_count() > 0);
        for id in graph.nodes_with_degree(1) {
            assert!(graph.depth(id).unwrap() >= 12.0);
        }
        assert!(!graph.contains_node(ids[0]));
        assert!(!graph.contains_node(ids[10]));
    }

    #[test]
    fn test_length_is_conserved() {
        let mut graph = SkeletonGraph::new();
        let hub = graph.add_node(Point2::new(0.0, 0.0));
        let arms = [(30.0, 0.0), (-25.0, 0.0), (0.0, 7.0), (0.0, -2.0)];
        for &(x, y) in &arms {
            let mid = graph.add_node(Point2::new(x / 2.0, y / 2.0));
            let tip = graph.add_node(Point2::new(x, y));
            graph.add_edge(hub, mid);
            graph.add_edge(mid, tip);
        }
        let before = graph.total_length();

        let removed = prune_skeleton(&mut graph, 10.0);

        // Tips first, then the two short arms up to the hub
        assert_eq!(removed, 6);
        assert_relative_eq!(
            graph.total_length() + graph.total_depth(),
            before,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_cycle_untouched() {
        let (mut graph, ids) = path(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        graph.add_edge(ids[3], ids[0]);

        assert_eq!(prune_skeleton(&mut graph, 20.0), 0);
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_deep_leaf_is_kept() {
        let (mut graph, ids) = path(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        graph.add_depth(ids[0], 25.0);

        prune_skeleton(&mut graph, 20.0);

        // ids[2] goes first, then ids[1]; ids[0] is never removed
        assert!(graph.contains_node(ids[0]));
        assert_relative_eq!(
            graph.total_length() + graph.total_depth(),
            2.0 + 25.0,
            epsilon = 1e-12
        );
    }
}
