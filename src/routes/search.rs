//! A* path search over skeleton graphs.

use crate::skeleton::{NodeId, SkeletonGraph};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// How edges are weighted during a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weighting {
    /// Edge weight is its length.
    Length,
    /// Every edge weighs 1.
    Hops,
}

/// Frontier entry for the priority queue.
#[derive(Debug, Clone, Copy)]
struct State {
    estimate: f64,
    cost: f64,
    node: NodeId,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior, lower ids first on ties
        other
            .estimate
            .partial_cmp(&self.estimate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Finds a cheapest path from `from` to `to`.
///
/// The heuristic is the straight-line distance to `to` under either
/// weighting. With [`Weighting::Hops`] it can overestimate, so the search
/// favors paths that head toward the goal over strictly fewest hops.
///
/// Returns the node sequence including both ends, or `None` if `to` cannot
/// be reached or either node is missing.
pub fn shortest_path(
    graph: &SkeletonGraph,
    from: NodeId,
    to: NodeId,
    weighting: Weighting,
) -> Option<Vec<NodeId>> {
    let goal = graph.point(to)?;
    graph.point(from)?;

    let heuristic = |id: NodeId| graph.point(id).map_or(0.0, |p| p.distance(goal));

    let mut best: HashMap<NodeId, f64> = HashMap::new();
    let mut came_from: HashMap<NodeId, NodeId> = HashMap::new();
    let mut heap = BinaryHeap::new();

    best.insert(from, 0.0);
    heap.push(State {
        estimate: heuristic(from),
        cost: 0.0,
        node: from,
    });

    while let Some(State { cost, node, .. }) = heap.pop() {
        if node == to {
            let mut path = vec![to];
            let mut current = to;
            while let Some(&prev) = came_from.get(&current) {
                path.push(prev);
                current = prev;
            }
            path.reverse();
            return Some(path);
        }

        // Stale entry
        if best.get(&node).is_some_and(|&b| cost > b) {
            continue;
        }

        for next in graph.neighbors(node) {
            let weight = match weighting {
                Weighting::Length => graph.edge_length(node, next).unwrap_or(0.0),
                Weighting::Hops => 1.0,
            };
            let next_cost = cost + weight;
            if best.get(&next).map_or(true, |&b| next_cost < b) {
                best.insert(next, next_cost);
                came_from.insert(next, node);
                heap.push(State {
                    estimate: next_cost + heuristic(next),
                    cost: next_cost,
                    node: next,
                });
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Point2;

    /// Two routes from a to d: a straight one with three hops and a slightly
    /// longer one with two.
    ///
    /// ```text
    /// a - b - c - d    (3 hops, length 3)
    ///  \         /
    ///   \-- e --/      (2 hops, length ~3.16)
    /// ```
    fn two_routes() -> (SkeletonGraph, [NodeId; 5]) {
        let mut graph = SkeletonGraph::new();
        let a = graph.add_node(Point2::new(0.0, 0.0));
        let b = graph.add_node(Point2::new(1.0, 0.0));
        let c = graph.add_node(Point2::new(2.0, 0.0));
        let d = graph.add_node(Point2::new(3.0, 0.0));
        let e = graph.add_node(Point2::new(1.5, -0.5));
        graph.add_edge(a, b);
        graph.add_edge(b, c);
        graph.add_edge(c, d);
        graph.add_edge(a, e);
        graph.add_edge(e, d);
        (graph, [a, b, c, d, e])
    }

    #[test]
    fn test_length_weighting_prefers_short_route() {
        let (graph, [a, b, c, d, _]) = two_routes();
        assert_eq!(
            shortest_path(&graph, a, d, Weighting::Length),
            Some(vec![a, b, c, d])
        );
    }

    #[test]
    fn test_hop_weighting_prefers_few_edges() {
        let (graph, [a, _, _, d, e]) = two_routes();
        assert_eq!(
            shortest_path(&graph, a, d, Weighting::Hops),
            Some(vec![a, e, d])
        );
    }

    #[test]
    fn test_hop_weighting_follows_heuristic() {
        // The two-hop detour heads far away from d, so the search settles
        // the straight chain first
        let mut graph = SkeletonGraph::new();
        let a = graph.add_node(Point2::new(0.0, 0.0));
        let b = graph.add_node(Point2::new(1.0, 0.0));
        let c = graph.add_node(Point2::new(2.0, 0.0));
        let d = graph.add_node(Point2::new(3.0, 0.0));
        let far = graph.add_node(Point2::new(1.5, -500.0));
        graph.add_edge(a, b);
        graph.add_edge(b, c);
        graph.add_edge(c, d);
        graph.add_edge(a, far);
        graph.add_edge(far, d);

        assert_eq!(
            shortest_path(&graph, a, d, Weighting::Hops),
            Some(vec![a, b, c, d])
        );
    }

    #[test]
    fn test_same_node() {
        let (graph, [a, ..]) = two_routes();
        assert_eq!(shortest_path(&graph, a, a, Weighting::Length), Some(vec![a]));
    }

    #[test]
    fn test_unreachable_and_missing() {
        let (mut graph, [a, _, _, d, _]) = two_routes();
        let island = graph.add_node(Point2::new(50.0, 50.0));

        assert_eq!(shortest_path(&graph, a, island, Weighting::Length), None);
        assert_eq!(shortest_path(&graph, a, NodeId(999), Weighting::Hops), None);

        graph.remove_node(d);
        assert_eq!(shortest_path(&graph, a, d, Weighting::Length), None);
    }
}
