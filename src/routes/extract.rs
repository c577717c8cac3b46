//! Route extraction from skeleton graphs.
//!
//! Routes are peeled off a working copy of the graph one at a time: pick
//! the most promising pair of endpoint candidates, find a path between them,
//! remove that path's edges, repeat. Routes never share an edge.

use super::clock::{Clock, Deadline, MonotonicClock};
use super::search::{shortest_path, Weighting};
use crate::error::{CenterlineError, Result};
use crate::multiline::line_length;
use crate::primitives::Point2;
use crate::skeleton::{NodeId, SkeletonGraph};
use log::debug;
use std::time::Duration;

/// Seconds of budget per graph node.
pub const DEFAULT_TIME_COEFFICIENT: f64 = 0.02;

/// A path through the skeleton as a sequence of points.
pub type Route = Vec<Point2<f64>>;

/// Length of a route.
#[inline]
pub fn route_length(route: &[Point2<f64>]) -> f64 {
    line_length(route)
}

/// Extracts edge-disjoint routes from a graph using the wall clock.
///
/// See [`graph_routes_with_clock`].
pub fn graph_routes(
    graph: &SkeletonGraph,
    find_longest: bool,
    time_coefficient: f64,
) -> Result<Vec<Route>> {
    graph_routes_with_clock(graph, find_longest, time_coefficient, &MonotonicClock::new())
}

/// Extracts edge-disjoint routes from a graph.
///
/// The budget is `ceil(time_coefficient * node_count)` seconds, checked
/// before each round and before each path search. `graph` itself is never
/// modified.
///
/// Each round considers leaves as endpoints, adding degree-3 junctions when
/// there is a single leaf or `find_longest` is false. Candidate pairs are
/// tried farthest first when `find_longest` is set, closest first otherwise.
/// A graph with no candidate pair, such as a pure cycle, is opened at its
/// lowest degree-2 node. Extraction stops when no edges remain or no pair is
/// connected.
///
/// # Errors
///
/// [`CenterlineError::TimeoutExceeded`] carrying the partly consumed working
/// graph, or [`CenterlineError::InvalidInput`] for a negative or non-finite
/// `time_coefficient`.
///
/// # Example
///
/// ```
/// use centerline::routes::{graph_routes_with_clock, ManualClock};
/// use centerline::skeleton::SkeletonGraph;
/// use centerline::Point2;
///
/// // A "T": long bar with a short stem
/// let mut graph = SkeletonGraph::new();
/// let west = graph.add_node(Point2::new(0.0, 0.0));
/// let mid = graph.add_node(Point2::new(50.0, 0.0));
/// let east = graph.add_node(Point2::new(100.0, 0.0));
/// let stem = graph.add_node(Point2::new(50.0, -30.0));
/// graph.add_edge(west, mid);
/// graph.add_edge(mid, east);
/// graph.add_edge(mid, stem);
///
/// let routes = graph_routes_with_clock(&graph, true, 0.02, &ManualClock::new()).unwrap();
///
/// // The bar comes first, then the stem
/// let bar: Vec<Point2<f64>> = [west, mid, east]
///     .iter()
///     .map(|&n| graph.point(n).unwrap())
///     .collect();
/// assert_eq!(routes.len(), 2);
/// assert_eq!(routes[0], bar);
/// assert_eq!(routes[1].len(), 2);
/// ```
pub fn graph_routes_with_clock<C: Clock + ?Sized>(
    graph: &SkeletonGraph,
    find_longest: bool,
    time_coefficient: f64,
    clock: &C,
) -> Result<Vec<Route>> {
    let budget = time_budget(time_coefficient, graph.node_count())?;
    let deadline = Deadline::start(clock, budget);
    let weighting = if find_longest {
        Weighting::Length
    } else {
        Weighting::Hops
    };

    let mut working = graph.clone();
    let mut routes = Vec::new();

    let timeout = |working: SkeletonGraph| CenterlineError::TimeoutExceeded {
        budget,
        graph: Box::new(working),
    };

    while working.edge_count() > 0 {
        if deadline.exceeded() {
            return Err(timeout(working));
        }

        let mut path = None;
        for (v, w) in candidate_pairs(&working, find_longest) {
            if deadline.exceeded() {
                return Err(timeout(working));
            }
            if let Some(found) = shortest_path(&working, v, w, weighting) {
                path = Some(found);
                break;
            }
        }

        let Some(path) = path else {
            break;
        };
        for pair in path.windows(2) {
            working.remove_edge(pair[0], pair[1]);
        }
        routes.push(path.iter().filter_map(|&id| working.point(id)).collect());
    }

    debug!(
        "extracted {} routes from {} nodes in {:.3}s",
        routes.len(),
        graph.node_count(),
        deadline.elapsed().as_secs_f64()
    );
    Ok(routes)
}

/// Extracts routes longest-first and keeps those longer than `min_length`.
pub fn skeleton_routes(skeleton: &SkeletonGraph, min_length: f64) -> Result<Vec<Route>> {
    let routes = graph_routes(skeleton, true, DEFAULT_TIME_COEFFICIENT)?;
    Ok(routes
        .into_iter()
        .filter(|route| route_length(route) > min_length)
        .collect())
}

fn time_budget(time_coefficient: f64, node_count: usize) -> Result<Duration> {
    if !(time_coefficient >= 0.0) {
        return Err(CenterlineError::invalid(format!(
            "time coefficient must not be negative, got {}",
            time_coefficient
        )));
    }
    Duration::try_from_secs_f64((time_coefficient * node_count as f64).ceil()).map_err(|e| {
        CenterlineError::invalid(format!(
            "time coefficient {} gives no usable budget: {}",
            time_coefficient, e
        ))
    })
}

/// Endpoint pairs to try this round, in order.
///
/// Leaves come before junctions, each in ascending id order, so that ties in
/// distance go to the pair listed first.
fn candidate_pairs(graph: &SkeletonGraph, find_longest: bool) -> Vec<(NodeId, NodeId)> {
    let mut candidates = graph.nodes_with_degree(1);
    if candidates.len() == 1 || !find_longest {
        candidates.extend(graph.nodes_with_degree(3));
    }

    let mut pairs: Vec<(f64, NodeId, NodeId)> = Vec::new();
    for (i, &v) in candidates.iter().enumerate() {
        for &w in &candidates[i + 1..] {
            if let (Some(pv), Some(pw)) = (graph.point(v), graph.point(w)) {
                pairs.push((pv.distance(pw), v, w));
            }
        }
    }

    if pairs.is_empty() {
        return synthetic_pair(graph).into_iter().collect();
    }

    if find_longest {
        pairs.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    } else {
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    }
    pairs.into_iter().map(|(_, v, w)| (v, w)).collect()
}

/// Opens a graph without usable endpoints at its lowest degree-2 node, or at
/// its first edge when every node has degree 4 or more.
fn synthetic_pair(graph: &SkeletonGraph) -> Option<(NodeId, NodeId)> {
    if let Some(&node) = graph.nodes_with_degree(2).first() {
        let neighbor = graph.neighbors(node).next()?;
        return Some((node, neighbor));
    }
    graph.edges().next().map(|edge| (edge.a, edge.b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::ManualClock;
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    fn graph_from(points: &[(f64, f64)], edges: &[(usize, usize)]) -> (SkeletonGraph, Vec<NodeId>) {
        let mut graph = SkeletonGraph::new();
        let ids: Vec<NodeId> = points
            .iter()
            .map(|&(x, y)| graph.add_node(Point2::new(x, y)))
            .collect();
        for &(a, b) in edges {
            graph.add_edge(ids[a], ids[b]);
        }
        (graph, ids)
    }

    /// An "X": four arms of different lengths meeting at the origin.
    fn cross() -> SkeletonGraph {
        graph_from(
            &[
                (0.0, 0.0),
                (-40.0, 0.0),
                (-20.0, 0.0),
                (60.0, 0.0),
                (30.0, 0.0),
                (0.0, 25.0),
                (0.0, -10.0),
            ],
            &[(1, 2), (2, 0), (0, 4), (4, 3), (0, 5), (0, 6)],
        )
        .0
    }

    fn edge_set(route: &[Point2<f64>]) -> Vec<((i64, i64), (i64, i64))> {
        route
            .windows(2)
            .map(|w| {
                let a = (w[0].x.round() as i64, w[0].y.round() as i64);
                let b = (w[1].x.round() as i64, w[1].y.round() as i64);
                if a < b {
                    (a, b)
                } else {
                    (b, a)
                }
            })
            .collect()
    }

    #[test]
    fn test_empty_graph() {
        let clock = ManualClock::stepping(Duration::from_secs(1000));
        let routes = graph_routes_with_clock(&SkeletonGraph::new(), true, 0.0, &clock).unwrap();
        assert!(routes.is_empty());
    }

    #[test]
    fn test_cross_longest_first() {
        let graph = cross();
        let routes = graph_routes_with_clock(&graph, true, 0.02, &ManualClock::new()).unwrap();

        // Farthest leaves are the two horizontal arms
        assert_eq!(routes[0].first(), Some(&Point2::new(-40.0, 0.0)));
        assert_eq!(routes[0].last(), Some(&Point2::new(60.0, 0.0)));
        assert_relative_eq!(route_length(&routes[0]), 100.0, epsilon = 1e-9);

        // Then the vertical arms through the junction
        assert_eq!(routes.len(), 2);
        assert_relative_eq!(route_length(&routes[1]), 35.0, epsilon = 1e-9);
    }

    #[test]
    fn test_routes_are_edge_disjoint_and_cover_graph() {
        let graph = cross();
        let routes = graph_routes_with_clock(&graph, true, 0.02, &ManualClock::new()).unwrap();

        let mut seen = HashSet::new();
        for route in &routes {
            for edge in edge_set(route) {
                assert!(seen.insert(edge), "edge {:?} used twice", edge);
            }
        }
        assert_eq!(seen.len(), graph.edge_count());
    }

    #[test]
    fn test_caller_graph_untouched() {
        let graph = cross();
        let before = graph.clone();
        graph_routes_with_clock(&graph, true, 0.02, &ManualClock::new()).unwrap();
        assert_eq!(graph, before);
    }

    #[test]
    fn test_pure_cycle_terminates() {
        let (graph, _) = graph_from(
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            &[(0, 1), (1, 2), (2, 3), (3, 0)],
        );
        let routes = graph_routes_with_clock(&graph, true, 0.02, &ManualClock::new()).unwrap();

        assert!(!routes.is_empty());
        // First the synthetic pair's direct edge, then the rest of the loop
        assert_eq!(routes[0], vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)]);
        let total: f64 = routes.iter().map(|r| route_length(r)).sum();
        assert_relative_eq!(total, 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_high_degree_only_graph_terminates() {
        // Complete graph on five nodes: every node has degree 4
        let points = [(0.0, 0.0), (10.0, 0.0), (13.0, 9.0), (5.0, 15.0), (-3.0, 9.0)];
        let edges: Vec<(usize, usize)> = (0..5)
            .flat_map(|a| (a + 1..5).map(move |b| (a, b)))
            .collect();
        let (graph, _) = graph_from(&points, &edges);

        let routes = graph_routes_with_clock(&graph, true, 0.02, &ManualClock::new()).unwrap();

        // Opened at the first edge, then whatever the remaining leaves allow
        assert_eq!(routes[0], vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)]);
        let used: usize = routes.iter().map(|r| r.len() - 1).sum();
        assert!(used <= 10);
    }

    #[test]
    fn test_shortest_mode_closest_pair_first() {
        let graph = cross();
        let routes = graph_routes_with_clock(&graph, false, 0.02, &ManualClock::new()).unwrap();

        // Closest pair of leaves first, through the junction
        assert_eq!(
            routes[0],
            vec![
                Point2::new(0.0, 25.0),
                Point2::new(0.0, 0.0),
                Point2::new(0.0, -10.0)
            ]
        );
    }

    #[test]
    fn test_distance_ties_prefer_leaves() {
        // A "T" whose three arms are equally long; the junction has the
        // lowest id but is listed after the leaves
        let (graph, _) = graph_from(
            &[(0.0, 0.0), (10.0, 0.0), (-10.0, 0.0), (0.0, 10.0)],
            &[(0, 1), (0, 2), (0, 3)],
        );
        let routes = graph_routes_with_clock(&graph, false, 0.02, &ManualClock::new()).unwrap();

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0], vec![Point2::new(10.0, 0.0), Point2::new(0.0, 0.0)]);
        assert_eq!(
            routes[1],
            vec![
                Point2::new(-10.0, 0.0),
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 10.0)
            ]
        );
    }

    #[test]
    fn test_zero_budget_times_out() {
        let graph = cross();
        let clock = ManualClock::stepping(Duration::from_millis(1));

        match graph_routes_with_clock(&graph, true, 0.0, &clock) {
            Err(CenterlineError::TimeoutExceeded { budget, graph: partial }) => {
                assert_eq!(budget, Duration::ZERO);
                // Nothing was extracted before the first check
                assert_eq!(partial.edge_count(), graph.edge_count());
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[test]
    fn test_budget_rounds_up() {
        // 0.02 * 7 nodes rounds up to a full second
        assert_eq!(time_budget(0.02, 7).unwrap(), Duration::from_secs(1));
        assert_eq!(time_budget(0.02, 0).unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_invalid_time_coefficient() {
        let graph = cross();
        for coefficient in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                graph_routes(&graph, true, coefficient),
                Err(CenterlineError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn test_skeleton_routes_filters_short() {
        let graph = cross();
        let routes = skeleton_routes(&graph, 50.0).unwrap();
        assert_eq!(routes.len(), 1);
        assert_relative_eq!(route_length(&routes[0]), 100.0, epsilon = 1e-9);
    }
}
