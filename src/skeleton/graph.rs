//! Undirected skeleton graph keyed by stable node ids.

use crate::primitives::{Point2, Segment2};
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifier of a skeleton node.
///
/// Ids are never reused within one graph, so they stay valid for the
/// remaining nodes while others are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A node in the skeleton.
#[derive(Debug, Clone, PartialEq)]
struct Node {
    point: Point2<f64>,
    /// Branch length absorbed from pruned leaves
    depth: f64,
    /// Neighbor id to edge length
    adjacent: BTreeMap<NodeId, f64>,
}

/// An edge of the skeleton, reported with its lower id first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkeletonEdge {
    /// Lower endpoint id
    pub a: NodeId,
    /// Higher endpoint id
    pub b: NodeId,
    /// Straight segment between the endpoints
    pub segment: Segment2<f64>,
    /// Length of the segment
    pub length: f64,
}

/// A skeleton graph: points joined by straight, undirected edges.
///
/// There are no self loops and at most one edge per node pair. Iteration is
/// always in ascending id order, which keeps pruning and route extraction
/// deterministic.
///
/// # Example
///
/// ```
/// use centerline::{Point2, skeleton::SkeletonGraph};
///
/// let mut graph = SkeletonGraph::new();
/// let a = graph.add_node(Point2::new(0.0, 0.0));
/// let b = graph.add_node(Point2::new(3.0, 4.0));
///
/// assert!(graph.add_edge(a, b));
/// assert!(!graph.add_edge(b, a));
/// assert_eq!(graph.edge_length(a, b), Some(5.0));
/// assert_eq!(graph.degree(a), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkeletonGraph {
    nodes: BTreeMap<NodeId, Node>,
    edge_count: usize,
    next_id: usize,
}

impl SkeletonGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node with a fresh id.
    pub fn add_node(&mut self, point: Point2<f64>) -> NodeId {
        let id = NodeId(self.next_id);
        self.insert_node(id, point);
        id
    }

    /// Adds a node under a caller-chosen id.
    ///
    /// Returns false, leaving the graph unchanged, if the id is taken.
    pub fn insert_node(&mut self, id: NodeId, point: Point2<f64>) -> bool {
        if self.nodes.contains_key(&id) {
            return false;
        }
        self.nodes.insert(
            id,
            Node {
                point,
                depth: 0.0,
                adjacent: BTreeMap::new(),
            },
        );
        self.next_id = self.next_id.max(id.0 + 1);
        true
    }

    /// Joins two existing nodes with an edge.
    ///
    /// Returns false for self loops, unknown nodes and existing edges.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b || self.contains_edge(a, b) {
            return false;
        }
        let length = match (self.point(a), self.point(b)) {
            (Some(pa), Some(pb)) => pa.distance(pb),
            _ => return false,
        };

        if let Some(node) = self.nodes.get_mut(&a) {
            node.adjacent.insert(b, length);
        }
        if let Some(node) = self.nodes.get_mut(&b) {
            node.adjacent.insert(a, length);
        }
        self.edge_count += 1;
        true
    }

    /// Removes a node and every edge touching it.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.remove(&id) else {
            return false;
        };
        for other in node.adjacent.keys() {
            if let Some(neighbor) = self.nodes.get_mut(other) {
                neighbor.adjacent.remove(&id);
            }
        }
        self.edge_count -= node.adjacent.len();
        true
    }

    /// Removes the edge between `a` and `b`. Both nodes stay.
    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        let removed = self
            .nodes
            .get_mut(&a)
            .is_some_and(|node| node.adjacent.remove(&b).is_some());
        if removed {
            if let Some(node) = self.nodes.get_mut(&b) {
                node.adjacent.remove(&a);
            }
            self.edge_count -= 1;
        }
        removed
    }

    /// Returns true if the node exists.
    #[inline]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Returns true if `a` and `b` are joined by an edge.
    pub fn contains_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.nodes
            .get(&a)
            .is_some_and(|node| node.adjacent.contains_key(&b))
    }

    /// Number of edges at a node; 0 for unknown nodes.
    pub fn degree(&self, id: NodeId) -> usize {
        self.nodes.get(&id).map_or(0, |node| node.adjacent.len())
    }

    /// Neighbors of a node in ascending id order.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .get(&id)
            .into_iter()
            .flat_map(|node| node.adjacent.keys().copied())
    }

    /// All node ids in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Node ids with exactly `degree` edges, in ascending order.
    pub fn nodes_with_degree(&self, degree: usize) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.adjacent.len() == degree)
            .map(|(&id, _)| id)
            .collect()
    }

    /// All edges, each once, ordered by lower id then higher id.
    pub fn edges(&self) -> impl Iterator<Item = SkeletonEdge> + '_ {
        self.nodes.iter().flat_map(move |(&a, node)| {
            node.adjacent
                .range(a..)
                .filter_map(move |(&b, &length)| {
                    let end = self.point(b)?;
                    Some(SkeletonEdge {
                        a,
                        b,
                        segment: Segment2::new(node.point, end),
                        length,
                    })
                })
        })
    }

    /// Position of a node.
    #[inline]
    pub fn point(&self, id: NodeId) -> Option<Point2<f64>> {
        self.nodes.get(&id).map(|node| node.point)
    }

    /// Accumulated depth of a node.
    #[inline]
    pub fn depth(&self, id: NodeId) -> Option<f64> {
        self.nodes.get(&id).map(|node| node.depth)
    }

    /// Adds `amount` to a node's depth.
    pub fn add_depth(&mut self, id: NodeId, amount: f64) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.depth += amount;
        }
    }

    /// Length of the edge between `a` and `b`.
    pub fn edge_length(&self, a: NodeId, b: NodeId) -> Option<f64> {
        self.nodes.get(&a)?.adjacent.get(&b).copied()
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns true if there are no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sum of all edge lengths.
    pub fn total_length(&self) -> f64 {
        self.edges().map(|edge| edge.length).sum()
    }

    /// Sum of all node depths.
    pub fn total_depth(&self) -> f64 {
        self.nodes.values().map(|node| node.depth).sum()
    }
}
