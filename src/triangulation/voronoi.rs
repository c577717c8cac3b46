//! Voronoi diagram computation from Delaunay triangulation.
//!
//! The Voronoi diagram is the dual of the Delaunay triangulation:
//! - Each Delaunay triangle's circumcenter becomes a Voronoi vertex
//! - The triangles around a site, walked counter-clockwise, give the
//!   vertices of that site's cell
//! - A site on the convex hull has an open fan of triangles and an unbounded
//!   cell, marked with the vertex at infinity
//!
//! The result uses the layout of a `qvoronoi o` run: vertex 0 stands for
//! the point at infinity, and cells are listed in site order.
//!
//! # Example
//!
//! ```
//! use centerline::triangulation::{voronoi_diagram, INFINITE_VERTEX};
//! use centerline::Point2;
//!
//! let sites: Vec<Point2<f64>> = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(0.5, 1.0),
//! ];
//!
//! let voronoi = voronoi_diagram(&sites);
//!
//! // One triangle: infinity plus one circumcenter
//! assert_eq!(voronoi.vertices.len(), 2);
//! assert_eq!(voronoi.cells.len(), 3);
//!
//! // Every cell of a lone triangle is unbounded
//! assert!(voronoi.cells.iter().all(|cell| cell.contains(&INFINITE_VERTEX)));
//! ```

use super::delaunay::{circumcenter, delaunay_triangulation};
use crate::primitives::Point2;
use num_traits::Float;
use std::collections::HashMap;

/// Index of the vertex standing for the point at infinity.
pub const INFINITE_VERTEX: usize = 0;

/// A Voronoi diagram in vertex/cell form.
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiDiagram<F> {
    /// The Voronoi vertices. Index [`INFINITE_VERTEX`] is a placeholder for
    /// the point at infinity and carries no meaningful coordinates.
    pub vertices: Vec<Point2<F>>,

    /// For each site, the vertex indices bounding its cell, in cyclic order.
    /// Unbounded cells contain [`INFINITE_VERTEX`].
    pub cells: Vec<Vec<usize>>,
}

impl<F: Float> VoronoiDiagram<F> {
    /// Creates a diagram from its parts.
    pub fn new(vertices: Vec<Point2<F>>, cells: Vec<Vec<usize>>) -> Self {
        Self { vertices, cells }
    }

    /// Number of finite vertices.
    pub fn finite_vertex_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    /// Iterates over every cyclic pair `(cell[i], cell[(i + 1) % n])` of
    /// every cell.
    pub fn cell_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().flat_map(|cell| {
            let n = cell.len();
            (0..n).map(move |i| (cell[i], cell[(i + 1) % n]))
        })
    }
}

/// Computes the Voronoi diagram of a set of sites.
///
/// Each distinct Delaunay circumcenter becomes one vertex, numbered from 1 in
/// triangle order. Triangles sharing a circumcircle, as four or more
/// cocircular sites produce, share one vertex, so a cell never repeats a
/// vertex back to back. A site whose triangles form more than one open fan
/// gets each fan in turn, every one preceded by [`INFINITE_VERTEX`]. Sites
/// that are not part of the triangulation get an empty cell.
pub fn voronoi_diagram<F: Float>(sites: &[Point2<F>]) -> VoronoiDiagram<F> {
    let triangles = delaunay_triangulation(sites);

    let centers: Vec<Point2<F>> = triangles
        .iter()
        .map(|t| circumcenter(sites[t.a], sites[t.b], sites[t.c]))
        .collect();
    let (vertices, vertex_of) = merge_vertices(&centers, merge_tolerance(sites));

    // For each site s: triangles (s, u, v) keyed by u, and by v
    let mut incident: Vec<Vec<(usize, usize, usize)>> = vec![Vec::new(); sites.len()];
    let mut by_first: HashMap<(usize, usize), usize> = HashMap::new();
    let mut by_last: HashMap<(usize, usize), usize> = HashMap::new();
    for (t, tri) in triangles.iter().enumerate() {
        for (s, u, v) in tri.rotations() {
            incident[s].push((t, u, v));
            by_first.insert((s, u), t);
            by_last.insert((s, v), t);
        }
    }

    let cells = incident
        .iter()
        .enumerate()
        .map(|(s, fan)| {
            let walked = site_cell(s, fan, &by_first, &by_last);
            remap_cell(&walked, &vertex_of)
        })
        .collect();

    VoronoiDiagram::new(vertices, cells)
}

/// Distance below which two circumcenters are the same vertex.
fn merge_tolerance<F: Float>(sites: &[Point2<F>]) -> F {
    let extent = sites
        .iter()
        .filter(|p| p.is_finite())
        .fold(F::zero(), |m, p| m.max(p.x.abs()).max(p.y.abs()));
    let scale = F::from(1e-9).unwrap_or_else(F::epsilon);
    (extent * scale).max(F::epsilon())
}

/// Collapses circumcenters closer than `tolerance` into one vertex.
///
/// Returns the vertex list, starting with the placeholder at infinity, and
/// the vertex index of every triangle. Lookups go through a grid of
/// `tolerance`-sized buckets, checking the eight neighbors of each bucket.
fn merge_vertices<F: Float>(centers: &[Point2<F>], tolerance: F) -> (Vec<Point2<F>>, Vec<usize>) {
    let mut vertices = Vec::with_capacity(centers.len() + 1);
    vertices.push(Point2::new(F::infinity(), F::infinity()));

    let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    let mut vertex_of = Vec::with_capacity(centers.len());

    for &center in centers {
        let bucket = (center.x / tolerance)
            .floor()
            .to_i64()
            .zip((center.y / tolerance).floor().to_i64());

        let Some((bx, by)) = bucket else {
            vertex_of.push(vertices.len());
            vertices.push(center);
            continue;
        };

        let existing = (-1..=1)
            .flat_map(|dx| (-1..=1).map(move |dy| (bx + dx, by + dy)))
            .filter_map(|key| grid.get(&key))
            .flatten()
            .copied()
            .find(|&v| vertices[v].distance(center) <= tolerance);

        match existing {
            Some(v) => vertex_of.push(v),
            None => {
                let v = vertices.len();
                vertices.push(center);
                grid.entry((bx, by)).or_default().push(v);
                vertex_of.push(v);
            }
        }
    }

    (vertices, vertex_of)
}

/// Maps a walked cell from triangle slots (`t + 1`) to merged vertices and
/// drops repeats, including one wrapping from the last vertex to the first.
fn remap_cell(walked: &[usize], vertex_of: &[usize]) -> Vec<usize> {
    let mut cell: Vec<usize> = walked
        .iter()
        .map(|&slot| {
            if slot == INFINITE_VERTEX {
                INFINITE_VERTEX
            } else {
                vertex_of[slot - 1]
            }
        })
        .collect();
    cell.dedup();
    while cell.len() > 1 && cell.first() == cell.last() {
        cell.pop();
    }
    cell
}

/// Walks the triangle fans around site `s` counter-clockwise.
///
/// The triangle after `(s, u, v)` is the one starting with `(s, v)`; a fan
/// starts at a triangle `(s, u, _)` that no triangle `(s, _, u)` precedes.
/// Triangle `t` is reported as slot `t + 1`.
fn site_cell(
    s: usize,
    fan: &[(usize, usize, usize)],
    by_first: &HashMap<(usize, usize), usize>,
    by_last: &HashMap<(usize, usize), usize>,
) -> Vec<usize> {
    if fan.is_empty() {
        return Vec::new();
    }

    let last_of: HashMap<usize, usize> = fan.iter().map(|&(t, _, v)| (t, v)).collect();
    let walk = |start: usize, cell: &mut Vec<usize>| {
        let mut t = start;
        for _ in 0..fan.len() {
            cell.push(t + 1);
            match last_of.get(&t).and_then(|&v| by_first.get(&(s, v))) {
                Some(&n) if n != start => t = n,
                _ => break,
            }
        }
    };

    let mut cell = Vec::with_capacity(fan.len() + 1);
    let open_starts: Vec<usize> = fan
        .iter()
        .filter(|&&(_, u, _)| !by_last.contains_key(&(s, u)))
        .map(|&(t, _, _)| t)
        .collect();

    if open_starts.is_empty() {
        walk(fan[0].0, &mut cell);
    } else {
        for start in open_starts {
            cell.push(INFINITE_VERTEX);
            walk(start, &mut cell);
        }
    }

    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_with_center() -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 1.0),
        ]
    }

    #[test]
    fn test_too_few_sites() {
        let sites = vec![Point2::new(0.0_f64, 0.0), Point2::new(1.0, 0.0)];
        let voronoi = voronoi_diagram(&sites);
        assert_eq!(voronoi.vertices.len(), 1);
        assert_eq!(voronoi.finite_vertex_count(), 0);
        assert_eq!(voronoi.cells, vec![Vec::<usize>::new(), Vec::new()]);
    }

    #[test]
    fn test_center_site_has_bounded_cell() {
        let sites = square_with_center();
        let voronoi = voronoi_diagram(&sites);

        assert_eq!(voronoi.finite_vertex_count(), 4);

        let center = &voronoi.cells[4];
        assert_eq!(center.len(), 4);
        assert!(!center.contains(&INFINITE_VERTEX));

        // Circumcenters of the four fan triangles sit at the edge midpoints
        let mut xs: Vec<f64> = center.iter().map(|&v| voronoi.vertices[v].x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_relative_eq!(xs[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(xs[3], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hull_sites_are_unbounded() {
        let sites = square_with_center();
        let voronoi = voronoi_diagram(&sites);

        for cell in &voronoi.cells[..4] {
            assert_eq!(cell[0], INFINITE_VERTEX);
            // Each corner touches two fan triangles
            assert_eq!(cell.len(), 3);
        }
    }

    #[test]
    fn test_bounded_cell_is_cyclic() {
        let sites = square_with_center();
        let voronoi = voronoi_diagram(&sites);

        // Consecutive vertices of the center cell are adjacent triangles,
        // so each pair is one side of the diamond through the midpoints
        let cell = &voronoi.cells[4];
        for i in 0..cell.len() {
            let a = voronoi.vertices[cell[i]];
            let b = voronoi.vertices[cell[(i + 1) % cell.len()]];
            assert_relative_eq!(a.distance(b), 2.0_f64.sqrt(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_cocircular_sites_share_vertex() {
        let square = vec![
            Point2::new(0.0_f64, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let voronoi = voronoi_diagram(&square);

        // Both triangles of the square have the same circumcenter
        assert_eq!(voronoi.finite_vertex_count(), 1);
        assert_relative_eq!(voronoi.vertices[1].x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(voronoi.vertices[1].y, 1.0, epsilon = 1e-9);
        for cell in &voronoi.cells {
            assert_eq!(cell, &vec![INFINITE_VERTEX, 1]);
        }
    }

    #[test]
    fn test_grid_cells_have_no_repeated_vertices() {
        let grid: Vec<Point2<f64>> = (0..3)
            .flat_map(|y| (0..4).map(move |x| Point2::new(x as f64, y as f64)))
            .collect();
        let voronoi = voronoi_diagram(&grid);

        // One vertex per unit square
        assert_eq!(voronoi.finite_vertex_count(), 6);
        for (a, b) in voronoi.cell_pairs() {
            assert_ne!(a, b);
        }

        // The interior sites are surrounded by four square centers
        for site in [5, 6] {
            let cell = &voronoi.cells[site];
            assert_eq!(cell.len(), 4);
            assert!(!cell.contains(&INFINITE_VERTEX));
        }
    }

    #[test]
    fn test_merge_vertices_within_tolerance() {
        let centers = vec![
            Point2::new(1.0_f64, 1.0),
            Point2::new(1.0 + 1e-12, 1.0),
            Point2::new(5.0, 1.0),
            Point2::new(1.0, 1.0 - 1e-12),
        ];
        let (vertices, vertex_of) = merge_vertices(&centers, 1e-9);

        assert_eq!(vertices.len(), 3);
        assert_eq!(vertex_of, vec![1, 1, 2, 1]);
    }

    #[test]
    fn test_remap_cell_drops_repeats() {
        // Slots 1..=4 map onto vertices 1, 1, 2, 1
        let vertex_of = vec![1, 1, 2, 1];
        assert_eq!(remap_cell(&[1, 2, 3, 4], &vertex_of), vec![1, 2]);
        assert_eq!(remap_cell(&[0, 1, 2, 3], &vertex_of), vec![0, 1, 2]);
    }

    #[test]
    fn test_cell_pairs_close_cycles() {
        let voronoi: VoronoiDiagram<f64> = VoronoiDiagram::new(
            vec![Point2::new(0.0, 0.0); 4],
            vec![vec![1, 2, 3], vec![0, 2]],
        );
        let pairs: Vec<(usize, usize)> = voronoi.cell_pairs().collect();
        assert_eq!(pairs, vec![(1, 2), (2, 3), (3, 1), (0, 2), (2, 0)]);
    }
}
