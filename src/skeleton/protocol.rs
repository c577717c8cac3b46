//! Text protocol spoken with an external `qvoronoi` process.
//!
//! # Request
//!
//! ```text
//! 2
//! <point count>
//! <x> <y>        one line per site, two decimals
//! ```
//!
//! # Response (`qvoronoi o`)
//!
//! ```text
//! 2                               dimension, ignored
//! <vertex count> <cell count> 1
//! <x> <y>                         one line per vertex, the first at infinity
//! <n> <i_0> ... <i_(n-1)>         one line per cell
//! ```

use crate::error::VoronoiError;
use crate::primitives::Point2;
use crate::triangulation::VoronoiDiagram;
use std::fmt::Write;

/// Formats sites as a request.
///
/// # Example
///
/// ```
/// use centerline::{Point2, skeleton::protocol::format_request};
///
/// let request = format_request(&[Point2::new(1.0, 2.5), Point2::new(-3.14159, 0.0)]);
/// assert_eq!(request, "2\n2\n1.00 2.50\n-3.14 0.00\n");
/// ```
pub fn format_request(sites: &[Point2<f64>]) -> String {
    let mut request = String::with_capacity(16 + sites.len() * 24);
    request.push_str("2\n");
    // Writing to a String cannot fail
    let _ = writeln!(request, "{}", sites.len());
    for p in sites {
        let _ = writeln!(request, "{:.2} {:.2}", p.x, p.y);
    }
    request
}

/// Parses a response into a Voronoi diagram.
///
/// Lines past the declared cells are ignored. Every cell index must refer
/// to a listed vertex.
pub fn parse_response(text: &str) -> Result<VoronoiDiagram<f64>, VoronoiError> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

    lines
        .next()
        .ok_or_else(|| VoronoiError::Parse("empty output".to_string()))?;

    let counts = lines
        .next()
        .ok_or_else(|| VoronoiError::Parse("missing counts line".to_string()))?;
    let mut fields = counts.split_whitespace();
    let vertex_count = parse_count(fields.next(), "vertex count")?;
    let cell_count = parse_count(fields.next(), "cell count")?;

    let mut vertices = Vec::with_capacity(vertex_count);
    for i in 0..vertex_count {
        let line = lines
            .next()
            .ok_or_else(|| VoronoiError::Parse(format!("missing vertex {}", i)))?;
        vertices.push(parse_vertex(line, i)?);
    }

    let mut cells = Vec::with_capacity(cell_count);
    for i in 0..cell_count {
        let line = lines
            .next()
            .ok_or_else(|| VoronoiError::Parse(format!("missing cell {}", i)))?;
        cells.push(parse_cell(line, i, vertex_count)?);
    }

    Ok(VoronoiDiagram::new(vertices, cells))
}

fn parse_count(field: Option<&str>, what: &str) -> Result<usize, VoronoiError> {
    field
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| VoronoiError::Parse(format!("bad {}", what)))
}

fn parse_vertex(line: &str, index: usize) -> Result<Point2<f64>, VoronoiError> {
    let mut fields = line.split_whitespace().map(str::parse::<f64>);
    match (fields.next(), fields.next()) {
        (Some(Ok(x)), Some(Ok(y))) => Ok(Point2::new(x, y)),
        _ => Err(VoronoiError::Parse(format!(
            "bad vertex {}: {:?}",
            index, line
        ))),
    }
}

fn parse_cell(line: &str, index: usize, vertex_count: usize) -> Result<Vec<usize>, VoronoiError> {
    let bad = || VoronoiError::Parse(format!("bad cell {}: {:?}", index, line));

    let mut fields = line.split_whitespace().map(str::parse::<usize>);
    let n = fields.next().and_then(|f| f.ok()).ok_or_else(bad)?;
    let cell: Vec<usize> = fields.collect::<Result<_, _>>().map_err(|_| bad())?;

    if cell.len() != n || cell.iter().any(|&v| v >= vertex_count) {
        return Err(bad());
    }
    Ok(cell)
}
