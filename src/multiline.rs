//! Multi-part polylines.

use crate::primitives::Point2;

/// One polyline part. No closure is implied.
pub type LinePart = Vec<Point2<f64>>;

/// An ordered collection of polyline parts.
///
/// Part order is preserved through every operation so output stays
/// deterministic for a given input.
///
/// # Example
///
/// ```
/// use centerline::{MultiLine, Point2};
///
/// let lines = MultiLine::new(vec![
///     vec![Point2::new(0.0, 0.0), Point2::new(3.0, 4.0)],
///     vec![Point2::new(10.0, 0.0), Point2::new(10.0, 2.0), Point2::new(12.0, 2.0)],
/// ]);
///
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines.point_count(), 5);
/// assert!((lines.length() - 9.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiLine {
    /// The parts, in input order.
    pub parts: Vec<LinePart>,
}

impl MultiLine {
    /// Creates a multi-line from its parts.
    #[inline]
    pub fn new(parts: Vec<LinePart>) -> Self {
        Self { parts }
    }

    /// Returns true if there are no parts.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Number of parts.
    #[inline]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Total number of points across all parts.
    pub fn point_count(&self) -> usize {
        self.parts.iter().map(Vec::len).sum()
    }

    /// Sum of the lengths of all parts.
    pub fn length(&self) -> f64 {
        self.parts.iter().map(|part| line_length(part)).sum()
    }

    /// Iterates over the parts.
    pub fn iter(&self) -> std::slice::Iter<'_, LinePart> {
        self.parts.iter()
    }

    /// Appends a part.
    pub fn push(&mut self, part: LinePart) {
        self.parts.push(part);
    }
}

impl From<Vec<LinePart>> for MultiLine {
    fn from(parts: Vec<LinePart>) -> Self {
        Self::new(parts)
    }
}

impl FromIterator<LinePart> for MultiLine {
    fn from_iter<I: IntoIterator<Item = LinePart>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MultiLine {
    type Item = &'a LinePart;
    type IntoIter = std::slice::Iter<'a, LinePart>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.iter()
    }
}

/// Length of a polyline.
pub fn line_length(points: &[Point2<f64>]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}
