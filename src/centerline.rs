//! The centerline pipeline.
//!
//! A multi-line is simplified, buffered into polygon components, and each
//! component is collapsed to its Voronoi skeleton. Long routes through the
//! skeletons, simplified again, make up the centerline.

use crate::error::{CenterlineError, Result};
use crate::multiline::MultiLine;
use crate::polygon::{multiline_polygon, Polygon};
use crate::routes::{graph_routes_with_clock, route_length, Clock, MonotonicClock, Route};
use crate::simplify::{simplify_line_dp, simplify_line_vw};
use crate::skeleton::{polygon_skeleton_with_cutoff, DelaunayEngine, VoronoiEngine};
use log::{debug, info, warn};
use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Equatorial circumference of the spherical web mercator earth, in meters.
const EARTH_CIRCUMFERENCE: f64 = 2.0 * std::f64::consts::PI * 6_378_137.0;

/// Tuning for [`Centerliner`].
///
/// All distances are in map units.
#[derive(Debug, Clone, PartialEq)]
pub struct CenterlineOptions {
    /// Buffer radius around each line. Should cover the ground distance
    /// between typical carriageways.
    pub buffer: f64,
    /// Maximum spacing of perimeter samples, about half the buffer.
    pub density: f64,
    /// Routes this long or shorter are dropped, about twice the buffer.
    pub min_length: f64,
    /// Visvalingam-Whyatt area threshold, about a quarter of the buffer
    /// squared.
    pub min_area: f64,
    /// Seconds of route extraction budget per skeleton node.
    pub time_coefficient: f64,
    /// Branch depth below which skeleton leaves are pruned.
    pub depth_cutoff: f64,
    /// Directory for Voronoi failure reports. `None` disables them.
    pub failure_dir: Option<PathBuf>,
}

impl Default for CenterlineOptions {
    fn default() -> Self {
        Self {
            buffer: 20.0,
            density: 10.0,
            min_length: 40.0,
            min_area: 100.0,
            time_coefficient: crate::routes::DEFAULT_TIME_COEFFICIENT,
            depth_cutoff: crate::skeleton::DEFAULT_DEPTH_CUTOFF,
            failure_dir: None,
        }
    }
}

impl CenterlineOptions {
    /// Derives options for web mercator data at a zoom level.
    ///
    /// `width` is the buffer diameter in pixels at that zoom.
    ///
    /// # Example
    ///
    /// ```
    /// use centerline::CenterlineOptions;
    ///
    /// let options = CenterlineOptions::for_zoom(16, 20.0);
    /// assert!((options.buffer - 23.886).abs() < 1e-3);
    /// assert_eq!(options.density, options.buffer / 2.0);
    /// ```
    pub fn for_zoom(zoom: u32, width: f64) -> Self {
        let pixel = EARTH_CIRCUMFERENCE / 2f64.powi(zoom as i32 + 8);
        let buffer = width / 2.0 * pixel;
        Self {
            buffer,
            density: buffer / 2.0,
            min_length: 2.0 * buffer,
            min_area: buffer * buffer / 4.0,
            ..Default::default()
        }
    }

    /// Sets the buffer radius.
    pub fn buffer(mut self, buffer: f64) -> Self {
        self.buffer = buffer;
        self
    }

    /// Sets the perimeter sampling density.
    pub fn density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    /// Sets the minimum route length.
    pub fn min_length(mut self, min_length: f64) -> Self {
        self.min_length = min_length;
        self
    }

    /// Sets the simplification area threshold.
    pub fn min_area(mut self, min_area: f64) -> Self {
        self.min_area = min_area;
        self
    }

    /// Sets the route extraction time coefficient.
    pub fn time_coefficient(mut self, time_coefficient: f64) -> Self {
        self.time_coefficient = time_coefficient;
        self
    }

    /// Sets the pruning depth cutoff.
    pub fn depth_cutoff(mut self, depth_cutoff: f64) -> Self {
        self.depth_cutoff = depth_cutoff;
        self
    }

    /// Sets the directory that receives Voronoi failure reports.
    pub fn failure_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.failure_dir = Some(dir.into());
        self
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// [`CenterlineError::InvalidInput`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let positive = [("buffer", self.buffer), ("density", self.density)];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(CenterlineError::invalid(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("min_length", self.min_length),
            ("min_area", self.min_area),
            ("time_coefficient", self.time_coefficient),
            ("depth_cutoff", self.depth_cutoff),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(CenterlineError::invalid(format!(
                    "{} must be non-negative and finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Collapses line networks to centerlines.
///
/// Holds the options, the Voronoi engine and the clock that bounds route
/// extraction. A `Centerliner` can be shared across threads.
///
/// # Example
///
/// ```
/// use centerline::{Centerliner, CenterlineOptions, MultiLine, Point2};
///
/// // Two carriageways 10 units apart
/// let road = MultiLine::new(vec![
///     vec![Point2::new(0.0, 0.0), Point2::new(400.0, 0.0)],
///     vec![Point2::new(400.0, 10.0), Point2::new(0.0, 10.0)],
/// ]);
///
/// let centerliner = Centerliner::new(CenterlineOptions::default());
/// let center = centerliner.centerline(&road).unwrap().unwrap();
///
/// for p in center.iter().flatten() {
///     assert!(p.y > -20.0 && p.y < 30.0);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Centerliner<E = DelaunayEngine, C = MonotonicClock> {
    options: CenterlineOptions,
    engine: E,
    clock: C,
}

impl Centerliner {
    /// Creates a centerliner with the in-process engine and the wall clock.
    pub fn new(options: CenterlineOptions) -> Self {
        Self {
            options,
            engine: DelaunayEngine,
            clock: MonotonicClock::new(),
        }
    }
}

impl<E, C> Centerliner<E, C> {
    /// Replaces the Voronoi engine.
    pub fn with_engine<E2>(self, engine: E2) -> Centerliner<E2, C> {
        Centerliner {
            options: self.options,
            engine,
            clock: self.clock,
        }
    }

    /// Replaces the clock.
    pub fn with_clock<C2>(self, clock: C2) -> Centerliner<E, C2> {
        Centerliner {
            options: self.options,
            engine: self.engine,
            clock,
        }
    }

    /// The options in use.
    #[inline]
    pub fn options(&self) -> &CenterlineOptions {
        &self.options
    }
}

impl<E: VoronoiEngine, C: Clock> Centerliner<E, C> {
    /// Collapses a multi-line to its centerline.
    ///
    /// Returns `None` for empty input or when no route survives. Buffer
    /// components the Voronoi engine fails on are skipped.
    ///
    /// # Errors
    ///
    /// - [`CenterlineError::InvalidInput`] for bad options or a part with
    ///   fewer than two points
    /// - [`CenterlineError::TimeoutExceeded`] if any component's route
    ///   extraction runs out of time. The error carries that component's
    ///   whole pruned skeleton, not the partly consumed working copy.
    pub fn centerline(&self, multiline: &MultiLine) -> Result<Option<MultiLine>> {
        self.options.validate()?;
        if multiline.is_empty() {
            return Ok(None);
        }
        if let Some(part) = multiline.iter().find(|part| part.len() < 2) {
            return Err(CenterlineError::invalid(format!(
                "line part has {} points, need at least 2",
                part.len()
            )));
        }

        let simplified: MultiLine = multiline
            .iter()
            .map(|part| simplify_line_dp(part, self.options.buffer))
            .collect();
        info!(
            "{} linear parts with {} points reduced to {} points",
            multiline.len(),
            multiline.point_count(),
            simplified.point_count()
        );

        let components = multiline_polygon(&simplified, self.options.buffer)?;
        debug!("{} buffer components", components.len());

        let mut lines = MultiLine::default();
        let mut points = 0;
        for routes in self.all_component_routes(&components)? {
            for route in routes {
                points += route.len();
                lines.push(simplify_line_vw(&route, self.options.min_area));
            }
        }
        info!(
            "{} centerline points reduced to {} final points",
            points,
            lines.point_count()
        );

        Ok(if lines.is_empty() { None } else { Some(lines) })
    }

    #[cfg(not(feature = "parallel"))]
    fn all_component_routes(&self, components: &[Polygon<f64>]) -> Result<Vec<Vec<Route>>> {
        components
            .iter()
            .map(|polygon| self.component_routes(polygon))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn all_component_routes(&self, components: &[Polygon<f64>]) -> Result<Vec<Vec<Route>>> {
        let results: Vec<Result<Vec<Route>>> = components
            .par_iter()
            .map(|polygon| self.component_routes(polygon))
            .collect();
        results.into_iter().collect()
    }

    /// Routes longer than `min_length` through one buffer component.
    fn component_routes(&self, polygon: &Polygon<f64>) -> Result<Vec<Route>> {
        let options = &self.options;
        let skeleton = match polygon_skeleton_with_cutoff(
            polygon,
            options.density,
            &self.engine,
            options.depth_cutoff,
        ) {
            Ok(skeleton) => skeleton,
            Err(CenterlineError::VoronoiEngineFailure {
                polygon,
                density,
                reason,
            }) => {
                warn!("skipping buffer component: voronoi failure: {}", reason);
                if let Some(dir) = &options.failure_dir {
                    match write_failure_report(dir, &polygon, density, &reason) {
                        Ok(path) => warn!("wrote failure report {}", path.display()),
                        Err(e) => warn!("could not write failure report: {}", e),
                    }
                }
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let routes = graph_routes_with_clock(&skeleton, true, options.time_coefficient, &self.clock)
            .map_err(|e| match e {
                CenterlineError::TimeoutExceeded { budget, .. } => {
                    warn!("route extraction timed out on {} nodes", skeleton.node_count());
                    CenterlineError::TimeoutExceeded {
                        budget,
                        graph: Box::new(skeleton),
                    }
                }
                other => other,
            })?;
        Ok(routes
            .into_iter()
            .filter(|route| route_length(route) > options.min_length)
            .collect())
    }
}

/// Collapses a multi-line with the in-process engine and the wall clock.
///
/// See [`Centerliner::centerline`].
pub fn multiline_centerline(
    multiline: &MultiLine,
    options: &CenterlineOptions,
) -> Result<Option<MultiLine>> {
    Centerliner::new(options.clone()).centerline(multiline)
}

/// Writes a uniquely named report next to earlier ones and keeps it.
fn write_failure_report(
    dir: &Path,
    polygon: &Polygon<f64>,
    density: f64,
    reason: &str,
) -> std::io::Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("voronoi-failure-")
        .suffix(".txt")
        .tempfile_in(dir)?;
    write!(
        file,
        "Error: {}\nDensity: {:.6}\nPolygon: {}\n",
        reason,
        density,
        polygon_wkt(polygon)
    )?;
    let (_, path) = file.keep().map_err(|e| e.error)?;
    Ok(path)
}

/// Well-known text for a polygon, rings closed.
fn polygon_wkt(polygon: &Polygon<f64>) -> String {
    let mut wkt = String::from("POLYGON (");
    for (i, ring) in polygon.rings().enumerate() {
        if i > 0 {
            wkt.push_str(", ");
        }
        wkt.push('(');
        for (j, p) in ring.iter().chain(ring.first()).enumerate() {
            if j > 0 {
                wkt.push_str(", ");
            }
            let _ = write!(wkt, "{} {}", p.x, p.y);
        }
        wkt.push(')');
    }
    wkt.push(')');
    wkt
}
