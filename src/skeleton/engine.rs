//! Voronoi engines.
//!
//! A [`VoronoiEngine`] turns perimeter samples into a Voronoi diagram in the
//! `qvoronoi o` layout. [`DelaunayEngine`] computes it in-process;
//! [`QhullEngine`] runs an external `qvoronoi` binary.

use super::protocol::{format_request, parse_response};
use crate::error::VoronoiError;
use crate::primitives::Point2;
use crate::triangulation::{voronoi_diagram, VoronoiDiagram};
use log::debug;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Default wall-clock limit for an external engine run.
pub const DEFAULT_ENGINE_TIMEOUT: Duration = Duration::from_secs(60);

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Computes Voronoi diagrams of point sets.
///
/// The returned diagram must use index 0 for the point at infinity and list
/// one cell per site, in site order.
pub trait VoronoiEngine: Send + Sync {
    /// Computes the Voronoi diagram of `sites`.
    fn voronoi(&self, sites: &[Point2<f64>]) -> Result<VoronoiDiagram<f64>, VoronoiError>;
}

impl<E: VoronoiEngine + ?Sized> VoronoiEngine for &E {
    fn voronoi(&self, sites: &[Point2<f64>]) -> Result<VoronoiDiagram<f64>, VoronoiError> {
        (**self).voronoi(sites)
    }
}

impl<E: VoronoiEngine + ?Sized> VoronoiEngine for Box<E> {
    fn voronoi(&self, sites: &[Point2<f64>]) -> Result<VoronoiDiagram<f64>, VoronoiError> {
        (**self).voronoi(sites)
    }
}

/// In-process engine built on a Bowyer-Watson Delaunay triangulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DelaunayEngine;

impl VoronoiEngine for DelaunayEngine {
    fn voronoi(&self, sites: &[Point2<f64>]) -> Result<VoronoiDiagram<f64>, VoronoiError> {
        Ok(voronoi_diagram(sites))
    }
}

/// Engine that runs `qvoronoi o` as a child process.
///
/// # Example
///
/// ```no_run
/// use centerline::skeleton::{QhullEngine, VoronoiEngine};
/// use centerline::Point2;
/// use std::time::Duration;
///
/// let engine = QhullEngine::new()
///     .program("/usr/local/bin/qvoronoi")
///     .timeout(Duration::from_secs(10));
///
/// let sites: Vec<Point2<f64>> = (0..8)
///     .map(|i| Point2::new((i % 4) as f64, (i / 4) as f64))
///     .collect();
/// let voronoi = engine.voronoi(&sites).unwrap();
/// assert_eq!(voronoi.cells.len(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QhullEngine {
    /// Path or name of the `qvoronoi` executable.
    pub program: PathBuf,
    /// Wall-clock limit for one run.
    pub timeout: Duration,
}

impl Default for QhullEngine {
    fn default() -> Self {
        Self {
            program: PathBuf::from("qvoronoi"),
            timeout: DEFAULT_ENGINE_TIMEOUT,
        }
    }
}

impl QhullEngine {
    /// Creates an engine that runs `qvoronoi` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the executable to run.
    pub fn program(mut self, program: impl AsRef<Path>) -> Self {
        self.program = program.as_ref().to_path_buf();
        self
    }

    /// Sets the wall-clock limit.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn spawn_error(&self, err: impl ToString) -> VoronoiError {
        VoronoiError::Spawn {
            program: self.program.display().to_string(),
            reason: err.to_string(),
        }
    }
}

impl VoronoiEngine for QhullEngine {
    fn voronoi(&self, sites: &[Point2<f64>]) -> Result<VoronoiDiagram<f64>, VoronoiError> {
        let started = Instant::now();
        let mut child = Command::new(&self.program)
            .arg("o")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // Drain stdout on its own thread so a large diagram cannot block the
        // child while we wait on it
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| self.spawn_error("stdout not captured"))?;
        let reader = thread::spawn(move || {
            let mut output = String::new();
            stdout.read_to_string(&mut output).map(|_| output)
        });

        let fed = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(format_request(sites).as_bytes()),
            None => Ok(()),
        };

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if started.elapsed() > self.timeout => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(VoronoiError::Timeout(self.timeout));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    return Err(self.spawn_error(e));
                }
            }
        };

        if !status.success() {
            return Err(VoronoiError::Exit {
                code: status.code(),
            });
        }
        fed.map_err(|e| self.spawn_error(e))?;

        let output = reader
            .join()
            .map_err(|_| VoronoiError::Parse("output reader panicked".to_string()))?
            .map_err(|e| VoronoiError::Parse(e.to_string()))?;

        debug!(
            "{} computed {} sites in {:.3}s",
            self.program.display(),
            sites.len(),
            started.elapsed().as_secs_f64()
        );
        parse_response(&output)
    }
}
