//! Error types for centerline operations.

use crate::polygon::Polygon;
use crate::skeleton::SkeletonGraph;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while building a centerline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CenterlineError {
    /// Geometry or options that the pipeline cannot work with, such as a
    /// line part with fewer than two points.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// The Voronoi engine failed on one buffer polygon.
    ///
    /// The pipeline absorbs this per polygon component.
    #[error("voronoi engine failed on a {}-vertex polygon at density {density}: {reason}", .polygon.vertex_count())]
    VoronoiEngineFailure {
        /// The polygon that triggered the failure.
        polygon: Box<Polygon<f64>>,
        /// Perimeter sampling density used for the request.
        density: f64,
        /// Engine-reported cause.
        reason: String,
    },

    /// Route extraction ran past its time budget.
    ///
    /// Carries the working copy of the graph at the moment the deadline was
    /// noticed.
    #[error("route extraction exceeded its {budget:?} budget with {} nodes left", .graph.node_count())]
    TimeoutExceeded {
        /// Budget that was exceeded.
        budget: Duration,
        /// The partially consumed graph, or the whole component skeleton
        /// when raised by [`Centerliner::centerline`](crate::Centerliner::centerline).
        graph: Box<SkeletonGraph>,
    },
}

impl CenterlineError {
    /// Shorthand for [`CenterlineError::InvalidInput`].
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        CenterlineError::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Errors reported by a Voronoi engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoronoiError {
    /// The engine process could not be started or fed its input.
    #[error("failed to run {program}: {reason}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O failure.
        reason: String,
    },

    /// The engine process exited unsuccessfully.
    #[error("engine exited with {}", exit_status(.code))]
    Exit {
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
    },

    /// The engine process did not finish in time and was killed.
    #[error("engine did not finish within {0:?}")]
    Timeout(Duration),

    /// The engine output did not follow the expected layout.
    #[error("malformed engine output: {0}")]
    Parse(String),
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status".to_string(),
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CenterlineError>;
