//! Edge-disjoint route extraction.
//!
//! Routes are paths through a skeleton graph between endpoint candidates,
//! found with A* under a time budget driven by a pluggable [`Clock`].

mod clock;
mod extract;
mod search;

pub use clock::{Clock, Deadline, ManualClock, MonotonicClock};
pub use extract::{
    graph_routes, graph_routes_with_clock, route_length, skeleton_routes, Route,
    DEFAULT_TIME_COEFFICIENT,
};
pub use search::{shortest_path, Weighting};
