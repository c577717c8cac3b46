//! Polyline simplification and densification.

mod densify;
mod rdp;
mod visvalingam;

pub use densify::{densify_line, densify_ring};
pub use rdp::{rdp_indices, simplify_line_dp};
pub use visvalingam::{simplify_line_vw, visvalingam_indices};
