//! Planar kernel (points, segments, intersections, point-in-polygon).
//!
//! Conventions
//! - Points are `nalgebra::Vector2<f64>`.
//! - Angles are degrees. `bearing(p, q)` is 0° toward +x and 90° toward +y.
//! - "Same position" checks go through `GeomCfg::same_point`; shared segment
//!   endpoints compare exactly.
//!
//! Code cross-refs: `visibility::build` (all predicates), `arrange::place`
//! (`bearing`, `rotate_about`).

mod intersect;
mod polygon;
mod types;
mod util;

pub use intersect::{intersect, Segment};
pub use polygon::{centroid, inflate, point_in_polygon, point_on_segment, ring_edges};
pub use types::GeomCfg;
pub use util::{bearing, distance, perp, rotate_about};
