//! Curated internal API (UNSTABLE).
//!
//! Important
//! - Not a public API. A convenience surface for the `cli` crate and benches.
//!   Breaking changes are allowed.

// Planar kernel
pub use crate::geom2::{
    bearing, centroid, distance, inflate, intersect, point_in_polygon, GeomCfg, Segment,
};
// Path search
pub use crate::visibility::{
    build_graph, latest_departure, search as search_route, solve as solve_route, Goal, Graph,
    NodeId, PolygonId, Route, Scene, Stop,
};
// Triangle arrangement
pub use crate::arrange::{
    search_arrangement, subset_angle_sum, ArrangeCfg, Arrangement, Direction, PlacedGroup,
    PlacedTriangle, Placement, Triangle,
};
// Errors
pub use crate::error::{Error, NoRoom, SceneError, TriangleError};
