//! Core algorithms for two contest geometry puzzles.
//!
//! - Path search: a visibility graph among polygonal obstacles and a
//!   time-weighted Dijkstra that finds the latest possible departure that still
//!   reaches a goal (`visibility`).
//! - Triangle arrangement: packs triangles around shared origins on a baseline
//!   so that the horizontal span is as small as the greedy search can find
//!   (`arrange`).
//!
//! Both pipelines share only the small planar kernel in `geom2`.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; the `cli`
//!   crate is its only consumer.

pub mod api;
pub mod arrange;
pub mod error;
pub mod geom2;
pub mod visibility;

pub use error::{Error, NoRoom, SceneError, TriangleError};

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use geom2::GeomCfg;
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::arrange::{
        search_arrangement, ArrangeCfg, Arrangement, Direction, Placement, Triangle,
    };
    pub use crate::geom2::{bearing, distance, intersect, point_in_polygon, GeomCfg, Segment};
    pub use crate::visibility::{build_graph, latest_departure, solve, Goal, Graph, Route, Scene};
    pub use nalgebra::Vector2 as Vec2;
}
