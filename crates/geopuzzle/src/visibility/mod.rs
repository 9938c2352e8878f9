//! Latest-departure path search among polygonal obstacles.
//!
//! Purpose
//! - Given a start point, obstacles and a goal whose arrival time depends on
//!   where it is reached, find the route that lets the runner leave as late as
//!   possible.
//!
//! Model
//! - Visibility graph: start, obstacle vertices and per-node goal candidates.
//!   An edge exists iff the straight segment crosses no obstacle edge and does
//!   not cut through the interior of a polygon owning one of its endpoints.
//! - Search: Dijkstra run backwards from the goals over "latest time still on
//!   schedule" labels (max-heap). Travel time is distance / runner speed.
//!
//! Code cross-refs: `geom2::{intersect, point_in_polygon, inflate}`.

mod build;
mod dijkstra;
mod types;

pub use build::build_graph;
pub use dijkstra::{extract_route, latest_departure, search, solve, Labels};
pub use types::{Goal, Graph, Node, NodeId, NodeKind, Polygon, PolygonId, Route, Scene, Stop};
