//! Triangle arrangement on a baseline.
//!
//! Purpose
//! - Set every triangle with one corner on the x-axis, grouped around shared
//!   origins, without overlaps, so that the distance between the first and
//!   the last origin (the span) is small.
//!
//! Model
//! - A group collects triangles at one origin; their angles there add up to at
//!   most 180°. Groups after the first may start with a base triangle lying on
//!   the axis, which carries the baseline forward.
//! - `subset`: angle subset-sum filling the room in a group.
//! - `base`: lazy stream of base-triangle sets ordered by the distance they cover.
//! - `group`: order and arm assignment of triangles within a group, leftovers.
//! - `place`: local layout and left-to-right collision offsets between groups.
//! - `search`: greedy builders and the pruned outer loop.
//!
//! Code cross-refs: `geom2::bearing` (outer angles).

mod base;
mod group;
mod place;
mod search;
mod subset;
mod triangle;

pub use base::{base_candidates, BaseCandidate, BaseCandidates};
pub use group::{insert_remaining, Arm, Direction, PlacedTriangle, TriangleGroup};
pub use place::{place_groups, Arrangement, Edge, PlacedGroup};
pub use search::{
    arrange_two_groups, arrange_with_bases, arrange_with_reserve, search_arrangement, ArrangeCfg,
    Incumbent,
};
pub use subset::{subset_angle_sum, SubsetSum};
pub use triangle::{Placement, Side, Triangle};

#[cfg(test)]
mod tests;
