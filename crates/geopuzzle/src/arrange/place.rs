use nalgebra::Vector2;
use tracing::trace;

use super::group::{arrange_local, Direction, PlacedTriangle, TriangleGroup};
use super::search::ArrangeCfg;
use crate::error::NoRoom;
use crate::geom2::bearing;

/// A boundary edge ordered by height (`low.y <= high.y`, ties keep input order).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub low: Vector2<f64>,
    pub high: Vector2<f64>,
}

impl Edge {
    fn by_height(a: Vector2<f64>, b: Vector2<f64>) -> Self {
        if b.y < a.y {
            Self { low: b, high: a }
        } else {
            Self { low: a, high: b }
        }
    }
}

/// A group placed on the baseline.
#[derive(Clone, Debug)]
pub struct PlacedGroup {
    pub group: TriangleGroup,
    pub origin: Vector2<f64>,
    pub triangles: Vec<PlacedTriangle>,
    /// Exposed boundary points seen from the right, with the origin they hang off.
    pub relevant_points: Vec<(Vector2<f64>, Vector2<f64>)>,
    /// Exposed boundary edges seen from the right, with their origin.
    pub relevant_lines: Vec<(Edge, Vector2<f64>)>,
    /// Angle at the right end of this group's footprint that a successor must respect.
    pub outer_angle: f64,
}

impl PlacedGroup {
    /// True iff the origin or a vertex of a later triangle lies strictly left
    /// of the line from the first triangle's lower arm end to its upper arm end
    /// (seen along the line).
    ///
    /// Only the first triangle's own arm ends are skipped; a congruent member
    /// whose vertex coincides with one of them is still checked.
    pub fn has_overlapping_point(&self) -> bool {
        let Some((first, rest)) = self.triangles.split_first() else {
            return false;
        };
        let (l1, l2) = (first.lower.end, first.upper.end);
        std::iter::once(self.origin)
            .chain(rest.iter().flat_map(|t| [t.upper.end, t.lower.end]))
            .any(|p| (p.x - l1.x) * (l2.y - l1.y) - (p.y - l1.y) * (l2.x - l1.x) > 0.0)
    }
}

/// The finished layout.
#[derive(Clone, Debug)]
pub struct Arrangement {
    pub groups: Vec<PlacedGroup>,
    /// x of the last group's origin (the first group sits at 0).
    pub span: f64,
}

impl Arrangement {
    pub fn triangles(&self) -> impl Iterator<Item = &PlacedTriangle> + '_ {
        self.groups.iter().flat_map(|g| g.triangles.iter())
    }

    pub fn triangle_count(&self) -> usize {
        self.groups.iter().map(|g| g.triangles.len()).sum()
    }
}

fn group_points(origin: Vector2<f64>, triangles: &[PlacedTriangle]) -> Vec<Vector2<f64>> {
    std::iter::once(origin)
        .chain(triangles.iter().flat_map(|t| [t.upper.end, t.lower.end]))
        .collect()
}

fn outer_lines(triangles: &[PlacedTriangle]) -> Vec<Edge> {
    triangles
        .iter()
        .map(|t| Edge::by_height(t.upper.end, t.lower.end))
        .collect()
}

/// Place groups left to right; empty groups are dropped first.
pub fn place_groups(groups: Vec<TriangleGroup>, cfg: &ArrangeCfg) -> Result<Arrangement, NoRoom> {
    let groups: Vec<TriangleGroup> = groups.into_iter().filter(|g| !g.is_empty()).collect();
    let n = groups.len();
    let mut placed: Vec<PlacedGroup> = Vec::with_capacity(n);
    for (i, group) in groups.into_iter().enumerate() {
        let pg = place_group(group, placed.last(), i + 1 < n, cfg)?;
        placed.push(pg);
    }
    let span = placed.last().map_or(0.0, |g| g.origin.x);
    Ok(Arrangement {
        groups: placed,
        span,
    })
}

pub(crate) fn place_group(
    group: TriangleGroup,
    prev: Option<&PlacedGroup>,
    has_next: bool,
    cfg: &ArrangeCfg,
) -> Result<PlacedGroup, NoRoom> {
    let mut triangles = arrange_local(&group, prev, has_next)?;

    let x = match prev {
        None => 0.0,
        Some(p) if shares_origin(&group, p) => p.origin.x,
        Some(p) => {
            let points = group_points(Vector2::zeros(), &triangles);
            let lines = outer_lines(&triangles);
            required_offset(p, &points, &lines, cfg.flat_edge_tolerance).unwrap_or(p.origin.x)
        }
    };
    for t in &mut triangles {
        t.shift_x(x);
    }
    let origin = Vector2::new(x, 0.0);

    let (relevant_points, relevant_lines) = exposed_boundary(&group, origin, &triangles, prev);
    let outer_angle = match triangles.first() {
        Some(first) => {
            let from = if first.lower.end.y == 0.0 {
                first.lower.end
            } else {
                origin
            };
            relevant_points
                .iter()
                .map(|(p, _)| *p)
                .filter(|p| *p != from)
                .map(|p| bearing(from, p))
                .min_by(f64::total_cmp)
                .map_or(0.0, |a| 180.0 - a)
        }
        None => 0.0,
    };
    trace!(x, outer_angle, triangles = triangles.len(), "group placed");
    Ok(PlacedGroup {
        group,
        origin,
        triangles,
        relevant_points,
        relevant_lines,
        outer_angle,
    })
}

/// A counter-clockwise group may share the origin of a clockwise predecessor
/// when their angles together stay below 180°.
fn shares_origin(group: &TriangleGroup, prev: &PlacedGroup) -> bool {
    group.direction == Direction::CounterClockwise
        && prev.group.direction == Direction::Clockwise
        && group.angle() + prev.group.angle() < 180.0
}

/// How far right a vertex has to sit to clear an edge at its height.
///
/// `own_vertex` says whether the vertex belongs to the group being placed (its
/// shift must put it right of the edge) or to an earlier group (the shifted
/// edge must end up right of it). Edges whose ends differ in height by at most
/// `flat_tol` count as horizontal. `None` if the vertex is outside the edge's
/// height range.
pub(crate) fn clearance(
    v: Vector2<f64>,
    edge: Edge,
    own_vertex: bool,
    flat_tol: f64,
) -> Option<f64> {
    let Edge { low, high } = edge;
    if !(low.y <= v.y && v.y <= high.y) {
        return None;
    }
    let flat = (low.y - high.y).abs() <= (1e-9 * low.y.abs().max(high.y.abs())).max(flat_tol);
    Some(if flat {
        if own_vertex {
            low.x.max(high.x) - v.x
        } else {
            v.x - low.x.min(high.x)
        }
    } else {
        let ix = (v.y - low.y) * ((high.x - low.x) / (high.y - low.y)) + low.x;
        if own_vertex {
            ix - v.x
        } else {
            v.x - ix
        }
    })
}

/// Largest shift that keeps the new group (given around `(0, 0)`) clear of
/// everything already placed. `None` if no pair constrains it.
fn required_offset(
    prev: &PlacedGroup,
    points: &[Vector2<f64>],
    lines: &[Edge],
    flat_tol: f64,
) -> Option<f64> {
    let local = Vector2::zeros();
    let mut best: Option<f64> = None;
    let mut take = |x: Option<f64>| {
        if let Some(x) = x {
            best = Some(best.map_or(x, |b| b.max(x)));
        }
    };
    for &p in points {
        for &(q, q_origin) in &prev.relevant_points {
            take(clearance(p, Edge { low: q_origin, high: q }, true, flat_tol));
        }
    }
    for &(q, _) in &prev.relevant_points {
        for &p in points {
            take(clearance(q, Edge { low: local, high: p }, false, flat_tol));
        }
    }
    for &p in points {
        for &(line, _) in &prev.relevant_lines {
            take(clearance(p, line, true, flat_tol));
        }
    }
    for &(q, _) in &prev.relevant_points {
        for &line in lines {
            take(clearance(q, line, false, flat_tol));
        }
    }
    best
}

/// Boundary of everything placed so far as seen from the right.
///
/// Walks this group's outer edges (top-down for clockwise groups) and then the
/// predecessor's exposed edges, keeping an edge only if it reaches higher than
/// anything kept before it.
fn exposed_boundary(
    group: &TriangleGroup,
    origin: Vector2<f64>,
    triangles: &[PlacedTriangle],
    prev: Option<&PlacedGroup>,
) -> (Vec<(Vector2<f64>, Vector2<f64>)>, Vec<(Edge, Vector2<f64>)>) {
    let mut own: Vec<(Edge, Vector2<f64>)> =
        outer_lines(triangles).into_iter().map(|e| (e, origin)).collect();
    if group.direction == Direction::Clockwise {
        own.reverse();
    }
    let inherited = prev.into_iter().flat_map(|p| p.relevant_lines.iter().copied());

    let mut min_y = -1.0;
    let mut points = Vec::new();
    let mut lines = Vec::new();
    for (edge, o) in own.into_iter().chain(inherited) {
        if edge.high.y > min_y {
            if edge.low.y > min_y {
                points.push((edge.low, o));
            }
            min_y = edge.high.y;
            points.push((edge.high, o));
            lines.push((edge, o));
        }
    }
    (points, lines)
}
