use nalgebra::Vector2;

use super::intersect::{intersect, Segment};
use super::types::GeomCfg;
use super::util::{bearing, perp};

/// Closed-ring edges `v[i] → v[i+1]`, wrapping at the end.
pub fn ring_edges(ring: &[Vector2<f64>]) -> impl Iterator<Item = Segment> + '_ {
    let n = ring.len();
    (0..n).map(move |i| Segment::new(ring[i], ring[(i + 1) % n]))
}

/// Arithmetic mean of the vertices. Zero for an empty ring.
pub fn centroid(ring: &[Vector2<f64>]) -> Vector2<f64> {
    if ring.is_empty() {
        return Vector2::zeros();
    }
    ring.iter().fold(Vector2::zeros(), |acc, v| acc + v) / ring.len() as f64
}

/// True iff `p` lies on `seg` within tolerance (collinear and between the endpoints).
pub fn point_on_segment(p: Vector2<f64>, seg: &Segment, cfg: GeomCfg) -> bool {
    let d = seg.b - seg.a;
    let len = d.norm();
    if len == 0.0 {
        return cfg.same_point(p, seg.a);
    }
    let eps = cfg.abs_tol.max(cfg.rel_tol * len);
    let off = perp(d, p - seg.a).abs() / len;
    let t = d.dot(&(p - seg.a)) / len;
    off <= eps && t >= -eps && t <= len + eps
}

/// Point-in-polygon with the boundary counted as inside.
///
/// Casts a horizontal ray to the left, past both the polygon and the y-axis,
/// and counts crossings. Crossings that land on a polygon vertex are classified
/// by the side of the ray on which the edge's other endpoint lies; an odd
/// count of "below" or "above" touches resolves the vertex cases.
pub fn point_in_polygon(p: Vector2<f64>, ring: &[Vector2<f64>], cfg: GeomCfg) -> bool {
    if ring.len() < 3 {
        return false;
    }
    if ring_edges(ring).any(|e| point_on_segment(p, &e, cfg)) {
        return true;
    }
    let min_x = ring.iter().map(|v| v.x).fold(f64::INFINITY, f64::min);
    let ray = Segment::new(p, Vector2::new(min_x.min(0.0) - 1.0, p.y));

    let (mut count, mut under, mut over) = (0usize, 0usize, 0usize);
    for edge in ring_edges(ring) {
        let Some(hit) = intersect(&ray, &edge) else {
            continue;
        };
        if cfg.same_point(hit, p) {
            return true;
        }
        let other = if cfg.same_point(hit, edge.a) {
            edge.b
        } else if cfg.same_point(hit, edge.b) {
            edge.a
        } else {
            count += 1;
            continue;
        };
        if other.y < p.y {
            under += 1;
        } else if other.y > p.y {
            over += 1;
        }
    }
    if under % 2 != over % 2 {
        return true;
    }
    (count + under) % 2 == 1
}

/// Grow a polygon by a set of offset vectors.
///
/// Every vertex `v` contributes `v - o` for each offset `o` that lands outside
/// the original ring. The new points are ordered by bearing around the original
/// centroid; a point is dropped when both of its adjacent new edges cross an
/// original edge. When fewer than 3 new points survive, they are returned
/// unpruned; the original outline is never returned in their place.
pub fn inflate(
    outline: &[Vector2<f64>],
    offsets: &[Vector2<f64>],
    cfg: GeomCfg,
) -> Vec<Vector2<f64>> {
    let c = centroid(outline);
    let mut pts: Vec<Vector2<f64>> = outline
        .iter()
        .flat_map(|v| offsets.iter().map(move |o| v - o))
        .filter(|q| !point_in_polygon(*q, outline, cfg))
        .collect();
    pts.sort_by(|a, b| bearing(c, *a).total_cmp(&bearing(c, *b)));
    pts.dedup_by(|a, b| cfg.same_point(*a, *b));

    let n = pts.len();
    if n < 3 {
        return pts;
    }
    let crosses: Vec<bool> = ring_edges(&pts)
        .map(|s| ring_edges(outline).any(|e| intersect(&s, &e).is_some()))
        .collect();
    pts.iter()
        .enumerate()
        .filter(|(i, _)| !(crosses[(i + n - 1) % n] && crosses[*i]))
        .map(|(_, q)| *q)
        .collect()
}
