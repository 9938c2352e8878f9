use nalgebra::Vector2;

use super::util::{bearing, perp};

/// Closed segment between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: Vector2<f64>,
    pub b: Vector2<f64>,
}

impl Segment {
    #[inline]
    pub fn new(a: Vector2<f64>, b: Vector2<f64>) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.b - self.a).norm()
    }

    /// Bearing from `a` to `b` in degrees.
    #[inline]
    pub fn angle(&self) -> f64 {
        bearing(self.a, self.b)
    }

    #[inline]
    pub fn midpoint(&self) -> Vector2<f64> {
        (self.a + self.b) * 0.5
    }

    /// True iff an endpoint of `self` equals an endpoint of `other` exactly.
    #[inline]
    pub fn shares_endpoint(&self, other: &Segment) -> bool {
        self.a == other.a || self.a == other.b || self.b == other.a || self.b == other.b
    }

    /// Inclusive range test along the segment's dominant coordinate.
    ///
    /// Vertical segments compare `y`; all others compare `x`. Only meaningful for
    /// points already known to lie on the segment's supporting line.
    pub fn in_range(&self, p: Vector2<f64>) -> bool {
        let (lo, hi, v) = if self.a.x == self.b.x {
            (self.a.y.min(self.b.y), self.a.y.max(self.b.y), p.y)
        } else {
            (self.a.x.min(self.b.x), self.a.x.max(self.b.x), p.x)
        };
        lo <= v && v <= hi
    }
}

/// Proper crossing point of two segments.
///
/// Returns `None` when the segments share an endpoint (compared exactly), when
/// their supporting lines are parallel or coincident, or when the line
/// intersection falls outside either segment.
pub fn intersect(s: &Segment, t: &Segment) -> Option<Vector2<f64>> {
    if s.shares_endpoint(t) {
        return None;
    }
    let x_diff = Vector2::new(s.a.x - s.b.x, t.a.x - t.b.x);
    let y_diff = Vector2::new(s.a.y - s.b.y, t.a.y - t.b.y);
    let div = perp(x_diff, y_diff);
    if div == 0.0 {
        return None;
    }
    let d = Vector2::new(perp(s.a, s.b), perp(t.a, t.b));
    let p = Vector2::new(perp(d, x_diff) / div, perp(d, y_diff) / div);
    (s.in_range(p) && t.in_range(p)).then_some(p)
}
