//! Tolerances shared by the planar predicates.

use nalgebra::Vector2;

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug)]
pub struct GeomCfg {
    /// Relative tolerance for near-equality of coordinates.
    pub rel_tol: f64,
    /// Absolute floor so that values near zero can still compare equal.
    pub abs_tol: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            rel_tol: 1e-9,
            abs_tol: 1e-9,
        }
    }
}

impl GeomCfg {
    /// `|a - b| <= max(rel_tol * max(|a|, |b|), abs_tol)`.
    #[inline]
    pub fn close(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= (self.rel_tol * a.abs().max(b.abs())).max(self.abs_tol)
    }

    /// Near-equality of positions, coordinate-wise.
    #[inline]
    pub fn same_point(&self, p: Vector2<f64>, q: Vector2<f64>) -> bool {
        self.close(p.x, q.x) && self.close(p.y, q.y)
    }
}
