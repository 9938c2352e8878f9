use nalgebra::Vector2;

/// Euclidean distance.
#[inline]
pub fn distance(p: Vector2<f64>, q: Vector2<f64>) -> f64 {
    (q - p).norm()
}

/// Direction from `from` to `to` in degrees: 0° = +x, 90° = +y, 180° = −x, 270° = −y.
///
/// Normalised with `rem_euclid(360)`.
#[inline]
pub fn bearing(from: Vector2<f64>, to: Vector2<f64>) -> f64 {
    let d = to - from;
    d.y.atan2(d.x).to_degrees().rem_euclid(360.0)
}

/// Rotate `p` counter-clockwise about `origin` by `degrees`.
pub fn rotate_about(p: Vector2<f64>, origin: Vector2<f64>, degrees: f64) -> Vector2<f64> {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let d = p - origin;
    Vector2::new(d.x * cos - d.y * sin, d.y * cos + d.x * sin) + origin
}

/// Perp-dot (2D cross) product `a.x * b.y - a.y * b.x`.
#[inline]
pub fn perp(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}
