use nalgebra::Vector2;
use rand::Rng;

use crate::error::TriangleError;
use crate::geom2::distance;

/// A triangle known by its sorted side lengths and the angles opposite them.
///
/// Angles are degrees and satisfy `shortest_angle <= middle_angle <= longest_angle`
/// with a sum of 180.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    /// Caller-assigned identity; unique within one arrangement problem.
    pub id: usize,
    pub shortest: f64,
    pub middle: f64,
    pub longest: f64,
    pub shortest_angle: f64,
    pub middle_angle: f64,
    pub longest_angle: f64,
}

/// Names a side of a triangle by its rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Shortest,
    Middle,
    Longest,
}

/// Angle opposite `opposite` between sides `b` and `c`, in degrees.
fn law_of_cosines(opposite: f64, b: f64, c: f64) -> f64 {
    ((b * b + c * c - opposite * opposite) / (2.0 * b * c))
        .clamp(-1.0, 1.0)
        .acos()
        .to_degrees()
}

impl Triangle {
    pub fn new(a: f64, b: f64, c: f64, id: usize) -> Result<Self, TriangleError> {
        if let Some(bad) = [a, b, c].into_iter().find(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(TriangleError::Side(bad));
        }
        let mut sides = [a, b, c];
        sides.sort_by(f64::total_cmp);
        let [shortest, middle, longest] = sides;
        if longest > shortest + middle {
            return Err(TriangleError::Inequality {
                shortest,
                middle,
                longest,
            });
        }
        let shortest_angle = law_of_cosines(shortest, middle, longest);
        let longest_angle = law_of_cosines(longest, middle, shortest);
        Ok(Self {
            id,
            shortest,
            middle,
            longest,
            shortest_angle,
            middle_angle: 180.0 - shortest_angle - longest_angle,
            longest_angle,
        })
    }

    /// Triangle through three points (side lengths only; position is discarded).
    pub fn from_points(
        a: Vector2<f64>,
        b: Vector2<f64>,
        c: Vector2<f64>,
        id: usize,
    ) -> Result<Self, TriangleError> {
        Self::new(distance(b, c), distance(a, c), distance(a, b), id)
    }

    /// Random triangle with integer sides in `[side_min, side_max]`.
    ///
    /// The third side is drawn so that the triangle is never degenerate.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        side_min: u32,
        side_max: u32,
        id: usize,
    ) -> Result<Self, TriangleError> {
        let lo = side_min.max(1);
        let hi = side_max.max(lo);
        let a = rng.gen_range(lo..=hi);
        let b = rng.gen_range(lo..=hi);
        let c_lo = (a.abs_diff(b) + 1).max(lo);
        // An overflowing a + b is past any u32 hi.
        let c_hi = a.checked_add(b).map_or(hi, |sum| (sum - 1).min(hi));
        let c = rng.gen_range(c_lo..=c_hi);
        Self::new(f64::from(a), f64::from(b), f64::from(c), id)
    }

    #[inline]
    pub fn side(&self, side: Side) -> f64 {
        match side {
            Side::Shortest => self.shortest,
            Side::Middle => self.middle,
            Side::Longest => self.longest,
        }
    }

    /// Angle opposite the given side.
    #[inline]
    pub fn angle_opposite(&self, side: Side) -> f64 {
        match side {
            Side::Shortest => self.shortest_angle,
            Side::Middle => self.middle_angle,
            Side::Longest => self.longest_angle,
        }
    }
}

/// Which sides become the lower and upper arm when a triangle is set at a group origin.
///
/// The third side is opposite the origin, so the angle at the origin is the
/// angle opposite that side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    LongMiddle,
    MiddleLong,
    LongShort,
    ShortLong,
    MiddleShort,
    ShortMiddle,
}

impl Placement {
    pub const ALL: [Placement; 6] = [
        Placement::LongMiddle,
        Placement::MiddleLong,
        Placement::LongShort,
        Placement::ShortLong,
        Placement::MiddleShort,
        Placement::ShortMiddle,
    ];

    /// `(lower, upper)` arm sides.
    pub const fn arms(self) -> (Side, Side) {
        match self {
            Placement::LongMiddle => (Side::Longest, Side::Middle),
            Placement::MiddleLong => (Side::Middle, Side::Longest),
            Placement::LongShort => (Side::Longest, Side::Shortest),
            Placement::ShortLong => (Side::Shortest, Side::Longest),
            Placement::MiddleShort => (Side::Middle, Side::Shortest),
            Placement::ShortMiddle => (Side::Shortest, Side::Middle),
        }
    }

    /// The side not touching the origin.
    pub const fn far_side(self) -> Side {
        match self {
            Placement::LongMiddle | Placement::MiddleLong => Side::Shortest,
            Placement::LongShort | Placement::ShortLong => Side::Middle,
            Placement::MiddleShort | Placement::ShortMiddle => Side::Longest,
        }
    }

    /// Angle at the group origin.
    #[inline]
    pub fn origin_angle(self, t: &Triangle) -> f64 {
        t.angle_opposite(self.far_side())
    }

    /// Angle at the far end of the lower arm, i.e. opposite the upper arm.
    ///
    /// For a base triangle this is the angle the next group has to respect.
    #[inline]
    pub fn outer_angle(self, t: &Triangle) -> f64 {
        t.angle_opposite(self.arms().1)
    }

    /// Short code: lower arm, upper arm, far side (`l`ongest, `s`econd, `b`rief).
    pub const fn code(self) -> &'static str {
        match self {
            Placement::LongMiddle => "lsb",
            Placement::MiddleLong => "slb",
            Placement::LongShort => "lbs",
            Placement::ShortLong => "bls",
            Placement::MiddleShort => "sbl",
            Placement::ShortMiddle => "bsl",
        }
    }
}
