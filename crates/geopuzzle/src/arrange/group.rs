use nalgebra::Vector2;

use super::place::PlacedGroup;
use super::triangle::{Placement, Triangle};
use crate::error::NoRoom;

/// Slack allowed when a group's origin angle is checked against 180°.
const ANGLE_EPS: f64 = 1e-9;

/// Sweep direction around a group origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Angles grow from the +x axis toward +y.
    CounterClockwise,
    /// Mirror image: angles are measured from the −x axis.
    Clockwise,
}

/// Triangles sharing one origin on the baseline, before placement.
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleGroup {
    pub base: Option<(Triangle, Placement)>,
    pub direction: Direction,
    pub members: Vec<Triangle>,
    angle: f64,
}

impl TriangleGroup {
    pub fn new(base: Option<(Triangle, Placement)>, direction: Direction) -> Self {
        let angle = base.map_or(0.0, |(t, p)| p.origin_angle(&t));
        Self {
            base,
            direction,
            members: Vec::new(),
            angle,
        }
    }

    pub fn with_base(base: Triangle, placement: Placement) -> Self {
        Self::new(Some((base, placement)), Direction::CounterClockwise)
    }

    /// Angle used at the origin so far.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    #[inline]
    pub fn free_angle(&self) -> f64 {
        180.0 - self.angle
    }

    /// Angle at the base triangle's far baseline corner.
    pub fn base_outer_angle(&self) -> Option<f64> {
        self.base.map(|(t, p)| p.outer_angle(&t))
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        usize::from(self.base.is_some()) + self.members.len()
    }

    pub fn append(&mut self, t: Triangle) -> Result<(), NoRoom> {
        let angle = self.angle + t.shortest_angle;
        if angle > 180.0 + ANGLE_EPS {
            return Err(NoRoom {
                used: self.angle,
                needed: t.shortest_angle,
            });
        }
        self.angle = angle;
        self.members.push(t);
        Ok(())
    }

    pub fn extend<I: IntoIterator<Item = Triangle>>(&mut self, ts: I) -> Result<(), NoRoom> {
        ts.into_iter().try_for_each(|t| self.append(t))
    }

    /// Every triangle of the group, base first.
    pub fn triangles(&self) -> impl Iterator<Item = &Triangle> + '_ {
        self.base.iter().map(|(t, _)| t).chain(self.members.iter())
    }
}

/// An arm of a placed triangle: from the group origin to `end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arm {
    pub length: f64,
    /// Direction in degrees (already mirrored for clockwise groups).
    pub angle: f64,
    pub end: Vector2<f64>,
}

impl Arm {
    fn new(origin: Vector2<f64>, length: f64, angle: f64) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        Self {
            length,
            angle,
            end: origin + Vector2::new(length * cos, length * sin),
        }
    }
}

/// A triangle set at a group origin with explicit vertex positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedTriangle {
    pub triangle: Triangle,
    pub placement: Placement,
    pub origin: Vector2<f64>,
    pub origin_angle: f64,
    pub lower: Arm,
    pub upper: Arm,
}

impl PlacedTriangle {
    /// Set `t` with its lower arm at `angle`, sweeping in `direction`.
    ///
    /// Fails when the upper arm would pass 180°, up to a relative 1e-9.
    pub fn place(
        t: Triangle,
        origin_x: f64,
        angle: f64,
        direction: Direction,
        placement: Placement,
    ) -> Result<Self, NoRoom> {
        let origin_angle = placement.origin_angle(&t);
        let top = angle + origin_angle;
        if top > 180.0 && (top - 180.0).abs() > 1e-9 * top {
            return Err(NoRoom {
                used: angle,
                needed: origin_angle,
            });
        }
        let (bottom, top) = match direction {
            Direction::CounterClockwise => (angle, top),
            Direction::Clockwise => (180.0 - angle, 180.0 - top),
        };
        let origin = Vector2::new(origin_x, 0.0);
        let (lower, upper) = placement.arms();
        Ok(Self {
            triangle: t,
            placement,
            origin,
            origin_angle,
            lower: Arm::new(origin, t.side(lower), bottom),
            upper: Arm::new(origin, t.side(upper), top),
        })
    }

    pub fn shift_x(&mut self, dx: f64) {
        let d = Vector2::new(dx, 0.0);
        self.origin += d;
        self.lower.end += d;
        self.upper.end += d;
    }

    /// Origin, lower arm end, upper arm end.
    pub fn vertices(&self) -> [Vector2<f64>; 3] {
        [self.origin, self.lower.end, self.upper.end]
    }

    pub fn centroid(&self) -> Vector2<f64> {
        (self.origin + self.lower.end + self.upper.end) / 3.0
    }
}

/// Order and arm assignment for a group's non-base triangles.
///
/// - last group, or a clockwise one: middle side descending, longest side low;
/// - first group: middle side ascending, middle side low;
/// - when the predecessor's base leaves too little room or one of its points
///   leans over its base line: alternate, so the long sides meet in the middle;
/// - otherwise as for the first group.
pub(crate) fn member_order(
    group: &TriangleGroup,
    prev: Option<&PlacedGroup>,
    has_next: bool,
) -> Vec<(Triangle, Placement)> {
    let mut sorted = group.members.clone();
    if !has_next || group.direction == Direction::Clockwise {
        sorted.sort_by(|a, b| b.middle.total_cmp(&a.middle));
        return sorted
            .into_iter()
            .map(|t| (t, Placement::LongMiddle))
            .collect();
    }
    sorted.sort_by(|a, b| a.middle.total_cmp(&b.middle));
    let crowded = prev.is_some_and(|p| {
        p.group.base_outer_angle().unwrap_or(0.0) + group.angle() > 180.0
            || p.has_overlapping_point()
    });
    if !crowded {
        return sorted
            .into_iter()
            .map(|t| (t, Placement::MiddleLong))
            .collect();
    }
    let front = sorted.iter().step_by(2).map(|t| (*t, Placement::MiddleLong));
    let back = sorted
        .iter()
        .skip(1)
        .step_by(2)
        .rev()
        .map(|t| (*t, Placement::LongMiddle));
    front.chain(back).collect()
}

/// Lay out a group around `(0, 0)`: base first, then the ordered members.
///
/// Counter-clockwise groups leave the angle the predecessor does not need
/// empty, so their members lean away from it.
pub(crate) fn arrange_local(
    group: &TriangleGroup,
    prev: Option<&PlacedGroup>,
    has_next: bool,
) -> Result<Vec<PlacedTriangle>, NoRoom> {
    let mut placed = Vec::with_capacity(group.len());
    let mut angle = 0.0;
    if let Some((t, p)) = group.base {
        let pt = PlacedTriangle::place(t, 0.0, 0.0, group.direction, p)?;
        angle = pt.origin_angle;
        placed.push(pt);
    }
    if group.direction == Direction::CounterClockwise {
        let space = 180.0 - prev.map_or(0.0, |p| p.outer_angle) - group.angle();
        if space > 0.0 {
            angle += space;
        }
    }
    for (t, p) in member_order(group, prev, has_next) {
        let pt = PlacedTriangle::place(t, 0.0, angle, group.direction, p)?;
        angle += pt.origin_angle;
        placed.push(pt);
    }
    Ok(placed)
}

/// Put leftover triangles wherever there is still room.
///
/// Larger angles go first; each goes to the first group, in order of how close
/// its used angle is to 90°, with enough free angle.
pub fn insert_remaining(
    mut groups: Vec<TriangleGroup>,
    mut leftovers: Vec<Triangle>,
) -> Result<Vec<TriangleGroup>, NoRoom> {
    leftovers.sort_by(|a, b| b.shortest_angle.total_cmp(&a.shortest_angle));
    for t in leftovers {
        let mut order: Vec<usize> = (0..groups.len()).collect();
        order.sort_by(|&a, &b| {
            (90.0 - groups[a].angle())
                .abs()
                .total_cmp(&(90.0 - groups[b].angle()).abs())
        });
        let slot = order
            .into_iter()
            .find(|&i| groups[i].free_angle() >= t.shortest_angle)
            .ok_or(NoRoom {
                used: 180.0,
                needed: t.shortest_angle,
            })?;
        groups[slot].append(t)?;
    }
    Ok(groups)
}
